mod state;

use std::time::Duration;

use api_types::auth::Credentials;
use chrono::Local;
use crossterm::event::{self, Event, KeyEvent};
use engine::DATE_KEY_FORMAT;
use tracing::{debug, error, info, warn};

use crate::{
    client::{ApiClient, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    records,
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use state::{
    AppState, BudgetField, BudgetUsage, ChartKind, ExpenseField, FilterField, ListMode,
    LoginField, LoginMode, Screen, Section,
};
use state::{BudgetForm, ExpenseForm};

pub struct App {
    client: ApiClient,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url)?;
        let currency = config.currency()?;
        let state = AppState::new(config.username, currency, config.base_url);

        Ok(Self {
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key).await;
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(action).await,
            Screen::Main => match self.state.section {
                Section::Expenses => self.handle_expenses_key(action).await,
                Section::Budgets => self.handle_budgets_key(action).await,
            },
        }
    }

    async fn handle_login_key(&mut self, action: AppAction) {
        let login = &mut self.state.login;
        match action {
            AppAction::NextField | AppAction::PrevField => login.advance_focus(),
            AppAction::Up | AppAction::Down => login.toggle_mode(),
            AppAction::Backspace => {
                login.active_field_mut().pop();
            }
            AppAction::Input(ch) => login.active_field_mut().push(ch),
            AppAction::Submit => self.attempt_login().await,
            AppAction::Cancel => self.should_quit = true,
            AppAction::Quit | AppAction::None => {}
        }
    }

    async fn attempt_login(&mut self) {
        let username = self.state.login.username.trim().to_string();
        let password = self.state.login.password.clone();
        if username.is_empty() || password.is_empty() {
            self.state.login.message = Some("Username and password are required.".to_string());
            return;
        }
        let credentials = Credentials { username, password };

        if self.state.login.mode == LoginMode::Register {
            match self.client.register(&credentials).await {
                Ok(message) => {
                    info!(username = %credentials.username, "registered");
                    self.state.login.toggle_mode();
                    self.state.login.password.clear();
                    self.state.login.notice = Some(if message.trim().is_empty() {
                        "Registration successful, please log in.".to_string()
                    } else {
                        message.trim().to_string()
                    });
                }
                Err(err) => {
                    warn!(error = %err, "registration failed");
                    self.state.login.message = Some(login_message_for_error(err));
                }
            }
            return;
        }

        match self.client.login(&credentials).await {
            Ok(session) => {
                info!(username = %session.username, "logged in");
                self.state.session = Some(session);
                self.state.screen = Screen::Main;
                self.state.login.password.clear();
                self.state.login.message = None;
                self.state.login.notice = None;
                self.load_profile().await;
                self.load_expenses().await;
                self.load_budgets().await;
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.state.login.message = Some(login_message_for_error(err));
            }
        }
    }

    fn logout(&mut self, message: Option<String>) {
        info!("logged out");
        self.state.logout(message);
    }

    /// Turns a failed call into a message for the view. An expired session
    /// sends the user back to the login screen instead.
    fn report(&mut self, err: ClientError) -> Option<String> {
        if matches!(err, ClientError::Unauthorized) {
            warn!("session rejected by the server");
            self.logout(Some("Session expired, please log in again.".to_string()));
            return None;
        }
        error!(error = %err, "request failed");
        Some(message_for_error(err))
    }

    async fn load_profile(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        match self.client.me(&session).await {
            Ok(profile) => self.state.profile = profile.username,
            Err(err) => warn!(error = %err, "could not load profile"),
        }
    }

    async fn load_expenses(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        match self.client.expenses(&session).await {
            Ok(views) => {
                let records: Vec<_> = views.into_iter().map(records::expense_from_view).collect();
                debug!(count = records.len(), "expenses fetched");
                self.state.expenses.set_records(records);
                self.state.expenses.error = None;
                self.state.last_refresh = Some(Local::now());
            }
            Err(err) => {
                if let Some(message) = self.report(err) {
                    self.state.expenses.error = Some(message);
                }
            }
        }
    }

    async fn load_budgets(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        match self.client.budgets(&session).await {
            Ok(views) => {
                let budgets: Vec<_> = views.into_iter().map(records::budget_from_view).collect();
                debug!(count = budgets.len(), "budgets fetched");
                self.state.budgets.set_budgets(budgets);
                self.state.budgets.error = None;
                self.state.last_refresh = Some(Local::now());
            }
            Err(err) => {
                if let Some(message) = self.report(err) {
                    self.state.budgets.error = Some(message);
                }
                return;
            }
        }

        for category in self.state.budgets.categories() {
            match self.client.budget_status(&session, &category).await {
                Ok(status) => {
                    let usage = BudgetUsage::from(&status);
                    self.state.budgets.usage.insert(category, usage);
                }
                Err(ClientError::Unauthorized) => {
                    self.report(ClientError::Unauthorized);
                    return;
                }
                Err(err) => warn!(%category, error = %err, "budget status unavailable"),
            }
        }
    }

    async fn handle_expenses_key(&mut self, action: AppAction) {
        match self.state.expenses.mode {
            ListMode::List => self.handle_expenses_list_key(action).await,
            ListMode::Filter => self.handle_filter_key(action),
            ListMode::Form => self.handle_expense_form_key(action).await,
            ListMode::ConfirmDelete => {
                self.state.expenses.mode = ListMode::List;
                if action == AppAction::Input('y') {
                    self.delete_selected_expense().await;
                }
            }
        }
    }

    async fn handle_expenses_list_key(&mut self, action: AppAction) {
        let expenses = &mut self.state.expenses;
        match action {
            AppAction::Up | AppAction::Input('k') => expenses.select_prev(),
            AppAction::Down | AppAction::Input('j') => expenses.select_next(),
            AppAction::NextField | AppAction::PrevField => {
                self.state.section = self.state.section.next();
            }
            AppAction::Input('/') => expenses.mode = ListMode::Filter,
            AppAction::Input('c') => expenses.clear_filters(),
            AppAction::Input('g') => expenses.next_chart(),
            AppAction::Input('a') => {
                let today = Local::now().date_naive().format(DATE_KEY_FORMAT).to_string();
                expenses.form = ExpenseForm::create(&today);
                expenses.mode = ListMode::Form;
            }
            AppAction::Input('e') | AppAction::Submit => {
                if let Some(expense) = expenses.selected_expense() {
                    if expense.id.is_some() {
                        expenses.form = ExpenseForm::edit(expense);
                        expenses.mode = ListMode::Form;
                    } else {
                        expenses.error = Some("This expense has no id and cannot be edited.".to_string());
                    }
                }
            }
            AppAction::Input('d') => {
                if expenses.selected_expense().and_then(|e| e.id).is_some() {
                    expenses.mode = ListMode::ConfirmDelete;
                }
            }
            AppAction::Input('r') => {
                self.load_expenses().await;
            }
            AppAction::Input('l') => self.logout(None),
            AppAction::Input('q') | AppAction::Cancel => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, action: AppAction) {
        let expenses = &mut self.state.expenses;
        let field = expenses.filter_focus;
        match action {
            AppAction::NextField => expenses.filter_focus = field.next(),
            AppAction::PrevField => expenses.filter_focus = field.prev(),
            AppAction::Up if field == FilterField::Category => expenses.cycle_category(false),
            AppAction::Down if field == FilterField::Category => expenses.cycle_category(true),
            AppAction::Backspace => {
                expenses.filter_field_mut(field).pop();
                expenses.recompute();
            }
            AppAction::Input(ch) => {
                expenses.filter_field_mut(field).push(ch);
                expenses.recompute();
            }
            AppAction::Submit | AppAction::Cancel => expenses.mode = ListMode::List,
            _ => {}
        }
    }

    async fn handle_expense_form_key(&mut self, action: AppAction) {
        let form = &mut self.state.expenses.form;
        let field = form.focus();
        match action {
            AppAction::NextField | AppAction::Down => form.focus = Some(field.next()),
            AppAction::PrevField | AppAction::Up => form.focus = Some(field.prev()),
            AppAction::Backspace => {
                form.field_mut().pop();
            }
            AppAction::Input(ch) => form.field_mut().push(ch),
            AppAction::Submit => self.submit_expense().await,
            AppAction::Cancel => self.state.expenses.mode = ListMode::List,
            _ => {}
        }
    }

    async fn submit_expense(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        let form = &mut self.state.expenses.form;
        let valid = match form.draft.validate() {
            Ok(valid) => valid,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };
        let editing = form.editing;
        let body = records::expense_body(valid);

        let res = match editing {
            Some(id) => self.client.update_expense(&session, id, &body).await,
            None => self.client.create_expense(&session, &body).await,
        };
        match res {
            Ok(()) => {
                info!(id = ?editing, "expense saved");
                self.state.expenses.mode = ListMode::List;
                self.load_expenses().await;
            }
            Err(err) => {
                if let Some(message) = self.report(err) {
                    self.state.expenses.form.error = Some(message);
                }
            }
        }
    }

    async fn delete_selected_expense(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        let Some(id) = self.state.expenses.selected_expense().and_then(|e| e.id) else {
            return;
        };
        match self.client.delete_expense(&session, id).await {
            Ok(()) => {
                info!(id, "expense deleted");
                self.load_expenses().await;
            }
            Err(err) => {
                if let Some(message) = self.report(err) {
                    self.state.expenses.error = Some(message);
                }
            }
        }
    }

    async fn handle_budgets_key(&mut self, action: AppAction) {
        match self.state.budgets.mode {
            ListMode::List | ListMode::Filter => self.handle_budgets_list_key(action).await,
            ListMode::Form => self.handle_budget_form_key(action).await,
            ListMode::ConfirmDelete => {
                self.state.budgets.mode = ListMode::List;
                if action == AppAction::Input('y') {
                    self.delete_selected_budget().await;
                }
            }
        }
    }

    async fn handle_budgets_list_key(&mut self, action: AppAction) {
        let budgets = &mut self.state.budgets;
        match action {
            AppAction::Up | AppAction::Input('k') => budgets.select_prev(),
            AppAction::Down | AppAction::Input('j') => budgets.select_next(),
            AppAction::NextField | AppAction::PrevField => {
                self.state.section = self.state.section.next();
            }
            AppAction::Input('a') => {
                budgets.form = BudgetForm::create();
                budgets.mode = ListMode::Form;
            }
            AppAction::Input('e') | AppAction::Submit => {
                if let Some(budget) = budgets.selected_budget() {
                    if budget.id.is_some() {
                        budgets.form = BudgetForm::edit(budget);
                        budgets.mode = ListMode::Form;
                    } else {
                        budgets.error = Some("This budget has no id and cannot be edited.".to_string());
                    }
                }
            }
            AppAction::Input('d') => {
                if budgets.selected_budget().and_then(|b| b.id).is_some() {
                    budgets.mode = ListMode::ConfirmDelete;
                }
            }
            AppAction::Input('r') => self.load_budgets().await,
            AppAction::Input('l') => self.logout(None),
            AppAction::Input('q') | AppAction::Cancel => self.should_quit = true,
            _ => {}
        }
    }

    async fn handle_budget_form_key(&mut self, action: AppAction) {
        let form = &mut self.state.budgets.form;
        let field = form.focus();
        match action {
            AppAction::NextField => form.focus = Some(field.next()),
            AppAction::PrevField => form.focus = Some(field.prev()),
            AppAction::Up if field == BudgetField::Category => form.cycle_category(false),
            AppAction::Down if field == BudgetField::Category => form.cycle_category(true),
            AppAction::Up => form.focus = Some(field.prev()),
            AppAction::Down => form.focus = Some(field.next()),
            AppAction::Backspace => {
                form.field_mut().pop();
            }
            AppAction::Input(ch) => form.field_mut().push(ch),
            AppAction::Submit => self.submit_budget().await,
            AppAction::Cancel => self.state.budgets.mode = ListMode::List,
            _ => {}
        }
    }

    async fn submit_budget(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        let form = &mut self.state.budgets.form;
        let valid = match form.draft.validate() {
            Ok(valid) => valid,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };
        let editing = form.editing;
        let body = records::budget_body(valid);

        let res = match editing {
            Some(id) => self.client.update_budget(&session, id, &body).await,
            None => self.client.create_budget(&session, &body).await,
        };
        match res {
            Ok(()) => {
                info!(id = ?editing, category = %body.category, "budget saved");
                self.state.budgets.mode = ListMode::List;
                self.load_budgets().await;
            }
            Err(err) => {
                if let Some(message) = self.report(err) {
                    self.state.budgets.form.error = Some(message);
                }
            }
        }
    }

    async fn delete_selected_budget(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };
        let Some(id) = self.state.budgets.selected_budget().and_then(|b| b.id) else {
            return;
        };
        match self.client.delete_budget(&session, id).await {
            Ok(()) => {
                info!(id, "budget deleted");
                self.load_budgets().await;
            }
            Err(err) => {
                if let Some(message) = self.report(err) {
                    self.state.budgets.error = Some(message);
                }
            }
        }
    }
}

fn login_message_for_error(err: ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Invalid username or password.".to_string()
        }
        other => message_for_error(other),
    }
}

fn message_for_error(err: ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Not logged in.".to_string(),
        ClientError::Forbidden => "You are not allowed to do that.".to_string(),
        ClientError::NotFound => "Record not found, refresh with r.".to_string(),
        ClientError::Validation(message) => format!("Rejected by the server: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_errors_hide_the_reason() {
        assert_eq!(
            login_message_for_error(ClientError::Forbidden),
            "Invalid username or password."
        );
        assert_eq!(
            login_message_for_error(ClientError::Validation("Username is already taken".into())),
            "Rejected by the server: Username is already taken"
        );
    }

    #[test]
    fn app_starts_on_login_with_configured_user() {
        let config = AppConfig {
            username: "alice".to_string(),
            currency: "eur".to_string(),
            ..AppConfig::default()
        };
        let app = App::new(config).unwrap();
        assert_eq!(app.state.screen, Screen::Login);
        assert_eq!(app.state.login.username, "alice");
        assert_eq!(app.state.currency, engine::Currency::Eur);
    }

    #[tokio::test]
    async fn filter_keys_recompute_on_every_stroke() {
        let mut app = App::new(AppConfig::default()).unwrap();
        app.state.screen = Screen::Main;
        app.state.expenses.set_records(vec![
            engine::Expense {
                id: Some(1),
                amount: Some(engine::Money::new(500)),
                category: Some("Food".to_string()),
                ..engine::Expense::default()
            },
            engine::Expense {
                id: Some(2),
                amount: Some(engine::Money::new(5000)),
                category: Some("Bills".to_string()),
                ..engine::Expense::default()
            },
        ]);

        app.handle_expenses_key(AppAction::Input('/')).await;
        assert_eq!(app.state.expenses.mode, ListMode::Filter);
        app.handle_expenses_key(AppAction::NextField).await;
        app.handle_expenses_key(AppAction::NextField).await;
        app.handle_expenses_key(AppAction::NextField).await;
        assert_eq!(app.state.expenses.filter_focus, FilterField::MinAmount);
        app.handle_expenses_key(AppAction::Input('1')).await;
        app.handle_expenses_key(AppAction::Input('0')).await;
        assert_eq!(app.state.expenses.rows.len(), 1);
        app.handle_expenses_key(AppAction::Input('x')).await;
        assert!(app.state.expenses.filter_error.is_some());
        assert_eq!(app.state.expenses.rows.len(), 1);
        app.handle_expenses_key(AppAction::Backspace).await;
        app.handle_expenses_key(AppAction::Backspace).await;
        assert_eq!(app.state.expenses.rows.len(), 2);
        app.handle_expenses_key(AppAction::Cancel).await;
        assert_eq!(app.state.expenses.mode, ListMode::List);
    }

    #[tokio::test]
    async fn invalid_budget_form_shows_first_message() {
        let mut app = App::new(AppConfig::default()).unwrap();
        app.state.screen = Screen::Main;
        app.state.section = Section::Budgets;
        app.state.session = Some(crate::session::Session::new("alice", "t"));

        app.handle_budgets_key(AppAction::Input('a')).await;
        assert_eq!(app.state.budgets.mode, ListMode::Form);
        app.handle_budgets_key(AppAction::Submit).await;
        assert_eq!(
            app.state.budgets.form.error.as_deref(),
            Some("Amount must be greater than 0")
        );
        assert_eq!(app.state.budgets.mode, ListMode::Form);
    }
}
