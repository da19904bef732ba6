use std::collections::HashMap;

use api_types::budget::BudgetStatus;
use chrono::{DateTime, Local};
use engine::{
    Budget, BudgetCategory, BudgetDraft, Bucket, Currency, Expense, ExpenseDraft, FilterCriteria,
    FilterInput, GroupBy, Money, UNDEFINED_KEY, aggregate, distinct_categories, filter, total,
};

use crate::{records, session::Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Expenses,
    Budgets,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Expenses => "Expenses",
            Self::Budgets => "Budgets",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Expenses => Self::Budgets,
            Self::Budgets => Self::Expenses,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Login,
    Register,
}

#[derive(Debug)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub mode: LoginMode,
    pub message: Option<String>,
    pub notice: Option<String>,
}

impl LoginState {
    pub fn new(username: String) -> Self {
        Self {
            username,
            password: String::new(),
            focus: LoginField::Username,
            mode: LoginMode::Login,
            message: None,
            notice: None,
        }
    }

    pub fn advance_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::Login => LoginMode::Register,
            LoginMode::Register => LoginMode::Login,
        };
        self.message = None;
    }

    pub fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Which chart the expenses view draws under the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Share,
    Bars,
    Trend,
}

impl ChartKind {
    pub fn next(self) -> Self {
        match self {
            Self::Share => Self::Bars,
            Self::Bars => Self::Trend,
            Self::Trend => Self::Share,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Share => "Share by category",
            Self::Bars => "Totals by category",
            Self::Trend => "Daily trend",
        }
    }

    pub fn group_by(self) -> GroupBy {
        match self {
            Self::Share | Self::Bars => GroupBy::Category,
            Self::Trend => GroupBy::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    List,
    Filter,
    Form,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    DateFrom,
    DateTo,
    MinAmount,
    MaxAmount,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        Self::Category,
        Self::DateFrom,
        Self::DateTo,
        Self::MinAmount,
        Self::MaxAmount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::DateFrom => "From",
            Self::DateTo => "To",
            Self::MinAmount => "Min",
            Self::MaxAmount => "Max",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Title,
    Amount,
    Date,
    Category,
    Description,
}

impl ExpenseField {
    pub const ALL: [ExpenseField; 5] = [
        Self::Title,
        Self::Amount,
        Self::Date,
        Self::Category,
        Self::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Amount => "Amount",
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Description => "Description",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetField {
    Category,
    Amount,
    StartDate,
    EndDate,
    Description,
}

impl BudgetField {
    pub const ALL: [BudgetField; 5] = [
        Self::Category,
        Self::Amount,
        Self::StartDate,
        Self::EndDate,
        Self::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Amount => "Amount",
            Self::StartDate => "Start date",
            Self::EndDate => "End date",
            Self::Description => "Description",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let index = all.iter().position(|item| *item == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    all[next]
}

/// Picks the entry after (or before) `current` in `options`, wrapping
/// around. An unknown or empty `current` starts from the first entry.
fn cycle_text(options: &[String], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|option| option == current) {
        Some(index) if forward => (index + 1) % len,
        Some(index) => (index + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(options[next].clone())
}

#[derive(Debug, Default)]
pub struct ExpenseForm {
    pub draft: ExpenseDraft,
    pub focus: Option<ExpenseField>,
    /// Id of the expense being edited; `None` creates a new one.
    pub editing: Option<i64>,
    pub error: Option<String>,
}

impl ExpenseForm {
    pub fn create(today: &str) -> Self {
        Self {
            draft: ExpenseDraft {
                date: today.to_string(),
                ..ExpenseDraft::default()
            },
            focus: Some(ExpenseField::Title),
            editing: None,
            error: None,
        }
    }

    pub fn edit(expense: &Expense) -> Self {
        Self {
            draft: ExpenseDraft::from(expense),
            focus: Some(ExpenseField::Title),
            editing: expense.id,
            error: None,
        }
    }

    pub fn focus(&self) -> ExpenseField {
        self.focus.unwrap_or(ExpenseField::Title)
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus() {
            ExpenseField::Title => &mut self.draft.title,
            ExpenseField::Amount => &mut self.draft.amount,
            ExpenseField::Date => &mut self.draft.date,
            ExpenseField::Category => &mut self.draft.category,
            ExpenseField::Description => &mut self.draft.description,
        }
    }

    pub fn field(&self, field: ExpenseField) -> &str {
        match field {
            ExpenseField::Title => &self.draft.title,
            ExpenseField::Amount => &self.draft.amount,
            ExpenseField::Date => &self.draft.date,
            ExpenseField::Category => &self.draft.category,
            ExpenseField::Description => &self.draft.description,
        }
    }
}

#[derive(Debug, Default)]
pub struct BudgetForm {
    pub draft: BudgetDraft,
    pub focus: Option<BudgetField>,
    pub editing: Option<i64>,
    pub error: Option<String>,
}

impl BudgetForm {
    pub fn create() -> Self {
        Self {
            draft: BudgetDraft {
                category: BudgetCategory::Food.as_str().to_string(),
                ..BudgetDraft::default()
            },
            focus: Some(BudgetField::Category),
            editing: None,
            error: None,
        }
    }

    pub fn edit(budget: &Budget) -> Self {
        Self {
            draft: BudgetDraft::from(budget),
            focus: Some(BudgetField::Category),
            editing: budget.id,
            error: None,
        }
    }

    pub fn focus(&self) -> BudgetField {
        self.focus.unwrap_or(BudgetField::Category)
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus() {
            BudgetField::Category => &mut self.draft.category,
            BudgetField::Amount => &mut self.draft.amount,
            BudgetField::StartDate => &mut self.draft.start_date,
            BudgetField::EndDate => &mut self.draft.end_date,
            BudgetField::Description => &mut self.draft.description,
        }
    }

    pub fn field(&self, field: BudgetField) -> &str {
        match field {
            BudgetField::Category => &self.draft.category,
            BudgetField::Amount => &self.draft.amount,
            BudgetField::StartDate => &self.draft.start_date,
            BudgetField::EndDate => &self.draft.end_date,
            BudgetField::Description => &self.draft.description,
        }
    }

    /// Steps the category field through the fixed budget categories.
    pub fn cycle_category(&mut self, forward: bool) {
        let options: Vec<String> = BudgetCategory::ALL
            .iter()
            .map(|category| category.as_str().to_string())
            .collect();
        if let Some(next) = cycle_text(&options, self.draft.category.trim(), forward) {
            self.draft.category = next;
        }
    }
}

/// Expense snapshot plus everything derived from it for the view.
///
/// Derived fields are only refreshed by [`ExpensesState::recompute`], which
/// must run after any change to `records`, `input` or `chart`.
#[derive(Debug)]
pub struct ExpensesState {
    pub records: Vec<Expense>,
    pub input: FilterInput,
    /// Last criteria parsed successfully from `input`.
    pub criteria: FilterCriteria,
    pub filter_error: Option<String>,
    pub rows: Vec<Expense>,
    pub categories: Vec<String>,
    pub chart: ChartKind,
    pub buckets: Vec<Bucket>,
    pub total: Money,
    pub selected: usize,
    pub mode: ListMode,
    pub filter_focus: FilterField,
    pub form: ExpenseForm,
    pub error: Option<String>,
}

impl Default for ExpensesState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            input: FilterInput::default(),
            criteria: FilterCriteria::default(),
            filter_error: None,
            rows: Vec::new(),
            categories: Vec::new(),
            chart: ChartKind::Share,
            buckets: Vec::new(),
            total: Money::ZERO,
            selected: 0,
            mode: ListMode::List,
            filter_focus: FilterField::Category,
            form: ExpenseForm::default(),
            error: None,
        }
    }
}

impl ExpensesState {
    pub fn set_records(&mut self, records: Vec<Expense>) {
        self.records = records;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        match FilterCriteria::parse(&self.input) {
            Ok(criteria) => {
                self.criteria = criteria;
                self.filter_error = None;
            }
            Err(err) => self.filter_error = Some(err.to_string()),
        }
        self.rows = filter(&self.records, &self.criteria);
        self.categories = distinct_categories(&self.records);
        self.buckets = chart_buckets(&self.rows, self.chart);
        self.total = total(&self.rows);
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    pub fn filter_field_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Category => &mut self.input.category,
            FilterField::DateFrom => &mut self.input.date_from,
            FilterField::DateTo => &mut self.input.date_to,
            FilterField::MinAmount => &mut self.input.min_amount,
            FilterField::MaxAmount => &mut self.input.max_amount,
        }
    }

    pub fn filter_field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Category => &self.input.category,
            FilterField::DateFrom => &self.input.date_from,
            FilterField::DateTo => &self.input.date_to,
            FilterField::MinAmount => &self.input.min_amount,
            FilterField::MaxAmount => &self.input.max_amount,
        }
    }

    /// Steps the category filter through the categories present in the
    /// snapshot, with a blank entry meaning "all categories".
    pub fn cycle_category(&mut self, forward: bool) {
        let mut options = vec![String::new()];
        options.extend(self.categories.iter().cloned());
        if let Some(next) = cycle_text(&options, self.input.category.trim(), forward) {
            self.input.category = next;
            self.recompute();
        }
    }

    pub fn clear_filters(&mut self) {
        self.input = FilterInput::default();
        self.recompute();
    }

    pub fn next_chart(&mut self) {
        self.chart = self.chart.next();
        self.recompute();
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.rows.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Buckets for the selected chart. The trend is drawn in calendar order,
/// so its buckets are sorted and records without a date are left out.
fn chart_buckets(rows: &[Expense], chart: ChartKind) -> Vec<Bucket> {
    let mut buckets = aggregate(rows, chart.group_by());
    if chart == ChartKind::Trend {
        buckets.retain(|bucket| bucket.key != UNDEFINED_KEY);
        buckets.sort_by(|a, b| a.key.cmp(&b.key));
    }
    buckets
}

/// Server-computed usage of the budgets of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetUsage {
    pub spent: Option<Money>,
    pub remaining: Option<Money>,
    pub percentage: Option<f64>,
}

impl From<&BudgetStatus> for BudgetUsage {
    fn from(status: &BudgetStatus) -> Self {
        Self {
            spent: records::status_money(status.total_spent.as_ref()),
            remaining: records::status_money(status.remaining.as_ref()),
            percentage: status.percentage_used,
        }
    }
}

#[derive(Debug)]
pub struct BudgetsState {
    pub budgets: Vec<Budget>,
    pub usage: HashMap<String, BudgetUsage>,
    pub total: Money,
    pub selected: usize,
    pub mode: ListMode,
    pub form: BudgetForm,
    pub error: Option<String>,
}

impl Default for BudgetsState {
    fn default() -> Self {
        Self {
            budgets: Vec::new(),
            usage: HashMap::new(),
            total: Money::ZERO,
            selected: 0,
            mode: ListMode::List,
            form: BudgetForm::default(),
            error: None,
        }
    }
}

impl BudgetsState {
    pub fn set_budgets(&mut self, budgets: Vec<Budget>) {
        self.budgets = budgets;
        self.usage.clear();
        self.total = total(&self.budgets);
        self.selected = self.selected.min(self.budgets.len().saturating_sub(1));
    }

    /// Categories whose status is worth fetching, in list order.
    pub fn categories(&self) -> Vec<String> {
        distinct_categories(&self.budgets)
    }

    pub fn usage_for(&self, budget: &Budget) -> Option<&BudgetUsage> {
        budget
            .category
            .as_deref()
            .and_then(|category| self.usage.get(category))
    }

    pub fn selected_budget(&self) -> Option<&Budget> {
        self.budgets.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.budgets.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.budgets.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub login: LoginState,
    pub session: Option<Session>,
    /// Username reported by `GET /api/user/me`.
    pub profile: Option<String>,
    pub expenses: ExpensesState,
    pub budgets: BudgetsState,
    pub currency: Currency,
    pub base_url: String,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(username: String, currency: Currency, base_url: String) -> Self {
        Self {
            screen: Screen::Login,
            section: Section::Expenses,
            login: LoginState::new(username),
            session: None,
            profile: None,
            expenses: ExpensesState::default(),
            budgets: BudgetsState::default(),
            currency,
            base_url,
            last_refresh: None,
        }
    }

    /// Drops the session and every piece of user data fetched with it.
    pub fn logout(&mut self, message: Option<String>) {
        let username = self
            .session
            .take()
            .map(|session| session.username)
            .unwrap_or_else(|| self.login.username.clone());
        self.login = LoginState::new(username);
        self.login.message = message;
        self.profile = None;
        self.expenses = ExpensesState::default();
        self.budgets = BudgetsState::default();
        self.section = Section::Expenses;
        self.screen = Screen::Login;
        self.last_refresh = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expense(id: i64, category: &str, cents: i64, day: u32) -> Expense {
        Expense {
            id: Some(id),
            title: Some(format!("e{id}")),
            amount: Some(Money::new(cents)),
            date: NaiveDate::from_ymd_opt(2024, 1, day),
            category: Some(category.to_string()),
            description: None,
        }
    }

    fn loaded() -> ExpensesState {
        let mut state = ExpensesState::default();
        state.set_records(vec![
            expense(1, "Food", 1000, 2),
            expense(2, "Transportation", 2000, 1),
            expense(3, "Food", 500, 1),
            Expense {
                id: Some(4),
                amount: Some(Money::new(300)),
                category: Some("Other".to_string()),
                ..Expense::default()
            },
        ]);
        state
    }

    #[test]
    fn set_records_derives_rows_and_buckets() {
        let state = loaded();
        assert_eq!(state.rows.len(), 4);
        assert_eq!(state.total, Money::new(3800));
        assert_eq!(state.categories, vec!["Food", "Transportation", "Other"]);
        let keys: Vec<_> = state.buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["Food", "Transportation", "Other"]);
        assert_eq!(state.buckets[0].total, Money::new(1500));
    }

    #[test]
    fn typing_in_the_filter_recomputes() {
        let mut state = loaded();
        state.input.min_amount = "10".to_string();
        state.recompute();
        let ids: Vec<_> = state.rows.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert_eq!(state.total, Money::new(3000));
    }

    #[test]
    fn invalid_input_keeps_last_valid_criteria() {
        let mut state = loaded();
        state.input.category = "Food".to_string();
        state.recompute();
        assert_eq!(state.rows.len(), 2);

        state.input.date_from = "2024-01".to_string();
        state.recompute();
        assert!(state.filter_error.is_some());
        assert_eq!(state.criteria.category.as_deref(), Some("Food"));
        assert_eq!(state.criteria.date_from, None);
        assert_eq!(state.rows.len(), 2);

        state.input.date_from = "2024-01-02".to_string();
        state.recompute();
        assert!(state.filter_error.is_none());
        assert_eq!(state.rows.len(), 1);
    }

    #[test]
    fn trend_is_sorted_and_skips_undated() {
        let mut state = loaded();
        state.next_chart();
        state.next_chart();
        assert_eq!(state.chart, ChartKind::Trend);
        let keys: Vec<_> = state.buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(state.buckets[0].total, Money::new(2500));
    }

    #[test]
    fn category_selector_cycles_through_snapshot() {
        let mut state = loaded();
        state.cycle_category(true);
        assert_eq!(state.input.category, "Food");
        assert_eq!(state.rows.len(), 2);
        state.cycle_category(true);
        state.cycle_category(true);
        assert_eq!(state.input.category, "Other");
        state.cycle_category(true);
        assert_eq!(state.input.category, "");
        assert_eq!(state.rows.len(), 4);
        state.cycle_category(false);
        assert_eq!(state.input.category, "Other");
    }

    #[test]
    fn selection_stays_in_bounds_after_narrowing() {
        let mut state = loaded();
        state.select_next();
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 3);
        state.input.category = "Transportation".to_string();
        state.recompute();
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_expense().and_then(|e| e.id), Some(2));
    }

    #[test]
    fn budget_form_cycles_categories() {
        let mut form = BudgetForm::create();
        assert_eq!(form.draft.category, "Food");
        form.cycle_category(true);
        assert_eq!(form.draft.category, "Transportation");
        form.cycle_category(false);
        form.cycle_category(false);
        assert_eq!(form.draft.category, "Other");
    }

    #[test]
    fn fields_wrap_around() {
        assert_eq!(FilterField::MaxAmount.next(), FilterField::Category);
        assert_eq!(ExpenseField::Title.prev(), ExpenseField::Description);
        assert_eq!(BudgetField::EndDate.next(), BudgetField::Description);
    }

    #[test]
    fn logout_drops_user_data() {
        let mut state = AppState::new(String::new(), Currency::Usd, String::new());
        state.session = Some(Session::new("alice", "t"));
        state.screen = Screen::Main;
        state.expenses = loaded();
        state.logout(Some("Session expired".to_string()));
        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert!(state.expenses.records.is_empty());
        assert_eq!(state.login.username, "alice");
        assert_eq!(state.login.message.as_deref(), Some("Session expired"));
    }

    #[test]
    fn budget_usage_reads_status() {
        let status: BudgetStatus = serde_json::from_str(
            r#"{"totalSpent": "120.5", "remaining": 79.5, "percentageUsed": 60.25}"#,
        )
        .unwrap();
        let usage = BudgetUsage::from(&status);
        assert_eq!(usage.spent, Some(Money::new(12_050)));
        assert_eq!(usage.remaining, Some(Money::new(7950)));
        assert_eq!(usage.percentage, Some(60.25));
    }
}
