use api_types::{
    auth::{Credentials, LoginResponse},
    budget::{BudgetBody, BudgetStatus, BudgetView},
    expense::{ExpenseBody, ExpenseView},
    user::UserProfile,
};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    error::{AppError, Result},
    session::Session,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// REST client of the expense tracker API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::BaseUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::BaseUrl(format!("{base_url} cannot be a base")));
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Server(format!("invalid base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Session> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        let res = send(self.http.post(url).json(credentials)).await?;
        let body = res.json::<LoginResponse>().await?;
        Ok(Session::new(credentials.username.clone(), body.token))
    }

    /// Returns the server's confirmation message.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<String> {
        let url = self.endpoint(&["api", "auth", "register"])?;
        let res = send(self.http.post(url).json(credentials)).await?;
        Ok(res.text().await?)
    }

    pub async fn me(&self, session: &Session) -> ClientResult<UserProfile> {
        let url = self.endpoint(&["api", "user", "me"])?;
        self.get_json(session, url).await
    }

    pub async fn expenses(&self, session: &Session) -> ClientResult<Vec<ExpenseView>> {
        let url = self.endpoint(&["api", "expenses"])?;
        self.get_json(session, url).await
    }

    pub async fn create_expense(&self, session: &Session, body: &ExpenseBody) -> ClientResult<()> {
        let url = self.endpoint(&["api", "expenses"])?;
        send(self.http.post(url).bearer_auth(session.token()).json(body)).await?;
        Ok(())
    }

    pub async fn update_expense(
        &self,
        session: &Session,
        id: i64,
        body: &ExpenseBody,
    ) -> ClientResult<()> {
        let url = self.endpoint(&["api", "expenses", &id.to_string()])?;
        send(self.http.put(url).bearer_auth(session.token()).json(body)).await?;
        Ok(())
    }

    pub async fn delete_expense(&self, session: &Session, id: i64) -> ClientResult<()> {
        let url = self.endpoint(&["api", "expenses", &id.to_string()])?;
        send(self.http.delete(url).bearer_auth(session.token())).await?;
        Ok(())
    }

    pub async fn budgets(&self, session: &Session) -> ClientResult<Vec<BudgetView>> {
        let url = self.endpoint(&["api", "budgets"])?;
        self.get_json(session, url).await
    }

    pub async fn create_budget(&self, session: &Session, body: &BudgetBody) -> ClientResult<()> {
        let url = self.endpoint(&["api", "budgets"])?;
        send(self.http.post(url).bearer_auth(session.token()).json(body)).await?;
        Ok(())
    }

    pub async fn update_budget(
        &self,
        session: &Session,
        id: i64,
        body: &BudgetBody,
    ) -> ClientResult<()> {
        let url = self.endpoint(&["api", "budgets", &id.to_string()])?;
        send(self.http.put(url).bearer_auth(session.token()).json(body)).await?;
        Ok(())
    }

    pub async fn delete_budget(&self, session: &Session, id: i64) -> ClientResult<()> {
        let url = self.endpoint(&["api", "budgets", &id.to_string()])?;
        send(self.http.delete(url).bearer_auth(session.token())).await?;
        Ok(())
    }

    pub async fn budget_status(
        &self,
        session: &Session,
        category: &str,
    ) -> ClientResult<BudgetStatus> {
        let url = self.endpoint(&["api", "budgets", category, "status"])?;
        self.get_json(session, url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &Session, url: Url) -> ClientResult<T> {
        let res = send(self.http.get(url).bearer_auth(session.token())).await?;
        Ok(res.json::<T>().await?)
    }
}

/// Sends the request and turns non-2xx statuses into `ClientError`.
async fn send(request: RequestBuilder) -> ClientResult<Response> {
    let res = request.send().await?;
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let text = res.text().await.unwrap_or_default();
    let message = error_message(&text)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        400 | 422 => ClientError::Validation(message),
        _ => ClientError::Server(message),
    };
    Err(err)
}

/// Error bodies are either `{"error": ..}` / `{"message": ..}` or plain text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return Some(message.clone());
            }
        }
    }
    Some(body.to_string())
}
