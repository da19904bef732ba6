/// An authenticated user: username plus the bearer token issued at login.
///
/// Created by a successful login and passed to every authenticated request.
/// Logging out drops it; nothing else keeps the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    token: String,
}

impl Session {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
