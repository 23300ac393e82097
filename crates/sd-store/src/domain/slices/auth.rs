use serde::Serialize;

use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn { access_token: String },
}

impl AuthState {
    pub(crate) fn apply(&mut self, outcome: AuthOutcome) {
        match outcome {
            AuthOutcome::LoggedIn { access_token } => {
                self.token = Some(access_token);
                self.is_authenticated = true;
            }
        }
    }

    pub(crate) fn logout(&mut self) {
        self.token = None;
        self.is_authenticated = false;
    }

    pub(crate) fn reset(&mut self) {
        self.logout();
        self.lifecycle.reset();
    }
}
