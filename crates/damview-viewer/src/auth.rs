//! Auth state: the token payload and the login phase.

use damview_core::models::TokenData;
use damview_core::AppError;

use crate::state::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    LoggedOut,
    Authenticating,
    LoggedIn,
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    token: TokenData,
    phase: AuthPhase,
    error: Option<StoreError>,
}

impl AuthState {
    pub fn token(&self) -> &TokenData {
        &self.token
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.has_tenant()
    }

    /// Seed from a persisted payload at startup.
    pub fn seed(&mut self, token: TokenData) {
        self.phase = if token.has_tenant() {
            AuthPhase::LoggedIn
        } else {
            AuthPhase::LoggedOut
        };
        self.token = token;
    }

    pub fn begin_login(&mut self) {
        self.phase = AuthPhase::Authenticating;
        self.error = None;
    }

    pub fn complete_login(&mut self, token: TokenData) {
        self.token = token;
        self.phase = AuthPhase::LoggedIn;
        self.error = None;
    }

    pub fn fail_login(&mut self, error: StoreError) {
        self.phase = AuthPhase::LoggedOut;
        self.error = Some(error);
    }

    /// Record an auth failure reported by any Asset Service call.
    pub fn record_failure(&mut self, error: StoreError) {
        self.error = Some(error);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Token to attach to an Asset Service call; all calls are gated on it.
    pub fn token_for_request(&self) -> Result<TokenData, AppError> {
        if self.is_logged_in() {
            Ok(self.token.clone())
        } else {
            Err(AppError::Unauthorized("Not logged in".to_string()))
        }
    }
}
