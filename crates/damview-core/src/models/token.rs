use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// OAuth2 token payload as returned by the token endpoint.
///
/// Unknown upstream fields are kept in `extra` so the payload round-trips
/// through persistence unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    #[serde(default, alias = "accessToken")]
    pub access_token: String,
    /// Upstream host that serves this user's library
    #[serde(default)]
    pub tenant: String,
    #[serde(default, alias = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, alias = "tokenType", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, alias = "expiresIn", skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl TokenData {
    pub fn new(access_token: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            tenant: tenant.into(),
            ..Default::default()
        }
    }

    /// A token with a non-blank tenant is what "logged in" means.
    pub fn has_tenant(&self) -> bool {
        !self.tenant.trim().is_empty()
    }
}
