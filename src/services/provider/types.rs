/*
 * Responsibility
 * - Wire shapes of the Discord REST payloads this service reads and writes
 * - Only the fields we actually use are modelled; the rest is ignored by serde
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct TokenExchangeRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'static str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
}

// Deliberately not Debug: carries the raw access token.
#[derive(Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartialGuild {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
pub(super) struct AddMemberRequest<'a> {
    pub access_token: &'a str,
}
