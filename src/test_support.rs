//! Shared fixtures for unit tests: a config pointing at a wiremock server and
//! canned Discord responses.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::Config;

pub const GUILD_ID: &str = "900";
pub const CLIENT_ID: &str = "client-1";

/// Config whose REST base points at `server`. The web base stays on discord.com so
/// redirects can be asserted against real-looking URLs.
pub fn config_for(server: &MockServer, denied: &[&str]) -> Config {
    config_with_timeout(server, denied, 5)
}

pub fn config_with_timeout(server: &MockServer, denied: &[&str], upstream_secs: u64) -> Config {
    let upstream_secs = upstream_secs.to_string();
    let api_base = format!("{}/api", server.uri());
    let denied = denied.join(",");
    Config::from_lookup(|key| {
        let value = match key {
            "DISCORD_CLIENT_ID" => CLIENT_ID,
            "DISCORD_CLIENT_SECRET" => "test-secret",
            "DISCORD_BOT_TOKEN" => "test-bot-token",
            "DISCORD_GUILD_ID" => GUILD_ID,
            "DISCORD_DENIED_GUILD_IDS" => denied.as_str(),
            "DISCORD_API_BASE_URL" => api_base.as_str(),
            "UPSTREAM_TIMEOUT_SECONDS" => upstream_secs.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config is valid")
}

pub struct ProviderMock<'a> {
    server: &'a MockServer,
    delay: Duration,
}

impl<'a> ProviderMock<'a> {
    pub fn new(server: &'a MockServer) -> Self {
        Self {
            server,
            delay: Duration::ZERO,
        }
    }

    /// Every response mounted afterwards is held back by `delay`.
    pub fn delayed(server: &'a MockServer, delay: Duration) -> Self {
        Self { server, delay }
    }

    fn respond(&self, status: u16) -> ResponseTemplate {
        ResponseTemplate::new(status).set_delay(self.delay)
    }

    pub async fn token_ok(&self) {
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .respond_with(self.respond(200).set_body_json(serde_json::json!({
                "access_token": "user-token",
                "token_type": "Bearer",
                "expires_in": 604800,
                "refresh_token": "refresh",
                "scope": "identify guilds guilds.join"
            })))
            .mount(self.server)
            .await;
    }

    pub async fn token_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .respond_with(
                self.respond(status)
                    .set_body_json(serde_json::json!({"error": "invalid_client"})),
            )
            .mount(self.server)
            .await;
    }

    pub async fn user(&self, id: &str) {
        self.mount_user(id, None).await;
    }

    pub async fn user_expecting(&self, id: &str, calls: u64) {
        self.mount_user(id, Some(calls)).await;
    }

    async fn mount_user(&self, id: &str, calls: Option<u64>) {
        let mut mock = Mock::given(method("GET"))
            .and(path("/api/users/@me"))
            .respond_with(self.respond(200).set_body_json(serde_json::json!({
                "id": id,
                "username": "someone",
                "global_name": "Someone"
            })));
        if let Some(calls) = calls {
            mock = mock.expect(calls);
        }
        mock.mount(self.server).await;
    }

    pub async fn guilds_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/api/users/@me/guilds"))
            .respond_with(self.respond(status).set_body_json(serde_json::json!({
                "message": "500: Internal Server Error",
                "code": 0
            })))
            .mount(self.server)
            .await;
    }

    pub async fn guilds(&self, ids: &[&str]) {
        let body: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "name": format!("guild {id}")}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/users/@me/guilds"))
            .respond_with(self.respond(200).set_body_json(body))
            .mount(self.server)
            .await;
    }

    /// Add-member endpoint for the test guild, answering `status` and expected exactly
    /// `calls` times.
    pub async fn add_member(&self, status: u16, calls: u64) {
        Mock::given(method("PUT"))
            .and(path(format!("/api/guilds/{GUILD_ID}/members/42")))
            .respond_with(self.respond(status))
            .expect(calls)
            .mount(self.server)
            .await;
    }
}
