//! HTTP client for the Discord OAuth2 and REST endpoints used by the invite flow.
//!
//! One `ProviderClient` is built at startup and shared through `AppState`;
//! `reqwest::Client` pools connections internally, so cloning is cheap.
//!
//! Every call is a single attempt. Failures are reported as `ProviderError`
//! and the caller decides what they mean for the HTTP response.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::error::ProviderError;
use super::types::{AddMemberRequest, PartialGuild, TokenExchangeRequest, TokenResponse, User};
use crate::config::Config;

/// Scopes requested on the authorization screen.
pub const SCOPES: &str = "identify guilds guilds.join";

#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl ProviderClient {
    pub fn new(config: Arc<Config>) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(format!(
                "DiscordBot ({}, {})",
                config.project_url,
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(ProviderError::Setup)?;

        Ok(Self { http, config })
    }

    /// Browser-facing authorization URL for the given callback.
    pub fn authorization_url(web_base_url: &Url, client_id: &str, redirect_uri: &Url) -> Url {
        let mut url = web_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["oauth2", "authorize"]);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("client_id", client_id)
            .append_pair("scope", SCOPES)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", redirect_uri.as_str());
        url
    }

    /// POST /oauth2/token (authorization_code grant).
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &Url,
    ) -> Result<SecretString, ProviderError> {
        const ENDPOINT: &str = "token exchange";

        let form = TokenExchangeRequest {
            client_id: &self.config.client_id,
            client_secret: self.config.client_secret.expose_secret(),
            grant_type: "authorization_code",
            code,
            redirect_uri: redirect_uri.as_str(),
        };

        let response = self
            .http
            .post(self.endpoint(&["oauth2", "token"]))
            .form(&form)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        let token: TokenResponse = decode(ENDPOINT, response).await?;
        tracing::debug!(scope = %token.scope, "authorization code exchanged");

        Ok(SecretString::from(token.access_token))
    }

    /// GET /users/@me
    pub async fn current_user(&self, access_token: &SecretString) -> Result<User, ProviderError> {
        const ENDPOINT: &str = "current user";

        let response = self
            .http
            .get(self.endpoint(&["users", "@me"]))
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        decode(ENDPOINT, response).await
    }

    /// GET /users/@me/guilds
    pub async fn current_user_guilds(
        &self,
        access_token: &SecretString,
    ) -> Result<Vec<PartialGuild>, ProviderError> {
        const ENDPOINT: &str = "current user guilds";

        let response = self
            .http
            .get(self.endpoint(&["users", "@me", "guilds"]))
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        decode(ENDPOINT, response).await
    }

    /// PUT /guilds/{guild_id}/members/{user_id}, authorized with the bot token.
    ///
    /// Returns the raw status: 201 when the user was added, 204 when already a member.
    /// Only transport failures are errors here.
    pub async fn add_guild_member(
        &self,
        guild_id: &str,
        user_id: &str,
        access_token: &SecretString,
    ) -> Result<reqwest::StatusCode, ProviderError> {
        let response = self
            .http
            .put(self.endpoint(&["guilds", guild_id, "members", user_id]))
            .header(
                AUTHORIZATION,
                format!("Bot {}", self.config.bot_token.expose_secret()),
            )
            .json(&AddMemberRequest {
                access_token: access_token.expose_secret(),
            })
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                endpoint: "add guild member",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, guild_id, user_id, "add guild member rejected");
        }
        Ok(status)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.api_base_url.clone();
        // Config only admits http(s) bases, which always have path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            endpoint,
            status,
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|source| ProviderError::Decode { endpoint, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::config_for;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> ProviderClient {
        ProviderClient::new(Arc::new(config_for(server, &["g1"]))).unwrap()
    }

    fn token() -> SecretString {
        SecretString::from("user-token")
    }

    #[test]
    fn authorization_url_carries_all_parameters() {
        let web = Url::parse("https://discord.com").unwrap();
        let redirect = Url::parse("https://invite.example/callback").unwrap();

        let url = ProviderClient::authorization_url(&web, "client-1", &redirect);

        assert_eq!(url.path(), "/oauth2/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".into(), "client-1".into()),
                ("scope".into(), SCOPES.into()),
                ("response_type".into(), "code".into()),
                ("redirect_uri".into(), "https://invite.example/callback".into()),
            ]
        );
    }

    #[tokio::test]
    async fn exchange_code_posts_form_and_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .and(body_string_contains("client_secret=test-secret"))
            .and(body_string_contains(
                "redirect_uri=https%3A%2F%2Finvite.example%2Fcallback",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "user-token",
                "token_type": "Bearer",
                "expires_in": 604800,
                "scope": SCOPES
            })))
            .expect(1)
            .mount(&server)
            .await;

        let redirect = Url::parse("https://invite.example/callback").unwrap();
        let token = client(&server)
            .await
            .exchange_code("abc", &redirect)
            .await
            .unwrap();

        assert_eq!(token.expose_secret(), "user-token");
    }

    #[tokio::test]
    async fn exchange_code_surfaces_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let redirect = Url::parse("https://invite.example/callback").unwrap();
        let err = client(&server)
            .await
            .exchange_code("stale", &redirect)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Status { status, .. } if status == reqwest::StatusCode::BAD_REQUEST
        ));
    }

    #[tokio::test]
    async fn current_user_uses_bearer_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/@me"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42",
                "username": "someone",
                "global_name": null
            })))
            .mount(&server)
            .await;

        let user = client(&server).await.current_user(&token()).await.unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.username, "someone");
    }

    #[tokio::test]
    async fn current_user_guilds_rejects_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/@me/guilds"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .current_user_guilds(&token())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[tokio::test]
    async fn add_guild_member_sends_bot_header_and_token_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/guilds/900/members/42"))
            .and(header("authorization", "Bot test-bot-token"))
            .and(body_json(serde_json::json!({"access_token": "user-token"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let status = client(&server)
            .await
            .add_guild_member("900", "42", &token())
            .await
            .unwrap();
        assert_eq!(status, reqwest::StatusCode::CREATED);
    }
}
