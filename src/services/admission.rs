/*
 * Responsibility
 * - Run the callback sequence once the code is known:
 *   token exchange -> profile -> guilds -> policy -> add member
 * - Each step depends on the previous one, so they run strictly in order, once, no retries
 * - The access token never leaves this function
 */
use url::Url;

use crate::config::Config;
use crate::error::AppError;
use crate::services::policy::{self, Decision};
use crate::services::provider::ProviderClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    CodeValidated,
    TokenObtained,
    ProfileFetched,
    MembershipFetched,
    Rejected,
    AdmissionRequested,
    Admitted,
    AdmissionFailed,
}

struct Progress(Stage);

impl Progress {
    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.0, "stage {:?} after {:?}", next, self.0);
        tracing::debug!(from = ?self.0, to = ?next, "admission flow");
        self.0 = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub user_id: String,
    /// false when the user was already a member (204).
    pub newly_joined: bool,
}

pub async fn admit(
    provider: &ProviderClient,
    config: &Config,
    code: &str,
    redirect_uri: &Url,
) -> Result<Admitted, AppError> {
    let mut progress = Progress(Stage::CodeValidated);
    let result = run(provider, config, code, redirect_uri, &mut progress).await;
    if let Err(e) = &result {
        tracing::debug!(stage = ?progress.0, error = %e, "admission flow stopped");
    }
    result
}

async fn run(
    provider: &ProviderClient,
    config: &Config,
    code: &str,
    redirect_uri: &Url,
    progress: &mut Progress,
) -> Result<Admitted, AppError> {
    let access_token = provider.exchange_code(code, redirect_uri).await?;
    progress.advance(Stage::TokenObtained);

    let user = provider.current_user(&access_token).await?;
    progress.advance(Stage::ProfileFetched);

    let guilds = provider.current_user_guilds(&access_token).await?;
    progress.advance(Stage::MembershipFetched);

    if let Decision::Deny { guild } = policy::evaluate(&guilds, &config.denied_guild_ids) {
        progress.advance(Stage::Rejected);
        tracing::info!(
            user_id = %user.id,
            user = %user.display_name(),
            denied_guild_id = %guild.id,
            denied_guild_name = %guild.name,
            "admission rejected by deny-list"
        );
        return Err(AppError::PolicyRejected);
    }

    progress.advance(Stage::AdmissionRequested);
    let status = provider
        .add_guild_member(&config.guild_id, &user.id, &access_token)
        .await?;

    if !status.is_success() {
        progress.advance(Stage::AdmissionFailed);
        return Err(AppError::AdmissionFailed);
    }

    progress.advance(Stage::Admitted);
    let newly_joined = status != reqwest::StatusCode::NO_CONTENT;
    tracing::info!(
        user_id = %user.id,
        user = %user.display_name(),
        guild_id = %config.guild_id,
        newly_joined,
        "user admitted"
    );

    Ok(Admitted {
        user_id: user.id,
        newly_joined,
    })
}
