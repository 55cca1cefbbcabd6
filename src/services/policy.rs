/*
 * Responsibility
 * - Decide whether a user may be admitted, given their current guilds and the deny-list
 */
use crate::config::DenyList;
use crate::services::provider::PartialGuild;

#[derive(Debug, PartialEq, Eq)]
pub enum Decision<'a> {
    Allow,
    Deny { guild: &'a PartialGuild },
}

/// Denies as soon as any membership is on the deny-list.
pub fn evaluate<'a>(memberships: &'a [PartialGuild], deny_list: &DenyList) -> Decision<'a> {
    memberships
        .iter()
        .find(|guild| deny_list.contains(&guild.id))
        .map_or(Decision::Allow, |guild| Decision::Deny { guild })
}
