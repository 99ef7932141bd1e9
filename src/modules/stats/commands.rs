use super::{
    database::StatsStore,
    render::{player_embed, team_embed, top_players_embed, top_teams_embed, Reply},
};
use crate::{database::DbError, locale::Locale, Context, Error};
use poise::command;
use tracing::debug;

pub const TOP_TEAMS_LIMIT: u32 = 10;
pub const DEFAULT_TOP_PLAYERS: i64 = 10;
pub const MAX_TOP_PLAYERS: i64 = 20;

pub fn clamp_limit(requested: Option<i64>) -> u32 {
    requested
        .unwrap_or(DEFAULT_TOP_PLAYERS)
        .clamp(1, MAX_TOP_PLAYERS) as u32
}

pub async fn player_reply(
    store: &dyn StatsStore,
    locale: Locale,
    name: &str,
) -> Result<Reply, DbError> {
    match store.player_by_name(name).await? {
        Some(player) => Ok(Reply::Embed(player_embed(locale, &player))),
        None => Ok(Reply::Text(locale.player_not_found(name))),
    }
}

pub async fn team_reply(
    store: &dyn StatsStore,
    locale: Locale,
    team: &str,
) -> Result<Reply, DbError> {
    let Some(info) = store.team_info(team).await? else {
        return Ok(Reply::Text(locale.team_not_found(team)));
    };

    let members = store.team_members(team).await?;
    debug!("team {} has {} roster rows", team, members.len());
    Ok(Reply::Embed(team_embed(locale, &info, &members)))
}

pub async fn top_teams_reply(store: &dyn StatsStore, locale: Locale) -> Result<Reply, DbError> {
    let teams = store.top_teams(TOP_TEAMS_LIMIT).await?;
    if teams.is_empty() {
        return Ok(Reply::Text(locale.no_teams().to_string()));
    }
    Ok(Reply::Embed(top_teams_embed(locale, TOP_TEAMS_LIMIT, &teams)))
}

pub async fn top_players_reply(
    store: &dyn StatsStore,
    locale: Locale,
    requested: Option<i64>,
) -> Result<Reply, DbError> {
    let limit = clamp_limit(requested);
    let players = store.top_players(limit).await?;
    if players.is_empty() {
        return Ok(Reply::Text(locale.no_players().to_string()));
    }
    Ok(Reply::Embed(top_players_embed(locale, limit, &players)))
}

/// Player stats by name
#[command(
    slash_command,
    description_localized("ru", "Информация об игроке по нику")
)]
pub async fn player(
    ctx: Context<'_>,
    #[description = "Player name"]
    #[description_localized("ru", "Ник игрока")]
    name: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let reply = player_reply(data.db.as_ref(), data.locale, &name).await?;
    ctx.send(reply.into()).await?;
    Ok(())
}

/// Team stats and top members
#[command(slash_command, description_localized("ru", "Информация о команде"))]
pub async fn team(
    ctx: Context<'_>,
    #[description = "Team system name (e.g. number9, interlinx). Ask the staff if unsure."]
    #[description_localized(
        "ru",
        "Системное имя команды (например number9, interlinx). Можете уточнить у администрации."
    )]
    team: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let reply = team_reply(data.db.as_ref(), data.locale, &team).await?;
    ctx.send(reply.into()).await?;
    Ok(())
}

/// Top teams by kills
#[command(
    slash_command,
    rename = "topteams",
    description_localized("ru", "Топ команд по киллам")
)]
pub async fn top_teams(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let reply = top_teams_reply(data.db.as_ref(), data.locale).await?;
    ctx.send(reply.into()).await?;
    Ok(())
}

/// Top players by kills
#[command(
    slash_command,
    rename = "topplayers",
    description_localized("ru", "Топ игроков по киллам")
)]
pub async fn top_players(
    ctx: Context<'_>,
    #[description = "How many players to show (1-20)"]
    #[description_localized("ru", "Сколько игроков показать (1-20)")]
    limit: Option<i64>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let reply = top_players_reply(data.db.as_ref(), data.locale, limit).await?;
    ctx.send(reply.into()).await?;
    Ok(())
}
