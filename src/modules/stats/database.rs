use crate::{
    database::{Database, DbError, Param},
    utils::count,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Latest `displayname.<text>` permission per LuckPerms group, keyed by
/// group name. The highest row id is taken as the most recent write.
macro_rules! latest_display {
    () => {
        "LEFT JOIN (
  SELECT g.name AS team,
         SUBSTRING(g.permission, LENGTH('displayname.') + 1) AS display_raw
  FROM luckperms_group_permissions g
  JOIN (
      SELECT name, MAX(id) AS mid
      FROM luckperms_group_permissions
      WHERE permission LIKE 'displayname.%'
      GROUP BY name
  ) m ON m.name = g.name AND m.mid = g.id
) gd ON gd.team = ps.team"
    };
}

pub const PLAYER_BY_NAME: &str = concat!(
    "SELECT
  CAST(ps.uuid AS CHAR) AS uuid,
  ps.name,
  ps.team,
  CAST(ps.kills AS SIGNED) AS kills,
  ps.updated_at,
  gd.display_raw
FROM player_stats ps
",
    latest_display!(),
    "
WHERE LOWER(ps.name) = LOWER(?)
LIMIT 1"
);

pub const TEAM_INFO: &str = concat!(
    "SELECT
  ps.team,
  gd.display_raw,
  CAST(COUNT(*) AS SIGNED) AS members,
  CAST(COALESCE(SUM(ps.kills), 0) AS SIGNED) AS kills
FROM player_stats ps
",
    latest_display!(),
    "
WHERE ps.team = ? AND CAST(ps.team AS BINARY) = CAST(? AS BINARY)
GROUP BY ps.team, gd.display_raw
LIMIT 1"
);

pub const TEAM_MEMBERS: &str = "SELECT
  name,
  CAST(kills AS SIGNED) AS kills,
  updated_at
FROM player_stats
WHERE team = ? AND CAST(team AS BINARY) = CAST(? AS BINARY)
ORDER BY kills DESC, name ASC
LIMIT ?";

pub const TOP_TEAMS_BY_KILLS: &str = concat!(
    "SELECT
  ps.team,
  gd.display_raw,
  CAST(COUNT(*) AS SIGNED) AS members,
  CAST(COALESCE(SUM(ps.kills), 0) AS SIGNED) AS kills
FROM player_stats ps
",
    latest_display!(),
    "
WHERE ps.team IS NOT NULL AND ps.team <> ''
GROUP BY ps.team, gd.display_raw
ORDER BY kills DESC, members DESC, ps.team ASC
LIMIT ?"
);

pub const TOP_PLAYERS_BY_KILLS: &str = concat!(
    "SELECT
  CAST(ps.uuid AS CHAR) AS uuid,
  ps.name,
  ps.team,
  CAST(ps.kills AS SIGNED) AS kills,
  ps.updated_at,
  gd.display_raw
FROM player_stats ps
",
    latest_display!(),
    "
ORDER BY ps.kills DESC, ps.name ASC
LIMIT ?"
);

/// Rows the store returns for a roster.
pub const ROSTER_LIMIT: usize = 25;

#[derive(Debug, sqlx::FromRow)]
struct PlayerRow {
    uuid: Option<String>,
    name: Option<String>,
    team: Option<String>,
    kills: Option<i64>,
    updated_at: Option<NaiveDateTime>,
    display_raw: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct TeamSummaryRow {
    team: Option<String>,
    display_raw: Option<String>,
    members: Option<i64>,
    kills: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct TeamMemberRow {
    name: Option<String>,
    kills: Option<i64>,
    updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub uuid: Option<String>,
    pub name: String,
    pub team: Option<String>,
    pub kills: u64,
    pub updated_at: Option<NaiveDateTime>,
    pub display_raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummary {
    pub team: String,
    pub display_raw: Option<String>,
    pub members: u64,
    pub kills: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub name: String,
    pub kills: u64,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        Self {
            uuid: row.uuid,
            name: row.name.unwrap_or_default(),
            team: row.team,
            kills: count(row.kills),
            updated_at: row.updated_at,
            display_raw: row.display_raw,
        }
    }
}

impl From<TeamSummaryRow> for TeamSummary {
    fn from(row: TeamSummaryRow) -> Self {
        Self {
            team: row.team.unwrap_or_default(),
            display_raw: row.display_raw,
            members: count(row.members),
            kills: count(row.kills),
        }
    }
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            name: row.name.unwrap_or_default(),
            kills: count(row.kills),
            updated_at: row.updated_at,
        }
    }
}

/// Read-only queries the stat commands run.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Case-insensitive exact match on the player name.
    async fn player_by_name(&self, name: &str) -> Result<Option<PlayerRecord>, DbError>;
    /// Aggregate for a team; the identifier is matched case-sensitively.
    async fn team_info(&self, team: &str) -> Result<Option<TeamSummary>, DbError>;
    /// Up to [`ROSTER_LIMIT`] members, kills descending then name ascending.
    async fn team_members(&self, team: &str) -> Result<Vec<TeamMember>, DbError>;
    async fn top_teams(&self, limit: u32) -> Result<Vec<TeamSummary>, DbError>;
    async fn top_players(&self, limit: u32) -> Result<Vec<PlayerRecord>, DbError>;
}

#[async_trait]
impl StatsStore for Database {
    async fn player_by_name(&self, name: &str) -> Result<Option<PlayerRecord>, DbError> {
        let row = self
            .fetch_one::<PlayerRow>(PLAYER_BY_NAME, &[name.into()])
            .await?;
        Ok(row.map(PlayerRecord::from))
    }

    async fn team_info(&self, team: &str) -> Result<Option<TeamSummary>, DbError> {
        let row = self
            .fetch_one::<TeamSummaryRow>(TEAM_INFO, &[team.into(), team.into()])
            .await?;
        Ok(row.map(TeamSummary::from))
    }

    async fn team_members(&self, team: &str) -> Result<Vec<TeamMember>, DbError> {
        let rows = self
            .fetch_all::<TeamMemberRow>(
                TEAM_MEMBERS,
                &[team.into(), team.into(), Param::Int(ROSTER_LIMIT as i64)],
            )
            .await?;
        Ok(rows.into_iter().map(TeamMember::from).collect())
    }

    async fn top_teams(&self, limit: u32) -> Result<Vec<TeamSummary>, DbError> {
        let rows = self
            .fetch_all::<TeamSummaryRow>(TOP_TEAMS_BY_KILLS, &[Param::from(limit)])
            .await?;
        Ok(rows.into_iter().map(TeamSummary::from).collect())
    }

    async fn top_players(&self, limit: u32) -> Result<Vec<PlayerRecord>, DbError> {
        let rows = self
            .fetch_all::<PlayerRow>(TOP_PLAYERS_BY_KILLS, &[Param::from(limit)])
            .await?;
        Ok(rows.into_iter().map(PlayerRecord::from).collect())
    }
}
