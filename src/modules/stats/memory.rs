//! In-memory [`StatsStore`] mirroring what the MySQL queries do, for tests.

use super::database::{PlayerRecord, StatsStore, TeamMember, TeamSummary, ROSTER_LIMIT};
use crate::database::DbError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

const DISPLAY_PREFIX: &str = "displayname.";

#[derive(Debug, Clone)]
pub struct StoredPlayer {
    pub uuid: String,
    pub name: String,
    pub team: Option<String>,
    pub kills: Option<i64>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
struct GroupPermission {
    id: i64,
    group: String,
    permission: String,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    players: Vec<StoredPlayer>,
    permissions: Vec<GroupPermission>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(mut self, name: &str, team: Option<&str>, kills: Option<i64>) -> Self {
        self.players.push(StoredPlayer {
            uuid: format!("uuid-{}", name.to_lowercase()),
            name: name.to_string(),
            team: team.map(str::to_string),
            kills,
            updated_at: None,
        });
        self
    }

    pub fn updated(mut self, at: NaiveDateTime) -> Self {
        if let Some(player) = self.players.last_mut() {
            player.updated_at = Some(at);
        }
        self
    }

    /// Appends a permission row; later calls get higher ids.
    pub fn permission(mut self, group: &str, permission: &str) -> Self {
        self.next_id += 1;
        self.permissions.push(GroupPermission {
            id: self.next_id,
            group: group.to_string(),
            permission: permission.to_string(),
        });
        self
    }

    pub fn display_name(self, group: &str, display: &str) -> Self {
        self.permission(group, &format!("{}{}", DISPLAY_PREFIX, display))
    }

    fn display_raw(&self, team: Option<&str>) -> Option<String> {
        let team = team?;
        self.permissions
            .iter()
            .filter(|p| p.group == team && p.permission.starts_with(DISPLAY_PREFIX))
            .max_by_key(|p| p.id)
            .map(|p| p.permission[DISPLAY_PREFIX.len()..].to_string())
    }

    fn record(&self, player: &StoredPlayer) -> PlayerRecord {
        PlayerRecord {
            uuid: Some(player.uuid.clone()),
            name: player.name.clone(),
            team: player.team.clone(),
            kills: player.kills.unwrap_or(0).max(0) as u64,
            updated_at: player.updated_at,
            display_raw: self.display_raw(player.team.as_deref()),
        }
    }

    fn summaries(&self) -> Vec<TeamSummary> {
        let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for player in &self.players {
            if let Some(team) = player.team.as_deref().filter(|t| !t.is_empty()) {
                let entry = groups.entry(team).or_default();
                entry.0 += 1;
                entry.1 += player.kills.unwrap_or(0).max(0) as u64;
            }
        }
        groups
            .into_iter()
            .map(|(team, (members, kills))| TeamSummary {
                team: team.to_string(),
                display_raw: self.display_raw(Some(team)),
                members,
                kills,
            })
            .collect()
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn player_by_name(&self, name: &str) -> Result<Option<PlayerRecord>, DbError> {
        let wanted = name.to_lowercase();
        Ok(self
            .players
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
            .map(|p| self.record(p)))
    }

    async fn team_info(&self, team: &str) -> Result<Option<TeamSummary>, DbError> {
        Ok(self.summaries().into_iter().find(|s| s.team == team))
    }

    async fn team_members(&self, team: &str) -> Result<Vec<TeamMember>, DbError> {
        let mut members: Vec<&StoredPlayer> = self
            .players
            .iter()
            .filter(|p| p.team.as_deref() == Some(team))
            .collect();
        members.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.name.cmp(&b.name)));
        Ok(members
            .into_iter()
            .take(ROSTER_LIMIT)
            .map(|p| TeamMember {
                name: p.name.clone(),
                kills: p.kills.unwrap_or(0).max(0) as u64,
                updated_at: p.updated_at,
            })
            .collect())
    }

    async fn top_teams(&self, limit: u32) -> Result<Vec<TeamSummary>, DbError> {
        let mut teams = self.summaries();
        teams.sort_by(|a, b| {
            b.kills
                .cmp(&a.kills)
                .then_with(|| b.members.cmp(&a.members))
                .then_with(|| a.team.cmp(&b.team))
        });
        teams.truncate(limit as usize);
        Ok(teams)
    }

    async fn top_players(&self, limit: u32) -> Result<Vec<PlayerRecord>, DbError> {
        let mut players: Vec<&StoredPlayer> = self.players.iter().collect();
        players.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.name.cmp(&b.name)));
        Ok(players
            .into_iter()
            .take(limit as usize)
            .map(|p| self.record(p))
            .collect())
    }
}

/// Store whose every query fails as if the pool never came up.
#[derive(Debug, Default)]
pub struct DisconnectedStore;

#[async_trait]
impl StatsStore for DisconnectedStore {
    async fn player_by_name(&self, _name: &str) -> Result<Option<PlayerRecord>, DbError> {
        Err(DbError::NotConnected)
    }

    async fn team_info(&self, _team: &str) -> Result<Option<TeamSummary>, DbError> {
        Err(DbError::NotConnected)
    }

    async fn team_members(&self, _team: &str) -> Result<Vec<TeamMember>, DbError> {
        Err(DbError::NotConnected)
    }

    async fn top_teams(&self, _limit: u32) -> Result<Vec<TeamSummary>, DbError> {
        Err(DbError::NotConnected)
    }

    async fn top_players(&self, _limit: u32) -> Result<Vec<PlayerRecord>, DbError> {
        Err(DbError::NotConnected)
    }
}
