use std::{fmt, str::FromStr};

/// Language used for every user-facing reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ru => write!(f, "ru"),
            Self::En => write!(f, "en"),
        }
    }
}

impl Locale {
    pub fn player_not_found(self, name: &str) -> String {
        match self {
            Self::Ru => format!("Игрок **{}** не найден в базе данных.", name),
            Self::En => format!("Player **{}** was not found in the database.", name),
        }
    }

    pub fn team_not_found(self, team: &str) -> String {
        match self {
            Self::Ru => format!("Команда **{}** не найдена.", team),
            Self::En => format!("Team **{}** was not found.", team),
        }
    }

    pub fn no_teams(self) -> &'static str {
        match self {
            Self::Ru => "В базе нет команд для топа.",
            Self::En => "There are no teams to rank yet.",
        }
    }

    pub fn no_players(self) -> &'static str {
        match self {
            Self::Ru => "В базе нет игроков для топа.",
            Self::En => "There are no players to rank yet.",
        }
    }

    pub fn command_failed(self) -> &'static str {
        match self {
            Self::Ru => "⚠️ Не удалось выполнить команду. Попробуйте позже.",
            Self::En => "⚠️ Something went wrong running that command. Please try again later.",
        }
    }

    pub fn team_label(self) -> &'static str {
        match self {
            Self::Ru => "Команда: ",
            Self::En => "Team: ",
        }
    }

    pub fn kills_label(self) -> &'static str {
        match self {
            Self::Ru => "Убийств: ",
            Self::En => "Kills: ",
        }
    }

    pub fn updated_label(self) -> &'static str {
        "Updated"
    }

    pub fn members_label(self) -> &'static str {
        match self {
            Self::Ru => "Участников: ",
            Self::En => "Members: ",
        }
    }

    pub fn total_kills_label(self) -> &'static str {
        match self {
            Self::Ru => "Убийств (В сумме): ",
            Self::En => "Kills (total): ",
        }
    }

    pub fn top_members_label(self) -> &'static str {
        match self {
            Self::Ru => "Топ участников",
            Self::En => "Top members",
        }
    }

    pub fn team_title(self, display: &str) -> String {
        match self {
            Self::Ru => format!("🛡 Команда: {}", display),
            Self::En => format!("🛡 Team: {}", display),
        }
    }

    pub fn top_teams_title(self, limit: u32) -> String {
        match self {
            Self::Ru => format!("🏆 Топ {} команд по киллам в текущем сезоне:", limit),
            Self::En => format!("🏆 Top {} teams by kills this season:", limit),
        }
    }

    pub fn top_players_title(self, limit: u32) -> String {
        match self {
            Self::Ru => format!("🏅 Топ {} игроков по киллам в текущем сезоне!", limit),
            Self::En => format!("🏅 Top {} players by kills this season!", limit),
        }
    }

    pub fn team_line(self, rank: usize, display: &str, kills: u64, members: u64) -> String {
        match self {
            Self::Ru => format!(
                "**{}. {}** — {} убийств | {} участников",
                rank, display, kills, members
            ),
            Self::En => format!(
                "**{}. {}** — {} kills | {} members",
                rank, display, kills, members
            ),
        }
    }
}
