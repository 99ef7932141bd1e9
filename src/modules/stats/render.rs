use super::{
    database::{PlayerRecord, TeamMember, TeamSummary},
    display::team_display,
};
use crate::locale::Locale;
use once_cell::sync::Lazy;
use poise::{
    serenity_prelude::{CreateEmbed, CreateEmbedFooter},
    CreateReply,
};
use url::Url;

pub const EMBED_COLOR: u32 = 0x2b2d31;
/// Roster lines shown in the team embed.
pub const ROSTER_DISPLAY_LIMIT: usize = 15;
const PLACEHOLDER: &str = "—";

static SKIN_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://mc-heads.net/body/").expect("valid skin base url"));

/// What a stats command sends back once its queries have finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Embed(StatsEmbed),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsEmbed {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub image: Option<String>,
    pub footer: Option<String>,
}

impl StatsEmbed {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new().title(&self.title).color(EMBED_COLOR);
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }
        if let Some(image) = &self.image {
            embed = embed.image(image);
        }
        if let Some(footer) = &self.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }
        embed
    }
}

impl From<Reply> for CreateReply {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Text(text) => CreateReply::default().content(text),
            Reply::Embed(embed) => CreateReply::default().embed(embed.to_embed()),
        }
    }
}

/// Full-body render of the player's skin; the name is sent as one
/// percent-encoded path segment.
pub fn skin_url(name: &str) -> String {
    let mut url = SKIN_BASE.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(name).push("200");
    }
    url.into()
}

pub fn player_embed(locale: Locale, player: &PlayerRecord) -> StatsEmbed {
    let mut embed = StatsEmbed::new(format!("👤 {}", player.name))
        .field(
            locale.team_label(),
            team_display(player.team.as_deref(), player.display_raw.as_deref()),
            true,
        )
        .field(locale.kills_label(), player.kills.to_string(), true);

    embed.image = Some(skin_url(&player.name));

    if let Some(updated_at) = player.updated_at {
        embed = embed.field(locale.updated_label(), updated_at.to_string(), true);
    }
    embed.footer = player.uuid.clone().filter(|uuid| !uuid.is_empty());
    embed
}

pub fn team_embed(locale: Locale, info: &TeamSummary, members: &[TeamMember]) -> StatsEmbed {
    let display = team_display(Some(&info.team), info.display_raw.as_deref());

    let mut embed = StatsEmbed::new(locale.team_title(&display))
        .field(locale.members_label(), info.members.to_string(), true)
        .field(locale.total_kills_label(), info.kills.to_string(), true);

    if !members.is_empty() {
        let lines: Vec<String> = members
            .iter()
            .take(ROSTER_DISPLAY_LIMIT)
            .enumerate()
            .map(|(i, m)| format!("{}. **{}** - {} K", i + 1, m.name, m.kills))
            .collect();
        embed = embed.field(locale.top_members_label(), lines.join("\n"), false);
    }
    embed
}

pub fn top_teams_embed(locale: Locale, limit: u32, teams: &[TeamSummary]) -> StatsEmbed {
    let lines: Vec<String> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let team = if t.team.is_empty() { PLACEHOLDER } else { t.team.as_str() };
            let display = team_display(Some(team), t.display_raw.as_deref());
            locale.team_line(i + 1, &display, t.kills, t.members)
        })
        .collect();

    let mut embed = StatsEmbed::new(locale.top_teams_title(limit));
    embed.description = Some(lines.join("\n"));
    embed
}

pub fn top_players_embed(locale: Locale, limit: u32, players: &[PlayerRecord]) -> StatsEmbed {
    let lines: Vec<String> = players
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name = if p.name.is_empty() { PLACEHOLDER } else { p.name.as_str() };
            let display = team_display(p.team.as_deref(), p.display_raw.as_deref());
            format!("**{}. {}** — {} K ({})", i + 1, name, p.kills, display)
        })
        .collect();

    let mut embed = StatsEmbed::new(locale.top_players_title(limit));
    embed.description = Some(lines.join("\n"));
    embed
}
