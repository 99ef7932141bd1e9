pub mod commands;
pub mod database;
pub mod display;
#[cfg(test)]
mod memory;
pub mod render;

use crate::{Data, Error};

/// Slash commands answering player and team stat queries.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::player(),
        commands::team(),
        commands::top_teams(),
        commands::top_players(),
    ]
}
