use config::Config;
use database::Database;
use events::EventManager;
use locale::Locale;
use modules::system::events::ReadyHandler;
use poise::serenity_prelude::{self as serenity, CreateAllowedMentions, GuildId};
use std::sync::Arc;
use tracing::{error, info, trace, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod events;
mod locale;
mod modules;
mod utils;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Arc<Database>,
    pub event_manager: Arc<EventManager>,
    pub locale: Locale,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

fn where_used(ctx: Context<'_>) -> String {
    ctx.guild_id()
        .map_or_else(|| "DM".to_string(), |id| id.to_string())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command {} failed for {} in {}: {:?}",
                ctx.command().qualified_name,
                ctx.author().tag(),
                where_used(ctx),
                error
            );
            if let Err(e) = ctx.say(ctx.data().locale.command_failed()).await {
                error!("Failed to report command error: {}", e);
            }
        }
        err => error!("Other framework error: {:?}", err),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("starting killboard");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("replying in locale {}", config.locale);

    let intents = serenity::GatewayIntents::non_privileged();
    let db = Arc::new(Database::new(config.db.clone()));
    let setup_db = db.clone();
    let guild_id = config.guild_id;
    let locale = config.locale;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions::<Data, Error> {
            allowed_mentions: Some(CreateAllowedMentions::new().empty_roles().empty_users()),
            commands: modules::stats::commands(),
            pre_command: |ctx| {
                Box::pin(async move {
                    trace!(
                        "Command {} used by {} in {}",
                        ctx.command().qualified_name,
                        ctx.author().tag(),
                        where_used(ctx)
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command {} completed for {} in {}",
                        ctx.command().qualified_name,
                        ctx.author().tag(),
                        where_used(ctx)
                    );
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    data.event_manager.handle_event(ctx, event).await;
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                // Commands stay registered even without a database; they
                // then fail with NotConnected until the bot is restarted.
                match setup_db.connect().await {
                    Ok(()) => info!("database connected"),
                    Err(e) => error!("database connect failed: {}", e),
                }

                let commands = &framework.options().commands;
                if guild_id != 0 {
                    poise::builtins::register_in_guild(ctx, commands, GuildId::new(guild_id))
                        .await?;
                    info!("commands registered in guild {}", guild_id);
                } else {
                    poise::builtins::register_globally(ctx, commands).await?;
                    info!("commands registered globally");
                }

                let event_manager = Arc::new(EventManager::new());
                event_manager.add_handler(ReadyHandler).await;
                info!("event handlers: {:?}", event_manager.handler_names().await);

                Ok(Data {
                    db: setup_db,
                    event_manager,
                    locale,
                })
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await;

    let mut client = match client {
        Ok(client) => client,
        Err(e) => {
            error!("failed to build client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.start().await {
        error!("client stopped: {}", e);
    }

    warn!("shutting down");
    db.close().await;
}
