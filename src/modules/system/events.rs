use crate::{events::EventHandler, Error};
use async_trait::async_trait;
use poise::serenity_prelude::{ActivityData, Context, FullEvent, OnlineStatus};
use tracing::info;

pub const PRESENCE: &str = "the killboard";

#[derive(Debug, Clone)]
pub struct ReadyHandler;

#[async_trait]
impl EventHandler for ReadyHandler {
    fn name(&self) -> &str {
        "Ready"
    }

    async fn handle(&self, ctx: &Context, event: &FullEvent) -> Result<(), Error> {
        if let FullEvent::Ready { data_about_bot } = event {
            info!("logged in as {}", data_about_bot.user.tag());
            ctx.set_presence(Some(ActivityData::watching(PRESENCE)), OnlineStatus::Online);
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn EventHandler> {
        Box::new(self.clone())
    }
}
