use crate::Error;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use poise::serenity_prelude::{Context, FullEvent};
use std::fmt::Debug;
use tokio::sync::Mutex;
use tracing::error;

/// Reacts to raw gateway events alongside the command framework.
#[async_trait]
pub trait EventHandler: Send + Sync + Debug {
    fn name(&self) -> &str;
    async fn handle(&self, ctx: &Context, event: &FullEvent) -> Result<(), Error>;
    fn box_clone(&self) -> Box<dyn EventHandler>;
}

impl Clone for Box<dyn EventHandler> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

#[derive(Debug, Default)]
pub struct EventManager {
    handlers: Mutex<Vec<Box<dyn EventHandler>>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_handler(&self, handler: impl EventHandler + 'static) {
        self.handlers.lock().await.push(Box::new(handler));
    }

    pub async fn handler_names(&self) -> Vec<String> {
        self.handlers
            .lock()
            .await
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    /// Runs every handler on its own task; a failing handler is logged and
    /// does not affect the others.
    pub async fn handle_event(&self, ctx: &Context, event: &FullEvent) {
        let handlers: Vec<Box<dyn EventHandler>> = self.handlers.lock().await.clone();
        let mut futures = FuturesUnordered::new();

        for handler in handlers {
            let ctx = ctx.clone();
            let event = event.clone();

            futures.push(tokio::spawn(async move {
                if let Err(e) = handler.handle(&ctx, &event).await {
                    error!("Error in event handler {}: {}", handler.name(), e);
                }
            }));
        }

        while futures.next().await.is_some() {}
    }
}
