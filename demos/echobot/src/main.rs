//! Echo Bot Example
//!
//! Two scenes and an in-memory state store:
//!
//! ```text
//! "main"     /start  → greeting
//!            /enter  → move to "message"
//!            other   → "Incorrect input"
//!
//! "message"  /start  → greeting
//!            /leave  → back to "main"
//!            other   → "You in message scene"
//! ```
//!
//! # Usage
//!
//! ```bash
//! BOT_TOKEN=123456:ABC cargo run --package telestage-echobot
//! ```

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use telestage::prelude::*;
use telestage::runtime::PollingConfig;
use tracing::{info, warn};

const DEFAULT_STATE: &str = "main";

// ============================================================================
// State store
// ============================================================================

/// Remembers which scene each user is in. Unknown users are in `main`.
#[derive(Default)]
struct StateStore {
    states: RwLock<HashMap<i64, String>>,
}

impl StateStore {
    fn get(&self, user_id: i64) -> String {
        self.states
            .read()
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| DEFAULT_STATE.to_string())
    }

    fn set(&self, user_id: i64, state: &str) {
        info!(user_id, state, "State changed");
        self.states.write().insert(user_id, state.to_string());
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn reply(ctx: &Context, text: &str) {
    if let Err(err) = ctx.reply(text).await {
        warn!(error = %err, "Failed to send reply");
    }
}

fn say(text: &'static str) -> EventFn {
    handler(move |ctx| async move { reply(&ctx, text).await })
}

/// Moves the sender to `state`, then replies with `text`.
fn transition(states: &Arc<StateStore>, state: &'static str, text: &'static str) -> EventFn {
    let states = Arc::clone(states);
    handler(move |ctx| {
        let states = Arc::clone(&states);
        async move {
            if let Some(user) = ctx.sender() {
                states.set(user.id, state);
            }
            reply(&ctx, text).await;
        }
    })
}

fn build_stage(states: &Arc<StateStore>) -> Stage {
    let mut main = Scene::new();
    main.on_start(say("Hello world. send: /enter"))
        .on_command("enter", transition(states, "message", "Now send: /start"))
        .on_message(say("Incorrect input"));

    let mut message = Scene::new();
    message
        .on_start(say("Hello from message scene, go back: /leave"))
        .on_command(
            "leave",
            transition(states, "main", "Welcome in main scene, send: /start"),
        )
        .on_message(say("You in message scene"));

    let resolver = {
        let states = Arc::clone(states);
        move |ctx: &Context| match ctx.sender() {
            Some(user) => states.get(user.id),
            None => DEFAULT_STATE.to_string(),
        }
    };

    Stage::new(resolver)
        .with("main", main)
        .with("message", message)
}

#[tokio::main]
async fn main() -> Result<()> {
    let states = Arc::new(StateStore::default());

    let runtime = StageRuntime::builder()
        .merge(TelestageConfig {
            polling: PollingConfig {
                timeout_secs: 60,
                ..Default::default()
            },
            ..Default::default()
        })
        .build(build_stage(&states))?;

    runtime.run().await?;
    Ok(())
}
