//! Store Example
//!
//! A scene-level middleware loads the sender's account into the dispatch
//! store; the message handler reads it back.
//!
//! # Usage
//!
//! ```bash
//! BOT_TOKEN=123456:ABC cargo run --package telestage-store
//! ```

use anyhow::Result;
use telestage::prelude::*;
use tracing::warn;

#[derive(Debug, Clone)]
struct Account {
    balance: u64,
}

/// Puts the sender's account under `"account"` before the handler runs.
fn add_user_balance() -> Middleware {
    middleware_fn(|ctx: Arc<Context>, next: EventFn| async move {
        ctx.set("account", Account { balance: 500 });
        next(ctx).await;
    })
}

async fn show_balance(ctx: Arc<Context>) {
    let text = match ctx.get::<Account>("account") {
        Ok(Some(account)) => format!("Your balance: {}", account.balance),
        Ok(None) => "No account loaded".to_string(),
        Err(err) => {
            warn!(error = %err, "Unexpected value in store");
            return;
        }
    };

    if let Err(err) = ctx.reply(&text).await {
        warn!(error = %err, "Failed to send reply");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut main = Scene::new();
    main.use_middleware(add_user_balance());
    main.on_message(handler(show_balance));

    let stage = Stage::new(|_: &Context| "main".to_string()).with("main", main);

    StageRuntime::builder().build(stage)?.run().await?;
    Ok(())
}
