//! Tower integration for a [`Stage`].
//!
//! [`StageService`] implements `tower::Service<Update>`, so a host can stack
//! ordinary tower layers around dispatch:
//!
//! ```rust,ignore
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let service = ServiceBuilder::new()
//!     .concurrency_limit(16)
//!     .service(Arc::new(stage).service(bot));
//!
//! service.oneshot(update).await?;
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::Service;

use telestage_core::{BoxedBot, Update};

use crate::error::{StageError, StageResult};
use crate::stage::Stage;

/// A [`Stage`] bound to a transport handle.
#[derive(Clone)]
pub struct StageService {
    stage: Arc<Stage>,
    bot: BoxedBot,
}

impl StageService {
    pub fn new(stage: Arc<Stage>, bot: BoxedBot) -> Self {
        Self { stage, bot }
    }

    pub fn stage(&self) -> &Arc<Stage> {
        &self.stage
    }
}

impl Service<Update> for StageService {
    type Response = ();
    type Error = StageError;
    type Future = BoxFuture<'static, StageResult<()>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, update: Update) -> Self::Future {
        let stage = Arc::clone(&self.stage);
        let bot = Arc::clone(&self.bot);
        Box::pin(async move { stage.run(bot, update).await })
    }
}

impl std::fmt::Debug for StageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageService")
            .field("stage", &self.stage)
            .field("bot", &self.bot.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler;
    use crate::scene::Scene;
    use crate::test_utils::{MockBot, private_text};
    use tower::ServiceExt;

    fn update(text: &str) -> Update {
        Update {
            update_id: 3,
            message: Some(private_text(1, 12, text)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn oneshot_dispatches_through_stage() {
        let bot = MockBot::new();
        let mut scene = Scene::new();
        scene.on_message(handler(|ctx| async move {
            let _ = ctx.reply("pong").await;
        }));
        let stage = Arc::new(Stage::new(|_: &crate::Context| "main".to_string()).with("main", scene));

        stage.service(bot.clone()).oneshot(update("ping")).await.unwrap();

        assert_eq!(bot.sent(), vec![(12, "pong".to_string())]);
    }

    #[tokio::test]
    async fn scene_not_found_is_the_service_error() {
        let stage = Arc::new(Stage::new(|_: &crate::Context| "nowhere".to_string()));
        let service = StageService::new(stage, MockBot::boxed());

        let err = service.oneshot(update("ping")).await.unwrap_err();
        assert!(matches!(err, StageError::SceneNotFound { state } if state == "nowhere"));
    }
}
