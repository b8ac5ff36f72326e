//! The stage: a router from state names to scenes.
//!
//! A [`Stage`] holds one [`Scene`] per state name and a resolver that turns a
//! [`Context`] into the current state name. It keeps no state of its own
//! between calls: where a user "is" lives wherever the resolver reads it from,
//! and handlers move users around by writing there.
//!
//! # Dispatch
//!
//! [`Stage::run`] handles exactly one update:
//!
//! 1. Builds a fresh [`Context`] from the handle and update
//! 2. Calls the resolver once to obtain the state name
//! 3. Fails with [`StageError::SceneNotFound`] if no scene is registered under
//!    that name, before any handler runs
//! 4. Tries the scene's matchers in registration order and awaits the handler
//!    of the first one that accepts; later matchers are not evaluated
//! 5. Returns `Ok(())` whether or not a matcher accepted
//!
//! Matching is a linear scan, so its cost grows with the number of matchers
//! in the active scene.
//!
//! ```rust,ignore
//! let states = Arc::new(StateStore::default());
//!
//! let mut stage = Stage::new({
//!     let states = Arc::clone(&states);
//!     move |ctx: &Context| states.get(ctx.sender().map_or(0, |u| u.id))
//! });
//! stage.add("main", main_scene);
//! stage.add("message", message_scene);
//!
//! stage.run(bot, update).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{Instrument, Span, debug, debug_span, field, trace};

use telestage_core::{BoxedBot, Update};

use crate::context::Context;
use crate::error::{StageError, StageResult};
use crate::scene::Scene;
use crate::service::StageService;

/// Resolves the state name for a dispatch.
pub type StateResolver = Arc<dyn Fn(&Context) -> String + Send + Sync>;

/// Routes updates to the scene of the current state.
#[derive(Clone)]
pub struct Stage {
    scenes: HashMap<String, Arc<Scene>>,
    resolver: StateResolver,
}

impl Stage {
    /// Creates a stage with no scenes.
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&Context) -> String + Send + Sync + 'static,
    {
        Self {
            scenes: HashMap::new(),
            resolver: Arc::new(resolver),
        }
    }

    /// Registers `scene` under `state`, replacing any scene already there.
    ///
    /// The same scene may be registered under several names by passing a
    /// shared `Arc<Scene>`.
    pub fn add(&mut self, state: impl Into<String>, scene: impl Into<Arc<Scene>>) -> &mut Self {
        let state = state.into();
        let scene = scene.into();
        debug!(state = %state, matchers = scene.len(), "Scene added");
        self.scenes.insert(state, scene);
        self
    }

    /// Registers a scene (builder pattern).
    pub fn with(mut self, state: impl Into<String>, scene: impl Into<Arc<Scene>>) -> Self {
        self.add(state, scene);
        self
    }

    /// Returns the scene registered under `state`.
    pub fn scene(&self, state: &str) -> Option<&Arc<Scene>> {
        self.scenes.get(state)
    }

    /// Returns the registered state names, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    /// Returns the number of registered scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Returns `true` if no scene is registered.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Dispatches one update.
    ///
    /// The only error is [`StageError::SceneNotFound`]. A missing matcher is
    /// not an error, and handler failures stay inside the handler.
    pub async fn run(&self, bot: BoxedBot, update: Update) -> StageResult<()> {
        let update_id = update.update_id;
        let kind = update.kind();
        let ctx = Arc::new(Context::new(bot, update));
        let span = debug_span!("dispatch", update_id, kind, state = field::Empty);

        async move {
            let state = (self.resolver)(ctx.as_ref());
            Span::current().record("state", state.as_str());

            let Some(scene) = self.scenes.get(&state) else {
                debug!("No scene registered for state");
                return Err(StageError::SceneNotFound { state });
            };

            for matcher in scene.matchers() {
                if matcher.matches(&ctx) {
                    debug!(matcher = matcher.name(), "Matcher accepted update");
                    matcher.call(Arc::clone(&ctx)).await;
                    return Ok(());
                }
                trace!(matcher = matcher.name(), "Matcher rejected update");
            }

            debug!("No matcher accepted update");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Wraps this stage in a [`tower::Service`] that dispatches with `bot`.
    pub fn service(self: Arc<Self>, bot: BoxedBot) -> StageService {
        StageService::new(self, bot)
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut states: Vec<_> = self.states().collect();
        states.sort_unstable();
        f.debug_struct("Stage")
            .field("states", &states)
            .finish_non_exhaustive()
    }
}
