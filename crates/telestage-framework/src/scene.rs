//! Scenes: ordered matchers for one conversational state.
//!
//! A [`Scene`] keeps its matchers in registration order, which is also the
//! order [`Stage::run`](crate::Stage::run) tries them in. It also keeps a
//! middleware prefix: every registration captures the prefix as it is at that
//! moment, so [`use_middleware`](Scene::use_middleware) never reaches back to
//! matchers registered earlier.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut scene = Scene::new();
//!
//! scene.on_start(handler(greet));
//! scene.use_middleware(load_account);
//! scene.use_group(&[require_admin], |admin| {
//!     admin.on_command("stats", handler(stats));
//! });
//! scene.on_message(handler(echo));
//! ```
//!
//! Here `greet` runs without middleware, `stats` runs inside `load_account`
//! then `require_admin`, and `echo` runs inside `load_account` only.

use std::sync::Arc;

use tracing::trace;

use crate::context::Context;
use crate::handler::{EventFn, Middleware, apply_middleware};
use crate::matcher::{Matcher, Predicate, is_command, is_message, is_photo, is_sticker};

/// An ordered set of matchers plus the middleware prefix for new ones.
#[derive(Clone, Default)]
pub struct Scene {
    matchers: Vec<Matcher>,
    middleware: Vec<Middleware>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the matchers in evaluation order.
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Returns the number of registered matchers.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns `true` if no matcher is registered.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    // ─── Middleware ──────────────────────────────────────────────────────────

    /// Appends middleware to the prefix of every matcher registered from now on.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    /// Runs `register` with `middleware` appended to the prefix, then restores
    /// the prefix as it was before the call.
    ///
    /// Anything `register` adds with [`use_middleware`](Self::use_middleware)
    /// is dropped on return as well.
    pub fn use_group<F>(&mut self, middleware: &[Middleware], register: F) -> &mut Self
    where
        F: FnOnce(&mut Scene),
    {
        let saved = self.middleware.len();
        self.middleware.extend(middleware.iter().cloned());
        register(self);
        self.middleware.truncate(saved);
        self
    }

    // ─── Registration ────────────────────────────────────────────────────────

    /// Handles the direct-message command `/name`.
    pub fn on_command(&mut self, name: &str, handler: EventFn) -> &mut Self {
        self.on_command_with(name, handler, &[])
    }

    /// Like [`on_command`](Self::on_command), with extra middleware inside the
    /// scene prefix.
    pub fn on_command_with(
        &mut self,
        name: &str,
        handler: EventFn,
        middleware: &[Middleware],
    ) -> &mut Self {
        self.register(format!("command:{name}"), is_command(name), handler, middleware)
    }

    /// Handles `/start`.
    pub fn on_start(&mut self, handler: EventFn) -> &mut Self {
        self.on_command("start", handler)
    }

    /// Like [`on_start`](Self::on_start), with extra middleware.
    pub fn on_start_with(&mut self, handler: EventFn, middleware: &[Middleware]) -> &mut Self {
        self.on_command_with("start", handler, middleware)
    }

    /// Handles any direct message: text, photo, sticker or anything else.
    pub fn on_message(&mut self, handler: EventFn) -> &mut Self {
        self.on_message_with(handler, &[])
    }

    /// Like [`on_message`](Self::on_message), with extra middleware.
    pub fn on_message_with(&mut self, handler: EventFn, middleware: &[Middleware]) -> &mut Self {
        self.register("message", is_message(), handler, middleware)
    }

    /// Handles messages carrying a photo.
    pub fn on_photo(&mut self, handler: EventFn) -> &mut Self {
        self.on_photo_with(handler, &[])
    }

    /// Like [`on_photo`](Self::on_photo), with extra middleware.
    pub fn on_photo_with(&mut self, handler: EventFn, middleware: &[Middleware]) -> &mut Self {
        self.register("photo", is_photo(), handler, middleware)
    }

    /// Handles messages carrying a sticker.
    pub fn on_sticker(&mut self, handler: EventFn) -> &mut Self {
        self.on_sticker_with(handler, &[])
    }

    /// Like [`on_sticker`](Self::on_sticker), with extra middleware.
    pub fn on_sticker_with(&mut self, handler: EventFn, middleware: &[Middleware]) -> &mut Self {
        self.register("sticker", is_sticker(), handler, middleware)
    }

    /// Handles updates accepted by a custom predicate.
    pub fn on<P>(&mut self, predicate: P, handler: EventFn) -> &mut Self
    where
        P: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.on_with(predicate, handler, &[])
    }

    /// Like [`on`](Self::on), with extra middleware.
    pub fn on_with<P>(
        &mut self,
        predicate: P,
        handler: EventFn,
        middleware: &[Middleware],
    ) -> &mut Self
    where
        P: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.register("custom", Arc::new(predicate), handler, middleware)
    }

    fn register(
        &mut self,
        name: impl Into<String>,
        predicate: Predicate,
        handler: EventFn,
        middleware: &[Middleware],
    ) -> &mut Self {
        let layers: Vec<Middleware> = self
            .middleware
            .iter()
            .chain(middleware)
            .cloned()
            .collect();
        let matcher = Matcher::new(name, predicate, apply_middleware(handler, &layers));
        trace!(
            matcher = matcher.name(),
            position = self.matchers.len(),
            layers = layers.len(),
            "Registered matcher"
        );
        self.matchers.push(matcher);
        self
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("matchers", &self.matchers)
            .field("middleware_count", &self.middleware.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler, middleware_fn};
    use crate::test_utils::{MockBot, command, private_text};
    use parking_lot::Mutex;
    use telestage_core::Update;

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, entry: &'static str) -> EventFn {
        let log = Arc::clone(log);
        handler(move |_ctx| {
            let log = Arc::clone(&log);
            async move { log.lock().push(entry.into()) }
        })
    }

    fn mark(log: &Log, entry: &'static str) -> Middleware {
        let log = Arc::clone(log);
        middleware_fn(move |ctx, next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push(entry.into());
                next(ctx).await;
            }
        })
    }

    async fn fire(scene: &Scene, update: Update) {
        let ctx = Arc::new(Context::new(MockBot::boxed(), update));
        if let Some(matcher) = scene.matchers().iter().find(|m| m.matches(&ctx)) {
            matcher.call(ctx).await;
        }
    }

    fn direct(text: &str) -> Update {
        let message = if text.starts_with('/') {
            command(1, text)
        } else {
            private_text(1, 1, text)
        };
        Update {
            update_id: 1,
            message: Some(message),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn middleware_applies_only_to_later_registrations() {
        let log: Log = Arc::default();
        let mut scene = Scene::new();
        scene.on_command("before", record(&log, "before"));
        scene.use_middleware(mark(&log, "mw"));
        scene.on_command("after", record(&log, "after"));

        fire(&scene, direct("/before")).await;
        assert_eq!(*log.lock(), vec!["before"]);

        log.lock().clear();
        fire(&scene, direct("/after")).await;
        assert_eq!(*log.lock(), vec!["mw", "after"]);
    }

    #[tokio::test]
    async fn group_middleware_is_scoped_to_the_callback() {
        let log: Log = Arc::default();
        let mut scene = Scene::new();
        scene.use_group(&[mark(&log, "group")], |inner| {
            inner.use_middleware(mark(&log, "nested"));
            inner.on_command("inside", record(&log, "inside"));
        });
        scene.on_command("outside", record(&log, "outside"));

        fire(&scene, direct("/inside")).await;
        assert_eq!(*log.lock(), vec!["group", "nested", "inside"]);

        log.lock().clear();
        fire(&scene, direct("/outside")).await;
        assert_eq!(*log.lock(), vec!["outside"]);
    }

    #[tokio::test]
    async fn scene_prefix_wraps_per_call_middleware() {
        let log: Log = Arc::default();
        let mut scene = Scene::new();
        scene.use_middleware(mark(&log, "scene"));
        scene.on_message_with(record(&log, "handler"), &[mark(&log, "call")]);

        fire(&scene, direct("hello")).await;
        assert_eq!(*log.lock(), vec!["scene", "call", "handler"]);
    }

    #[tokio::test]
    async fn on_start_is_the_start_command() {
        let log: Log = Arc::default();
        let mut scene = Scene::new();
        scene.on_start(record(&log, "start"));

        fire(&scene, direct("/help")).await;
        fire(&scene, direct("/start")).await;
        assert_eq!(*log.lock(), vec!["start"]);
    }

    #[test]
    fn registrations_keep_order_and_names() {
        let log: Log = Arc::default();
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        scene
            .on_start(record(&log, "a"))
            .on_photo(record(&log, "b"))
            .on_sticker(record(&log, "c"))
            .on(|ctx| ctx.text() == "ping", record(&log, "d"))
            .on_message(record(&log, "e"));

        let names: Vec<_> = scene.matchers().iter().map(Matcher::name).collect();
        assert_eq!(names, ["command:start", "photo", "sticker", "custom", "message"]);
        assert_eq!(scene.len(), 5);
    }
}
