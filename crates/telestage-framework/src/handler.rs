//! Event handlers and middleware.
//!
//! A handler is an async function of the dispatch [`Context`]; it returns
//! nothing, and whatever fails inside it stays inside it. A middleware is a
//! function from one handler to another, so it can run code before and after
//! the next layer or decide not to call it at all.
//!
//! # Composition
//!
//! [`apply_middleware`] wraps a handler so that the first middleware in the
//! list runs first:
//!
//! ```text
//! apply_middleware(h, [m0, m1, m2])  ==  m0(m1(m2(h)))
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let auth = middleware_fn(|ctx: Arc<Context>, next: EventFn| async move {
//!     if ctx.sender().is_some_and(|user| ADMINS.contains(&user.id)) {
//!         next(ctx).await;
//!     }
//! });
//!
//! scene.on_command_with("ban", handler(ban), &[auth]);
//! ```

use std::future::Future;
use std::sync::Arc;

pub use futures::future::BoxFuture;

use crate::context::Context;

/// A type-erased, middleware-composed event handler.
pub type EventFn = Arc<dyn Fn(Arc<Context>) -> BoxFuture<'static, ()> + Send + Sync>;

/// A transformation from one handler to another.
pub type Middleware = Arc<dyn Fn(EventFn) -> EventFn + Send + Sync>;

/// Builds an [`EventFn`] from an async function or closure.
pub fn handler<F, Fut>(f: F) -> EventFn
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |ctx: Arc<Context>| -> BoxFuture<'static, ()> { Box::pin(f(ctx)) })
}

/// Builds a [`Middleware`] from a handler-to-handler function.
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(EventFn) -> EventFn + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builds a [`Middleware`] from an async function that receives the context
/// and the next layer.
pub fn middleware_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(Arc<Context>, EventFn) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |next: EventFn| -> EventFn {
        let f = Arc::clone(&f);
        handler(move |ctx| f(ctx, Arc::clone(&next)))
    })
}

/// Wraps `handler` in `middleware`, first element outermost.
pub fn apply_middleware(handler: EventFn, middleware: &[Middleware]) -> EventFn {
    middleware
        .iter()
        .rev()
        .fold(handler, |next, layer| layer(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBot;
    use parking_lot::Mutex;
    use telestage_core::Update;

    type Log = Arc<Mutex<Vec<String>>>;

    fn tag(log: &Log, name: &'static str) -> Middleware {
        let log = Arc::clone(log);
        middleware_fn(move |ctx, next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push(format!("{name}:before"));
                next(ctx).await;
                log.lock().push(format!("{name}:after"));
            }
        })
    }

    fn recording_handler(log: &Log) -> EventFn {
        let log = Arc::clone(log);
        handler(move |_ctx| {
            let log = Arc::clone(&log);
            async move { log.lock().push("handler".into()) }
        })
    }

    fn ctx() -> Arc<Context> {
        Arc::new(Context::new(MockBot::boxed(), Update::default()))
    }

    #[tokio::test]
    async fn first_middleware_runs_outermost() {
        let log: Log = Arc::default();
        let composed = apply_middleware(
            recording_handler(&log),
            &[tag(&log, "m0"), tag(&log, "m1"), tag(&log, "m2")],
        );

        composed(ctx()).await;

        assert_eq!(
            *log.lock(),
            vec![
                "m0:before",
                "m1:before",
                "m2:before",
                "handler",
                "m2:after",
                "m1:after",
                "m0:after",
            ]
        );
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let log: Log = Arc::default();
        let deny = middleware(|_next| handler(|_ctx| async {}));
        let composed = apply_middleware(recording_handler(&log), &[tag(&log, "outer"), deny]);

        composed(ctx()).await;

        assert_eq!(*log.lock(), vec!["outer:before", "outer:after"]);
    }

    #[tokio::test]
    async fn empty_middleware_list_is_identity() {
        let log: Log = Arc::default();
        let composed = apply_middleware(recording_handler(&log), &[]);

        composed(ctx()).await;

        assert_eq!(*log.lock(), vec!["handler"]);
    }

    #[test]
    fn handler_runs_on_a_blocking_executor() {
        let log: Log = Arc::default();
        let composed = apply_middleware(recording_handler(&log), &[tag(&log, "m")]);

        tokio_test::block_on(composed(ctx()));

        assert_eq!(log.lock().len(), 3);
    }
}
