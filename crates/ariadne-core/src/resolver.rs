//! The two-phase resolver protocol.
//!
//! A forward [`Resolver`] runs when its route matches. It either finishes
//! ([`Outcome::Done`]) or hands back a [`BackwardResolver`] through
//! [`Outcome::Defer`]. Backward resolvers run after every forward resolver of
//! the request has run, in the reverse order of collection, each exactly once.
//!
//! # Example
//!
//! ```
//! use ariadne_core::{Outcome, Request, Resolver, Response};
//! use std::time::Instant;
//!
//! let timing: Resolver = Resolver::new(|_req: Request, _res: Response, ctx| async move {
//!     let started = Instant::now();
//!     Ok(Outcome::defer(move |_req: Request, _res: Response| async move {
//!         println!("{} took {:?}", ctx.request_id(), started.elapsed());
//!         Ok(())
//!     }))
//! });
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::MatchContext;
use crate::error::HandlerError;
use crate::request::Request;
use crate::response::Response;

/// An owned, sendable, type-erased future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type ForwardFn<Req, Res> = dyn Fn(Req, Res, MatchContext) -> BoxFuture<'static, Result<Outcome<Req, Res>, HandlerError>>
    + Send
    + Sync;

type BackwardFn<Req, Res> =
    dyn FnOnce(Req, Res) -> BoxFuture<'static, Result<(), HandlerError>> + Send;

/// What a forward resolver asks the dispatcher to do next.
pub enum Outcome<Req = Request, Res = Response> {
    /// Nothing more to do for this route.
    Done,
    /// Run this resolver during the backward pass.
    Defer(BackwardResolver<Req, Res>),
}

impl<Req, Res> Outcome<Req, Res> {
    /// Shorthand for `Outcome::Defer(BackwardResolver::new(f))`.
    #[must_use]
    pub fn defer<F, Fut>(f: F) -> Self
    where
        Req: 'static,
        Res: 'static,
        F: FnOnce(Req, Res) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Self::Defer(BackwardResolver::new(f))
    }

    /// Returns true for [`Outcome::Defer`].
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Defer(_))
    }
}

impl<Req, Res> fmt::Debug for Outcome<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("Done"),
            Self::Defer(_) => f.write_str("Defer(..)"),
        }
    }
}

/// Work deferred to the backward pass.
///
/// Consumed by [`invoke`](Self::invoke), so it can only run once.
pub struct BackwardResolver<Req = Request, Res = Response> {
    func: Box<BackwardFn<Req, Res>>,
}

impl<Req, Res> BackwardResolver<Req, Res> {
    /// Wraps an async closure.
    #[must_use]
    pub fn new<F, Fut>(f: F) -> Self
    where
        Req: 'static,
        Res: 'static,
        F: FnOnce(Req, Res) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Self {
            func: Box::new(move |req: Req, res: Res| -> BoxFuture<'static, Result<(), HandlerError>> {
                Box::pin(f(req, res))
            }),
        }
    }

    /// Runs the resolver.
    pub fn invoke(self, request: Req, response: Res) -> BoxFuture<'static, Result<(), HandlerError>> {
        (self.func)(request, response)
    }
}

impl<Req, Res> fmt::Debug for BackwardResolver<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackwardResolver").finish_non_exhaustive()
    }
}

/// A forward resolver, shareable across every request the router serves.
pub struct Resolver<Req = Request, Res = Response> {
    func: Arc<ForwardFn<Req, Res>>,
}

impl<Req, Res> Resolver<Req, Res> {
    /// Wraps an async closure taking the request, the response and the
    /// match context.
    #[must_use]
    pub fn new<F, Fut>(f: F) -> Self
    where
        Req: 'static,
        Res: 'static,
        F: Fn(Req, Res, MatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Outcome<Req, Res>, HandlerError>> + Send + 'static,
    {
        Self {
            func: Arc::new(
                move |req: Req,
                      res: Res,
                      ctx: MatchContext|
                      -> BoxFuture<'static, Result<Outcome<Req, Res>, HandlerError>> {
                    Box::pin(f(req, res, ctx))
                },
            ),
        }
    }

    /// Runs the resolver.
    pub fn invoke(
        &self,
        request: Req,
        response: Res,
        ctx: MatchContext,
    ) -> BoxFuture<'static, Result<Outcome<Req, Res>, HandlerError>> {
        (self.func)(request, response, ctx)
    }
}

impl<Req, Res> Clone for Resolver<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<Req, Res> fmt::Debug for Resolver<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
