//! Ordered route registry.
//!
//! Routes are appended in registration order and never removed. That order
//! is both priority and invocation order: the dispatcher walks every route,
//! front to back, for every request.
//!
//! # Example
//!
//! ```rust
//! use ariadne_core::Outcome;
//! use ariadne_server::Router;
//! use http::StatusCode;
//!
//! let mut router: Router = Router::new();
//! router
//!     .static_get("/", |_req, res, _ctx| async move {
//!         res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
//!         Ok(Outcome::Done)
//!     })
//!     .dynamic_get("/hello/:name", |_req, res, ctx| async move {
//!         let name = ctx.param("name").unwrap_or_default().to_string();
//!         res.send(StatusCode::OK, "text/plain", format!("Hello, {name}!"))?;
//!         Ok(Outcome::Done)
//!     });
//!
//! assert_eq!(router.len(), 2);
//! ```

use std::fmt;
use std::future::Future;

use ariadne_core::{HandlerError, MatchContext, Outcome, Request, Resolver, Response};
use ariadne_router::{InvalidMethod, MethodFilter, PathMatcher, RouteMatcher};

/// A registered route: a match predicate and the resolver it guards.
pub struct Route<Req = Request, Res = Response> {
    matcher: RouteMatcher,
    resolver: Resolver<Req, Res>,
}

impl<Req, Res> Route<Req, Res> {
    /// Returns the match predicate.
    #[must_use]
    pub fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    /// Returns the forward resolver.
    #[must_use]
    pub fn resolver(&self) -> &Resolver<Req, Res> {
        &self.resolver
    }

    /// Returns the path or pattern the route was registered with.
    #[must_use]
    pub fn path(&self) -> &str {
        self.matcher.path().as_str()
    }
}

impl<Req, Res> fmt::Debug for Route<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// The route registry.
///
/// Generic over the request and response handles so the dispatcher can be
/// driven by anything implementing [`RouteRequest`](ariadne_core::RouteRequest)
/// and [`RouteResponse`](ariadne_core::RouteResponse); it defaults to the
/// handles from `ariadne-core`.
pub struct Router<Req = Request, Res = Response> {
    routes: Vec<Route<Req, Res>>,
}

/// Generates one `{static,dynamic}_{method}` registration shorthand.
macro_rules! shorthand {
    ($(#[$doc:meta])* $name:ident => $filter:expr, $path:ident) => {
        $(#[$doc])*
        pub fn $name<F, Fut>(&mut self, path: &str, resolver: F) -> &mut Self
        where
            F: Fn(Req, Res, MatchContext) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<Outcome<Req, Res>, HandlerError>> + Send + 'static,
        {
            self.add_route($filter, PathMatcher::$path(path), Resolver::new(resolver))
        }
    };
}

impl<Req, Res> Router<Req, Res> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Returns the routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route<Req, Res>] {
        &self.routes
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Appends a route. Every other registration method ends up here.
    pub fn add_route(
        &mut self,
        method: MethodFilter,
        path: PathMatcher,
        resolver: Resolver<Req, Res>,
    ) -> &mut Self {
        let matcher = RouteMatcher::new(method, path);
        tracing::debug!(index = self.routes.len(), route = %matcher, "route registered");
        self.routes.push(Route { matcher, resolver });
        self
    }

    /// Registers an already built resolver.
    ///
    /// `method` is `*` or a method token; `path` is `*`, a static path or a
    /// pattern with `:name` segments.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMethod`] if `method` is neither `*` nor a valid token.
    pub fn route(
        &mut self,
        method: &str,
        path: &str,
        resolver: Resolver<Req, Res>,
    ) -> Result<&mut Self, InvalidMethod> {
        let method: MethodFilter = method.parse()?;
        Ok(self.add_route(method, PathMatcher::parse(path), resolver))
    }
}

impl<Req: 'static, Res: 'static> Router<Req, Res> {
    /// Registers an async closure.
    ///
    /// A path with at least one `:name` segment becomes a dynamic route,
    /// anything else a static one; `*` matches every path.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMethod`] if `method` is neither `*` nor a valid token.
    pub fn register<F, Fut>(
        &mut self,
        method: &str,
        path: &str,
        resolver: F,
    ) -> Result<&mut Self, InvalidMethod>
    where
        F: Fn(Req, Res, MatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Outcome<Req, Res>, HandlerError>> + Send + 'static,
    {
        self.route(method, path, Resolver::new(resolver))
    }

    shorthand!(
        /// Registers a static `GET` route.
        static_get => MethodFilter::GET, static_path
    );
    shorthand!(
        /// Registers a static `POST` route.
        static_post => MethodFilter::POST, static_path
    );
    shorthand!(
        /// Registers a static `PUT` route.
        static_put => MethodFilter::PUT, static_path
    );
    shorthand!(
        /// Registers a static `DELETE` route.
        static_delete => MethodFilter::DELETE, static_path
    );
    shorthand!(
        /// Registers a static `PATCH` route.
        static_patch => MethodFilter::PATCH, static_path
    );
    shorthand!(
        /// Registers a static `HEAD` route.
        static_head => MethodFilter::HEAD, static_path
    );
    shorthand!(
        /// Registers a static `OPTIONS` route.
        static_options => MethodFilter::OPTIONS, static_path
    );
    shorthand!(
        /// Registers a static route for every method.
        static_all => MethodFilter::Any, static_path
    );
    shorthand!(
        /// Registers a dynamic `GET` route.
        dynamic_get => MethodFilter::GET, dynamic
    );
    shorthand!(
        /// Registers a dynamic `POST` route.
        dynamic_post => MethodFilter::POST, dynamic
    );
    shorthand!(
        /// Registers a dynamic `PUT` route.
        dynamic_put => MethodFilter::PUT, dynamic
    );
    shorthand!(
        /// Registers a dynamic `DELETE` route.
        dynamic_delete => MethodFilter::DELETE, dynamic
    );
    shorthand!(
        /// Registers a dynamic `PATCH` route.
        dynamic_patch => MethodFilter::PATCH, dynamic
    );
    shorthand!(
        /// Registers a dynamic `HEAD` route.
        dynamic_head => MethodFilter::HEAD, dynamic
    );
    shorthand!(
        /// Registers a dynamic `OPTIONS` route.
        dynamic_options => MethodFilter::OPTIONS, dynamic
    );
    shorthand!(
        /// Registers a dynamic route for every method.
        dynamic_all => MethodFilter::Any, dynamic
    );
}

impl<Req, Res> Default for Router<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for Router<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|route| route.matcher.to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn done() -> Resolver {
        Resolver::new(|_req: Request, _res: Response, _ctx| async { Ok(Outcome::Done) })
    }

    #[test]
    fn test_new_router_is_empty() {
        let router: Router = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut router: Router = Router::new();
        router
            .static_get("/b", |_req, _res, _ctx| async { Ok(Outcome::Done) })
            .static_get("/a", |_req, _res, _ctx| async { Ok(Outcome::Done) })
            .static_all("*", |_req, _res, _ctx| async { Ok(Outcome::Done) });

        let paths: Vec<_> = router.routes().iter().map(Route::path).collect();
        assert_eq!(paths, vec!["/b", "/a", "*"]);
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let mut router: Router = Router::new();
        router
            .add_route(MethodFilter::GET, PathMatcher::static_path("/x"), done())
            .add_route(MethodFilter::GET, PathMatcher::static_path("/x"), done());
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_static_path_is_normalized_at_registration() {
        let mut router: Router = Router::new();
        router.static_get("/hello//", |_req, _res, _ctx| async { Ok(Outcome::Done) });
        assert_eq!(router.routes()[0].path(), "/hello");
    }

    #[test]
    fn test_shorthands_pick_method_and_kind() {
        let mut router: Router = Router::new();
        router
            .static_post("/items", |_req, _res, _ctx| async { Ok(Outcome::Done) })
            .dynamic_delete("/items/:id", |_req, _res, _ctx| async { Ok(Outcome::Done) })
            .dynamic_all("/any/:x", |_req, _res, _ctx| async { Ok(Outcome::Done) });

        let routes = router.routes();
        assert_eq!(routes[0].matcher().method(), &MethodFilter::POST);
        assert!(!routes[0].matcher().path().is_dynamic());
        assert_eq!(routes[1].matcher().method(), &MethodFilter::DELETE);
        assert!(routes[1].matcher().path().is_dynamic());
        assert!(routes[2].matcher().method().is_any());
    }

    #[test]
    fn test_register_classifies_path() {
        let mut router: Router = Router::new();
        router
            .register("GET", "/hello/:name", |_req, _res, _ctx| async { Ok(Outcome::Done) })
            .unwrap()
            .register("*", "*", |_req, _res, _ctx| async { Ok(Outcome::Done) })
            .unwrap();

        let routes = router.routes();
        assert!(routes[0].matcher().path().is_dynamic());
        assert!(routes[0].matcher().matches(&Method::GET, "/hello/John").is_some());
        assert_eq!(routes[1].matcher().path(), &PathMatcher::Any);
        assert!(routes[1].matcher().method().is_any());
    }

    #[test]
    fn test_register_rejects_invalid_method() {
        let mut router: Router = Router::new();
        let err = router.route("BAD METHOD", "/", done()).unwrap_err();
        assert_eq!(err.token(), "BAD METHOD");
        assert!(router.is_empty());
    }

    #[test]
    fn test_debug_lists_routes() {
        let mut router: Router = Router::new();
        router.route("GET", "/users/:id", done()).unwrap();
        assert_eq!(format!("{router:?}"), r#"["GET /users/:id"]"#);
    }
}
