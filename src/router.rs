//! Radix-tree request router and handler storage.
//!
//! One matchit tree per HTTP method, built once at startup. Handlers are
//! plain `async fn(Request) -> impl IntoResponse` items or closures; they are
//! type-erased behind [`Handler`] so one table can hold them all. A path
//! registered under a different method answers `405`, an unknown path `404`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Router ───────────────────────────────────────────────────────────────────

/// The application router.
///
/// Path parameters use `{name}` syntax and are read back with
/// [`Request::param`]:
///
/// ```rust,no_run
/// # use circus::{Request, Response, Router};
/// # async fn sketch_by_name(_: Request) -> Response { Response::text("") }
/// # async fn random_quote(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .get("/v1/quotes/random", random_quote)
///     .get("/v1/sketches/{name}", sketch_by_name);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

/// Outcome of a route lookup.
pub(crate) enum RouteMatch {
    Found {
        handler: BoxedHandler,
        params: HashMap<String, String>,
    },
    /// The path exists, but under another method.
    MethodNotAllowed,
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registers a GET handler. Returns `self` for chaining.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Registers a handler for an arbitrary method + path pair.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or conflicting route pattern. Routes are
    /// registered once at startup; a bad pattern is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed())
            .unwrap_or_else(|err| panic!("invalid route `{path}`: {err}"));
        self
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> RouteMatch {
        if let Some(tree) = self.routes.get(method) {
            if let Ok(matched) = tree.at(path) {
                let params = matched
                    .params
                    .iter()
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
                    .collect();
                return RouteMatch::Found {
                    handler: Arc::clone(matched.value),
                    params,
                };
            }
        }
        let known_elsewhere = self
            .routes
            .iter()
            .any(|(other, tree)| other != method && tree.at(path).is_ok());
        if known_elsewhere {
            RouteMatch::MethodNotAllowed
        } else {
            RouteMatch::NotFound
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

// ── Handler erasure ──────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface behind the type erasure. `#[doc(hidden)]`
/// because it leaks into [`Handler`]'s method signature; nothing outside this
/// crate can use it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A stored handler, shared across concurrent requests. One `Arc` clone plus
/// one virtual call per request; the rest is the handler's own future.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Never implemented by hand: the blanket impl covers every
/// `async fn(Request) -> impl IntoResponse` and every closure of the same
/// shape, which is how handlers capture shared state such as the script
/// store. The trait is sealed so the blanket impl stays the only one.
pub trait Handler: sealed::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed(self) -> BoxedHandler;
}

mod sealed {
    pub trait Sealed {}
}

impl<F, Fut, R> sealed::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete handler into the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn greet(req: Request) -> Response {
        let name = req.param("name").unwrap_or("nobody").to_owned();
        Response::text(name)
    }

    fn router() -> Router {
        Router::new()
            .get("/v1/sketches", |_req| async { Response::text("all") })
            .get("/v1/sketches/random", |_req| async { Response::text("random") })
            .get("/v1/sketches/{name}", greet)
    }

    async fn dispatch(router: &Router, method: Method, path: &str) -> Option<Response> {
        match router.lookup(&method, path) {
            RouteMatch::Found { handler, params } => {
                let uri: http::Uri = path.parse().expect("test uri");
                let req = Request::new(method, &uri, http::HeaderMap::new(), params);
                Some(handler.call(req).await)
            }
            _ => None,
        }
    }

    #[tokio::test]
    async fn static_routes_win_over_params() {
        let router = router();
        let response = dispatch(&router, Method::GET, "/v1/sketches/random")
            .await
            .expect("route exists");
        assert_eq!(response.body_bytes(), b"random");
    }

    #[tokio::test]
    async fn params_are_captured() {
        let router = router();
        let response = dispatch(&router, Method::GET, "/v1/sketches/Spam")
            .await
            .expect("route exists");
        assert_eq!(response.body_bytes(), b"Spam");
    }

    #[test]
    fn wrong_method_is_distinguished_from_missing_path() {
        let router = router();
        assert!(matches!(
            router.lookup(&Method::POST, "/v1/sketches"),
            RouteMatch::MethodNotAllowed
        ));
        assert!(matches!(
            router.lookup(&Method::GET, "/v1/nothing/here"),
            RouteMatch::NotFound
        ));
    }

    #[tokio::test]
    async fn closures_capture_state() {
        let flavour = Arc::new("spam".to_owned());
        let captured = Arc::clone(&flavour);
        let router = Router::new().get("/flavour", move |_req| {
            let flavour = Arc::clone(&captured);
            async move { Response::text(flavour.as_str()) }
        });
        let response = dispatch(&router, Method::GET, "/flavour")
            .await
            .expect("route exists");
        assert_eq!(response.body_bytes(), b"spam");
    }

    #[test]
    fn lookup_reports_not_found_on_empty_router() {
        let router = Router::new();
        assert!(matches!(
            router.lookup(&Method::GET, "/anything"),
            RouteMatch::NotFound
        ));
    }
}
