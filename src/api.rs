//! The HTTP surface: routes, handlers, and reply shapes.
//!
//! Every endpoint is a GET under `/v1`. Handlers capture the store behind an
//! `Arc` and do purely synchronous work: parse parameters, filter, pick,
//! serialize. Client-facing failures are [`ApiError`]s, converted into JSON
//! error bodies by [`IntoResponse`] so handlers can use `?`.
//!
//! | Route | Response |
//! |---|---|
//! | `/v1/quotes/random?episode=&actor=&sketch=&max_length=` | one random quote |
//! | `/v1/sketches` | every distinct sketch name |
//! | `/v1/sketches/random?detailed=` | one random sketch with its body |
//! | `/v1/sketches/episode/{episode}` | sketch names of one episode |
//! | `/v1/sketches/{name}?detailed=` | one sketch looked up by name |
//! | `/v1/episodes/random?detailed=` | one random episode, full script |
//! | `/v1/episodes/{episode}?detailed=` | one episode, full script |

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::health;
use crate::query::{self, QuoteFilter};
use crate::request::{BadParam, Request};
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::script::{EpisodeScript, Sketch, SketchBody};
use crate::store::ScriptStore;

/// Builds the application router over a loaded store.
pub fn router(store: Arc<ScriptStore>) -> Router {
    Router::new()
        .get("/v1/quotes/random", route(&store, random_quote))
        .get("/v1/sketches", route(&store, all_sketches))
        .get("/v1/sketches/random", route(&store, random_sketch))
        .get("/v1/sketches/episode/{episode}", route(&store, episode_sketches))
        .get("/v1/sketches/{name}", route(&store, sketch_by_name))
        .get("/v1/episodes/random", route(&store, random_episode))
        .get("/v1/episodes/{episode}", route(&store, episode_by_number))
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}

/// Adapts a synchronous `fn(&ScriptStore, &Request)` endpoint into a route
/// handler, capturing the store. The work is done before the future is built;
/// nothing here awaits.
fn route<F>(
    store: &Arc<ScriptStore>,
    endpoint: F,
) -> impl Fn(Request) -> std::future::Ready<Result<Response, ApiError>> + Send + Sync + 'static
where
    F: Fn(&ScriptStore, &Request) -> Result<Response, ApiError> + Send + Sync + 'static,
{
    let store = Arc::clone(store);
    move |req: Request| std::future::ready(endpoint(&store, &req))
}

// ── Reply shapes ─────────────────────────────────────────────────────────────

/// `GET /v1/quotes/random` — one attributed line with its context.
#[derive(Serialize)]
struct QuoteReply<'a> {
    episode: u32,
    sketch: Option<&'a str>,
    actor: Option<&'a str>,
    character: Option<&'a str>,
    quote: &'a str,
}

/// `GET /v1/sketches/random` and `GET /v1/sketches/{name}`.
#[derive(Serialize)]
struct SketchReply<'a> {
    episode: u32,
    episode_name: Option<&'a str>,
    sketch: &'a str,
    body: SketchBody<'a>,
}

impl<'a> SketchReply<'a> {
    fn new(sketch: &Sketch<'a>, detailed: bool) -> Self {
        Self {
            episode: sketch.episode,
            episode_name: sketch.episode_name,
            sketch: sketch.name,
            body: sketch.body(detailed),
        }
    }
}

/// `GET /v1/episodes/random` and `GET /v1/episodes/{episode}`.
#[derive(Serialize)]
struct EpisodeReply<'a> {
    episode: u32,
    episode_name: Option<&'a str>,
    body: Vec<EpisodeSketchReply<'a>>,
}

/// One sketch block inside an episode reply. `sketch` is `null` for the
/// unnamed block at the top of an episode.
#[derive(Serialize)]
struct EpisodeSketchReply<'a> {
    sketch: Option<&'a str>,
    lines: SketchBody<'a>,
}

impl<'a> EpisodeReply<'a> {
    fn new(episode: &EpisodeScript<'a>, detailed: bool) -> Self {
        Self {
            episode: episode.episode,
            episode_name: episode.episode_name,
            body: episode
                .sketches
                .iter()
                .map(|block| EpisodeSketchReply {
                    sketch: block.name,
                    lines: block.body(detailed),
                })
                .collect(),
        }
    }
}

// ── Endpoints ────────────────────────────────────────────────────────────────

/// `GET /v1/quotes/random?episode=&actor=&sketch=&max_length=`
fn random_quote(store: &ScriptStore, req: &Request) -> Result<Response, ApiError> {
    let filter = QuoteFilter {
        episode: req.query_parsed("episode")?,
        actor: req.query("actor").map(str::to_owned),
        sketch: req.query("sketch").map(str::to_owned),
        max_length: req.query_parsed("max_length")?,
    };
    let mut rng = rand::thread_rng();
    let record = query::random_quote(store, &filter, &mut rng).ok_or_else(|| {
        debug!(?filter, "no quote matched");
        ApiError::not_found("no quote matches the given filters")
    })?;
    Ok(Json(QuoteReply {
        episode: record.episode,
        sketch: record.segment.as_deref(),
        actor: record.actor.as_deref(),
        character: record.character.as_deref(),
        quote: record.detail.as_deref().unwrap_or(""),
    })
    .into_response())
}

/// `GET /v1/sketches` — every distinct sketch name, first-appearance order.
fn all_sketches(store: &ScriptStore, _req: &Request) -> Result<Response, ApiError> {
    Ok(Json(store.sketch_names()).into_response())
}

/// `GET /v1/sketches/random?detailed=`
fn random_sketch(store: &ScriptStore, req: &Request) -> Result<Response, ApiError> {
    let detailed = req.query_flag("detailed")?;
    let mut rng = rand::thread_rng();
    let sketch = query::random_sketch(store, &mut rng)
        .ok_or_else(|| ApiError::not_found("the dataset holds no named sketches"))?;
    Ok(Json(SketchReply::new(&sketch, detailed)).into_response())
}

/// `GET /v1/sketches/episode/{episode}` — sketch names of one episode.
fn episode_sketches(store: &ScriptStore, req: &Request) -> Result<Response, ApiError> {
    let episode: u32 = req.param_parsed("episode")?;
    if !store.has_episode(episode) {
        return Err(ApiError::not_found(format!(
            "episode {episode} is not in the dataset"
        )));
    }
    Ok(Json(store.sketches_in_episode(episode)).into_response())
}

/// `GET /v1/sketches/{name}?detailed=` — lookup by name, case-insensitive.
fn sketch_by_name(store: &ScriptStore, req: &Request) -> Result<Response, ApiError> {
    let name = req.param("name").unwrap_or("");
    let detailed = req.query_flag("detailed")?;
    let sketch = store
        .find_sketch(name)
        .ok_or_else(|| ApiError::not_found(format!("no sketch named `{name}`")))?;
    Ok(Json(SketchReply::new(&sketch, detailed)).into_response())
}

/// `GET /v1/episodes/random?detailed=`
fn random_episode(store: &ScriptStore, req: &Request) -> Result<Response, ApiError> {
    let detailed = req.query_flag("detailed")?;
    let mut rng = rand::thread_rng();
    let episode = query::random_episode(store, &mut rng)
        .ok_or_else(|| ApiError::not_found("the dataset holds no episodes"))?;
    Ok(Json(EpisodeReply::new(&episode, detailed)).into_response())
}

/// `GET /v1/episodes/{episode}?detailed=` — the full script of one episode.
fn episode_by_number(store: &ScriptStore, req: &Request) -> Result<Response, ApiError> {
    let number: u32 = req.param_parsed("episode")?;
    let detailed = req.query_flag("detailed")?;
    let episode = store.episode(number).ok_or_else(|| {
        ApiError::not_found(format!("episode {number} is not in the dataset"))
    })?;
    Ok(Json(EpisodeReply::new(&episode, detailed)).into_response())
}

// ── ApiError ─────────────────────────────────────────────────────────────────

/// A client-facing failure: a status code and a message, rendered as
/// `{"error": "..."}` with the proper status.
#[derive(Clone, Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<BadParam> for ApiError {
    fn from(err: BadParam) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            error: &'a str,
        }
        let body = serde_json::to_vec(&ErrorBody {
            error: &self.message,
        })
        .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
        Response::builder().status(self.status).json(body)
    }
}
