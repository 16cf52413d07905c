//! # circus
//!
//! A read-only HTTP API over the Monty Python's Flying Circus scripts.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The whole dataset is loaded into memory once at startup and never
//! mutated, so every handler is a pure read over a shared `Arc` — no locks,
//! no transactions, no cache to invalidate. nginx or the ingress in front
//! handles TLS, rate limiting, and slow clients; circus parses filters,
//! picks records, and serializes JSON.
//!
//! ## Quick start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ```text
//! curl 'localhost:3000/v1/quotes/random?actor=cleese&max_length=80'
//! curl 'localhost:3000/v1/sketches/episode/8'
//! curl 'localhost:3000/v1/sketches/random?detailed=true'
//! curl 'localhost:3000/v1/sketches/Dead%20Parrot'
//! curl 'localhost:3000/v1/episodes/random'
//! curl 'localhost:3000/healthz'
//! ```
//!
//! ## Embedding
//!
//! The pieces compose for tests and for serving a different dataset:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use circus::{ScriptStore, Server, api};
//!
//! # async fn run() -> Result<(), circus::Error> {
//! let store = Arc::new(ScriptStore::from_json_file("data/scripts.json")?);
//! let server = Server::bind("127.0.0.1:0").await?;
//! println!("listening on {}", server.local_addr());
//! server.serve(api::router(store)).await?;
//! # Ok(()) }
//! ```

pub mod api;
mod config;
mod error;
pub mod health;
mod middleware;
pub mod query;
mod request;
mod response;
mod router;
pub mod script;
mod server;
mod store;

pub use config::Config;
pub use error::Error;
pub use query::QuoteFilter;
pub use request::{BadParam, Request};
pub use response::{IntoResponse, Json, Response};
pub use router::{Handler, Router};
pub use script::{LineKind, ScriptRecord};
pub use server::Server;
pub use store::{ScriptStore, SketchKey};
