//! # persona
//!
//! A small HTTP API for people and logins whose every input is checked
//! against a declared schema before a handler sees it.
//!
//! ## Layout
//!
//! - [`validation`]: field declarations, schemas, failure reports, and
//!   response shaping. The only part with logic of its own.
//! - [`api`]: the route table, the handlers, and their models.
//! - The rest is a minimal hyper-based framework: a radix-tree [`Router`]
//!   per method, type-erased async [`Handler`]s, [`Request`]/[`Response`]
//!   types, and a [`Server`] with graceful shutdown.
//!
//! TLS, rate limiting, and body-size limits are left to the reverse proxy in
//! front of the service.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use persona::{Server, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), persona::Error> {
//!     Server::bind("127.0.0.1:8000")?.serve(api::router()).await
//! }
//! ```
//!
//! The router can also be driven in memory, which is how the tests run:
//!
//! ```rust
//! # async fn demo() {
//! use bytes::Bytes;
//! use http_body_util::Full;
//!
//! let req = http::Request::get("/person/detail/3")
//!     .body(Full::new(Bytes::new()))
//!     .unwrap();
//! let res = persona::api::router().handle(req).await;
//! assert_eq!(res.status(), http::StatusCode::OK);
//! # }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod extract;
pub mod health;
pub mod logging;
pub mod validation;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::{Method, UnsupportedMethod};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
