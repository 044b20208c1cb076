//! The HTTP surface: route table, handlers, and their models.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET  | `/`                          | greeting, `204` |
//! | GET  | `/healthz`, `/readyz`        | [`health`](crate::health) probes |
//! | POST | `/person/new`                | [`persons::create_person`] |
//! | GET  | `/person/detail`             | [`persons::show_person_by_query`] |
//! | GET  | `/person/detail/{person_id}` | [`persons::show_person`] |
//! | PUT  | `/person/{person_id}`        | [`persons::update_person`] |
//! | POST | `/login/`                    | [`forms::login`] |
//! | POST | `/contact`                   | [`forms::contact`] |
//! | POST | `/post-image`                | [`files::upload_image`] |

mod error;
mod extract;

pub mod files;
pub mod forms;
pub mod models;
pub mod persons;

pub use error::ApiError;
pub use extract::{extract, extract_both};

use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::router::Router;
use crate::status::Status;

/// Builds the service's dispatch table.
pub fn router() -> Router {
    Router::new()
        .on(Method::Get,  "/",                          home)
        .on(Method::Get,  "/healthz",                   health::liveness)
        .on(Method::Get,  "/readyz",                    health::readiness)
        .on(Method::Post, "/person/new",                persons::create_person)
        .on(Method::Get,  "/person/detail",             persons::show_person_by_query)
        .on(Method::Get,  "/person/detail/{person_id}", persons::show_person)
        .on(Method::Put,  "/person/{person_id}",        persons::update_person)
        .on(Method::Post, "/login/",                    forms::login)
        .on(Method::Post, "/contact",                   forms::contact)
        .on(Method::Post, "/post-image",                files::upload_image)
}

async fn home(_req: Request) -> Status {
    Status::NoContent
}
