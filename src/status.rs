//! HTTP status codes as a typed enum.
//!
//! Only the codes this service actually answers with are listed. Use
//! [`Status`] anywhere a status is accepted: `Response::status()`,
//! `Response::builder().status()`, or as a bare handler return value.
//!
//! ```rust
//! use persona::{Response, Status};
//!
//! Response::status(Status::NoContent);
//!
//! Response::builder()
//!     .status(Status::Created)
//!     .json(&serde_json::json!({ "id": 42 }));
//! ```

/// HTTP status codes produced by persona.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                   // 200
    Created,              // 201
    NoContent,            // 204

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    TemporaryRedirect,    // 307

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,           // 400
    NotFound,             // 404
    MethodNotAllowed,     // 405
    UnprocessableContent, // 422

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,  // 500
}

impl Status {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Ok                   => 200,
            Self::Created              => 201,
            Self::NoContent            => 204,
            Self::TemporaryRedirect    => 307,
            Self::BadRequest           => 400,
            Self::NotFound             => 404,
            Self::MethodNotAllowed     => 405,
            Self::UnprocessableContent => 422,
            Self::InternalServerError  => 500,
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.as_u16()
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        match s {
            Status::Ok                   => http::StatusCode::OK,
            Status::Created              => http::StatusCode::CREATED,
            Status::NoContent            => http::StatusCode::NO_CONTENT,
            Status::TemporaryRedirect    => http::StatusCode::TEMPORARY_REDIRECT,
            Status::BadRequest           => http::StatusCode::BAD_REQUEST,
            Status::NotFound             => http::StatusCode::NOT_FOUND,
            Status::MethodNotAllowed     => http::StatusCode::METHOD_NOT_ALLOWED,
            Status::UnprocessableContent => http::StatusCode::UNPROCESSABLE_ENTITY,
            Status::InternalServerError  => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
