//! Form-encoded endpoints: login and contact.

use serde_json::Value;

use crate::request::Request;
use crate::response::Json;

use super::error::ApiError;
use super::extract::extract;
use super::models::{ContactMessage, Login};

/// `POST /login/`: echoes the username with the password replaced.
pub async fn login(req: Request) -> Result<Json<Login>, ApiError> {
    let login: Login = extract(&req).await?;
    Ok(Json(login.redacted()))
}

/// `POST /contact`: validates the form, header and cookie fields and echoes
/// the `User-Agent` header (or `null`).
pub async fn contact(req: Request) -> Result<Json<Value>, ApiError> {
    let message: ContactMessage = extract(&req).await?;
    Ok(Json(message.user_agent.map_or(Value::Null, Value::String)))
}
