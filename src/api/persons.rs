//! `/person` handlers.

use serde_json::{Map, Value};
use tracing::debug;

use crate::request::Request;
use crate::response::{Json, Response};
use crate::status::Status;
use crate::validation::ResponseModel;

use super::error::ApiError;
use super::extract::{extract, extract_both};
use super::models::{Person, PersonId, PersonQuery};

/// The people this service knows about. Stands in for a database.
const KNOWN_PERSON_IDS: [i64; 5] = [1, 2, 3, 4, 5];

/// Whether `id` names a known person.
pub fn person_exists(id: i64) -> bool {
    KNOWN_PERSON_IDS.contains(&id)
}

/// `POST /person/new`: validates a person and echoes it back without the
/// password.
pub async fn create_person(req: Request) -> Result<Response, ApiError> {
    let person: Person = extract(&req).await?;
    debug!(first_name = %person.first_name, age = person.age, "person accepted");

    Ok(Response::builder()
        .status(Status::Created)
        .json(&person.to_output()?))
}

/// `GET /person/detail`: echoes `{name: age}`. An absent name is keyed as
/// `"null"`.
pub async fn show_person_by_query(req: Request) -> Result<Json<Value>, ApiError> {
    let query: PersonQuery = extract(&req).await?;
    let key = query.name.unwrap_or_else(|| "null".to_owned());
    Ok(Json(keyed(key, Value::String(query.age))))
}

/// `GET /person/detail/{person_id}`: existence check against the known ids.
pub async fn show_person(req: Request) -> Result<Json<Value>, ApiError> {
    let PersonId(id) = extract::<PersonId>(&req).await?;

    if !person_exists(id) {
        return Err(ApiError::not_found("This person doesn't even exist!"));
    }
    Ok(Json(keyed(id.to_string(), Value::from("it_exist"))))
}

/// `PUT /person/{person_id}`: validates the id and the body together and
/// echoes both, the person without its password.
pub async fn update_person(req: Request) -> Result<Json<Value>, ApiError> {
    let (PersonId(id), person): (PersonId, Person) = extract_both(&req).await?;
    debug!(person_id = id, "person updated");

    Ok(Json(keyed(id.to_string(), person.to_output()?)))
}

/// A one-entry JSON object.
fn keyed(key: String, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key, value);
    Value::Object(map)
}
