//! Gathering raw field values out of a request.
//!
//! Each field in a [`Schema`] says where its value lives. [`gather`] walks
//! the schema and reads every field from its source, parsing each source at
//! most once, and hands the result to [`Schema::validate`].
//!
//! Form fields are read from either an `application/x-www-form-urlencoded`
//! or a `multipart/form-data` body. File parts of a multipart body are not
//! form values and are skipped.

use serde_json::{Map, Value as Json};

use crate::request::Request;
use crate::validation::{
    FailureReason, FieldError, RawInput, RawValue, Schema, Source, ValidationReport,
};

/// Reads the raw value of every field in `schema` from `req`.
///
/// Fails only when a whole source is unreadable: an empty or non-object JSON
/// body for a schema with body fields, or a malformed multipart form.
pub async fn gather(req: &Request, schema: &Schema) -> Result<RawInput, ValidationReport> {
    let mut sources = Sources::new(req);
    if schema.fields().iter().any(|f| f.source() == Source::Form) {
        sources.form = Some(form_pairs(req).await?);
    }
    let mut input = RawInput::new();

    for field in schema.fields() {
        if let Some(raw) = sources.read(field.source(), field.name())? {
            input.insert(field.name().to_owned(), raw);
        }
    }

    Ok(input)
}

/// Lazily parsed request sources.
struct Sources<'r> {
    req: &'r Request,
    query: Option<Vec<(String, String)>>,
    form: Option<Vec<(String, String)>>,
    body: Option<Map<String, Json>>,
}

impl<'r> Sources<'r> {
    fn new(req: &'r Request) -> Self {
        Self { req, query: None, form: None, body: None }
    }

    fn read(&mut self, source: Source, name: &str) -> Result<Option<RawValue>, ValidationReport> {
        let req = self.req;
        let raw = match source {
            Source::Path => req.param(name).map(RawValue::from),
            Source::Query => {
                let pairs = self.query.get_or_insert_with(|| req.query_pairs());
                last_value(pairs, name)
            }
            Source::Form => self.form.as_deref().and_then(|pairs| last_value(pairs, name)),
            Source::Header => req.header(&name.replace('_', "-")).map(RawValue::from),
            Source::Cookie => req.cookie(name).map(RawValue::from),
            Source::Body => {
                if self.body.is_none() {
                    self.body = Some(json_object(req.body())?);
                }
                self.body
                    .as_ref()
                    .and_then(|body| body.get(name))
                    .map(RawValue::from_json)
            }
        };
        Ok(raw)
    }
}

/// Repeated keys resolve to their last occurrence.
fn last_value(pairs: &[(String, String)], name: &str) -> Option<RawValue> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| RawValue::from(v.as_str()))
}

async fn form_pairs(req: &Request) -> Result<Vec<(String, String)>, ValidationReport> {
    let Some(mut multipart) = req.multipart() else {
        return Ok(req.form_pairs());
    };

    let mut pairs = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(malformed_form)? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        pairs.push((name, field.text().await.map_err(malformed_form)?));
    }
    Ok(pairs)
}

fn malformed_form(e: multer::Error) -> ValidationReport {
    ValidationReport::single(FieldError::at_source(
        Source::Form,
        FailureReason::InvalidType,
        format!("invalid multipart body: {e}"),
    ))
}

fn json_object(body: &[u8]) -> Result<Map<String, Json>, ValidationReport> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationReport::single(FieldError::at_source(
            Source::Body,
            FailureReason::MissingRequired,
            "field required",
        )));
    }

    match serde_json::from_slice::<Json>(body) {
        Ok(Json::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationReport::single(FieldError::at_source(
            Source::Body,
            FailureReason::InvalidType,
            "value is not a valid JSON object",
        ))),
        Err(e) => Err(ValidationReport::single(FieldError::at_source(
            Source::Body,
            FailureReason::InvalidType,
            format!("JSON decode error: {e}"),
        ))),
    }
}
