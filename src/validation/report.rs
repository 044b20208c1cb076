//! Validation failure reports.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::field::Source;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    MissingRequired,
    BelowMinLength,
    AboveMaxLength,
    OutOfRange,
    NotInEnumeration,
    PatternMismatch,
    /// The raw value could not be read as the declared kind at all.
    InvalidType,
}

/// One rejected field: where it came from, why, and a readable message.
///
/// Serializes as `{"loc": [source, field], "type": reason, "msg": message}`.
/// Failures that concern a whole source (an unreadable JSON body, say) carry
/// no field name and serialize with a one-element `loc`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    source: Source,
    field: Option<String>,
    reason: FailureReason,
    message: String,
}

impl FieldError {
    pub fn new(
        source: Source,
        field: impl Into<String>,
        reason: FailureReason,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            field: Some(field.into()),
            reason,
            message: message.into(),
        }
    }

    /// A failure attached to a source as a whole rather than to one field.
    pub fn at_source(source: Source, reason: FailureReason, message: impl Into<String>) -> Self {
        Self { source, field: None, reason, message: message.into() }
    }

    pub fn source(&self) -> Source { self.source }
    pub fn field(&self) -> Option<&str> { self.field.as_deref() }
    pub fn reason(&self) -> FailureReason { self.reason }
    pub fn message(&self) -> &str { &self.message }

    fn loc(&self) -> Vec<&str> {
        let mut loc = vec![self.source.as_str()];
        loc.extend(self.field.as_deref());
        loc
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FieldError", 3)?;
        s.serialize_field("loc", &self.loc())?;
        s.serialize_field("type", &self.reason)?;
        s.serialize_field("msg", &self.message)?;
        s.end()
    }
}

/// Every field that failed validation for one request.
///
/// Reports aggregate: a schema is checked field by field to the end, so a
/// request with three bad fields gets three entries back.
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(error: FieldError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Appends every entry of `other`, keeping order.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    pub fn errors(&self) -> &[FieldError] { &self.errors }
    pub fn len(&self) -> usize { self.errors.len() }
    pub fn is_empty(&self) -> bool { self.errors.is_empty() }

    /// The reason recorded for `field`, if it failed.
    pub fn reason_for(&self, field: &str) -> Option<FailureReason> {
        self.errors
            .iter()
            .find(|e| e.field() == Some(field))
            .map(FieldError::reason)
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationReport", 1)?;
        s.serialize_field("detail", &self.errors)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_location_and_type() {
        let mut report = ValidationReport::new();
        report.push(FieldError::new(
            Source::Body,
            "age",
            FailureReason::OutOfRange,
            "ensure this value is greater than 0",
        ));
        report.push(FieldError::at_source(
            Source::Body,
            FailureReason::InvalidType,
            "value is not a valid JSON object",
        ));

        assert_eq!(
            serde_json::to_value(&report).expect("serialize"),
            json!({
                "detail": [
                    { "loc": ["body", "age"], "type": "out_of_range", "msg": "ensure this value is greater than 0" },
                    { "loc": ["body"], "type": "invalid_type", "msg": "value is not a valid JSON object" },
                ]
            })
        );
    }

    #[test]
    fn merge_keeps_both_sides() {
        let mut left = ValidationReport::single(FieldError::new(
            Source::Path,
            "person_id",
            FailureReason::OutOfRange,
            "ensure this value is greater than 0",
        ));
        left.merge(ValidationReport::single(FieldError::new(
            Source::Body,
            "first_name",
            FailureReason::MissingRequired,
            "field required",
        )));
        assert_eq!(left.len(), 2);
        assert_eq!(left.reason_for("first_name"), Some(FailureReason::MissingRequired));
        assert_eq!(left.to_string(), "2 field(s) failed validation");
    }
}
