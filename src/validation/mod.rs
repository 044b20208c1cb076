//! Schema-driven request validation.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s. Each spec names the
//! request [`Source`] its value comes from, whether it is required (or
//! optional with a default), the [`Kind`] the raw value is coerced to, and
//! a constraint set: length bounds, numeric bounds, an allowed-symbol list,
//! or a regular expression. Titles and descriptions ride along as metadata
//! and never change an outcome.
//!
//! [`Schema::validate`] turns a [`RawInput`] into a typed [`Record`] or a
//! [`ValidationReport`] listing every failed field. A [`Model`] reads its
//! typed struct out of the record; a [`ResponseModel`] decides which of its
//! fields are serialized back.
//!
//! ```rust
//! use persona::validation::{FailureReason, FieldSpec, RawInput, RawValue, Schema, Source};
//!
//! let schema = Schema::new([
//!     FieldSpec::text(Source::Body, "first_name").min_length(1).max_length(50),
//!     FieldSpec::integer(Source::Body, "age").gt(0).le(115),
//! ]);
//!
//! let mut input = RawInput::new();
//! input.insert("age".into(), RawValue::Int(116));
//!
//! let report = schema.validate(&input).unwrap_err();
//! assert_eq!(report.reason_for("first_name"), Some(FailureReason::MissingRequired));
//! assert_eq!(report.reason_for("age"), Some(FailureReason::OutOfRange));
//! ```

mod field;
mod output;
mod report;
mod value;

pub use field::{FieldSpec, Kind, Schema, Source};
pub use output::{ResponseModel, to_value_excluding};
pub use report::{FailureReason, FieldError, ValidationReport};
pub use value::{FromValue, RawInput, RawValue, Record, RecordError, Value};

/// A typed struct populated from a validated [`Record`].
pub trait Model: Sized {
    /// The schema every instance is validated against.
    fn schema() -> &'static Schema;

    /// Builds the struct. Only fails if the model reads fields its schema
    /// does not declare.
    fn from_record(record: Record) -> Result<Self, RecordError>;
}
