//! Field declarations and the schema that groups them.

use std::num::IntErrorKind;

use regex::Regex;
use tracing::trace;

use super::report::{FailureReason, FieldError, ValidationReport};
use super::value::{RawInput, RawValue, Record, Value};

/// Where in the request a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Path,
    Query,
    Body,
    Form,
    Header,
    Cookie,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path   => "path",
            Self::Query  => "query",
            Self::Body   => "body",
            Self::Form   => "form",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

/// The kind a raw value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Integer,
    Boolean,
    /// A closed set of symbols; the value must be one of them verbatim.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq)]
enum Presence {
    Required,
    Optional { default: Option<Value> },
}

/// Constraint set attached to one field. Unset bounds are not checked.
#[derive(Debug, Clone, Default)]
struct Constraints {
    min_length: Option<usize>,
    max_length: Option<usize>,
    gt: Option<i64>,
    ge: Option<i64>,
    lt: Option<i64>,
    le: Option<i64>,
    pattern: Option<Regex>,
}

/// Declaration of a single input field.
///
/// Built with a kind constructor and chained constraint setters:
///
/// ```rust
/// use persona::validation::{FieldSpec, Source};
///
/// let age = FieldSpec::integer(Source::Body, "age").gt(0).le(115);
/// let nickname = FieldSpec::text(Source::Query, "nickname")
///     .optional()
///     .max_length(20)
///     .title("nickname")
///     .description("shown instead of the first name when set");
/// # let _ = (age, nickname);
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    source: Source,
    kind: Kind,
    presence: Presence,
    constraints: Constraints,
    title: Option<&'static str>,
    description: Option<&'static str>,
}

impl FieldSpec {
    fn new(source: Source, name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            source,
            kind,
            presence: Presence::Required,
            constraints: Constraints::default(),
            title: None,
            description: None,
        }
    }

    pub fn text(source: Source, name: &'static str) -> Self {
        Self::new(source, name, Kind::Text)
    }

    pub fn integer(source: Source, name: &'static str) -> Self {
        Self::new(source, name, Kind::Integer)
    }

    pub fn boolean(source: Source, name: &'static str) -> Self {
        Self::new(source, name, Kind::Boolean)
    }

    pub fn choice(source: Source, name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(source, name, Kind::Choice(allowed))
    }

    /// Makes the field optional with no default: when absent, it is absent
    /// from the record too.
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional { default: None };
        self
    }

    /// Makes the field optional, filling `value` in when it is absent.
    ///
    /// Defaults are trusted and are not run through the constraints.
    pub fn default(mut self, value: Value) -> Self {
        self.presence = Presence::Optional { default: Some(value) };
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.constraints.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.constraints.max_length = Some(n);
        self
    }

    pub fn gt(mut self, n: i64) -> Self {
        self.constraints.gt = Some(n);
        self
    }

    pub fn ge(mut self, n: i64) -> Self {
        self.constraints.ge = Some(n);
        self
    }

    pub fn lt(mut self, n: i64) -> Self {
        self.constraints.lt = Some(n);
        self
    }

    pub fn le(mut self, n: i64) -> Self {
        self.constraints.le = Some(n);
        self
    }

    /// Requires text values to match `pattern`. Anchor it with `^` to pin
    /// the match to the start of the value.
    pub fn pattern(mut self, pattern: &Regex) -> Self {
        self.constraints.pattern = Some(pattern.clone());
        self
    }

    pub fn title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn name(&self) -> &'static str { self.name }
    pub fn source(&self) -> Source { self.source }

    /// Checks one raw value against this declaration.
    ///
    /// `Ok(None)` means the field is optional, absent, and has no default.
    fn check(&self, raw: Option<&RawValue>) -> Result<Option<Value>, FieldError> {
        let raw = match raw {
            None | Some(RawValue::Null) => {
                return match (&self.presence, raw) {
                    (Presence::Optional { default }, _) => Ok(default.clone()),
                    (Presence::Required, None) => {
                        Err(self.fail(FailureReason::MissingRequired, "field required"))
                    }
                    (Presence::Required, Some(_)) => {
                        Err(self.fail(FailureReason::InvalidType, "none is not an allowed value"))
                    }
                };
            }
            Some(raw) => raw,
        };

        let value = self.coerce(raw)?;
        self.constrain(&value)?;
        Ok(Some(value))
    }

    fn coerce(&self, raw: &RawValue) -> Result<Value, FieldError> {
        match self.kind {
            Kind::Text => coerce_text(raw)
                .map(Value::Text)
                .ok_or_else(|| self.fail(FailureReason::InvalidType, "str type expected")),
            Kind::Integer => match coerce_integer(raw) {
                Ok(n) => Ok(Value::Integer(n)),
                Err(IntegerError::Invalid) => {
                    Err(self.fail(FailureReason::InvalidType, "value is not a valid integer"))
                }
                Err(IntegerError::Overflow(saturated)) => {
                    // A declared bound reports first; otherwise the i64 limit does.
                    self.constrain(&Value::Integer(saturated))?;
                    let relation = if saturated > 0 { "less" } else { "greater" };
                    Err(self.fail(
                        FailureReason::OutOfRange,
                        format!("ensure this value is {relation} than or equal to {saturated}"),
                    ))
                }
            },
            Kind::Boolean => coerce_boolean(raw)
                .map(Value::Boolean)
                .ok_or_else(|| {
                    self.fail(FailureReason::InvalidType, "value could not be parsed to a boolean")
                }),
            Kind::Choice(allowed) => match raw {
                RawValue::Str(s) if allowed.contains(&s.as_str()) => Ok(Value::Text(s.clone())),
                _ => {
                    let permitted = allowed
                        .iter()
                        .map(|v| format!("'{v}'"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    Err(self.fail(
                        FailureReason::NotInEnumeration,
                        format!("value is not a valid enumeration member; permitted: {permitted}"),
                    ))
                }
            },
        }
    }

    fn constrain(&self, value: &Value) -> Result<(), FieldError> {
        let c = &self.constraints;
        match value {
            Value::Text(s) => {
                let len = s.chars().count();
                if let Some(min) = c.min_length.filter(|min| len < *min) {
                    return Err(self.fail(
                        FailureReason::BelowMinLength,
                        format!("ensure this value has at least {min} characters"),
                    ));
                }
                if let Some(max) = c.max_length.filter(|max| len > *max) {
                    return Err(self.fail(
                        FailureReason::AboveMaxLength,
                        format!("ensure this value has at most {max} characters"),
                    ));
                }
                if let Some(re) = c.pattern.as_ref().filter(|re| !re.is_match(s)) {
                    return Err(self.fail(
                        FailureReason::PatternMismatch,
                        format!("string does not match regex \"{}\"", re.as_str()),
                    ));
                }
            }
            Value::Integer(n) => {
                let bounds = [
                    (c.gt, "greater than", c.gt.is_none_or(|b| *n > b)),
                    (c.ge, "greater than or equal to", c.ge.is_none_or(|b| *n >= b)),
                    (c.lt, "less than", c.lt.is_none_or(|b| *n < b)),
                    (c.le, "less than or equal to", c.le.is_none_or(|b| *n <= b)),
                ];
                if let Some((Some(bound), relation, _)) = bounds.into_iter().find(|(_, _, ok)| !ok) {
                    return Err(self.fail(
                        FailureReason::OutOfRange,
                        format!("ensure this value is {relation} {bound}"),
                    ));
                }
            }
            Value::Boolean(_) => {}
        }
        Ok(())
    }

    fn fail(&self, reason: FailureReason, message: impl Into<String>) -> FieldError {
        FieldError::new(self.source, self.name, reason, message)
    }
}

/// Whole floats keep a trailing `.0`; booleans render as `True`/`False`.
fn coerce_text(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Str(s) => Some(s.clone()),
        RawValue::Int(i) => Some(i.to_string()),
        RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
            Some(format!("{f:.1}"))
        }
        RawValue::Float(f) => Some(f.to_string()),
        RawValue::Bool(true) => Some("True".to_owned()),
        RawValue::Bool(false) => Some("False".to_owned()),
        RawValue::Null | RawValue::Composite => None,
    }
}

#[derive(Debug, PartialEq)]
enum IntegerError {
    Invalid,
    /// A whole number outside `i64`, saturated to the nearest limit.
    Overflow(i64),
}

/// Floats truncate toward zero. Strings must hold a whole number.
fn coerce_integer(raw: &RawValue) -> Result<i64, IntegerError> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63

    match raw {
        RawValue::Int(i) => Ok(*i),
        RawValue::Bool(b) => Ok(i64::from(*b)),
        RawValue::Float(f) if !f.is_finite() => Err(IntegerError::Invalid),
        RawValue::Float(f) if *f >= LIMIT => Err(IntegerError::Overflow(i64::MAX)),
        RawValue::Float(f) if *f < -LIMIT => Err(IntegerError::Overflow(i64::MIN)),
        RawValue::Float(f) => Ok(f.trunc() as i64),
        RawValue::Str(s) => s.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => IntegerError::Overflow(i64::MAX),
            IntErrorKind::NegOverflow => IntegerError::Overflow(i64::MIN),
            _ => IntegerError::Invalid,
        }),
        RawValue::Null | RawValue::Composite => Err(IntegerError::Invalid),
    }
}

fn coerce_boolean(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Bool(b) => Some(*b),
        RawValue::Int(0) => Some(false),
        RawValue::Int(1) => Some(true),
        RawValue::Float(f) if *f == 0.0 => Some(false),
        RawValue::Float(f) if *f == 1.0 => Some(true),
        RawValue::Str(s) => match s.to_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// An ordered list of field declarations.
///
/// Validation visits every field in order and collects every failure; one
/// bad field never hides another. Input keys the schema does not declare are
/// ignored.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self { fields: fields.into_iter().collect() }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn validate(&self, input: &RawInput) -> Result<Record, ValidationReport> {
        let mut record = Record::default();
        let mut report = ValidationReport::new();

        for field in &self.fields {
            match field.check(input.get(field.name)) {
                Ok(Some(value)) => record.insert(field.name, value),
                Ok(None) => {}
                Err(e) => {
                    trace!(
                        field = field.name,
                        title = field.title,
                        description = field.description,
                        reason = ?e.reason(),
                        "field rejected"
                    );
                    report.push(e);
                }
            }
        }

        if report.is_empty() { Ok(record) } else { Err(report) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pairs: &[(&str, RawValue)]) -> RawInput {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
    }

    fn age_schema() -> Schema {
        Schema::new([FieldSpec::integer(Source::Body, "age").gt(0).le(115)])
    }

    #[test]
    fn integer_bounds_are_exclusive_below_inclusive_above() {
        let schema = age_schema();
        for ok in [1, 60, 115] {
            assert!(schema.validate(&input(&[("age", RawValue::Int(ok))])).is_ok(), "{ok}");
        }
        for bad in [-3, 0, 116] {
            let report = schema.validate(&input(&[("age", RawValue::Int(bad))])).unwrap_err();
            assert_eq!(report.reason_for("age"), Some(FailureReason::OutOfRange), "{bad}");
        }
    }

    #[test]
    fn out_of_range_message_names_the_violated_bound() {
        let report = age_schema()
            .validate(&input(&[("age", RawValue::Int(116))]))
            .unwrap_err();
        assert_eq!(report.errors()[0].message(), "ensure this value is less than or equal to 115");

        let report = age_schema()
            .validate(&input(&[("age", RawValue::Int(0))]))
            .unwrap_err();
        assert_eq!(report.errors()[0].message(), "ensure this value is greater than 0");
    }

    #[test]
    fn ge_and_lt_bounds() {
        let schema = Schema::new([FieldSpec::integer(Source::Query, "page").ge(1).lt(10)]);
        assert!(schema.validate(&input(&[("page", "1".into())])).is_ok());
        assert!(schema.validate(&input(&[("page", "10".into())])).is_err());
        assert!(schema.validate(&input(&[("page", "0".into())])).is_err());
    }

    #[test]
    fn strings_are_coerced_to_integers_and_booleans() {
        let schema = Schema::new([
            FieldSpec::integer(Source::Query, "age"),
            FieldSpec::boolean(Source::Query, "is_married"),
        ]);
        let record = schema
            .validate(&input(&[("age", " 42 ".into()), ("is_married", "Yes".into())]))
            .expect("valid");
        assert_eq!(record.get("age"), Some(&Value::Integer(42)));
        assert_eq!(record.get("is_married"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn floats_truncate_to_integers() {
        let schema = age_schema();
        for (raw, expected) in [(30.0, 30), (30.7, 30), (115.9, 115)] {
            let record = schema.validate(&input(&[("age", RawValue::Float(raw))])).expect("valid");
            assert_eq!(record.get("age"), Some(&Value::Integer(expected)), "{raw}");
        }
        let report = schema.validate(&input(&[("age", RawValue::Float(0.5))])).unwrap_err();
        assert_eq!(report.reason_for("age"), Some(FailureReason::OutOfRange));
        let report = schema.validate(&input(&[("age", "30.7".into())])).unwrap_err();
        assert_eq!(report.reason_for("age"), Some(FailureReason::InvalidType));
    }

    #[test]
    fn integers_beyond_i64_are_out_of_range() {
        let report = age_schema()
            .validate(&input(&[("age", RawValue::Float(1e20))]))
            .unwrap_err();
        assert_eq!(report.reason_for("age"), Some(FailureReason::OutOfRange));
        assert_eq!(report.errors()[0].message(), "ensure this value is less than or equal to 115");

        let report = age_schema()
            .validate(&input(&[("age", "-99999999999999999999".into())]))
            .unwrap_err();
        assert_eq!(report.errors()[0].message(), "ensure this value is greater than 0");

        let unbounded = Schema::new([FieldSpec::integer(Source::Query, "n")]);
        let report = unbounded
            .validate(&input(&[("n", "99999999999999999999".into())]))
            .unwrap_err();
        assert_eq!(report.reason_for("n"), Some(FailureReason::OutOfRange));
        assert_eq!(
            report.errors()[0].message(),
            "ensure this value is less than or equal to 9223372036854775807"
        );
    }

    #[test]
    fn scalars_are_coerced_to_text() {
        let schema = Schema::new([FieldSpec::text(Source::Body, "name")]);
        for (raw, expected) in [
            (RawValue::Int(123), "123"),
            (RawValue::Float(2.5), "2.5"),
            (RawValue::Float(3.0), "3.0"),
            (RawValue::Bool(true), "True"),
        ] {
            let record = schema.validate(&input(&[("name", raw)])).expect("valid");
            assert_eq!(record.get("name"), Some(&Value::Text(expected.to_owned())));
        }
        let report = schema.validate(&input(&[("name", RawValue::Composite)])).unwrap_err();
        assert_eq!(report.reason_for("name"), Some(FailureReason::InvalidType));
    }

    #[test]
    fn boolean_spellings() {
        let schema = Schema::new([FieldSpec::boolean(Source::Query, "flag")]);
        for (raw, expected) in [
            ("y", true), ("T", true), ("on", true), ("1", true),
            ("n", false), ("f", false), ("OFF", false), ("0", false),
        ] {
            let record = schema.validate(&input(&[("flag", raw.into())])).expect(raw);
            assert_eq!(record.get("flag"), Some(&Value::Boolean(expected)), "{raw}");
        }
        for bad in ["maybe", "2", " yes"] {
            let report = schema.validate(&input(&[("flag", bad.into())])).unwrap_err();
            assert_eq!(report.reason_for("flag"), Some(FailureReason::InvalidType), "{bad}");
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let schema = Schema::new([FieldSpec::text(Source::Body, "name").max_length(3)]);
        assert!(schema.validate(&input(&[("name", "ñño".into())])).is_ok());
        let report = schema.validate(&input(&[("name", "ññoo".into())])).unwrap_err();
        assert_eq!(report.reason_for("name"), Some(FailureReason::AboveMaxLength));
    }

    #[test]
    fn empty_required_text_is_below_min_length() {
        let schema = Schema::new([FieldSpec::text(Source::Body, "name").min_length(1)]);
        let report = schema.validate(&input(&[("name", "".into())])).unwrap_err();
        assert_eq!(report.reason_for("name"), Some(FailureReason::BelowMinLength));
    }

    #[test]
    fn choice_rejects_unknown_symbols() {
        let schema = Schema::new([FieldSpec::choice(Source::Body, "size", &["s", "m", "l"])]);
        assert!(schema.validate(&input(&[("size", "m".into())])).is_ok());
        let report = schema.validate(&input(&[("size", "xl".into())])).unwrap_err();
        assert_eq!(report.reason_for("size"), Some(FailureReason::NotInEnumeration));
        assert_eq!(
            report.errors()[0].message(),
            "value is not a valid enumeration member; permitted: 's', 'm', 'l'"
        );
    }

    #[test]
    fn pattern_mismatch_is_reported() {
        let re = Regex::new(r"^\w*@\w*").expect("pattern");
        let schema = Schema::new([FieldSpec::text(Source::Query, "email").pattern(&re)]);
        assert!(schema.validate(&input(&[("email", "ana@example".into())])).is_ok());
        let report = schema.validate(&input(&[("email", "not an email".into())])).unwrap_err();
        assert_eq!(report.reason_for("email"), Some(FailureReason::PatternMismatch));
    }

    #[test]
    fn optional_fields_use_defaults_or_stay_absent() {
        let schema = Schema::new([
            FieldSpec::boolean(Source::Body, "is_married").optional(),
            FieldSpec::integer(Source::Body, "children").default(Value::Integer(0)),
        ]);
        let record = schema
            .validate(&input(&[("is_married", RawValue::Null)]))
            .expect("valid");
        assert!(!record.contains("is_married"));
        assert_eq!(record.get("children"), Some(&Value::Integer(0)));
    }

    #[test]
    fn required_null_is_an_invalid_type() {
        let report = age_schema()
            .validate(&input(&[("age", RawValue::Null)]))
            .unwrap_err();
        assert_eq!(report.reason_for("age"), Some(FailureReason::InvalidType));
    }

    #[test]
    fn failures_aggregate_across_fields() {
        let schema = Schema::new([
            FieldSpec::text(Source::Body, "first_name").min_length(1),
            FieldSpec::integer(Source::Body, "age").gt(0),
            FieldSpec::text(Source::Body, "password").min_length(8),
        ]);
        let report = schema
            .validate(&input(&[("age", RawValue::Int(0)), ("password", "short".into())]))
            .unwrap_err();
        assert_eq!(report.len(), 3);
        assert_eq!(report.reason_for("first_name"), Some(FailureReason::MissingRequired));
        assert_eq!(report.reason_for("age"), Some(FailureReason::OutOfRange));
        assert_eq!(report.reason_for("password"), Some(FailureReason::BelowMinLength));
    }

    #[test]
    fn metadata_does_not_change_the_outcome() {
        let plain = Schema::new([FieldSpec::text(Source::Query, "name").max_length(2)]);
        let documented = Schema::new([FieldSpec::text(Source::Query, "name")
            .max_length(2)
            .title("person name")
            .description("between 1 and 2 characters")]);
        let raw = input(&[("name", "abc".into())]);
        assert_eq!(plain.validate(&raw), documented.validate(&raw));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let record = age_schema()
            .validate(&input(&[("age", RawValue::Int(5)), ("extra", "x".into())]))
            .expect("valid");
        assert_eq!(record.len(), 1);
    }
}
