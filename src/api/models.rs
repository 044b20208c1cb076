//! Request and response models with their schemas.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::validation::{
    FieldSpec, FromValue, Model, Record, RecordError, ResponseModel, Schema, Source, Value,
};

/// Loose `local@domain` shape accepted by the person query's `email`.
static LOOSE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w*@\w*").expect("loose e-mail pattern"));

/// Address shape required of contact e-mails.
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("e-mail pattern"));

// ── HairColor ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HairColor {
    White,
    Brown,
    Black,
    Yellow,
    #[serde(rename = "none")]
    NoHair,
}

impl HairColor {
    /// Wire symbols, in declaration order.
    pub const VALUES: &'static [&'static str] = &["white", "brown", "black", "yellow", "none"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::White  => "white",
            Self::Brown  => "brown",
            Self::Black  => "black",
            Self::Yellow => "yellow",
            Self::NoHair => "none",
        }
    }
}

impl FromStr for HairColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white"  => Ok(Self::White),
            "brown"  => Ok(Self::Brown),
            "black"  => Ok(Self::Black),
            "yellow" => Ok(Self::Yellow),
            "none"   => Ok(Self::NoHair),
            _        => Err(()),
        }
    }
}

impl fmt::Display for HairColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromValue for HairColor {
    const EXPECTED: &'static str = "hair color";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

// ── Person ────────────────────────────────────────────────────────────────────

static PERSON: Lazy<Schema> = Lazy::new(|| {
    Schema::new([
        FieldSpec::text(Source::Body, "first_name").min_length(1).max_length(50),
        FieldSpec::text(Source::Body, "last_name").min_length(1).max_length(50),
        FieldSpec::integer(Source::Body, "age").gt(0).le(115),
        FieldSpec::choice(Source::Body, "hair_color", HairColor::VALUES).optional(),
        FieldSpec::boolean(Source::Body, "is_married").optional(),
        FieldSpec::text(Source::Body, "password").min_length(8).max_length(100),
    ])
});

/// A person submitted as a JSON body. `password` is validated and kept in
/// memory but never serialized into a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub hair_color: Option<HairColor>,
    pub is_married: Option<bool>,
    pub password: String,
}

impl Model for Person {
    fn schema() -> &'static Schema { &PERSON }

    fn from_record(mut r: Record) -> Result<Self, RecordError> {
        Ok(Self {
            first_name: r.take("first_name")?,
            last_name: r.take("last_name")?,
            age: r.take("age")?,
            hair_color: r.take_opt("hair_color")?,
            is_married: r.take_opt("is_married")?,
            password: r.take("password")?,
        })
    }
}

impl ResponseModel for Person {
    const EXCLUDE: &'static [&'static str] = &["password"];
}

// ── Path and query parameters ─────────────────────────────────────────────────

static PERSON_ID: Lazy<Schema> = Lazy::new(|| {
    Schema::new([FieldSpec::integer(Source::Path, "person_id")
        .gt(0)
        .title("person id")
        .description("this is the person id")])
});

/// The `{person_id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonId(pub i64);

impl Model for PersonId {
    fn schema() -> &'static Schema { &PERSON_ID }

    fn from_record(mut r: Record) -> Result<Self, RecordError> {
        Ok(Self(r.take("person_id")?))
    }
}

static PERSON_QUERY: Lazy<Schema> = Lazy::new(|| {
    Schema::new([
        FieldSpec::text(Source::Query, "name")
            .optional()
            .min_length(1)
            .max_length(50)
            .title("person name")
            .description("this is the person name, it's between 1 and 50 characters"),
        FieldSpec::text(Source::Query, "age")
            .title("person age")
            .description("This is the person age, it's required and must be greater than zero"),
        FieldSpec::text(Source::Query, "email").optional().pattern(&LOOSE_EMAIL),
    ])
});

/// Query parameters of `GET /person/detail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonQuery {
    pub name: Option<String>,
    pub age: String,
    pub email: Option<String>,
}

impl Model for PersonQuery {
    fn schema() -> &'static Schema { &PERSON_QUERY }

    fn from_record(mut r: Record) -> Result<Self, RecordError> {
        Ok(Self {
            name: r.take_opt("name")?,
            age: r.take("age")?,
            email: r.take_opt("email")?,
        })
    }
}

// ── Login ─────────────────────────────────────────────────────────────────────

static LOGIN: Lazy<Schema> = Lazy::new(|| {
    Schema::new([
        FieldSpec::text(Source::Form, "username").max_length(20),
        FieldSpec::text(Source::Form, "password"),
    ])
});

/// Credentials submitted as a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

impl Login {
    /// Stands in for the submitted password in every login response.
    pub const PLACEHOLDER_PASSWORD: &'static str = "updated pass";

    /// The response echo: same username, password replaced.
    pub fn redacted(self) -> Self {
        Self { username: self.username, password: Self::PLACEHOLDER_PASSWORD.to_owned() }
    }
}

impl Model for Login {
    fn schema() -> &'static Schema { &LOGIN }

    fn from_record(mut r: Record) -> Result<Self, RecordError> {
        Ok(Self {
            username: r.take("username")?,
            password: r.take("password")?,
        })
    }
}

// ── Contact ───────────────────────────────────────────────────────────────────

static CONTACT: Lazy<Schema> = Lazy::new(|| {
    Schema::new([
        FieldSpec::text(Source::Form, "first_name").min_length(1).max_length(20),
        FieldSpec::text(Source::Form, "last_name").min_length(1).max_length(20),
        FieldSpec::text(Source::Form, "email").pattern(&EMAIL),
        FieldSpec::text(Source::Form, "message").min_length(20),
        FieldSpec::text(Source::Header, "user_agent").optional(),
        FieldSpec::text(Source::Cookie, "ads").optional(),
    ])
});

/// A contact-form submission plus the caller's user agent and `ads` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
    pub user_agent: Option<String>,
    pub ads: Option<String>,
}

impl Model for ContactMessage {
    fn schema() -> &'static Schema { &CONTACT }

    fn from_record(mut r: Record) -> Result<Self, RecordError> {
        Ok(Self {
            first_name: r.take("first_name")?,
            last_name: r.take("last_name")?,
            email: r.take("email")?,
            message: r.take("message")?,
            user_agent: r.take_opt("user_agent")?,
            ads: r.take_opt("ads")?,
        })
    }
}

// ── Uploads ───────────────────────────────────────────────────────────────────

/// What `POST /post-image` reports about the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    #[serde(rename = "Filename")]
    pub filename: Option<String>,
    #[serde(rename = "Format")]
    pub content_type: Option<String>,
    #[serde(rename = "Size(kb)")]
    pub size_kb: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::{FailureReason, RawInput, RawValue};

    fn person_input(overrides: &[(&str, RawValue)]) -> RawInput {
        let mut input = RawInput::from([
            ("first_name".to_owned(), RawValue::from("Ana")),
            ("last_name".to_owned(), RawValue::from("Ruiz")),
            ("age".to_owned(), RawValue::Int(30)),
            ("hair_color".to_owned(), RawValue::from("black")),
            ("is_married".to_owned(), RawValue::Bool(false)),
            ("password".to_owned(), RawValue::from("secretpw")),
        ]);
        for (k, v) in overrides {
            input.insert((*k).to_owned(), v.clone());
        }
        input
    }

    fn person(overrides: &[(&str, RawValue)]) -> Result<Person, FailureReason> {
        Person::schema()
            .validate(&person_input(overrides))
            .map(|record| Person::from_record(record).expect("record"))
            .map_err(|report| report.errors()[0].reason())
    }

    #[test]
    fn age_bounds_are_inclusive_at_1_and_115() {
        assert_eq!(person(&[("age", RawValue::Int(1))]).map(|p| p.age), Ok(1));
        assert_eq!(person(&[("age", RawValue::Int(115))]).map(|p| p.age), Ok(115));
        assert_eq!(person(&[("age", RawValue::Int(0))]), Err(FailureReason::OutOfRange));
        assert_eq!(person(&[("age", RawValue::Int(116))]), Err(FailureReason::OutOfRange));
    }

    #[test]
    fn every_hair_color_is_accepted() {
        for symbol in HairColor::VALUES {
            let p = person(&[("hair_color", RawValue::from(*symbol))]).expect("valid");
            assert_eq!(p.hair_color.map(HairColor::as_str), Some(*symbol));
        }
        assert_eq!(
            person(&[("hair_color", RawValue::from("purple"))]),
            Err(FailureReason::NotInEnumeration)
        );
    }

    #[test]
    fn optional_fields_default_to_unset() {
        let mut input = person_input(&[]);
        input.remove("hair_color");
        input.remove("is_married");
        let p = Person::from_record(Person::schema().validate(&input).expect("valid"))
            .expect("record");
        assert_eq!((p.hair_color, p.is_married), (None, None));
    }

    #[test]
    fn password_is_kept_in_memory_but_not_serialized() {
        let record = Person::schema().validate(&person_input(&[])).expect("valid");
        assert_eq!(record.get("password"), Some(&Value::Text("secretpw".into())));

        let p = Person::from_record(record).expect("record");
        assert_eq!(p.password, "secretpw");
        assert_eq!(
            p.to_output().expect("serialize"),
            json!({
                "first_name": "Ana",
                "last_name": "Ruiz",
                "age": 30,
                "hair_color": "black",
                "is_married": false,
            })
        );
    }

    #[test]
    fn password_length_is_bounded() {
        assert_eq!(
            person(&[("password", RawValue::from("short"))]),
            Err(FailureReason::BelowMinLength)
        );
        assert_eq!(
            person(&[("password", RawValue::from("x".repeat(101)))]),
            Err(FailureReason::AboveMaxLength)
        );
    }

    #[test]
    fn login_username_is_capped_at_20() {
        let input = RawInput::from([
            ("username".to_owned(), RawValue::from("r".repeat(21))),
            ("password".to_owned(), RawValue::from("anything")),
        ]);
        let report = Login::schema().validate(&input).unwrap_err();
        assert_eq!(report.reason_for("username"), Some(FailureReason::AboveMaxLength));
    }

    #[test]
    fn redacted_login_replaces_the_password() {
        let login = Login { username: "rich".into(), password: "anything".into() }.redacted();
        assert_eq!(login.username, "rich");
        assert_eq!(login.password, Login::PLACEHOLDER_PASSWORD);
        assert_ne!(login.password, "anything");
    }

    #[test]
    fn contact_email_must_look_like_an_address() {
        let mut input = RawInput::from([
            ("first_name".to_owned(), RawValue::from("Ana")),
            ("last_name".to_owned(), RawValue::from("Ruiz")),
            ("email".to_owned(), RawValue::from("ana@example.com")),
            ("message".to_owned(), RawValue::from("a message long enough to pass")),
        ]);
        assert!(ContactMessage::schema().validate(&input).is_ok());

        input.insert("email".to_owned(), RawValue::from("ana@example"));
        let report = ContactMessage::schema().validate(&input).unwrap_err();
        assert_eq!(report.reason_for("email"), Some(FailureReason::PatternMismatch));
    }

    #[test]
    fn upload_summary_uses_display_keys() {
        let summary = UploadSummary {
            filename: Some("cat.png".into()),
            content_type: Some("image/png".into()),
            size_kb: 2,
        };
        assert_eq!(
            serde_json::to_value(summary).expect("serialize"),
            json!({ "Filename": "cat.png", "Format": "image/png", "Size(kb)": 2 })
        );
    }
}
