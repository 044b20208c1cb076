//! Response shaping.
//!
//! What a handler validates and what it sends back are separate field sets:
//! a model can carry a field through validation and into memory while its
//! serialized form leaves it out.

use serde::Serialize;
use serde_json::Value;

/// A serializable model with fields withheld from responses.
pub trait ResponseModel: Serialize {
    /// Top-level field names dropped from the serialized output.
    const EXCLUDE: &'static [&'static str] = &[];

    /// Serializes `self` to JSON without the [`EXCLUDE`](Self::EXCLUDE) fields.
    fn to_output(&self) -> Result<Value, serde_json::Error> {
        to_value_excluding(self, Self::EXCLUDE)
    }
}

/// Serializes `value` and removes `exclude` from the top-level object.
///
/// Non-object values are returned unchanged.
pub fn to_value_excluding<T: Serialize + ?Sized>(
    value: &T,
    exclude: &[&str],
) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(value)?;
    if let Value::Object(map) = &mut value {
        for field in exclude {
            map.remove(*field);
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Account {
        name: &'static str,
        token: &'static str,
    }

    impl ResponseModel for Account {
        const EXCLUDE: &'static [&'static str] = &["token"];
    }

    #[test]
    fn excluded_fields_are_dropped_from_output_only() {
        let account = Account { name: "ana", token: "s3cret" };
        assert_eq!(account.to_output().expect("serialize"), json!({ "name": "ana" }));
        assert_eq!(account.token, "s3cret");
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(to_value_excluding(&3, &["x"]).expect("serialize"), json!(3));
    }
}
