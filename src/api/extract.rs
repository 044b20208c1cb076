//! Typed extraction: gather, validate, build.

use crate::extract::gather;
use crate::request::Request;
use crate::validation::{Model, Record, ValidationReport};

use super::error::ApiError;

/// Validates `req` against `T`'s schema and builds a `T`.
pub async fn extract<T: Model>(req: &Request) -> Result<T, ApiError> {
    Ok(T::from_record(validated::<T>(req).await?)?)
}

/// Extracts two models from one request, reporting the failures of both
/// when both fail.
pub async fn extract_both<A: Model, B: Model>(req: &Request) -> Result<(A, B), ApiError> {
    match (validated::<A>(req).await, validated::<B>(req).await) {
        (Ok(a), Ok(b)) => Ok((A::from_record(a)?, B::from_record(b)?)),
        (Err(mut left), Err(right)) => {
            left.merge(right);
            Err(left.into())
        }
        (Err(report), Ok(_)) | (Ok(_), Err(report)) => Err(report.into()),
    }
}

async fn validated<T: Model>(req: &Request) -> Result<Record, ValidationReport> {
    let schema = T::schema();
    schema.validate(&gather(req, schema).await?)
}
