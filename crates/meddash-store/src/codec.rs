//! Conversion between doctor records and document fields.

use chrono::{DateTime, Utc};
use meddash_model::{Doctor, DoctorFormData, DoctorPatch, RATING_MAX, RATING_MIN};
use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::traits::{Document, Fields};

fn to_fields<T: Serialize>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(StoreError::Codec(format!("expected an object, got {other}"))),
        Err(e) => Err(StoreError::Codec(e.to_string())),
    }
}

/// Fields sent with an insert: the form data plus the creation timestamp.
pub fn encode_new(form: &DoctorFormData, created_at: DateTime<Utc>) -> StoreResult<Fields> {
    let mut fields = to_fields(form)?;
    fields.insert(
        "createdAt".to_string(),
        serde_json::to_value(created_at).map_err(|e| StoreError::Codec(e.to_string()))?,
    );
    Ok(fields)
}

/// Fields sent with a partial write: exactly the fields the patch carries.
pub fn encode_patch(patch: &DoctorPatch) -> StoreResult<Fields> {
    to_fields(patch)
}

/// Fields of an existing record, without its id.
pub fn encode_doctor(doctor: &Doctor) -> StoreResult<Fields> {
    let mut fields = to_fields(doctor)?;
    fields.remove("id");
    Ok(fields)
}

/// Decodes a stored document into a record.
///
/// Rejects documents whose rating lies outside `[0, 5]`.
pub fn decode(document: &Document) -> Result<Doctor, String> {
    let mut fields = document.fields.clone();
    fields.insert("id".to_string(), Value::String(document.id.clone()));
    let doctor: Doctor = serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())?;
    if !(RATING_MIN..=RATING_MAX).contains(&doctor.rating) {
        return Err(format!("rating {} is outside [0, 5]", doctor.rating));
    }
    Ok(doctor)
}
