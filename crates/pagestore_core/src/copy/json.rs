//! Serialize-then-deserialize copy strategy over JSON text.
//!
//! # Invariants
//! - Deserialization builds every field from the encoded value; collection
//!   fields are replaced, never merged with values a `Default` or constructor
//!   would have installed.
//! - Any encode or decode failure is reported as `NotSerializable`.

use super::{CopyError, CopyResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::type_name;

/// Copies `source` through a JSON text round trip.
///
/// # Errors
/// - `NotSerializable` when the value cannot be represented in JSON (for
///   example non-string map keys) or does not decode back into `T` (for
///   example non-finite floats, which encode as `null`).
pub fn clone_json<T>(source: &T) -> CopyResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let encoded = serde_json::to_string(source).map_err(not_serializable::<T>)?;
    serde_json::from_str(&encoded).map_err(not_serializable::<T>)
}

/// [`clone_json`] with absent values propagated as absent.
pub fn clone_json_opt<T>(source: Option<&T>) -> CopyResult<Option<T>>
where
    T: Serialize + DeserializeOwned,
{
    source.map(clone_json).transpose()
}

/// Copies every same-named field of `source` into `target`.
///
/// Fields of `target` without a counterpart in `source` keep their value.
/// On error `target` is left untouched.
///
/// # Errors
/// - `NotSerializable` when either side does not encode as a JSON object, or
///   a copied field does not fit the target field type.
pub fn copy_matching_fields<S, T>(source: &S, target: &mut T) -> CopyResult<()>
where
    S: Serialize,
    T: Serialize + DeserializeOwned,
{
    let Value::Object(mut source_fields) =
        serde_json::to_value(source).map_err(not_serializable::<S>)?
    else {
        return Err(not_an_object::<S>());
    };

    let mut target_value = serde_json::to_value(&*target).map_err(not_serializable::<T>)?;
    let Value::Object(target_fields) = &mut target_value else {
        return Err(not_an_object::<T>());
    };

    for (name, slot) in target_fields.iter_mut() {
        if let Some(value) = source_fields.remove(name) {
            *slot = value;
        }
    }

    *target = serde_json::from_value(target_value).map_err(not_serializable::<T>)?;
    Ok(())
}

fn not_serializable<T>(err: serde_json::Error) -> CopyError {
    CopyError::NotSerializable {
        type_name: type_name::<T>().to_string(),
        reason: err.to_string(),
    }
}

fn not_an_object<T>() -> CopyError {
    CopyError::NotSerializable {
        type_name: type_name::<T>().to_string(),
        reason: "value does not encode as an object with named fields".to_string(),
    }
}
