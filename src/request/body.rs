//! JSON body encoding with `null` field omission.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, error::ConfigError};

/// Serializes `body` into a JSON value with every `null` object field removed.
pub fn to_json_value<B>(body: &B) -> Result<Value, ConfigError>
where
	B: ?Sized + Serialize,
{
	let mut value = serde_json::to_value(body)?;

	prune_nulls(&mut value);

	Ok(value)
}

/// Removes `null` fields from objects, recursing into nested objects and arrays.
///
/// Array elements that are `null` stay in place so positions are preserved.
pub fn prune_nulls(value: &mut Value) {
	match value {
		Value::Object(map) => {
			map.retain(|_, field| !field.is_null());
			map.values_mut().for_each(prune_nulls);
		},
		Value::Array(items) => items.iter_mut().for_each(prune_nulls),
		_ => (),
	}
}

/// Encodes a request body into wire bytes; a missing or top-level `null` body sends nothing.
pub(crate) fn encode_body(body: Option<Value>) -> Result<Option<Vec<u8>>, ConfigError> {
	let Some(mut value) = body.filter(|value| !value.is_null()) else {
		return Ok(None);
	};

	prune_nulls(&mut value);

	Ok(Some(serde_json::to_vec(&value)?))
}
