//! Codec for the reserved sync metadata map.

use super::CodecError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const SYNC_METADATA_COLUMN: &str = "sync_metadata";

/// Encodes the extension map as a JSON object.
pub fn encode_extra(extra: &BTreeMap<String, String>) -> String {
    let object = extra
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect::<Map<String, Value>>();
    Value::Object(object).to_string()
}

/// Decodes the extension map; anything but a string-to-string object is corrupt.
pub fn decode_extra(raw: &str) -> Result<BTreeMap<String, String>, CodecError> {
    serde_json::from_str::<BTreeMap<String, String>>(raw)
        .map_err(|err| CodecError::corrupt(SYNC_METADATA_COLUMN, err.to_string()))
}
