//! Keyword list codec.
//!
//! Keywords are stored as a JSON array of strings, which round-trips order,
//! duplicates, commas and the empty list exactly.

use super::CodecError;
use serde_json::Value;

const KEYWORDS_COLUMN: &str = "keywords";

/// Encodes a keyword sequence into its column representation.
pub fn encode_keywords(keywords: &[String]) -> String {
    Value::Array(keywords.iter().cloned().map(Value::String).collect()).to_string()
}

/// Decodes a keyword column value.
///
/// # Errors
/// - `CodecError::CorruptRecord` when `raw` is not a JSON array of strings.
pub fn decode_keywords(raw: &str) -> Result<Vec<String>, CodecError> {
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|err| CodecError::corrupt(KEYWORDS_COLUMN, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{decode_keywords, encode_keywords};
    use crate::codec::CodecError;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_sequence_round_trips() {
        let encoded = encode_keywords(&[]);
        assert_eq!(encoded, "[]");
        assert!(decode_keywords(&encoded).unwrap().is_empty());
    }

    #[test]
    fn order_duplicates_and_separators_survive() {
        let keywords = owned(&["b", "a", "b", "x,y", "引号\"", "", " pad "]);
        let decoded = decode_keywords(&encode_keywords(&keywords)).unwrap();
        assert_eq!(decoded, keywords);
    }

    #[test]
    fn malformed_input_is_rejected() {
        for raw in ["", "[\"a\"", "{\"a\":1}", "[1, 2]", "null", "\"a\"", "[\"a\", null]"] {
            let err = decode_keywords(raw).expect_err("malformed keywords must fail");
            assert!(
                matches!(err, CodecError::CorruptRecord { column: "keywords", .. }),
                "unexpected error for {raw:?}: {err}"
            );
        }
    }
}
