//! Decoding of a whole search response.

use serde_json::Value;

use super::entry::{json_type_name, CatalogEntry};
use super::DecodeError;

const RESULT_COUNT_KEY: &str = "resultCount";
const RESULTS_KEY: &str = "results";

/// One page of search results, in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    /// Result count reported by the feed.
    pub result_count: usize,
    /// Decoded entries. Display order; never reordered here.
    pub entries: Vec<CatalogEntry>,
}

impl CatalogPage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Decode a search response.
///
/// The response must be an object holding a `results` array. Every element
/// is decoded on its own, and the first failing element fails the whole page.
pub fn decode_page(raw: &Value) -> Result<CatalogPage, DecodeError> {
    let object = raw.as_object().ok_or(DecodeError::NotAMapping {
        found: json_type_name(raw),
    })?;

    let results = match object.get(RESULTS_KEY) {
        Some(Value::Array(results)) => results,
        Some(other) => {
            return Err(DecodeError::InvalidResults {
                found: json_type_name(other),
            })
        }
        None => return Err(DecodeError::MissingResults),
    };

    let entries = results
        .iter()
        .enumerate()
        .map(|(index, record)| {
            CatalogEntry::decode(record).map_err(|source| DecodeError::InvalidEntry {
                index,
                source: Box::new(source),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let result_count = object
        .get(RESULT_COUNT_KEY)
        .and_then(Value::as_u64)
        .map(|count| count as usize)
        .unwrap_or(entries.len());

    Ok(CatalogPage {
        result_count,
        entries,
    })
}

/// Decode a search response from raw JSON bytes.
pub fn decode_page_slice(bytes: &[u8]) -> Result<CatalogPage, DecodeError> {
    let raw: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    decode_page(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_page() {
        let page = decode_page(&json!({ "resultCount": 0, "results": [] })).unwrap();
        assert_eq!(page.result_count, 0);
        assert!(page.is_empty());
    }

    #[test]
    fn test_page_preserves_order() {
        let page = decode_page(&json!({
            "resultCount": 3,
            "results": [
                { "trackName": "Zulu", "kind": "song" },
                { "trackName": "Alpha", "kind": "song" },
                { "collectionName": "Mike", "kind": "album" }
            ]
        }))
        .unwrap();

        assert_eq!(page.result_count, 3);
        let names: Vec<&str> = page.entries.iter().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
    }

    #[test]
    fn test_non_mapping_payload() {
        let err = decode_page(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, DecodeError::NotAMapping { found: "array" }));

        let err = decode_page(&Value::Null).unwrap_err();
        assert!(matches!(err, DecodeError::NotAMapping { found: "null" }));
    }

    #[test]
    fn test_missing_results_list() {
        let err = decode_page(&json!({ "resultCount": 0 })).unwrap_err();
        assert!(matches!(err, DecodeError::MissingResults));

        let err = decode_page(&json!({ "resultCount": 1, "results": { "a": 1 } })).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidResults { found: "object" }));
    }

    #[test]
    fn test_bad_element_fails_whole_page() {
        let err = decode_page(&json!({
            "resultCount": 3,
            "results": [
                { "trackName": "Fine" },
                "not a record",
                { "trackName": "Also fine" }
            ]
        }))
        .unwrap_err();

        match err {
            DecodeError::InvalidEntry { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, DecodeError::NotAMapping { found: "string" }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_result_count_uses_entry_count() {
        let page = decode_page(&json!({ "results": [{ "trackName": "One" }] })).unwrap();
        assert_eq!(page.result_count, 1);

        let page = decode_page(&json!({ "resultCount": "many", "results": [] })).unwrap();
        assert_eq!(page.result_count, 0);
    }

    #[test]
    fn test_decode_page_slice() {
        let body = br#"{"resultCount":1,"results":[{"trackName":"Song A","kind":"song"}]}"#;
        let page = decode_page_slice(body).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.entries[0].type_label(), "Song");

        let err = decode_page_slice(b"{ not json").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }
}
