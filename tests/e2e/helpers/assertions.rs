use serde_json::Value;

/// Assert the synthesis response shape and return the decoded metadata object
pub fn assert_synthesis_response(response: &Value, expected_format: &str) -> Value {
    assert!(
        response.get("audio_data").and_then(|v| v.as_str()).is_some(),
        "Missing audio_data field"
    );
    assert_eq!(
        response.get("audio_format").and_then(|v| v.as_str()),
        Some(expected_format),
        "audio_format mismatch"
    );
    assert!(
        response.get("duration_ms").and_then(|v| v.as_u64()).is_some(),
        "Missing duration_ms field"
    );

    let metadata = response
        .get("metadata")
        .and_then(|v| v.as_str())
        .expect("metadata must be a JSON encoded string");
    serde_json::from_str(metadata).expect("metadata must decode to a JSON object")
}

pub fn assert_metadata_field(metadata: &Value, key: &str, expected: &str) {
    assert_eq!(
        metadata.get(key).and_then(|v| v.as_str()),
        Some(expected),
        "Metadata field '{}' mismatch in {}",
        key,
        metadata
    );
}
