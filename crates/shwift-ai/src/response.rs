//! Response shapes returned by the completion service.

use serde::Deserialize;
use serde_json::Value;

/// The provider response, narrowed to the shapes snapshot text can come from.
///
/// Variants are tried in order, so a convenience `output_text` field wins
/// over the structured `output` list when both are present. Output items are
/// kept as raw JSON so one malformed item cannot discard the rest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    SimpleText { output_text: String },
    StructuredOutput { output: Vec<Value> },
    Unrecognized(Value),
}

/// Non-empty `text` strings of one output item's content blocks.
fn item_texts(item: &Value) -> impl Iterator<Item = &str> {
    item.get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .filter(|text| !text.is_empty())
}

impl ProviderResponse {
    /// Snapshot text carried by the response; empty when there is none.
    pub fn extract_text(&self) -> String {
        match self {
            ProviderResponse::SimpleText { output_text } => output_text.trim().to_string(),
            ProviderResponse::StructuredOutput { output } => output
                .iter()
                .flat_map(item_texts)
                .collect::<String>()
                .trim()
                .to_string(),
            ProviderResponse::Unrecognized(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ProviderResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn convenience_field_is_returned_trimmed() {
        let response = parse(json!({ "output_text": "\n  ## Profile Name\nSteady Builder  \n" }));
        assert!(matches!(response, ProviderResponse::SimpleText { .. }));
        assert_eq!(response.extract_text(), "## Profile Name\nSteady Builder");
    }

    #[test]
    fn structured_output_concatenates_blocks_in_order() {
        let response = parse(json!({
            "id": "resp_1",
            "output": [
                { "type": "reasoning", "content": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "Part one. " },
                    { "type": "output_text", "text": "Part two." }
                ]},
                { "type": "message", "content": [
                    { "type": "output_text", "text": " Part three.\n" }
                ]}
            ]
        }));
        assert!(matches!(response, ProviderResponse::StructuredOutput { .. }));
        assert_eq!(response.extract_text(), "Part one. Part two. Part three.");
    }

    #[test]
    fn blocks_without_usable_text_are_skipped() {
        let response = parse(json!({
            "output": [
                { "type": "message", "content": null },
                { "type": "message" },
                { "type": "message", "content": [
                    { "type": "refusal" },
                    { "type": "output_text", "text": null },
                    { "type": "output_text", "text": { "nested": true } },
                    { "type": "output_text", "text": "kept" }
                ]}
            ]
        }));
        assert_eq!(response.extract_text(), "kept");
    }

    #[test]
    fn malformed_items_do_not_discard_valid_ones() {
        let response = parse(json!({
            "output": [
                { "type": "message", "content": "oops" },
                null,
                { "type": 7, "content": [{ "text": "first " }] },
                { "type": "message", "content": [{ "type": ["odd"], "text": "kept" }] },
                { "type": "message", "content": [null, 3, { "text": "." }] }
            ]
        }));
        assert!(matches!(response, ProviderResponse::StructuredOutput { .. }));
        assert_eq!(response.extract_text(), "first kept.");
    }

    #[test]
    fn convenience_field_wins_when_both_present() {
        let response = parse(json!({
            "output_text": "simple",
            "output": [{ "content": [{ "text": "structured" }] }]
        }));
        assert_eq!(response.extract_text(), "simple");
    }

    #[test]
    fn null_convenience_field_falls_back_to_structured() {
        let response = parse(json!({
            "output_text": null,
            "output": [{ "content": [{ "text": "structured" }] }]
        }));
        assert_eq!(response.extract_text(), "structured");
    }

    #[test]
    fn unknown_shapes_yield_empty_text() {
        for value in [
            json!({}),
            json!({ "choices": [{ "message": { "content": "chat style" } }] }),
            json!({ "output": "not a list" }),
            json!([1, 2, 3]),
            json!(null),
        ] {
            assert_eq!(parse(value).extract_text(), "");
        }
    }
}
