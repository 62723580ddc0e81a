use serde_json::{Map, Value};

/// Recognized profile keys, in the order they are written back to a sheet.
pub const PROFILE_FIELDS: [&str; 5] = [
    "company_overview",
    "company_type",
    "company_business",
    "company_industry",
    "sources",
];

/// A company profile recovered from a completion response.
///
/// Wraps the decoded JSON object as-is. Keys beyond [`PROFILE_FIELDS`]
/// (the model usually echoes `website` too) are kept but ignored
/// downstream. No schema validation is performed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfile(Map<String, Value>);

impl CompanyProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a field as a cell value.
    ///
    /// String values are returned verbatim. A non-string value (models
    /// occasionally emit arrays for `sources`) is rendered as compact
    /// JSON rather than failing the row. Missing keys become the empty
    /// string.
    pub fn field(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Recover a JSON profile from a raw completion reply.
///
/// Models wrap their answer in markdown fences, lead-in prose
/// ("Here is the result in JSON format:") and trailing commentary, so the
/// reply is reduced before parsing. The steps run unconditionally, in
/// order:
///
/// 1. substring-remove the literal ```` ```json ```` and ```` ``` ````
///    tokens (not fence-pair parsing; stray fence tokens mid-text are
///    removed as well);
/// 2. drop everything before the first `{`, keeping the brace;
/// 3. truncate after the last `}`;
/// 4. strict JSON object parse.
///
/// Returns `None` on any failure; this function never panics on malformed
/// input. When a reply contains several brace groups the first-`{`-to-
/// last-`}` window conflates them. Known fragility, kept for parity with
/// the established sheet contents; do not make this smarter.
pub fn extract_profile(raw: &str) -> Option<CompanyProfile> {
    let content = raw.replace("```json", "").replace("```", "");

    let content = match content.split_once('{') {
        Some((_, tail)) => format!("{{{tail}"),
        // No opening brace anywhere: leave as-is, the parse below fails.
        None => content,
    };

    let content = match content.rfind('}') {
        Some(idx) => &content[..=idx],
        None => content.as_str(),
    };

    serde_json::from_str::<Map<String, Value>>(content)
        .ok()
        .map(CompanyProfile::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COMPACT: &str = r#"{"company_overview":"Maker of widgets","company_type":"Product-based","company_business":"B2C","company_industry":"Manufacturing","sources":"https://www.crunchbase.com/organization/acme"}"#;

    #[test]
    fn test_extract_compact_round_trip() {
        let profile = extract_profile(COMPACT).unwrap();
        assert_eq!(
            Value::Object(profile.as_map().clone()),
            serde_json::from_str::<Value>(COMPACT).unwrap()
        );
    }

    #[test]
    fn test_extract_fenced_matches_unfenced() {
        let fenced = format!("```json\n{}\n```", COMPACT);
        let bare_fence = format!("```\n{}\n```", COMPACT);
        let unfenced = extract_profile(COMPACT).unwrap();
        assert_eq!(extract_profile(&fenced).unwrap(), unfenced);
        assert_eq!(extract_profile(&bare_fence).unwrap(), unfenced);
    }

    #[test]
    fn test_extract_surrounding_prose() {
        let noisy = format!(
            "Here is the result in JSON format:\n{}\nLet me know if you need anything else!",
            COMPACT
        );
        let profile = extract_profile(&noisy).unwrap();
        assert_eq!(profile.field("company_business"), "B2C");
    }

    #[test]
    fn test_extract_no_opening_brace() {
        assert!(extract_profile("I could not find that company.").is_none());
        assert!(extract_profile("").is_none());
    }

    #[test]
    fn test_extract_trailing_unmatched_brace() {
        // Truncation must use the LAST '}', not the first one after '{'.
        let input = format!("{}}}", COMPACT);
        assert!(extract_profile(&input).is_none());

        let balanced_then_noise = format!("{} trailing notes", COMPACT);
        assert!(extract_profile(&balanced_then_noise).is_some());
    }

    #[test]
    fn test_extract_nested_object_uses_last_brace() {
        let input = r#"{"sources": {"primary": "https://example.com"}}"#;
        let profile = extract_profile(input).unwrap();
        assert_eq!(profile.field("sources"), r#"{"primary":"https://example.com"}"#);
    }

    #[test]
    fn test_extract_multiple_brace_groups_conflate() {
        // Two objects in one reply get conflated into an unparseable
        // window. Preserved behavior, not a bug.
        let input = r#"{"a": 1} and then {"b": 2}"#;
        assert!(extract_profile(input).is_none());
    }

    #[test]
    fn test_extract_non_object_json() {
        assert!(extract_profile("[1, 2, 3]").is_none());
        assert!(extract_profile("42").is_none());
    }

    #[test]
    fn test_field_defaults_and_rendering() {
        let profile = CompanyProfile::new(
            json!({"company_type": "Product-based", "sources": ["https://a", "https://b"]})
                .as_object()
                .unwrap()
                .clone(),
        );
        assert_eq!(profile.field("company_type"), "Product-based");
        assert_eq!(profile.field("company_overview"), "");
        assert_eq!(profile.field("sources"), r#"["https://a","https://b"]"#);
    }
}
