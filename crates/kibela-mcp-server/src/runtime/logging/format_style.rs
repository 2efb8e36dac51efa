use schemars::JsonSchema;
use serde::Deserialize;

/// Log output format, mapped onto the tracing-subscriber formatters
#[derive(Debug, Default, Deserialize, JsonSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// Human-readable single-line logs
    #[default]
    Full,
    /// Shorter single-line logs
    Compact,
    /// Newline-delimited JSON
    Json,
    /// Multi-line logs for local debugging
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::FormatStyle;
    use rstest::rstest;

    #[rstest]
    #[case("full", FormatStyle::Full)]
    #[case("compact", FormatStyle::Compact)]
    #[case("json", FormatStyle::Json)]
    #[case("pretty", FormatStyle::Pretty)]
    fn reads_lowercase_styles(#[case] yaml: &str, #[case] expected: FormatStyle) {
        let actual: FormatStyle = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case("Full")]
    #[case("JSON")]
    #[case("ndjson")]
    fn rejects_unknown_styles(#[case] yaml: &str) {
        let error = serde_yaml::from_str::<FormatStyle>(yaml).unwrap_err();
        assert!(error.to_string().contains("unknown variant"));
    }
}
