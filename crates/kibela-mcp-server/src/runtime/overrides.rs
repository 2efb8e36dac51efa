use schemars::JsonSchema;
use serde::Deserialize;

/// Overridable flags
#[derive(Debug, Deserialize, Default, JsonSchema)]
#[serde(default)]
pub struct Overrides {
    /// Reject absent or blank required arguments for every tool, instead of
    /// only for the tools that declare strict validation
    pub strict_argument_validation: bool,
}
