//! Violation taxonomy for the schema validator

use thiserror::Error;

/// One reason a plugin folder fails validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("readme.md is missing")]
    MissingReadme,

    #[error("Frontmatter is invalid: {0}")]
    Frontmatter(String),

    #[error("id '{declared}' does not match folder name '{folder}'")]
    IdMismatch { folder: String, declared: String },

    #[error("tags must be a non-empty array")]
    EmptyTags,

    #[error("Tool '{tool}' is declared more than once")]
    DuplicateTool { tool: String },

    #[error("Tool '{tool}' declares no executor")]
    NoExecutor { tool: String },

    #[error("Tool '{tool}' declares multiple executors: {kinds}")]
    MultipleExecutors { tool: String, kinds: String },

    #[error("Tool '{tool}' declares both an inline executor and steps")]
    StepsAndExecutor { tool: String },

    #[error("Tool '{tool}' has an empty steps list")]
    EmptySteps { tool: String },

    #[error("Tool '{tool}' references '{{{{{reference}}}}}' which is not a prior step binding")]
    UnknownStepBinding { tool: String, reference: String },

    #[error("Tool '{tool}' references undeclared param '{param}'")]
    UnknownParam { tool: String, param: String },

    #[error("Tool '{tool}' references '{{{{auth.*}}}}' but the plugin has no auth block")]
    AuthRefWithoutAuth { tool: String },

    #[error("Tool '{tool}' references undeclared setting '{setting}'")]
    UnknownSetting { tool: String, setting: String },

    #[error("Tool '{tool}' has an invalid mapping for '{field}': {error}")]
    BadMapping {
        tool: String,
        field: String,
        error: String,
    },

    #[error("icon.svg is missing")]
    MissingIcon,

    #[error("icon.svg is {bytes} bytes, larger than the {max} byte limit")]
    IconTooLarge { bytes: u64, max: u64 },

    #[error("icon.svg is not an <svg> document")]
    IconNotSvg,

    #[error("icon.svg has no viewBox attribute")]
    IconMissingViewBox,

    #[error("icon.svg does not use currentColor")]
    IconMissingCurrentColor,

    #[error("icon.svg hardcodes the color '{value}'")]
    IconHardcodedColor { value: String },

    #[error("Tool '{tool}' has no test (no test file mentions it)")]
    UntestedTool { tool: String },

    #[error("No plugin folder with this name exists")]
    NotFound,
}
