//! Shared metadata model for flags declared through `flagdecl`.
//!
//! This crate intentionally does **not** depend on `flagdecl` itself.
//! The data types here describe a set of declarations without their
//! convertors or default suppliers, and are used for:
//! - exporting the declared interface of a program as JSON (tooling, completion)
//! - snapshot-style comparisons of a program's flags across versions

use serde::{Deserialize, Serialize};

/// Current value of [`ArgumentsSchema::format_version`].
pub const SCHEMA_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FlagSchema {
    /// Normalized long name (`--name`).
    pub long: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    /// Whether a default supplier is declared. The default itself is not
    /// evaluated when building the schema.
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Rust type name of the resolved value, for diagnostics only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_type: String,
}

/// JSON payload describing every declaration of one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentsSchema {
    pub format_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSchema>,
}

impl ArgumentsSchema {
    pub fn new(description: Option<String>, flags: Vec<FlagSchema>) -> Self {
        Self {
            format_version: SCHEMA_FORMAT_VERSION,
            description,
            flags,
        }
    }

    /// Look up a flag by its long name.
    pub fn flag(&self, long: &str) -> Option<&FlagSchema> {
        self.flags.iter().find(|f| f.long == long)
    }

    /// Flags that appear in the rendered help.
    pub fn visible_flags(&self) -> impl Iterator<Item = &FlagSchema> {
        self.flags.iter().filter(|f| !f.hidden)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArgumentsSchema {
        ArgumentsSchema::new(
            Some("Demo program".to_string()),
            vec![
                FlagSchema {
                    long: "count".to_string(),
                    short: Some('c'),
                    description: vec!["How many times".to_string()],
                    has_default: true,
                    hidden: false,
                    value_type: "i64".to_string(),
                },
                FlagSchema {
                    long: "help".to_string(),
                    short: Some('h'),
                    hidden: true,
                    value_type: "bool".to_string(),
                    ..Default::default()
                },
            ],
        )
    }

    #[test]
    fn json_uses_kebab_case_and_skips_empty_fields() {
        let json = sample().to_json_pretty().unwrap();
        assert!(json.contains("\"format-version\": 1"));
        assert!(json.contains("\"has-default\": true"));
        assert!(json.contains("\"value-type\": \"i64\""));
        // `help` has no description, so the key is skipped for that entry.
        assert_eq!(json.matches("\"description\"").count(), 2);
    }

    #[test]
    fn from_json_reads_back_what_was_written() {
        let schema = sample();
        let json = schema.to_json_pretty().unwrap();
        assert_eq!(ArgumentsSchema::from_json(&json).unwrap(), schema);
    }

    #[test]
    fn visible_flags_skips_hidden() {
        let schema = sample();
        let visible: Vec<&str> = schema.visible_flags().map(|f| f.long.as_str()).collect();
        assert_eq!(visible, vec!["count"]);
        assert_eq!(schema.flag("help").and_then(|f| f.short), Some('h'));
    }
}
