//! Response-mapping expression parser
//!
//! Expression format:
//! - Path: `data.items[].name` - dot-separated segments, `[]` marks array
//!   traversal at that segment
//! - Transforms: `fields.count|to_int` - pipe-separated, applied in order
//! - Defaults: `fields.done|default:false` - transform with an argument
//! - Literals: `'todoist'` - single-quoted static value, no path lookup
//!
//! The external host evaluates these against raw API/DB responses; this
//! module only parses and re-renders them so the validator can reject
//! malformed expressions before they ever reach the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("Empty mapping expression")]
    Empty,

    #[error("Empty path segment in '{0}'")]
    EmptySegment(String),

    #[error("Invalid path segment '{0}': only letters, digits, '_', '-' and '$' are allowed")]
    InvalidSegment(String),

    #[error("Unknown transform '{0}'")]
    UnknownTransform(String),

    #[error("Unterminated literal: {0}")]
    UnterminatedLiteral(String),
}

/// One segment of a mapping path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Field name within the response object
    pub name: String,

    /// True if the segment ends with `[]` (map over array elements)
    pub array: bool,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.array {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A value transform applied after path lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    ToInt,
    ToFloat,
    ToBool,
    ToString,
    StripQuotes,
    Trim,
    /// Fallback value when the path resolves to null/missing
    Default(String),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::ToInt => write!(f, "to_int"),
            Transform::ToFloat => write!(f, "to_float"),
            Transform::ToBool => write!(f, "to_bool"),
            Transform::ToString => write!(f, "to_string"),
            Transform::StripQuotes => write!(f, "strip_quotes"),
            Transform::Trim => write!(f, "trim"),
            Transform::Default(v) => write!(f, "default:{}", v),
        }
    }
}

impl FromStr for Transform {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = s.strip_prefix("default:") {
            return Ok(Transform::Default(value.to_string()));
        }

        match s {
            "to_int" => Ok(Transform::ToInt),
            "to_float" => Ok(Transform::ToFloat),
            "to_bool" => Ok(Transform::ToBool),
            "to_string" => Ok(Transform::ToString),
            "strip_quotes" => Ok(Transform::StripQuotes),
            "trim" => Ok(Transform::Trim),
            _ => Err(MappingError::UnknownTransform(s.to_string())),
        }
    }
}

/// A parsed response-mapping expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MappingExpr {
    /// Static value, written `'value'` in the definition
    Literal(String),

    /// Path lookup with optional transform pipeline
    Path {
        segments: Vec<Segment>,
        transforms: Vec<Transform>,
    },
}

impl MappingExpr {
    /// Returns true if the expression traverses an array at any segment
    pub fn is_array(&self) -> bool {
        match self {
            MappingExpr::Literal(_) => false,
            MappingExpr::Path { segments, .. } => segments.iter().any(|s| s.array),
        }
    }
}

fn parse_segment(raw: &str, expr: &str) -> Result<Segment, MappingError> {
    let (name, array) = match raw.strip_suffix("[]") {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };

    if name.is_empty() {
        return Err(MappingError::EmptySegment(expr.to_string()));
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$'));
    if !valid {
        return Err(MappingError::InvalidSegment(name.to_string()));
    }

    Ok(Segment {
        name: name.to_string(),
        array,
    })
}

impl FromStr for MappingExpr {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MappingError::Empty);
        }

        // Single-quoted literal
        if let Some(rest) = s.strip_prefix('\'') {
            return match rest.strip_suffix('\'') {
                Some(inner) => Ok(MappingExpr::Literal(inner.to_string())),
                None => Err(MappingError::UnterminatedLiteral(s.to_string())),
            };
        }

        let mut parts = s.split('|');
        let path = parts.next().ok_or(MappingError::Empty)?.trim();

        if path.is_empty() {
            return Err(MappingError::EmptySegment(s.to_string()));
        }

        let segments = path
            .split('.')
            .map(|seg| parse_segment(seg, s))
            .collect::<Result<Vec<_>, _>>()?;

        let transforms = parts
            .map(|t| t.trim().parse::<Transform>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MappingExpr::Path {
            segments,
            transforms,
        })
    }
}

impl fmt::Display for MappingExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingExpr::Literal(v) => write!(f, "'{}'", v),
            MappingExpr::Path {
                segments,
                transforms,
            } => {
                let path: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", path.join("."))?;
                for t in transforms {
                    write!(f, "|{}", t)?;
                }
                Ok(())
            }
        }
    }
}

impl TryFrom<String> for MappingExpr {
    type Error = MappingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MappingExpr> for String {
    fn from(expr: MappingExpr) -> Self {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_simple_path() {
        let expr: MappingExpr = "data.items.name".parse().unwrap();
        match &expr {
            MappingExpr::Path {
                segments,
                transforms,
            } => {
                assert_eq!(segments.len(), 3);
                assert!(transforms.is_empty());
                assert!(!expr.is_array());
            }
            _ => panic!("expected path"),
        }
    }

    #[test]
    fn parses_array_marker() {
        let expr: MappingExpr = "data.items[].name".parse().unwrap();
        assert!(expr.is_array());
        match &expr {
            MappingExpr::Path { segments, .. } => {
                assert!(segments[1].array);
                assert!(!segments[0].array);
            }
            _ => panic!("expected path"),
        }
    }

    #[test]
    fn parses_transform_pipeline() {
        let expr: MappingExpr = "fields.count|to_int|default:0".parse().unwrap();
        match expr {
            MappingExpr::Path { transforms, .. } => {
                assert_eq!(
                    transforms,
                    vec![Transform::ToInt, Transform::Default("0".to_string())]
                );
            }
            _ => panic!("expected path"),
        }
    }

    #[test]
    fn parses_literal() {
        let expr: MappingExpr = "'todoist'".parse().unwrap();
        assert_eq!(expr, MappingExpr::Literal("todoist".to_string()));
    }

    #[test]
    fn literal_roundtrips() {
        let expr: MappingExpr = "'some value'".parse().unwrap();
        assert_eq!(expr.to_string(), "'some value'");
    }

    #[test]
    fn rejects_empty_expression() {
        assert_eq!("".parse::<MappingExpr>(), Err(MappingError::Empty));
        assert_eq!("   ".parse::<MappingExpr>(), Err(MappingError::Empty));
    }

    #[test]
    fn rejects_empty_segment() {
        assert!("data..name".parse::<MappingExpr>().is_err());
        assert!(".name".parse::<MappingExpr>().is_err());
    }

    #[test]
    fn rejects_unknown_transform() {
        assert_eq!(
            "x|to_uppercase".parse::<MappingExpr>(),
            Err(MappingError::UnknownTransform("to_uppercase".to_string()))
        );
    }

    #[test]
    fn rejects_unterminated_literal() {
        assert!("'oops".parse::<MappingExpr>().is_err());
    }

    #[test]
    fn rejects_invalid_segment_chars() {
        assert!("data.it ems".parse::<MappingExpr>().is_err());
        assert!("data.a{b}".parse::<MappingExpr>().is_err());
    }

    #[test]
    fn dollar_root_is_valid() {
        let expr: MappingExpr = "$.data[].id".parse().unwrap();
        assert!(expr.is_array());
    }

    #[test]
    fn serde_roundtrip() {
        let expr: MappingExpr = "data.items[].id|to_int".parse().unwrap();
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(json, "\"data.items[].id|to_int\"");

        let parsed: MappingExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, parsed);
    }

    fn segment_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-z$][a-z0-9_-]{0,8}(\\[\\])?").unwrap()
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(
            segs in proptest::collection::vec(segment_strategy(), 1..5),
            with_transform in any::<bool>(),
        ) {
            let mut expr = segs.join(".");
            if with_transform {
                expr.push_str("|to_int");
            }

            let parsed: MappingExpr = expr.parse().unwrap();
            let rendered = parsed.to_string();
            let reparsed: MappingExpr = rendered.parse().unwrap();

            prop_assert_eq!(parsed, reparsed);
            prop_assert_eq!(rendered, expr);
        }
    }
}
