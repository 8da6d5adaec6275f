//! Template placeholder scanner
//!
//! Executor string fields may embed `{{params.x}}`, `{{auth.token}}`,
//! `{{settings.x}}`, or `{{<step>.field}}` placeholders. The host resolves
//! them at execution time; the validator only needs to know which
//! references a definition makes, so this scanner extracts them without
//! interpolating anything.

/// One `{{...}}` reference found in an executor string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    /// The raw text between the braces, trimmed
    pub raw: String,

    /// Dot-separated parts of the reference
    pub parts: Vec<String>,
}

impl TemplateRef {
    /// The reference root: `params`, `auth`, `settings`, or a step binding
    pub fn root(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or("")
    }

    /// The key below the root, if any (`x` in `params.x`)
    pub fn key(&self) -> Option<&str> {
        self.parts.get(1).map(String::as_str)
    }
}

/// Extracts all `{{...}}` references from a string.
///
/// Malformed placeholders (unclosed braces) terminate the scan; everything
/// found up to that point is still returned.
pub fn scan_refs(input: &str) -> Vec<TemplateRef> {
    let mut refs = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };

        let raw = after[..end].trim().to_string();
        if !raw.is_empty() {
            let parts = raw.split('.').map(|p| p.trim().to_string()).collect();
            refs.push(TemplateRef { raw, parts });
        }

        rest = &after[end + 2..];
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_reference() {
        let refs = scan_refs("https://api.example.com/tasks/{{params.id}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].root(), "params");
        assert_eq!(refs[0].key(), Some("id"));
    }

    #[test]
    fn finds_multiple_references() {
        let refs = scan_refs("{{params.project}}/items?token={{auth.token}}");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].root(), "params");
        assert_eq!(refs[1].root(), "auth");
    }

    #[test]
    fn step_binding_reference() {
        let refs = scan_refs("SELECT * FROM t WHERE id = {{lookup.id}}");
        assert_eq!(refs[0].root(), "lookup");
        assert_eq!(refs[0].key(), Some("id"));
    }

    #[test]
    fn no_references() {
        assert!(scan_refs("https://api.example.com/tasks").is_empty());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let refs = scan_refs("{{ params.id }}");
        assert_eq!(refs[0].raw, "params.id");
        assert_eq!(refs[0].key(), Some("id"));
    }

    #[test]
    fn unclosed_placeholder_stops_scan() {
        let refs = scan_refs("{{params.a}} and {{broken");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn empty_placeholder_is_skipped() {
        assert!(scan_refs("{{}}").is_empty());
        assert!(scan_refs("{{  }}").is_empty());
    }
}
