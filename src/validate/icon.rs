//! Icon file checks
//!
//! Catalog icons must be small SVGs that inherit the host theme: a
//! `viewBox` for scaling, `currentColor` for theming, and no hardcoded
//! fill/stroke colors.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::violation::Violation;

const ALLOWED_COLORS: &[&str] = &["currentcolor", "none", "transparent", "inherit"];

/// Checks an icon file, returning every violation found
pub fn check_icon(path: &Path, max_bytes: u64) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !path.is_file() {
        return vec![Violation::MissingIcon];
    }

    if let Ok(meta) = fs::metadata(path) {
        if meta.len() > max_bytes {
            violations.push(Violation::IconTooLarge {
                bytes: meta.len(),
                max: max_bytes,
            });
        }
    }

    let Ok(content) = fs::read_to_string(path) else {
        violations.push(Violation::IconNotSvg);
        return violations;
    };

    if !content.contains("<svg") {
        violations.push(Violation::IconNotSvg);
        return violations;
    }

    if !content.contains("viewBox") {
        violations.push(Violation::IconMissingViewBox);
    }

    if !content.contains("currentColor") {
        violations.push(Violation::IconMissingCurrentColor);
    }

    for value in hardcoded_colors(&content) {
        violations.push(Violation::IconHardcodedColor { value });
    }

    violations
}

/// Extracts fill/stroke values that are not theme-safe.
///
/// Covers both attribute form (`fill="#fff"`) and style form
/// (`style="fill: #fff"`). `url(...)` references (gradients, patterns)
/// are allowed.
fn hardcoded_colors(content: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for attr in ["fill", "stroke"] {
        let mut search = 0;
        while let Some(pos) = content[search..].find(attr) {
            let start = search + pos;
            search = start + attr.len();

            // Word boundary on both sides: skip "fill-rule", "stroke-width"
            if start > 0 {
                let before = content.as_bytes()[start - 1] as char;
                if before.is_ascii_alphanumeric() || before == '-' {
                    continue;
                }
            }
            let after = &content[start + attr.len()..];
            let after_trimmed = after.trim_start();
            let Some(rest) = after_trimmed
                .strip_prefix('=')
                .or_else(|| after_trimmed.strip_prefix(':'))
            else {
                continue;
            };

            let rest = rest.trim_start();
            let value: String = rest
                .trim_start_matches(['"', '\''])
                .chars()
                .take_while(|c| !matches!(c, '"' | '\'' | ';' | '>' | '}'))
                .collect();
            let value = value.trim().to_string();

            if value.is_empty() || value.starts_with("url(") {
                continue;
            }
            if !ALLOWED_COLORS.contains(&value.to_lowercase().as_str()) {
                found.insert(value);
            }
        }
    }

    found
}
