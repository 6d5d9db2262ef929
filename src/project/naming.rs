//! Name formatting helpers.
//!
//! Raw user input is sanitized into a formatted upper-camel-case name and a
//! kebab-case class name. The sanitizer guarantees the formatted name never
//! begins with punctuation, digits, or whitespace, and contains none of the
//! disallowed separator characters.

use regex::Regex;
use std::sync::LazyLock;

static LEADING_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[.*_/\\()&^!@#$%+=?<>~`\s]+").unwrap());
static LEADING_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+").unwrap());
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.*_/\\()&^!@#$%+=?<>~`\s]").unwrap());

/// Sanitize a raw name into the formatted project name.
///
/// Steps: trim, strip leading separator characters, strip leading digits,
/// normalize remaining separators to dashes, then upper-camel-case the
/// dash-separated words. Returns an empty string when nothing usable
/// remains; callers re-prompt in that case.
#[must_use]
pub fn format_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let stripped = LEADING_SEPARATORS.replace(trimmed, "");
    let stripped = LEADING_DIGITS.replace(&stripped, "");
    let dashed = SEPARATORS.replace_all(&stripped, "-");

    dashed
        .split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join("")
}

/// Derive the kebab-case class name from a formatted name.
///
/// `MyApp` becomes `my-app`. A leading dash produced by an initial
/// uppercase letter is stripped.
#[must_use]
pub fn format_class_name(formatted: &str) -> String {
    let mut out = String::with_capacity(formatted.len() + 4);
    for ch in formatted.chars() {
        if ch.is_uppercase() {
            out.push('-');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out.trim_start_matches('-').to_string()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_camel_case() {
        assert_eq!(format_name("my app"), "MyApp");
        assert_eq!(format_name("My App"), "MyApp");
    }

    #[test]
    fn leading_punctuation_and_digits_are_stripped() {
        assert_eq!(format_name("__private"), "Private");
        assert_eq!(format_name("9lives"), "Lives");
        assert_eq!(format_name("  .hidden-name"), "HiddenName");
    }

    #[test]
    fn separators_are_normalized() {
        assert_eq!(format_name("foo/bar_baz"), "FooBarBaz");
        assert_eq!(format_name("a  b"), "AB");
    }

    #[test]
    fn unusable_input_yields_empty() {
        assert_eq!(format_name(""), "");
        assert_eq!(format_name("   "), "");
        assert_eq!(format_name("123"), "");
        assert_eq!(format_name("!!!"), "");
    }

    #[test]
    fn formatted_name_never_starts_with_disallowed_chars() {
        for raw in ["9-lives!", " *star", "_x", "...dots", "42", "my app"] {
            let formatted = format_name(raw);
            if let Some(first) = formatted.chars().next() {
                assert!(
                    first.is_alphabetic(),
                    "{raw:?} formatted to {formatted:?} which starts with {first:?}"
                );
            }
            assert!(
                !SEPARATORS.is_match(&formatted),
                "{formatted:?} still contains separator characters"
            );
        }
    }

    #[test]
    fn class_name_is_kebab_case() {
        assert_eq!(format_class_name("MyApp"), "my-app");
        assert_eq!(format_class_name("App"), "app");
        assert_eq!(format_class_name("XYWidget"), "x-y-widget");
    }
}
