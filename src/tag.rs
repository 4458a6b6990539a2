//! Struct-tag style field annotations.
//!
//! An annotation is a space separated list of `key:"value"` pairs, e.g.
//! `inject-name:"db" inject-required:"false" inject-strategy:"TypeOnly"`.
//! Only the `inject-name` key makes a field injectable.

use crate::strategy::DEFAULT_STRATEGY;

pub const TAG_NAME: &str = "inject-name";
pub const TAG_REQUIRED: &str = "inject-required";
pub const TAG_STRATEGY: &str = "inject-strategy";

/// Parsed injection annotation of one field.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::FieldTag;
///
/// let tag = FieldTag::parse(r#"inject-name:"db" inject-required:"false""#).unwrap();
/// assert_eq!(tag.name, "db");
/// assert!(!tag.required);
/// assert_eq!(tag.strategy, "NameThenType");
///
/// // No name key: the field is not injectable.
/// assert!(FieldTag::parse(r#"json:"db""#).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    pub name: String,
    pub required: bool,
    pub strategy: String,
}

impl FieldTag {
    /// Parses an annotation; `None` when it carries no `inject-name` key.
    pub fn parse(tag: &str) -> Option<Self> {
        let name = lookup(tag, TAG_NAME)?;
        let required = match lookup(tag, TAG_REQUIRED) {
            Some(value) => !value.eq_ignore_ascii_case("false"),
            None => true,
        };
        let strategy = lookup(tag, TAG_STRATEGY).unwrap_or_else(|| DEFAULT_STRATEGY.to_string());
        Some(Self { name, required, strategy })
    }
}

/// Returns the unquoted value stored under `key`.
///
/// Malformed input stops the scan and yields `None`.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let colon = rest.find(':')?;
        let candidate = &rest[..colon];
        if candidate.is_empty() || candidate.contains(|c: char| c == ' ' || c == '"' || c.is_control()) {
            return None;
        }
        rest = &rest[colon + 1..];

        let (value, remaining) = quoted(rest)?;
        if candidate == key {
            return Some(value);
        }
        rest = remaining;
    }
}

// Splits a leading double-quoted string off `input`. Understands `\n`, `\t`, `\r`,
// `\"` and `\\`; any other escaped character is kept as-is.
fn quoted(input: &str) -> Option<(String, &str)> {
    let body = input.strip_prefix('"')?;
    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Some((value, &body[idx + 1..])),
            '\\' => {
                let (_, escaped) = chars.next()?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            other => value.push(other),
        }
    }
    None
}
