//! `{{field}}` token substitution.

use std::collections::HashMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Output of [`substitute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Field names that had no value and were replaced with an empty string.
    pub unresolved: Vec<String>,
}

/// A token found in template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

/// Find the next well-formed token at or after `from`.
///
/// Malformed openers (no closing braces, empty name, stray braces inside) are
/// skipped one character at a time so they stay verbatim in the output.
fn next_token(text: &str, mut from: usize) -> Option<Token<'_>> {
    while let Some(offset) = text[from..].find(OPEN) {
        let start = from + offset;
        let inner_start = start + OPEN.len();
        let close = text[inner_start..].find(CLOSE)?;
        let inner = &text[inner_start..inner_start + close];
        let name = inner.trim();
        if !name.is_empty() && !inner.contains(['{', '}']) {
            return Some(Token {
                start,
                end: inner_start + close + CLOSE.len(),
                name,
            });
        }
        from = start + 1;
    }
    None
}

/// Replace every `{{name}}` token in `text` with its value.
///
/// Missing names become empty strings. Substituted values are not scanned
/// again, so a value containing braces is inserted literally.
pub fn substitute(text: &str, values: &HashMap<String, String>) -> Substitution {
    let mut out = String::with_capacity(text.len());
    let mut unresolved = Vec::new();
    let mut cursor = 0;

    while let Some(token) = next_token(text, cursor) {
        out.push_str(&text[cursor..token.start]);
        match values.get(token.name) {
            Some(value) => out.push_str(value),
            None => {
                log::debug!("Unresolved placeholder {{{{{}}}}}", token.name);
                unresolved.push(token.name.to_string());
            }
        }
        cursor = token.end;
    }
    out.push_str(&text[cursor..]);

    Substitution { text: out, unresolved }
}

/// Field names referenced by `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut cursor = 0;
    while let Some(token) = next_token(text, cursor) {
        names.push(token.name);
        cursor = token.end;
    }
    names
}

pub fn has_placeholders(text: &str) -> bool {
    next_token(text, 0).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_simple_substitution() {
        let result = substitute("Hello {{name}}", &values(&[("name", "Sara")]));
        assert_eq!(result.text, "Hello Sara");
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_missing_field_becomes_empty() {
        let result = substitute("Hello {{name}}", &HashMap::new());
        assert_eq!(result.text, "Hello ");
        assert_eq!(result.unresolved, vec!["name".to_string()]);
    }

    #[test]
    fn test_multiple_and_repeated_tokens() {
        let v = values(&[("city", "Rome"), ("price", "499")]);
        let result = substitute("{{city}} from ${{price}} | {{city}}!", &v);
        assert_eq!(result.text, "Rome from $499 | Rome!");
    }

    #[test]
    fn test_whitespace_inside_token() {
        let result = substitute("{{ name }}", &values(&[("name", "Ana")]));
        assert_eq!(result.text, "Ana");
    }

    #[test]
    fn test_malformed_tokens_stay_verbatim() {
        let v = values(&[("name", "X")]);
        assert_eq!(substitute("Hi {{name", &v).text, "Hi {{name");
        assert_eq!(substitute("Hi {{}}", &v).text, "Hi {{}}");
        assert_eq!(substitute("{{a}b}}", &v).text, "{{a}b}}");
        assert_eq!(substitute("{{{name}}}", &v).text, "{X}");
        assert_eq!(substitute("name}}", &v).text, "name}}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let v = values(&[("a", "{{b}}"), ("b", "nope")]);
        assert_eq!(substitute("{{a}}", &v).text, "{{b}}");
    }

    #[test]
    fn test_placeholders_lists_names() {
        assert_eq!(placeholders("{{agencyName}} - {{ phone }} {{}}"), vec!["agencyName", "phone"]);
        assert!(has_placeholders("x {{y}}"));
        assert!(!has_placeholders("plain"));
    }
}
