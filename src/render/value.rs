//! Pretty-printing of captured values.

use crate::capture::CapturedValue;

/// Rendered contents of containers are cut at this many characters.
const CONTAINER_REPR_LIMIT: usize = 150;
/// Everything else is cut at this many characters.
const SCALAR_REPR_LIMIT: usize = 200;

/// Renders one captured value for inclusion in a log record.
pub fn pretty(value: &CapturedValue) -> String {
    match value {
        CapturedValue::Null => "null".to_string(),
        CapturedValue::Collection { len: 0, .. } => "[] (empty)".to_string(),
        CapturedValue::Collection { len, repr } => {
            format!("[{len} items] {}", truncate(repr, CONTAINER_REPR_LIMIT))
        }
        CapturedValue::Map { len: 0, .. } => "{} (empty)".to_string(),
        CapturedValue::Map { len, repr } => {
            format!("{{{len} entries}} {}", truncate(repr, CONTAINER_REPR_LIMIT))
        }
        CapturedValue::Array { len: 0, .. } => "[] (empty array)".to_string(),
        CapturedValue::Array { len, repr } => {
            format!("[{len} items] {}", truncate(repr, CONTAINER_REPR_LIMIT))
        }
        CapturedValue::Other { repr } => truncate(repr, SCALAR_REPR_LIMIT),
        CapturedValue::Opaque { type_name, address } => {
            format!("{}@{address:x}", simple_type_name(type_name))
        }
    }
}

/// Returns `text` unchanged when it fits, otherwise its first `max_len - 3`
/// characters followed by `"..."`.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let head: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{head}...")
}

/// Strips module paths from a fully-qualified type name, including from its
/// generic arguments: `std::vec::Vec<app::model::User>` becomes `Vec<User>`.
pub fn simple_type_name(qualified: &str) -> String {
    match qualified.find('<') {
        None => last_segment(qualified).to_string(),
        Some(open) => {
            let base = last_segment(&qualified[..open]);
            let inner = qualified[open + 1..]
                .strip_suffix('>')
                .unwrap_or(&qualified[open + 1..]);
            let arguments: Vec<String> = split_generic_arguments(inner)
                .into_iter()
                .map(simple_type_name)
                .collect();
            format!("{base}<{}>", arguments.join(", "))
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path).trim()
}

/// Splits `a, b<c, d>, e` into `["a", "b<c, d>", "e"]`, respecting nesting.
fn split_generic_arguments(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in arguments.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(arguments[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = arguments[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::{pretty, simple_type_name, truncate};
    use crate::capture::CapturedValue;

    #[test]
    fn null_and_empty_shapes() {
        assert_eq!(pretty(&CapturedValue::Null), "null");
        assert_eq!(
            pretty(&CapturedValue::Collection {
                len: 0,
                repr: "[]".to_string()
            }),
            "[] (empty)"
        );
        assert_eq!(
            pretty(&CapturedValue::Map {
                len: 0,
                repr: "{}".to_string()
            }),
            "{} (empty)"
        );
        assert_eq!(
            pretty(&CapturedValue::Array {
                len: 0,
                repr: "[]".to_string()
            }),
            "[] (empty array)"
        );
    }

    #[test]
    fn containers_are_prefixed_with_their_size() {
        assert_eq!(
            pretty(&CapturedValue::Collection {
                len: 3,
                repr: "[1, 2, 3]".to_string()
            }),
            "[3 items] [1, 2, 3]"
        );
        assert_eq!(
            pretty(&CapturedValue::Map {
                len: 2,
                repr: "{\"a\": 1, \"b\": 2}".to_string()
            }),
            "{2 entries} {\"a\": 1, \"b\": 2}"
        );
        assert_eq!(
            pretty(&CapturedValue::Array {
                len: 4,
                repr: "[9, 9, 9, 9]".to_string()
            }),
            "[4 items] [9, 9, 9, 9]"
        );
    }

    #[test]
    fn long_container_contents_are_cut_at_150() {
        let repr = "x".repeat(400);
        let rendered = pretty(&CapturedValue::Collection {
            len: 400,
            repr,
        });
        // "[400 items] " + 147 chars + "..."
        assert_eq!(rendered.len(), 12 + 150);
        assert!(rendered.ends_with("..."));
    }

    #[test]
    fn long_scalars_are_cut_at_200() {
        let rendered = pretty(&CapturedValue::other("y".repeat(500)));
        assert_eq!(rendered.chars().count(), 200);
        assert!(rendered.ends_with("..."));
    }

    #[test]
    fn opaque_prints_type_at_address() {
        let value = 7_u64;
        let rendered = pretty(&CapturedValue::opaque(&value));
        assert!(rendered.starts_with("u64@"));
    }

    #[test]
    fn truncate_boundaries() {
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcd", 3), "...");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }

    #[test]
    fn simple_type_names() {
        assert_eq!(simple_type_name("i64"), "i64");
        assert_eq!(simple_type_name("app::model::User"), "User");
        assert_eq!(
            simple_type_name("alloc::vec::Vec<app::model::User>"),
            "Vec<User>"
        );
        assert_eq!(
            simple_type_name(
                "std::collections::HashMap<alloc::string::String, alloc::vec::Vec<u8>>"
            ),
            "HashMap<String, Vec<u8>>"
        );
    }
}
