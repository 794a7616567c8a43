//! Query-string decoding with bracket array/nested-key conventions.
//!
//! `a[]=1&a[]=2` becomes `a: ["1", "2"]`, `a[b]=1` becomes
//! `a: {"b": "1"}`, and plain repeated keys keep the last value. Pair
//! splitting and percent/plus decoding are delegated to
//! `form_urlencoded`; the bracket nesting is layered on top.

use serde_json::{Map, Value};

/// Parse a raw query string into a nested map.
pub fn parse_query(raw: &str) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        let (name, path) = split_key(&key);
        let slot = root.entry(name).or_insert(Value::Null);
        set_path(slot, &path, Value::String(value.into_owned()));
    }
    root
}

/// Split `a[b][]` into the root name `a` and the segment path
/// `["b", ""]`. A key without brackets has an empty path.
fn split_key(key: &str) -> (String, Vec<String>) {
    let Some(open) = key.find('[') else {
        return (key.to_string(), Vec::new());
    };

    let name = key[..open].to_string();
    let mut path = Vec::new();
    let mut rest = &key[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                path.push(stripped[..close].to_string());
                rest = &stripped[close + 1..];
            }
            None => {
                // Unterminated bracket: take the remainder as one segment.
                path.push(stripped.to_string());
                break;
            }
        }
    }
    (name, path)
}

/// Write `value` at `path` below `slot`, materializing arrays for empty
/// segments and objects for named ones. A scalar already present at an
/// intermediate position is replaced by the container the path needs.
fn set_path(slot: &mut Value, path: &[String], value: Value) {
    let Some((segment, rest)) = path.split_first() else {
        *slot = value;
        return;
    };

    if segment.is_empty() {
        if !matches!(slot, Value::Array(_)) {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            items.push(Value::Null);
            if let Some(last) = items.last_mut() {
                set_path(last, rest, value);
            }
        }
    } else {
        if !matches!(slot, Value::Object(_)) {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(fields) = slot {
            let child = fields.entry(segment.clone()).or_insert(Value::Null);
            set_path(child, rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(raw: &str) -> Value {
        Value::Object(parse_query(raw))
    }

    #[test]
    fn scalar_pairs() {
        assert_eq!(parsed("a=1&b=2"), json!({"a": "1", "b": "2"}));
    }

    #[test]
    fn bracket_array_and_plus_decoding() {
        assert_eq!(
            parsed("first=value&arr[]=foo+bar&arr[]=baz"),
            json!({"first": "value", "arr": ["foo bar", "baz"]}),
        );
    }

    #[test]
    fn nested_object_key() {
        assert_eq!(parsed("a[b]=1"), json!({"a": {"b": "1"}}));
    }

    #[test]
    fn deep_nesting() {
        assert_eq!(parsed("a[b][c]=x&a[b][d]=y"), json!({"a": {"b": {"c": "x", "d": "y"}}}));
    }

    #[test]
    fn repeated_scalar_keeps_last_value() {
        assert_eq!(parsed("a=1&a=2"), json!({"a": "2"}));
    }

    #[test]
    fn scalar_replaced_by_container_on_conflict() {
        assert_eq!(parsed("a=1&a[b]=2"), json!({"a": {"b": "2"}}));
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(parsed("q=%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82"), json!({"q": "привет"}));
    }

    #[test]
    fn empty_value() {
        assert_eq!(parsed("flag="), json!({"flag": ""}));
    }

    #[test]
    fn empty_query() {
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn value_with_bracket_chars_is_untouched() {
        assert_eq!(parsed("a=%5B1%5D"), json!({"a": "[1]"}));
    }
}
