// Lenient JSON field readers
// Upstream services disagree on whether counts are numbers or strings,
// so every reader parses what it can and defaults the rest

use std::collections::HashMap;

use serde_json::Value;

/// Read a non-negative integer that may arrive as a number or a numeric
/// string. Negative and non-numeric values yield None.
pub fn num_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<u64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// Read a float that may arrive as a number or a numeric string
pub fn num_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer field of an object, defaulting to 0
pub fn field_u64(obj: &Value, key: &str) -> u64 {
    obj.get(key).and_then(num_u64).unwrap_or(0)
}

/// Integer field of an object, absent or malformed becomes None
pub fn opt_field_u64(obj: &Value, key: &str) -> Option<u64> {
    obj.get(key).and_then(num_u64)
}

/// String field of an object; numbers are stringified, anything else
/// becomes the empty string
pub fn field_str(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// String field of an object, empty or missing becomes None
pub fn opt_field_str(obj: &Value, key: &str) -> Option<String> {
    let value = field_str(obj, key);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Boolean field of an object, defaulting to false
pub fn field_bool(obj: &Value, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Map-of-counts field like topicWiseSolved; malformed counts become 0
/// but keep their key
pub fn field_count_map(obj: &Value, key: &str) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    if let Some(Value::Object(map)) = obj.get(key) {
        for (name, raw) in map {
            counts.insert(name.clone(), num_u64(raw).unwrap_or(0));
        }
    }
    counts
}

/// List-of-strings field; accepts an array or a comma-separated string
pub fn field_str_list(obj: &Value, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_num_u64_accepts_numbers_and_strings() {
        assert_eq!(num_u64(&json!(42)), Some(42));
        assert_eq!(num_u64(&json!("42")), Some(42));
        assert_eq!(num_u64(&json!(" 42 ")), Some(42));
        assert_eq!(num_u64(&json!(42.9)), Some(42));
    }

    #[test]
    fn test_num_u64_rejects_garbage() {
        assert_eq!(num_u64(&json!(-3)), None);
        assert_eq!(num_u64(&json!("-3")), None);
        assert_eq!(num_u64(&json!("abc")), None);
        assert_eq!(num_u64(&json!(null)), None);
        assert_eq!(num_u64(&json!([1])), None);
    }

    #[test]
    fn test_field_u64_defaults_to_zero() {
        let obj = json!({ "a": 5, "b": "oops" });
        assert_eq!(field_u64(&obj, "a"), 5);
        assert_eq!(field_u64(&obj, "b"), 0);
        assert_eq!(field_u64(&obj, "missing"), 0);
    }

    #[test]
    fn test_opt_field_u64_distinguishes_absence() {
        let obj = json!({ "ranking": 1200 });
        assert_eq!(opt_field_u64(&obj, "ranking"), Some(1200));
        assert_eq!(opt_field_u64(&obj, "missing"), None);
    }

    #[test]
    fn test_field_str_stringifies_numbers() {
        let obj = json!({ "answer": 2, "name": "two" });
        assert_eq!(field_str(&obj, "answer"), "2");
        assert_eq!(field_str(&obj, "name"), "two");
        assert_eq!(field_str(&obj, "missing"), "");
    }

    #[test]
    fn test_opt_field_str_drops_empty() {
        let obj = json!({ "a": "", "b": "x" });
        assert_eq!(opt_field_str(&obj, "a"), None);
        assert_eq!(opt_field_str(&obj, "b"), Some("x".to_string()));
    }

    #[test]
    fn test_field_count_map_keeps_keys_with_bad_counts() {
        let obj = json!({ "topicWiseSolved": { "arrays": 10, "graphs": "7", "dp": null } });
        let map = field_count_map(&obj, "topicWiseSolved");
        assert_eq!(map.get("arrays"), Some(&10));
        assert_eq!(map.get("graphs"), Some(&7));
        assert_eq!(map.get("dp"), Some(&0));
    }

    #[test]
    fn test_field_count_map_non_object_is_empty() {
        let obj = json!({ "topicWiseSolved": [1, 2] });
        assert!(field_count_map(&obj, "topicWiseSolved").is_empty());
    }

    #[test]
    fn test_field_str_list_accepts_both_shapes() {
        let obj = json!({ "a": ["x", " ", "y"], "b": "x, y , " });
        assert_eq!(field_str_list(&obj, "a"), vec!["x", "y"]);
        assert_eq!(field_str_list(&obj, "b"), vec!["x", "y"]);
        assert!(field_str_list(&obj, "missing").is_empty());
    }
}
