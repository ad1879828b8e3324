//! Typed, defaulting accessors over a HAR JSON tree.
//!
//! Every accessor takes a value, a key path and a default. A missing key, a
//! non-object along the path, or a value of the wrong shape all resolve to the
//! default. None of these functions fail.

use serde_json::Value;

/// Walk `keys` from `value`, returning the node at the end of the path
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |node, key| node.get(*key))
}

/// Read a string field.
///
/// Numbers and booleans are rendered as text; objects, arrays and `null`
/// take the default.
pub fn field_str(value: &Value, keys: &[&str], default: &str) -> String {
    match lookup(value, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Read an integer field.
///
/// Floats are truncated toward zero and numeric strings are parsed.
pub fn field_i64(value: &Value, keys: &[&str], default: i64) -> i64 {
    match lookup(value, keys) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f as i64)
                })
                .unwrap_or(default)
        }
        _ => default,
    }
}

/// Read a floating-point field. Numeric strings are parsed; non-finite
/// values take the default.
pub fn field_f64(value: &Value, keys: &[&str], default: f64) -> f64 {
    let parsed = match lookup(value, keys) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(default)
}

/// Read a byte count.
///
/// Only JSON numbers are accepted. Negative values (`-1` is the HAR
/// convention for "unknown") clamp to zero.
pub fn field_non_negative_u64(value: &Value, keys: &[&str]) -> u64 {
    match lookup(value, keys) {
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u
            } else if n.as_i64().is_some() {
                // any i64 that is not a u64 is negative
                0
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
                    .unwrap_or(0)
            }
        }
        _ => 0,
    }
}

/// Read an array field; `None` when absent or not an array
pub fn field_array<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    lookup(value, keys)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let v = json!({"a": {"b": {"c": 1}}});
        assert_eq!(lookup(&v, &["a", "b", "c"]), Some(&json!(1)));
        assert_eq!(lookup(&v, &["a", "x", "c"]), None);
        assert_eq!(lookup(&v, &[]), Some(&v));
    }

    #[test]
    fn test_lookup_through_non_object() {
        let v = json!({"a": "text", "b": [1, 2]});
        assert_eq!(lookup(&v, &["a", "b"]), None);
        assert_eq!(lookup(&v, &["b", "0"]), None);
    }

    #[test]
    fn test_field_str() {
        let v = json!({"s": "GET", "n": 404, "b": true, "o": {}, "a": [], "z": null});
        assert_eq!(field_str(&v, &["s"], ""), "GET");
        assert_eq!(field_str(&v, &["n"], ""), "404");
        assert_eq!(field_str(&v, &["b"], ""), "true");
        assert_eq!(field_str(&v, &["o"], "d"), "d");
        assert_eq!(field_str(&v, &["a"], "d"), "d");
        assert_eq!(field_str(&v, &["z"], "d"), "d");
        assert_eq!(field_str(&v, &["missing"], ""), "");
    }

    #[test]
    fn test_field_i64() {
        let v = json!({
            "int": 404,
            "float": 503.9,
            "str": " 201 ",
            "fstr": "302.5",
            "bad": "abc",
            "obj": {"x": 1},
            "big": 18446744073709551615u64
        });
        assert_eq!(field_i64(&v, &["int"], 0), 404);
        assert_eq!(field_i64(&v, &["float"], 0), 503);
        assert_eq!(field_i64(&v, &["str"], 0), 201);
        assert_eq!(field_i64(&v, &["fstr"], 0), 302);
        assert_eq!(field_i64(&v, &["bad"], 0), 0);
        assert_eq!(field_i64(&v, &["obj"], 7), 7);
        assert_eq!(field_i64(&v, &["big"], 0), i64::MAX);
        assert_eq!(field_i64(&v, &["missing"], 0), 0);
    }

    #[test]
    fn test_field_f64() {
        let v = json!({"n": 12.5, "i": 3, "s": "1500.25", "nan": "NaN", "bad": "slow"});
        assert_eq!(field_f64(&v, &["n"], 0.0), 12.5);
        assert_eq!(field_f64(&v, &["i"], 0.0), 3.0);
        assert_eq!(field_f64(&v, &["s"], 0.0), 1500.25);
        assert_eq!(field_f64(&v, &["nan"], 0.0), 0.0);
        assert_eq!(field_f64(&v, &["bad"], 0.0), 0.0);
        assert_eq!(field_f64(&v, &["missing"], 0.0), 0.0);
    }

    #[test]
    fn test_field_non_negative_u64() {
        let v = json!({
            "pos": 2048,
            "neg": -1,
            "neg5": -5,
            "float": 10.9,
            "negfloat": -3.5,
            "str": "100",
            "null": null
        });
        assert_eq!(field_non_negative_u64(&v, &["pos"]), 2048);
        assert_eq!(field_non_negative_u64(&v, &["neg"]), 0);
        assert_eq!(field_non_negative_u64(&v, &["neg5"]), 0);
        assert_eq!(field_non_negative_u64(&v, &["float"]), 10);
        assert_eq!(field_non_negative_u64(&v, &["negfloat"]), 0);
        assert_eq!(field_non_negative_u64(&v, &["str"]), 0);
        assert_eq!(field_non_negative_u64(&v, &["null"]), 0);
        assert_eq!(field_non_negative_u64(&v, &["missing"]), 0);
    }

    #[test]
    fn test_field_array() {
        let v = json!({"h": [{"name": "a"}], "o": {"name": "a"}});
        assert_eq!(field_array(&v, &["h"]).map(<[Value]>::len), Some(1));
        assert!(field_array(&v, &["o"]).is_none());
        assert!(field_array(&v, &["missing"]).is_none());
    }
}
