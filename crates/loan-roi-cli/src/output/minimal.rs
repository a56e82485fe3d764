use serde_json::{Map, Value};

use super::scalar;

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 5] = [
    "final_monthly_payment",
    "max_loan",
    "bank_debt_ratio",
    "monthly_payment",
    "prompt",
];

/// Row labels used when the result is a list.
const LABEL_KEYS: [&str; 2] = ["name", "duration"];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => println!("{}", headline(map)),
        Value::Array(rows) => {
            for row in rows {
                match row {
                    Value::Object(map) => {
                        let label = LABEL_KEYS
                            .iter()
                            .find_map(|k| map.get(*k))
                            .map(scalar)
                            .unwrap_or_default();
                        println!("{}: {}", label, headline(map));
                    }
                    other => println!("{}", scalar(other)),
                }
            }
        }
        other => println!("{}", scalar(other)),
    }
}

fn headline(map: &Map<String, Value>) -> String {
    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return scalar(val);
        }
    }
    map.iter()
        .next()
        .map(|(key, val)| format!("{}: {}", key, scalar(val)))
        .unwrap_or_default()
}
