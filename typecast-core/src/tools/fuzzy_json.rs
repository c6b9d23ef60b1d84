use serde_json::{Map, Number, Value};

/// Coerces a JSON value toward the expected schema. LLM clients often send
/// numbers and booleans as strings; those are converted when they parse
/// cleanly and everything else is passed through for serde to judge.
pub fn coerce_to_schema(value: &Value, schema: &Value) -> Value {
    match schema_type(schema) {
        Some("object") | None => coerce_object(value, schema),
        Some("string") => coerce_string(value),
        Some(kind @ ("integer" | "number")) => coerce_number(value, kind),
        Some("boolean") => coerce_boolean(value),
        Some(_) => value.clone(),
    }
}

/// The declared type, taking the first non-null entry of a type list.
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(kind) => Some(kind.as_str()),
        Value::Array(kinds) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null"),
        _ => None,
    }
}

fn coerce_object(value: &Value, schema: &Value) -> Value {
    let (Value::Object(map), Some(properties)) = (
        value,
        schema.get("properties").and_then(Value::as_object),
    ) else {
        return value.clone();
    };

    // An explicit null for a declared property means "not given", so the
    // field's serde default applies.
    let coerced: Map<String, Value> = map
        .iter()
        .filter_map(|(key, val)| {
            let val = match properties.get(key) {
                Some(_) if val.is_null() => return None,
                Some(prop_schema) => coerce_to_schema(val, prop_schema),
                None => val.clone(),
            };
            Some((key.clone(), val))
        })
        .collect();
    Value::Object(coerced)
}

fn coerce_string(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        _ => value.clone(),
    }
}

fn coerce_number(value: &Value, kind: &str) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };
    let trimmed = s.trim();
    if kind == "integer" {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| value.clone())
}

fn coerce_boolean(value: &Value) -> Value {
    match value {
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Value::Bool(true),
            "false" | "0" | "no" => Value::Bool(false),
            _ => value.clone(),
        },
        Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Bool(i != 0),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_string_to_integer() {
        let result = coerce_to_schema(&json!("120"), &json!({"type": "integer"}));
        assert_eq!(result, json!(120));
    }

    #[test]
    fn test_coerce_string_to_number() {
        let result = coerce_to_schema(&json!(" 1.5 "), &json!({"type": "number"}));
        assert_eq!(result, json!(1.5));
    }

    #[test]
    fn test_coerce_string_to_boolean() {
        assert_eq!(
            coerce_to_schema(&json!("yes"), &json!({"type": "boolean"})),
            json!(true)
        );
        assert_eq!(
            coerce_to_schema(&json!(0), &json!({"type": "boolean"})),
            json!(false)
        );
    }

    #[test]
    fn test_nullable_type_list_uses_non_null_entry() {
        let schema = json!({"type": ["null", "number"]});
        assert_eq!(coerce_to_schema(&json!("2"), &schema), json!(2.0));
    }

    #[test]
    fn test_coerce_tool_arguments() {
        let value = json!({
            "voice_id": "tc_1",
            "volume": "150",
            "audio_tempo": "1.25",
            "return_audio": "false",
            "extra": "kept"
        });
        let schema = json!({
            "type": "object",
            "properties": {
                "voice_id": {"type": "string"},
                "volume": {"type": "integer"},
                "audio_tempo": {"type": "number"},
                "return_audio": {"type": "boolean"}
            }
        });
        assert_eq!(
            coerce_to_schema(&value, &schema),
            json!({
                "voice_id": "tc_1",
                "volume": 150,
                "audio_tempo": 1.25,
                "return_audio": false,
                "extra": "kept"
            })
        );
    }

    #[test]
    fn test_null_properties_are_dropped() {
        let schema = json!({
            "type": "object",
            "properties": {
                "voice_id": {"type": "string"},
                "volume": {"type": "integer"},
                "return_audio": {"type": "boolean"}
            }
        });
        let value = json!({
            "voice_id": "tc_1",
            "volume": null,
            "return_audio": null,
            "extra": null
        });
        assert_eq!(
            coerce_to_schema(&value, &schema),
            json!({"voice_id": "tc_1", "extra": null})
        );
    }

    #[test]
    fn test_unparseable_values_pass_through() {
        assert_eq!(
            coerce_to_schema(&json!("loud"), &json!({"type": "integer"})),
            json!("loud")
        );
        assert_eq!(
            coerce_to_schema(&json!("maybe"), &json!({"type": "boolean"})),
            json!("maybe")
        );
    }

    #[test]
    fn test_numeric_voice_id_becomes_string() {
        let schema = json!({"type": "object", "properties": {"voice_id": {"type": "string"}}});
        assert_eq!(
            coerce_to_schema(&json!({"voice_id": 42}), &schema),
            json!({"voice_id": "42"})
        );
    }
}
