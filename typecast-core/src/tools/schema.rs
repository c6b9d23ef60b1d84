use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{json, Value};

/// Input schema for a tool's parameter struct, with every subschema inlined
/// so clients that ignore `$ref` still see enums and ranges.
pub fn input_schema_for<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.option_add_null_type = false;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| json!({"type": "object"}));
    if let Some(map) = schema.as_object_mut() {
        map.remove("$schema");
        map.remove("title");
        map.remove("definitions");
        map.entry("properties").or_insert_with(|| json!({}));
    }
    schema
}
