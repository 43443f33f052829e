use schemars::Schema;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const DEFINITION_KEYS: [&str; 2] = ["$defs", "definitions"];

pub struct Field {
    pub name: String,
    pub data_type: String,
}

impl Field {
    pub fn new(name: String, data_type: String) -> Self {
        Self { name, data_type }
    }
}

/// A named record or string enum taken from a schema.
pub struct Type {
    pub name: String,
    pub fields: Vec<Field>,
    pub variants: Vec<String>,
}

pub struct SchemaInfo {
    pub root_type: Type,
    pub definitions: BTreeMap<String, Type>,
}

pub fn get_schema(schema: &Schema) -> Option<SchemaInfo> {
    let root = schema.as_object()?;
    let root_name = root.get("title").and_then(Value::as_str)?;
    let root_type = process_schema(root_name, root)?;

    let mut definitions = BTreeMap::new();
    for key in DEFINITION_KEYS {
        let Some(defs) = root.get(key).and_then(Value::as_object) else {
            continue;
        };
        for (name, def) in defs {
            if let Some(info) = def.as_object().and_then(|obj| process_schema(name, obj)) {
                definitions.insert(name.clone(), info);
            }
        }
    }
    Some(SchemaInfo {
        root_type,
        definitions,
    })
}

/// Renders one line per record: the root types first, then every referenced
/// definition once.
pub fn write_schema_summary(schema_list: Vec<SchemaInfo>) -> String {
    let mut summary = String::from("Seed records:\n");
    let mut all_defs: BTreeMap<String, Type> = BTreeMap::new();
    for mut s in schema_list {
        summary += &to_type_expression(&s.root_type);
        all_defs.append(&mut s.definitions);
    }
    summary += "Referenced types:\n";
    for def in all_defs.values() {
        summary += &to_type_expression(def);
    }
    summary
}

fn to_type_expression(ty: &Type) -> String {
    if !ty.variants.is_empty() {
        return format!("  {}: one of ({})\n", ty.name, ty.variants.join(", "));
    }
    let fields = ty
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.name, f.data_type))
        .collect::<Vec<String>>()
        .join(", ");
    let noun = if ty.fields.len() == 1 {
        "field"
    } else {
        "fields"
    };
    format!("  {}: {} {noun} ({fields})\n", ty.name, ty.fields.len())
}

fn process_schema(type_name: &str, obj: &Map<String, Value>) -> Option<Type> {
    if let Some(variants) = obj.get("enum").and_then(Value::as_array) {
        return Some(Type {
            name: type_name.to_string(),
            fields: Vec::new(),
            variants: variants
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        });
    }
    let properties = obj.get("properties").and_then(Value::as_object)?;
    let fields = properties
        .iter()
        .map(|(name, schema)| Field::new(name.clone(), get_type_name(schema)))
        .collect();
    Some(Type {
        name: type_name.to_string(),
        fields,
        variants: Vec::new(),
    })
}

fn short_ref(reference: &str) -> String {
    reference.rsplit('/').next().unwrap_or(reference).to_string()
}

fn primitive_name(ty: &str, obj: &Map<String, Value>) -> String {
    match ty {
        "string" => "STRING".to_string(),
        "number" => "FLOAT".to_string(),
        "integer" => "INTEGER".to_string(),
        "boolean" => "BOOLEAN".to_string(),
        "object" => "MAP".to_string(),
        "null" => "NULL".to_string(),
        "array" => {
            let item = obj.get("items").map(get_type_name).unwrap_or_else(|| "ANY".to_string());
            format!("[{item}]")
        }
        _ => "ANY".to_string(),
    }
}

fn get_type_name(schema: &Value) -> String {
    let obj = match schema {
        Value::Object(obj) => obj,
        Value::Bool(true) => return "ANY".to_string(),
        _ => return "NEVER".to_string(),
    };

    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        return short_ref(reference);
    }

    match obj.get("type") {
        Some(Value::String(ty)) => return primitive_name(ty, obj),
        // Option<T> shows up as ["T", "null"].
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            let concrete: Vec<&str> = names.iter().copied().filter(|t| *t != "null").collect();
            return match concrete.as_slice() {
                [single] => format!("{}?", primitive_name(single, obj)),
                _ => "ANY".to_string(),
            };
        }
        _ => {}
    }

    for key in ["anyOf", "oneOf", "allOf"] {
        if let Some(options) = obj.get(key).and_then(Value::as_array) {
            let nullable = options
                .iter()
                .any(|o| o.get("type").and_then(Value::as_str) == Some("null"));
            let concrete: Vec<String> = options
                .iter()
                .filter(|o| o.get("type").and_then(Value::as_str) != Some("null"))
                .map(get_type_name)
                .collect();
            let name = match concrete.as_slice() {
                [single] => single.clone(),
                _ => "ANY".to_string(),
            };
            return if nullable { format!("{name}?") } else { name };
        }
    }
    "ANY".to_string()
}
