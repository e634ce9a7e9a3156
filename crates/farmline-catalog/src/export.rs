//! Protocol export of the catalog, and the inverse parse.
//!
//! The exported shape is what the voice-agent protocol expects for function
//! definitions:
//!
//! ```json
//! {
//!   "name": "end_call",
//!   "description": "...",
//!   "parameters": {
//!     "type": "object",
//!     "properties": { "farewell_type": { "type": "string", "description": "...", "enum": [...] } },
//!     "required": ["farewell_type"]
//!   }
//! }
//! ```
//!
//! `required` is omitted when an operation has no required parameters.

use serde_json::{json, Map, Value};

use farmline_contracts::{
    error::{FarmlineError, FarmlineResult},
    operation::{OperationName, OperationSpec, ParamSpec, ParamType, ParameterSchema},
};

use crate::catalog::Catalog;

/// Export a single operation in protocol form.
pub fn export_operation(spec: &OperationSpec) -> Value {
    json!({
        "name": spec.name.as_str(),
        "description": spec.description,
        "parameters": export_parameters(&spec.parameters),
    })
}

/// Export a parameter schema as a JSON Schema `object` document.
pub fn export_parameters(schema: &ParameterSchema) -> Value {
    let mut properties = Map::new();
    for param in &schema.params {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(param.param_type.json_type()));
        property.insert("description".to_string(), json!(param.description));
        if param.param_type == ParamType::Enum {
            property.insert("enum".to_string(), json!(param.allowed_values));
        }
        properties.insert(param.name.clone(), Value::Object(property));
    }

    let mut parameters = Map::new();
    parameters.insert("type".to_string(), json!("object"));
    parameters.insert("properties".to_string(), Value::Object(properties));

    let required: Vec<&str> = schema.required_names().collect();
    if !required.is_empty() {
        parameters.insert("required".to_string(), json!(required));
    }

    Value::Object(parameters)
}

impl Catalog {
    /// The ordered list of function definitions handed to the planner.
    pub fn export(&self) -> Vec<Value> {
        self.iter().map(export_operation).collect()
    }
}

/// Parse one exported function definition back into its name and schema.
///
/// Returns `FarmlineError::Catalog` when the entry does not have the
/// protocol shape or names an operation outside the closed set.
pub fn parse_operation(entry: &Value) -> FarmlineResult<(OperationName, ParameterSchema)> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| catalog_error("function definition has no string 'name'"))?;
    let operation = OperationName::parse(name).map_err(|e| catalog_error(&e.to_string()))?;

    let parameters = entry
        .get("parameters")
        .ok_or_else(|| catalog_error(&format!("'{name}' has no 'parameters' object")))?;

    Ok((operation, parse_parameters(parameters)?))
}

/// Parse a JSON Schema `object` document back into a `ParameterSchema`.
pub fn parse_parameters(parameters: &Value) -> FarmlineResult<ParameterSchema> {
    if parameters.get("type").and_then(Value::as_str) != Some("object") {
        return Err(catalog_error("parameters must declare \"type\": \"object\""));
    }

    let required: Vec<&str> = match parameters.get("required") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| catalog_error("'required' entries must be strings"))
            })
            .collect::<FarmlineResult<_>>()?,
        Some(_) => return Err(catalog_error("'required' must be an array")),
    };

    let properties = parameters
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| catalog_error("parameters must have a 'properties' object"))?;

    let mut params = Vec::with_capacity(properties.len());
    for (name, property) in properties {
        params.push(parse_property(name, property, required.contains(&name.as_str()))?);
    }

    for name in &required {
        if !properties.contains_key(*name) {
            return Err(catalog_error(&format!(
                "required parameter '{name}' has no property definition"
            )));
        }
    }

    Ok(ParameterSchema::new(params))
}

fn parse_property(name: &str, property: &Value, required: bool) -> FarmlineResult<ParamSpec> {
    let json_type = property
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| catalog_error(&format!("property '{name}' has no string 'type'")))?;
    let description = property
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let allowed_values: Vec<String> = match property.get("enum") {
        None => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    catalog_error(&format!("enum values of '{name}' must be strings"))
                })
            })
            .collect::<FarmlineResult<_>>()?,
        Some(_) => return Err(catalog_error(&format!("'enum' of '{name}' must be an array"))),
    };

    let param_type = match (json_type, allowed_values.is_empty()) {
        ("string", true) => ParamType::String,
        ("string", false) => ParamType::Enum,
        ("integer", true) => ParamType::Integer,
        (other, _) => {
            return Err(catalog_error(&format!(
                "property '{name}' has unsupported type '{other}'"
            )))
        }
    };

    Ok(ParamSpec {
        name: name.to_string(),
        description,
        param_type,
        required,
        allowed_values,
    })
}

fn catalog_error(reason: &str) -> FarmlineError {
    FarmlineError::Catalog {
        reason: reason.to_string(),
    }
}
