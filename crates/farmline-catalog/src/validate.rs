//! Parameter validation against the catalog.
//!
//! The validator checks presence, type, and enum membership only. Format
//! hints in parameter descriptions (such as the `N`-prefixed national ID)
//! are guidance for the planner and are not re-checked here.
//!
//! Coercion policy:
//! - integer fields accept JSON integers, integral floats, and numeric strings;
//! - string and enum fields accept JSON strings only, passed through unchanged;
//! - a JSON `null` counts as absent;
//! - undeclared parameters are dropped.

use serde_json::Value;
use tracing::debug;

use farmline_contracts::{
    call::{NormalizedParams, OperationCall, ParamValue},
    error::ValidationError,
    operation::{OperationName, ParamSpec, ParamType},
};

use crate::catalog::Catalog;

/// Pure validator over a catalog. Holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c Catalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Check `raw` against the schema of `name` and build the typed call.
    pub fn validate(&self, name: &str, raw: &Value) -> Result<OperationCall, ValidationError> {
        let (operation, params) = self.normalize(name, raw)?;
        OperationCall::from_normalized(operation, &params)
    }

    /// Check `raw` against the schema of `name` without building the typed call.
    ///
    /// Parameters are checked in declaration order; the first failure wins.
    pub fn normalize(
        &self,
        name: &str,
        raw: &Value,
    ) -> Result<(OperationName, NormalizedParams), ValidationError> {
        let spec = self.catalog.lookup(name)?;

        let empty = serde_json::Map::new();
        let supplied = raw.as_object().unwrap_or(&empty);

        for key in supplied.keys() {
            if spec.parameters.get(key).is_none() {
                debug!(operation = %name, parameter = %key, "dropping undeclared parameter");
            }
        }

        let mut params = NormalizedParams::default();
        for param in &spec.parameters.params {
            match supplied.get(&param.name) {
                None | Some(Value::Null) => {
                    if param.required {
                        return Err(ValidationError::MissingRequiredParameter {
                            name: param.name.clone(),
                        });
                    }
                }
                Some(value) => {
                    params.insert(param.name.clone(), coerce(param, value)?);
                }
            }
        }

        Ok((spec.name, params))
    }
}

fn coerce(param: &ParamSpec, value: &Value) -> Result<ParamValue, ValidationError> {
    match param.param_type {
        ParamType::String => value
            .as_str()
            .map(|s| ParamValue::Text(s.to_string()))
            .ok_or_else(|| type_error(param)),

        ParamType::Integer => coerce_integer(value)
            .map(ParamValue::Integer)
            .ok_or_else(|| type_error(param)),

        ParamType::Enum => {
            let text = value.as_str().ok_or_else(|| type_error(param))?;
            if param.allowed_values.iter().any(|allowed| allowed == text) {
                Ok(ParamValue::Text(text.to_string()))
            } else {
                Err(ValidationError::InvalidEnumValue {
                    name: param.name.clone(),
                    value: text.to_string(),
                    allowed: param.allowed_values.clone(),
                })
            }
        }
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn type_error(param: &ParamSpec) -> ValidationError {
    ValidationError::InvalidParameterType {
        name: param.name.clone(),
        expected: param.param_type.json_type().to_string(),
    }
}
