//! Operation catalog types.
//!
//! An `OperationSpec` is the declarative description of one callable
//! operation: its name, the intent text handed to the conversational planner,
//! and the parameter contract the validator enforces. Specs are built once at
//! process start and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The closed set of operations the voice agent may invoke.
///
/// Parsing a wire name that is not listed here yields
/// `ValidationError::UnknownOperation`, so the router never sees an
/// operation it cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationName {
    AgentFiller,
    FindFarmer,
    CreateFarmer,
    EndCall,
}

impl OperationName {
    /// Every operation, in catalog order.
    pub const ALL: [OperationName; 4] = [
        OperationName::AgentFiller,
        OperationName::FindFarmer,
        OperationName::CreateFarmer,
        OperationName::EndCall,
    ];

    /// The wire name used by the voice-agent protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationName::AgentFiller => "agent_filler",
            OperationName::FindFarmer => "find_farmer",
            OperationName::CreateFarmer => "create_farmer",
            OperationName::EndCall => "end_call",
        }
    }

    /// Resolve a wire name to an operation.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| ValidationError::UnknownOperation {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value type a parameter accepts.
///
/// `Enum` is a string restricted to `ParamSpec::allowed_values`; on the wire
/// it is exported as `"type": "string"` plus an `"enum"` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Enum,
}

impl ParamType {
    /// The JSON Schema `type` keyword this parameter exports as.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String | ParamType::Enum => "string",
            ParamType::Integer => "integer",
        }
    }
}

/// Contract for a single named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Format hints for the planner. Never machine-checked.
    pub description: String,
    pub param_type: ParamType,
    /// Required parameters have no default.
    pub required: bool,
    /// Non-empty only for `ParamType::Enum`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl ParamSpec {
    pub fn string(name: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type: ParamType::String,
            required,
            allowed_values: Vec::new(),
        }
    }

    pub fn integer(name: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type: ParamType::Integer,
            required,
            allowed_values: Vec::new(),
        }
    }

    pub fn enumeration(name: &str, description: &str, required: bool, allowed: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type: ParamType::Enum,
            required,
            allowed_values: allowed.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Ordered mapping from parameter name to its contract.
///
/// Declaration order is preserved on export so the planner sees parameters
/// in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub params: Vec<ParamSpec>,
}

impl ParameterSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    /// Look up a parameter contract by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Names of all required parameters, in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }
}

/// Immutable description of one callable operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: OperationName,
    /// Intent text handed verbatim to the planner.
    pub description: String,
    pub parameters: ParameterSchema,
    /// When true, an `agent_filler{lookup}` must precede each dispatch.
    pub requires_preceding_filler: bool,
}
