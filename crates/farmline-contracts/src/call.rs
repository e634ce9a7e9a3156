//! Call request and normalized parameter types.
//!
//! A `CallRequest` is what arrives from the voice-agent protocol: a name and
//! a loosely-typed JSON object. The validator turns it into `NormalizedParams`
//! and then into a typed `OperationCall`, which is all the router and the
//! handlers ever see.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ValidationError, operation::OperationName};

/// One incoming tool-call event. Consumed by a single dispatch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    /// Wire name of the requested operation.
    pub name: String,
    /// Raw parameter object as sent by the planner.
    #[serde(default)]
    pub parameters: Value,
}

impl CallRequest {
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// A parameter value after type checking and coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
}

/// Parameters that passed schema validation, keyed by name.
///
/// Only declared parameters appear here; anything the planner sent that the
/// schema does not mention is dropped during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedParams {
    values: BTreeMap<String, ParamValue>,
}

impl NormalizedParams {
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value of `name`, if present and integral.
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ParamValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    fn required_text(&self, name: &str) -> Result<String, ValidationError> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| ValidationError::MissingRequiredParameter {
                name: name.to_string(),
            })
    }

    fn required_integer(&self, name: &str) -> Result<i64, ValidationError> {
        self.integer(name)
            .ok_or_else(|| ValidationError::MissingRequiredParameter {
                name: name.to_string(),
            })
    }
}

/// Declares the wire spellings of a closed string enumeration.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Wire spellings, in declaration order.
            pub const WIRE_VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Resolve a wire spelling, reporting the allowed set on failure.
            pub fn parse(param: &str, value: &str) -> Result<Self, ValidationError> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ValidationError::InvalidEnumValue {
                        name: param.to_string(),
                        value: other.to_string(),
                        allowed: Self::WIRE_VALUES.iter().map(|v| v.to_string()).collect(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Why the agent is speaking a filler line.
    FillerKind { Lookup => "lookup", General => "general" }
}

wire_enum! {
    /// Which farewell the agent closes the call with.
    FarewellKind { Thanks => "thanks", General => "general", Help => "help" }
}

wire_enum! {
    /// The service a farmer registers for.
    ServiceKind { Register => "Register", Create => "Create" }
}

/// Typed parameters for `create_farmer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub national_id: String,
    pub name: String,
    pub state: String,
    pub crop: String,
    /// Yield in tons.
    pub yield_qty: i64,
    pub service: ServiceKind,
}

/// A validated call with typed parameters, one variant per operation.
///
/// The router matches exhaustively on this, so adding an operation means
/// adding a variant here and a handler arm there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum OperationCall {
    AgentFiller { message_type: FillerKind },
    FindFarmer { national_id: Option<String> },
    CreateFarmer(Registration),
    EndCall { farewell_type: FarewellKind },
}

impl OperationCall {
    /// Build the typed call for `operation` from schema-checked parameters.
    pub fn from_normalized(
        operation: OperationName,
        params: &NormalizedParams,
    ) -> Result<Self, ValidationError> {
        let call = match operation {
            OperationName::AgentFiller => OperationCall::AgentFiller {
                message_type: FillerKind::parse(
                    "message_type",
                    &params.required_text("message_type")?,
                )?,
            },
            OperationName::FindFarmer => OperationCall::FindFarmer {
                national_id: params.text("national_id").map(str::to_string),
            },
            OperationName::CreateFarmer => OperationCall::CreateFarmer(Registration {
                national_id: params.required_text("national_id")?,
                name: params.required_text("name")?,
                state: params.required_text("state")?,
                crop: params.required_text("crop")?,
                yield_qty: params.required_integer("yield_qty")?,
                service: ServiceKind::parse("service", &params.required_text("service")?)?,
            }),
            OperationName::EndCall => OperationCall::EndCall {
                farewell_type: FarewellKind::parse(
                    "farewell_type",
                    &params.required_text("farewell_type")?,
                )?,
            },
        };
        Ok(call)
    }

    pub fn operation(&self) -> OperationName {
        match self {
            OperationCall::AgentFiller { .. } => OperationName::AgentFiller,
            OperationCall::FindFarmer { .. } => OperationName::FindFarmer,
            OperationCall::CreateFarmer(_) => OperationName::CreateFarmer,
            OperationCall::EndCall { .. } => OperationName::EndCall,
        }
    }
}
