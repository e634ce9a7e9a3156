//! The operation catalog: every operation the voice agent may call.
//!
//! The catalog is the single source of truth for two consumers. The planner
//! reads its exported form to decide what to call, and the validator reads
//! the in-process form to check what was called. Both are derived from the
//! same `OperationSpec` values below, so they cannot drift apart.

use std::sync::OnceLock;

use farmline_contracts::{
    call::{FarewellKind, FillerKind, ServiceKind},
    error::ValidationError,
    operation::{OperationName, OperationSpec, ParamSpec, ParameterSchema},
};

const AGENT_FILLER_DESCRIPTION: &str = "\
Use this function to provide natural conversational filler before looking up information. \
ALWAYS call this function first with message_type='lookup' when you're about to look up farmer information. \
After calling this function, you MUST immediately follow up with the appropriate lookup function (e.g., find_farmer).";

const FIND_FARMER_DESCRIPTION: &str = "\
Look up a farmer's account information. Use context clues to determine what type of identifier the user is providing.\n\
National ID formats:\n\
- Numbers only (e.g., '123432', '678906') → Format as 'N123432', 'N678906'\n\
- With prefix (e.g., 'N123432', 'N678906') → Keep as 'N123432', 'N678906'";

const CREATE_FARMER_DESCRIPTION: &str = "\
Register a new farmer. Use this function when:\n\
- A farmer's national ID is not found\n\
- A farmer asks to register\n\
Before registration:\n\
1. Verify the farmer account does not exist using find_farmer\n\
2. Confirm national ID and service type with the farmer before registering";

const END_CALL_DESCRIPTION: &str = "\
End the conversation and close the connection. Call this function when:\n\
- User says goodbye, thank you, etc.\n\
- User indicates they're done (\"that's all I need\", \"I'm all set\", etc.)\n\
- User wants to end the conversation\n\
Examples of triggers:\n\
- \"Thank you, bye!\"\n\
- \"That's all I needed, thanks\"\n\
- \"Have a good day\"\n\
- \"Goodbye\"\n\
- \"I'm done\"\n\
Do not call this function if the user is just saying thanks but continuing the conversation.";

/// An ordered, immutable set of operation specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    specs: Vec<OperationSpec>,
}

impl Catalog {
    /// The process-wide catalog for the farmer voice agent.
    ///
    /// Built on first use and shared read-only across sessions.
    pub fn standard() -> &'static Catalog {
        static STANDARD: OnceLock<Catalog> = OnceLock::new();
        STANDARD.get_or_init(Catalog::build_standard)
    }

    fn build_standard() -> Catalog {
        Catalog {
            specs: vec![
                OperationSpec {
                    name: OperationName::AgentFiller,
                    description: AGENT_FILLER_DESCRIPTION.to_string(),
                    parameters: ParameterSchema::new(vec![ParamSpec::enumeration(
                        "message_type",
                        "Type of filler message to use. Use 'lookup' when about to search for information.",
                        true,
                        FillerKind::WIRE_VALUES,
                    )]),
                    requires_preceding_filler: false,
                },
                OperationSpec {
                    name: OperationName::FindFarmer,
                    description: FIND_FARMER_DESCRIPTION.to_string(),
                    parameters: ParameterSchema::new(vec![ParamSpec::string(
                        "national_id",
                        "Farmer's National Id. Format as NXXXXXX where XXXXXX is the number padded to 6 digits. \
                         Example: if user says '123432', pass 'N123432'",
                        false,
                    )]),
                    requires_preceding_filler: true,
                },
                OperationSpec {
                    name: OperationName::CreateFarmer,
                    description: CREATE_FARMER_DESCRIPTION.to_string(),
                    parameters: ParameterSchema::new(vec![
                        ParamSpec::string(
                            "national_id",
                            "Farmer's National ID in NXXXXXX format. Must be obtained from find_farmer first.",
                            true,
                        ),
                        ParamSpec::string(
                            "name",
                            "The farmer's name as spoken. Example: 'abhishek' → 'abhishek'",
                            true,
                        ),
                        ParamSpec::string(
                            "state",
                            "A state of India. Example: 'Kerala' → 'Kerala'",
                            true,
                        ),
                        ParamSpec::string("crop", "A crop name. Example: 'Rubber' → 'Rubber'", true),
                        ParamSpec::integer(
                            "yield_qty",
                            "Yield as an integer number of tons. Example: '1000' → 1000",
                            true,
                        ),
                        ParamSpec::enumeration(
                            "service",
                            "Type of service requested. Must be one of: Register, Create",
                            true,
                            ServiceKind::WIRE_VALUES,
                        ),
                    ]),
                    requires_preceding_filler: false,
                },
                OperationSpec {
                    name: OperationName::EndCall,
                    description: END_CALL_DESCRIPTION.to_string(),
                    parameters: ParameterSchema::new(vec![ParamSpec::enumeration(
                        "farewell_type",
                        "Type of farewell to use in response",
                        true,
                        FarewellKind::WIRE_VALUES,
                    )]),
                    requires_preceding_filler: false,
                },
            ],
        }
    }

    /// Build a catalog from explicit specs. Used by tests and alternative agents.
    pub fn from_specs(specs: Vec<OperationSpec>) -> Catalog {
        Catalog { specs }
    }

    /// All specs, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The spec for `operation`, if this catalog declares it.
    pub fn get(&self, operation: OperationName) -> Option<&OperationSpec> {
        self.specs.iter().find(|s| s.name == operation)
    }

    /// Resolve a wire name to its spec.
    ///
    /// Fails with `UnknownOperation` both for names outside the closed
    /// operation set and for known operations this catalog omits.
    pub fn lookup(&self, name: &str) -> Result<&OperationSpec, ValidationError> {
        let operation = OperationName::parse(name)?;
        self.get(operation)
            .ok_or_else(|| ValidationError::UnknownOperation {
                name: name.to_string(),
            })
    }

    /// True when `operation` must be preceded by a lookup filler.
    pub fn requires_preceding_filler(&self, operation: OperationName) -> bool {
        self.get(operation)
            .map(|s| s.requires_preceding_filler)
            .unwrap_or(false)
    }
}
