//! Typed handler table.
//!
//! One match arm per `OperationCall` variant. Business outcomes become
//! payloads here; only collaborator faults come back as `Err`.

use serde_json::{json, Map, Value};

use farmline_contracts::{
    call::OperationCall,
    error::CollaboratorError,
    farmer::{FarmerLookup, RegistrationOutcome},
};

use crate::traits::{Announcer, CallContext, FarmerDirectory, Session};

/// Borrowed collaborators for one invocation.
pub(crate) struct Collaborators<'a> {
    pub session: &'a dyn Session,
    pub directory: &'a dyn FarmerDirectory,
    pub announcer: &'a dyn Announcer,
}

pub(crate) async fn invoke(
    call: &OperationCall,
    ctx: &CallContext,
    with: Collaborators<'_>,
) -> Result<Map<String, Value>, CollaboratorError> {
    let payload = match call {
        OperationCall::AgentFiller { message_type } => {
            with.announcer
                .prepare_filler(ctx, with.session, *message_type)
                .await?;
            json!({ "status": "filler_sent", "message_type": message_type })
        }

        OperationCall::FindFarmer { national_id: None } => json!({
            "found": false,
            "error": "national_id is required to look up a farmer",
        }),

        OperationCall::FindFarmer {
            national_id: Some(national_id),
        } => match with.directory.lookup(ctx, national_id).await? {
            FarmerLookup::Found(farmer) => json!({ "found": true, "farmer": farmer }),
            FarmerLookup::NotFound { national_id } => json!({
                "found": false,
                "national_id": national_id,
                "error": format!("no farmer is registered with national ID {national_id}"),
            }),
        },

        OperationCall::CreateFarmer(registration) => {
            match with.directory.register(ctx, registration).await? {
                RegistrationOutcome::Registered(farmer) => json!({
                    "registered": true,
                    "message": format!(
                        "{} from {} has been registered for {}",
                        farmer.name, farmer.state, farmer.service
                    ),
                    "farmer": farmer,
                }),
                RegistrationOutcome::AlreadyExists { national_id } => json!({
                    "registered": false,
                    "national_id": national_id,
                    "error": format!("a farmer with national ID {national_id} is already registered"),
                }),
            }
        }

        OperationCall::EndCall { farewell_type } => {
            with.announcer
                .prepare_farewell(ctx, with.session, *farewell_type)
                .await?;
            json!({ "status": "call_ended", "farewell_type": farewell_type })
        }
    };

    Ok(into_object(payload))
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
