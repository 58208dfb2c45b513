//! Command envelope wire shape and topic addressing.
//!
//! Both the envelope JSON and the topic scheme are load-bearing: the deployed
//! toy fleet parses exactly these keys and subscribes to exactly these topics.
//! Do not change them without a firmware rollout.

use database::models::{Language, RoleType, Voice};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command tag for a persona update.
pub const ROLE_UPDATE_IDENTIFIER: &str = "updaterole";

const TOPIC_PREFIX: &str = "user/cheekotoy/";
const TOPIC_SUFFIX: &str = "/thing/data/post";

/// Derive the device-scoped topic for a serial number.
pub fn topic_for(serial_number: &str) -> String {
    format!("{TOPIC_PREFIX}{serial_number}{TOPIC_SUFFIX}")
}

/// The three mutable persona fields pushed to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaUpdate {
    pub role_type: RoleType,
    pub language: Language,
    pub voice: Voice,
}

/// The wire message sent to a device. Constructed and transmitted once,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    /// Fresh unique identifier per send.
    pub msg_id: String,
    /// Fixed command tag.
    pub identifier: String,
    /// Persona fields.
    pub out_params: PersonaUpdate,
}

impl CommandEnvelope {
    /// Build a role-update envelope with a fresh message id.
    pub fn role_update(update: PersonaUpdate) -> Self {
        Self {
            msg_id: Uuid::new_v4().to_string(),
            identifier: ROLE_UPDATE_IDENTIFIER.to_string(),
            out_params: update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_topic_scheme_matches_fleet() {
        assert_eq!(
            topic_for("TOY-123"),
            "user/cheekotoy/TOY-123/thing/data/post"
        );
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = CommandEnvelope::role_update(PersonaUpdate {
            role_type: RoleType::StoryTeller,
            language: Language::Spanish,
            voice: Voice::DeepVoice,
        });

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "msgId": envelope.msg_id,
                "identifier": "updaterole",
                "outParams": {
                    "roleType": "Story Teller",
                    "language": "Spanish",
                    "voice": "Deep Voice",
                }
            })
        );
    }

    #[test]
    fn test_msg_id_fresh_per_envelope() {
        let update = PersonaUpdate {
            role_type: RoleType::PuzzleSolver,
            language: Language::English,
            voice: Voice::SparklesForKids,
        };
        let a = CommandEnvelope::role_update(update);
        let b = CommandEnvelope::role_update(update);
        assert_ne!(a.msg_id, b.msg_id);
    }
}
