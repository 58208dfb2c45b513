//! One-shot MQTT command delivery to Cheeko toys.
//!
//! This crate opens a short-lived broker connection per dispatch, publishes a
//! single command envelope to the device-scoped topic, and resolves or fails
//! on the broker's acknowledgment. No retries, no queueing, no connection
//! reuse: a failed dispatch is the caller's soft failure, because the toy
//! picks the persisted settings up on its next reconnect.
//!
//! # Example
//!
//! ```no_run
//! use database::models::{Language, RoleType, Voice};
//! use device_link::{dispatch_device_update, BrokerConfig, PersonaUpdate};
//!
//! # async fn example() -> Result<(), device_link::DispatchError> {
//! let config = BrokerConfig::new("broker.example", 1883);
//! dispatch_device_update(
//!     &config,
//!     "SN-001",
//!     PersonaUpdate {
//!         role_type: RoleType::StoryTeller,
//!         language: Language::Spanish,
//!         voice: Voice::DeepVoice,
//!     },
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
mod session;

pub use config::BrokerConfig;
pub use envelope::{topic_for, CommandEnvelope, PersonaUpdate, ROLE_UPDATE_IDENTIFIER};
pub use error::{DispatchError, Result};

use std::time::Duration;

use rumqttc::AsyncClient;
use tracing::{info, warn};

use crate::session::MqttLink;

/// Session budget from call start. If no broker acknowledgment has arrived
/// by then, the dispatch fails with [`DispatchError::ConnectTimeout`].
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Deliver one persona update to one toy.
///
/// Opens a fresh connection scoped to this call, publishes the envelope at
/// QoS 1 on `user/cheekotoy/{serial}/thing/data/post`, and returns once the
/// broker acknowledges receipt. The connection is torn down in every outcome.
///
/// Resolution is exactly-once: late broker events after the first success,
/// error, or timeout are never surfaced.
pub async fn dispatch_device_update(
    config: &BrokerConfig,
    serial_number: &str,
    update: PersonaUpdate,
) -> Result<()> {
    let envelope = CommandEnvelope::role_update(update);
    let topic = topic_for(serial_number);
    let payload = serde_json::to_vec(&envelope)?;

    info!(
        serial = %serial_number,
        msg_id = %envelope.msg_id,
        "Dispatching persona update"
    );

    let (client, eventloop) = AsyncClient::new(config.mqtt_options(), 10);
    let mut link = MqttLink::new(client, eventloop);

    match session::run_session(&mut link, &topic, payload, DISPATCH_TIMEOUT).await {
        Ok(()) => {
            info!(serial = %serial_number, msg_id = %envelope.msg_id, "Dispatch acknowledged");
            Ok(())
        }
        Err(e) => {
            warn!(serial = %serial_number, error = %e, "Dispatch failed");
            Err(e)
        }
    }
}
