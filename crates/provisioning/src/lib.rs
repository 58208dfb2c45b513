//! Device claim and intake logic for the Cheeko toy console.
//!
//! This crate owns the business rules between the web surface and the
//! database: validating a serial number against the administrator-managed
//! allowlist, binding a toy to its owner (create-or-claim, last writer
//! wins), decoding QR intake payloads, and deriving a toy's online status
//! from its last check-in.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//! use provisioning::{provision_device, ProvisionOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:cheeko.db?mode=rwc").await?;
//!
//! match provision_device(db.pool(), "user-1", "SN-001", "abc123").await? {
//!     ProvisionOutcome::Created(toy) => println!("claimed {}", toy.name),
//!     ProvisionOutcome::Transferred(toy) => println!("transferred {}", toy.name),
//! }
//! # Ok(())
//! # }
//! ```

pub mod claim;
pub mod error;
pub mod scan;
pub mod status;

pub use claim::{provision_device, ProvisionOutcome};
pub use error::{ProvisionError, Result};
pub use scan::{parse_scan_payload, ScanPayload};
pub use status::{is_online, ONLINE_WINDOW_MINUTES};
