//! Database models.
//!
//! Persona values are stored and transmitted as the spaced display strings
//! the existing toy fleet expects (e.g. "Puzzle Solver"), hence the
//! per-variant renames on both the sqlx and serde sides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// What the toy acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum RoleType {
    #[serde(rename = "Puzzle Solver")]
    #[sqlx(rename = "Puzzle Solver")]
    PuzzleSolver,
    #[serde(rename = "Story Teller")]
    #[sqlx(rename = "Story Teller")]
    StoryTeller,
    #[serde(rename = "Math Tutor")]
    #[sqlx(rename = "Math Tutor")]
    MathTutor,
}

impl Default for RoleType {
    fn default() -> Self {
        RoleType::PuzzleSolver
    }
}

/// Language the toy speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Language {
    English,
    Spanish,
    French,
    Hindi,
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

/// Voice the toy speaks with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Voice {
    #[serde(rename = "Sparkles for Kids")]
    #[sqlx(rename = "Sparkles for Kids")]
    SparklesForKids,
    #[serde(rename = "Deep Voice")]
    #[sqlx(rename = "Deep Voice")]
    DeepVoice,
    #[serde(rename = "Soft Calm Voice")]
    #[sqlx(rename = "Soft Calm Voice")]
    SoftCalmVoice,
}

impl Default for Voice {
    fn default() -> Self {
        Voice::SparklesForKids
    }
}

/// An allowlist entry permitting a serial number to be claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AllowlistEntry {
    /// Physical unit serial number (unique key).
    pub serial_number: String,
    /// Broker credential for the device itself. Never read by the console.
    pub password_hash: String,
    /// Inactive entries cannot be claimed.
    pub is_active: bool,
    /// When the administrator added the entry.
    pub created_at: DateTime<Utc>,
}

/// A claimed toy bound to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Toy {
    /// Opaque unique identifier (UUID v4).
    pub id: String,
    /// Owning account. Exactly one owner at a time.
    pub owner_id: String,
    /// Must match an active allowlist entry at claim time.
    pub serial_number: String,
    /// Display name.
    pub name: String,
    pub role_type: RoleType,
    pub language: Language,
    pub voice: Voice,
    /// Persisted as given at intake (minimum length 6).
    pub activation_key: String,
    /// Updated by the device itself out-of-band; None until first contact.
    pub last_online: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
