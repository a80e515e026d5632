//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate navigation, mutation, persistence and import over one tree.
//! - Keep UI/CLI layers decoupled from model and storage details.

mod error;
mod session;
mod transfer;

pub use error::{SessionError, SessionResult};
pub use session::{GlossarySession, Inconsistency, Resolution};
pub use transfer::ImportSummary;
