//! Flashcard drilling over a definition snapshot.
//!
//! # Responsibility
//! - Shuffle a fixed deck once and walk it without repeats.
//!
//! # Invariants
//! - The deck is a snapshot; later tree edits never affect a running session.
//! - A sequencer never re-shuffles; restarting means building a new one.

pub mod sequencer;

pub use sequencer::{FlashcardSequencer, FlashcardStep};
