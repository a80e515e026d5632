//! Glossary domain model.
//!
//! # Responsibility
//! - Define the folder/definition tree shared by every core use-case.
//! - Provide the lossless document mapping for each entity.
//!
//! # Invariants
//! - A folder never holds subfolders and definitions at the same time.
//! - Folders own their children exclusively; there are no parent pointers.

pub mod definition;
pub mod folder;
