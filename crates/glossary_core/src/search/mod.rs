//! Definition collection and substring search.
//!
//! # Responsibility
//! - Flatten a folder subtree into path-annotated definitions.
//! - Filter the flattened list by a case-insensitive query.

pub mod collect;

pub use collect::{
    collect, collect_definitions, search, CollectedDefinition, SearchScope, ROOT_PATH_LABEL,
};
