//! Reaction service seam and record cache.
//!
//! The language-model transport lives outside this crate; it plugs in
//! through [`ReactionService`], which turns a prompt into raw model text.
//! [`ReactionClient`] owns a service and a [`ReactionCache`] and implements
//! the cache-first lookup: records are keyed by [`reaction_id`] of the
//! prompt, validated before they are stored, and never refetched once
//! cached.

mod cache;
mod client;
mod prompt;

use std::fmt;

pub use cache::{FileReactionCache, MemoryReactionCache, ReactionCache};
pub use client::{FetchedReaction, OfflineService, ReactionClient, ReactionService};
pub use prompt::{compose_prompt, extract_json};

pub use crate::util::hash::reaction_id;
use crate::model::ModelError;

/// Failures of the reaction service or the cache.
#[derive(Debug)]
pub enum ServiceError {
    /// The prompt was empty after trimming.
    EmptyPrompt,
    /// No service is configured and the record is not cached.
    Unavailable {
        /// Cache key that missed.
        reaction_id: String,
    },
    /// The service reported a failure.
    Query(String),
    /// The service answered, but not with a valid reaction record.
    InvalidResponse(ModelError),
    /// Reading or writing the cache failed.
    Cache(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrompt => f.write_str("empty prompt"),
            Self::Unavailable { reaction_id } => write!(
                f,
                "reaction {reaction_id} is not cached and no service is \
                 configured"
            ),
            Self::Query(msg) => write!(f, "query failed: {msg}"),
            Self::InvalidResponse(e) => write!(f, "invalid response: {e}"),
            Self::Cache(msg) => write!(f, "cache error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidResponse(e) => Some(e),
            _ => None,
        }
    }
}
