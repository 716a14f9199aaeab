use crate::types::{PersonId, RelationId};
use thiserror::Error;

/// Errors raised while loading a genealogy or projecting it into a tree
#[derive(Error, Debug)]
pub enum GenealogyError {
    #[error("Person with id:{0} not found")]
    PersonNotFound(PersonId),

    #[error("Relation with id:{0} not found")]
    RelationNotFound(RelationId),

    #[error("Traversal exceeded {limit} visits; the relation graph likely contains a remarriage cycle")]
    TraversalLimitExceeded { limit: usize },

    #[error("Invalid genealogy records: {0}")]
    InvalidRecords(String),

    #[error("Person with id:{0} is recorded as their own ancestor")]
    DescentCycle(PersonId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GenealogyError {
    /// Whether the error comes from a dangling person or relation reference
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PersonNotFound(_) | Self::RelationNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, GenealogyError>;
