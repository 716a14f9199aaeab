use serde::{Deserialize, Serialize};
use std::fmt;

/// Core record types shared by the store, the walker and the assembler

/// Identifier of a person within one genealogy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u32);

/// Identifier of a relation (marriage) within one genealogy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// The marriage this person was born into, if recorded
    pub parents_relation_id: Option<RelationId>,
}

impl Person {
    pub fn has_parents(&self) -> bool {
        self.parents_relation_id.is_some()
    }
}

/// Fields supplied when adding a person; anything left out takes its default
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
    pub name: String,
    pub parents_relation_id: Option<RelationId>,
}

impl NewPerson {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents_relation_id: None,
        }
    }

    pub fn child_of(mut self, relation_id: RelationId) -> Self {
        self.parents_relation_id = Some(relation_id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Marriage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub first_person_id: PersonId,
    pub second_person_id: PersonId,
    pub kind: RelationKind,
}

impl Relation {
    /// The other party of the marriage as seen from `person_id`
    pub fn spouse_of(&self, person_id: PersonId) -> PersonId {
        if self.first_person_id == person_id {
            self.second_person_id
        } else {
            self.first_person_id
        }
    }

    pub fn involves(&self, person_id: PersonId) -> bool {
        self.first_person_id == person_id || self.second_person_id == person_id
    }

    pub fn partners(&self) -> [PersonId; 2] {
        [self.first_person_id, self.second_person_id]
    }
}
