use crate::error::{GenealogyError, Result};
use crate::lineage::graph::KinshipGraph;
use crate::types::{NewPerson, Person, PersonId, Relation, RelationId, RelationKind};
use std::collections::HashMap;
use tracing::debug;

/// Sequential ID source owned by a single store
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn starting_at(start: u32) -> Self {
        Self { next: start }
    }

    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The ID the next call to `allocate` will hand out
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// In-memory registry of persons and marriages
///
/// Records are kept in insertion order. Lookups by ID go through hash indexes,
/// and the multi-result queries read per-key adjacency lists that are appended
/// on insert, so they return results in insertion order as well.
#[derive(Debug, Clone, Default)]
pub struct Genealogy {
    persons: Vec<Person>,
    relations: Vec<Relation>,
    person_index: HashMap<PersonId, usize>,
    relation_index: HashMap<RelationId, usize>,
    children_by_relation: HashMap<RelationId, Vec<PersonId>>,
    relations_by_person: HashMap<PersonId, Vec<RelationId>>,
    person_ids: IdAllocator,
    relation_ids: IdAllocator,
}

impl Genealogy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a person, filling unspecified fields with defaults
    pub fn add_person(&mut self, config: NewPerson) -> Person {
        let person = Person {
            id: PersonId(self.person_ids.allocate()),
            name: config.name,
            parents_relation_id: config.parents_relation_id,
        };

        if let Some(relation_id) = person.parents_relation_id {
            self.children_by_relation
                .entry(relation_id)
                .or_default()
                .push(person.id);
        }

        self.person_index.insert(person.id, self.persons.len());
        self.persons.push(person.clone());
        person
    }

    /// Append a marriage between two persons already in the store
    ///
    /// Nothing prevents recording the same pair twice.
    pub fn add_relation(&mut self, first: PersonId, second: PersonId) -> Result<Relation> {
        self.person(first)?;
        self.person(second)?;

        let relation = Relation {
            id: RelationId(self.relation_ids.allocate()),
            first_person_id: first,
            second_person_id: second,
            kind: RelationKind::Marriage,
        };

        self.relations_by_person
            .entry(first)
            .or_default()
            .push(relation.id);
        if second != first {
            self.relations_by_person
                .entry(second)
                .or_default()
                .push(relation.id);
        }

        self.relation_index.insert(relation.id, self.relations.len());
        self.relations.push(relation.clone());
        Ok(relation)
    }

    pub fn person(&self, person_id: PersonId) -> Result<&Person> {
        self.person_index
            .get(&person_id)
            .map(|&index| &self.persons[index])
            .ok_or(GenealogyError::PersonNotFound(person_id))
    }

    pub fn relation(&self, relation_id: RelationId) -> Result<&Relation> {
        self.relation_index
            .get(&relation_id)
            .map(|&index| &self.relations[index])
            .ok_or(GenealogyError::RelationNotFound(relation_id))
    }

    /// All children born into the given marriage, in insertion order
    pub fn persons_by_parent_relation(&self, relation_id: RelationId) -> Vec<&Person> {
        self.children_by_relation
            .get(&relation_id)
            .map(|children| {
                children
                    .iter()
                    .map(|id| &self.persons[self.person_index[id]])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All marriages the person takes part in, in insertion order
    pub fn relations_by_person(&self, person_id: PersonId) -> Vec<&Relation> {
        self.relations_by_person
            .get(&person_id)
            .map(|relations| {
                relations
                    .iter()
                    .map(|id| &self.relations[self.relation_index[id]])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Check that every parent reference resolves and nobody descends from themselves
    pub fn validate(&self) -> Result<()> {
        for person in &self.persons {
            if let Some(relation_id) = person.parents_relation_id {
                self.relation(relation_id)?;
            }
        }

        let graph = KinshipGraph::from_genealogy(self)?;
        if let Some(person_id) = graph.find_descent_cycle() {
            return Err(GenealogyError::DescentCycle(person_id));
        }

        debug!(
            "Validated genealogy with {} persons and {} relations",
            self.persons.len(),
            self.relations.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_genealogy() -> (Genealogy, Person, Person, Relation, Person) {
        let mut genealogy = Genealogy::new();
        let a = genealogy.add_person(NewPerson::named("A"));
        let b = genealogy.add_person(NewPerson::named("B"));
        let marriage = genealogy.add_relation(a.id, b.id).unwrap();
        let c = genealogy.add_person(NewPerson::named("C").child_of(marriage.id));
        (genealogy, a, b, marriage, c)
    }

    #[test]
    fn test_allocator_is_sequential() {
        let mut ids = IdAllocator::starting_at(5);
        assert_eq!(ids.allocate(), 5);
        assert_eq!(ids.allocate(), 6);
        assert_eq!(ids.peek(), 7);
    }

    #[test]
    fn test_add_person_assigns_sequential_ids_and_defaults() {
        let mut genealogy = Genealogy::new();
        let first = genealogy.add_person(NewPerson::default());
        let second = genealogy.add_person(NewPerson::named("Olga"));

        assert_eq!(first.id, PersonId(0));
        assert_eq!(first.name, "");
        assert_eq!(first.parents_relation_id, None);
        assert_eq!(second.id, PersonId(1));
        assert_eq!(genealogy.person_count(), 2);
    }

    #[test]
    fn test_get_person_and_relation() {
        let (genealogy, a, _, marriage, c) = create_test_genealogy();

        assert_eq!(genealogy.person(a.id).unwrap(), &a);
        assert_eq!(genealogy.person(c.id).unwrap(), &c);
        assert_eq!(genealogy.relation(marriage.id).unwrap(), &marriage);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let (genealogy, ..) = create_test_genealogy();

        let err = genealogy.person(PersonId(42)).unwrap_err();
        assert!(matches!(err, GenealogyError::PersonNotFound(PersonId(42))));
        assert_eq!(err.to_string(), "Person with id:42 not found");

        let err = genealogy.relation(RelationId(1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_add_relation_requires_existing_persons() {
        let mut genealogy = Genealogy::new();
        let a = genealogy.add_person(NewPerson::named("A"));

        let err = genealogy.add_relation(a.id, PersonId(9)).unwrap_err();
        assert!(matches!(err, GenealogyError::PersonNotFound(PersonId(9))));
        assert_eq!(genealogy.relation_count(), 0);
    }

    #[test]
    fn test_children_in_insertion_order() {
        let (mut genealogy, _, _, marriage, c) = create_test_genealogy();
        let d = genealogy.add_person(NewPerson::named("D").child_of(marriage.id));
        genealogy.add_person(NewPerson::named("Unrelated"));
        let e = genealogy.add_person(NewPerson::named("E").child_of(marriage.id));

        let children: Vec<PersonId> = genealogy
            .persons_by_parent_relation(marriage.id)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(children, vec![c.id, d.id, e.id]);
        assert!(genealogy.persons_by_parent_relation(RelationId(7)).is_empty());
    }

    #[test]
    fn test_relations_by_person_either_party() {
        let mut genealogy = Genealogy::new();
        let p = genealogy.add_person(NewPerson::named("P"));
        let s1 = genealogy.add_person(NewPerson::named("S1"));
        let s2 = genealogy.add_person(NewPerson::named("S2"));
        let first = genealogy.add_relation(p.id, s1.id).unwrap();
        let second = genealogy.add_relation(s2.id, p.id).unwrap();

        let ids: Vec<RelationId> = genealogy
            .relations_by_person(p.id)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(genealogy.relations_by_person(s2.id).len(), 1);
    }

    #[test]
    fn test_duplicate_pairs_are_allowed() {
        let (mut genealogy, a, b, ..) = create_test_genealogy();
        genealogy.add_relation(b.id, a.id).unwrap();
        assert_eq!(genealogy.relations_by_person(a.id).len(), 2);
    }

    #[test]
    fn test_validate_rejects_dangling_parent_relation() {
        let mut genealogy = Genealogy::new();
        genealogy.add_person(NewPerson::named("Orphan").child_of(RelationId(3)));

        let err = genealogy.validate().unwrap_err();
        assert!(matches!(err, GenealogyError::RelationNotFound(RelationId(3))));
    }

    #[test]
    fn test_validate_accepts_consistent_genealogy() {
        let (genealogy, ..) = create_test_genealogy();
        assert!(genealogy.validate().is_ok());
    }
}
