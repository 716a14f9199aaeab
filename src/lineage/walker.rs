use crate::error::{GenealogyError, Result};
use crate::genealogy::Genealogy;
use crate::types::{PersonId, RelationId};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// Default cap on the number of person visits in one walk
pub const DEFAULT_MAX_VISITS: usize = 100_000;

/// Persons assigned to one generation, in order of first arrival
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationBucket {
    order: Vec<PersonId>,
    members: HashSet<PersonId>,
}

impl GenerationBucket {
    fn insert(&mut self, person_id: PersonId) {
        if self.members.insert(person_id) {
            self.order.push(person_id);
        }
    }

    pub fn persons(&self) -> &[PersonId] {
        &self.order
    }

    pub fn contains(&self, person_id: PersonId) -> bool {
        self.members.contains(&person_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Everything a walk discovered about the genealogy around the start person
#[derive(Debug, Clone, Default)]
pub struct GenerationWalk {
    generations: BTreeMap<i32, GenerationBucket>,
    marriages: HashMap<PersonId, Vec<RelationId>>,
    children: HashMap<RelationId, Vec<PersonId>>,
    visits: usize,
}

impl GenerationWalk {
    /// Generations in ascending order, earliest ancestors first
    pub fn generations(&self) -> impl Iterator<Item = (i32, &GenerationBucket)> {
        self.generations.iter().map(|(&number, bucket)| (number, bucket))
    }

    pub fn generation(&self, number: i32) -> Option<&GenerationBucket> {
        self.generations.get(&number)
    }

    pub fn generation_count(&self) -> usize {
        self.generations.len()
    }

    pub fn earliest_generation(&self) -> Option<i32> {
        self.generations.keys().next().copied()
    }

    pub fn latest_generation(&self) -> Option<i32> {
        self.generations.keys().next_back().copied()
    }

    /// Every generation the person was placed in
    pub fn generations_of(&self, person_id: PersonId) -> Vec<i32> {
        self.generations
            .iter()
            .filter(|(_, bucket)| bucket.contains(person_id))
            .map(|(&number, _)| number)
            .collect()
    }

    /// Marriages linked to the person during the walk, repeats included
    pub fn marriages_of(&self, person_id: PersonId) -> &[RelationId] {
        self.marriages
            .get(&person_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Children of the marriage reached during the walk, one entry per visit
    pub fn children_of(&self, relation_id: RelationId) -> Option<&[PersonId]> {
        self.children.get(&relation_id).map(Vec::as_slice)
    }

    pub fn visits(&self) -> usize {
        self.visits
    }

    fn record(&mut self, person_id: PersonId, generation: i32, parents: Option<RelationId>) {
        self.visits += 1;
        self.generations.entry(generation).or_default().insert(person_id);
        if let Some(relation_id) = parents {
            self.children.entry(relation_id).or_default().push(person_id);
        }
    }

    fn link_marriage(&mut self, relation_id: RelationId, partners: [PersonId; 2]) {
        for partner in partners {
            self.marriages.entry(partner).or_default().push(relation_id);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    person_id: PersonId,
    /// Marriage crossed to get here; it is not crossed back
    arrived_by: Option<RelationId>,
    /// Parent marriage we descended from; it is not climbed back
    previous_parent_relation: Option<RelationId>,
    generation: i32,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Visit(Visit),
    LinkMarriage(RelationId),
}

/// Depth-first walk over parent, sibling, spouse and child edges
///
/// There is no global visited-set: the only guard against cycles is that a
/// visit never re-crosses the edge it arrived by. Persons reachable along
/// several paths are visited once per path. A pair married more than once
/// produces a walk that never ends on its own, which is what `max_visits`
/// catches.
pub struct GenerationWalker<'a> {
    genealogy: &'a Genealogy,
    max_visits: usize,
}

impl<'a> GenerationWalker<'a> {
    pub fn new(genealogy: &'a Genealogy) -> Self {
        Self {
            genealogy,
            max_visits: DEFAULT_MAX_VISITS,
        }
    }

    pub fn with_max_visits(mut self, max_visits: usize) -> Self {
        self.max_visits = max_visits;
        self
    }

    #[instrument(skip(self), fields(max_visits = self.max_visits))]
    pub fn walk(&self, start: PersonId) -> Result<GenerationWalk> {
        let mut walk = GenerationWalk::default();
        // Steps are pushed in reverse so they pop in recursive pre-order
        let mut stack = vec![Step::Visit(Visit {
            person_id: start,
            arrived_by: None,
            previous_parent_relation: None,
            generation: 0,
        })];

        while let Some(step) = stack.pop() {
            match step {
                Step::LinkMarriage(relation_id) => {
                    let relation = self.genealogy.relation(relation_id)?;
                    walk.link_marriage(relation_id, relation.partners());
                }
                Step::Visit(visit) => {
                    if walk.visits >= self.max_visits {
                        return Err(GenealogyError::TraversalLimitExceeded {
                            limit: self.max_visits,
                        });
                    }
                    let next = self.visit(&mut walk, visit)?;
                    stack.extend(next.into_iter().rev());
                }
            }
        }

        debug!(
            "Walk from person {} made {} visits across {} generations",
            start,
            walk.visits,
            walk.generation_count()
        );
        Ok(walk)
    }

    fn visit(&self, walk: &mut GenerationWalk, visit: Visit) -> Result<Vec<Step>> {
        let person = self.genealogy.person(visit.person_id)?;
        walk.record(person.id, visit.generation, person.parents_relation_id);

        let mut next = Vec::new();

        if let Some(parent_relation_id) = person.parents_relation_id {
            if Some(parent_relation_id) != visit.previous_parent_relation {
                let parent_relation = self.genealogy.relation(parent_relation_id)?;
                let parents = [
                    self.genealogy.person(parent_relation.first_person_id)?.id,
                    self.genealogy.person(parent_relation.second_person_id)?.id,
                ];
                walk.link_marriage(parent_relation_id, parents);

                for parent in parents {
                    next.push(Step::Visit(Visit {
                        person_id: parent,
                        arrived_by: Some(parent_relation_id),
                        previous_parent_relation: None,
                        generation: visit.generation - 1,
                    }));
                }

                for sibling in self.genealogy.persons_by_parent_relation(parent_relation_id) {
                    if sibling.id == person.id {
                        continue;
                    }
                    next.push(Step::Visit(Visit {
                        person_id: sibling.id,
                        arrived_by: None,
                        previous_parent_relation: Some(parent_relation_id),
                        generation: visit.generation,
                    }));
                }
            }
        }

        for marriage in self.genealogy.relations_by_person(person.id) {
            if Some(marriage.id) == visit.arrived_by {
                continue;
            }

            next.push(Step::LinkMarriage(marriage.id));
            next.push(Step::Visit(Visit {
                person_id: marriage.spouse_of(person.id),
                arrived_by: Some(marriage.id),
                previous_parent_relation: None,
                generation: visit.generation,
            }));

            for child in self.genealogy.persons_by_parent_relation(marriage.id) {
                next.push(Step::Visit(Visit {
                    person_id: child.id,
                    arrived_by: None,
                    previous_parent_relation: Some(marriage.id),
                    generation: visit.generation + 1,
                }));
            }
        }

        Ok(next)
    }
}
