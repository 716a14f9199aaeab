use crate::error::Result;
use crate::genealogy::Genealogy;
use crate::lineage::walker::GenerationWalk;
use crate::tree::{FamilyTree, TreeNode};
use crate::types::{PersonId, RelationId};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Make sure `nodes` has a single middle element and return its index
///
/// An even-sized group gets `placeholder()` inserted at `len / 2`; an odd one
/// already has a node there.
pub fn insert_center<T>(nodes: &mut Vec<T>, placeholder: impl FnOnce() -> T) -> usize {
    let center = nodes.len() / 2;
    if nodes.len() % 2 == 0 {
        nodes.insert(center, placeholder());
    }
    center
}

#[derive(Debug)]
enum Slot {
    Root,
    Person(PersonId, String),
    Marriage(RelationId),
    Placeholder,
}

/// Flat node storage so anchors can be filled in level by level
#[derive(Debug)]
struct Arena {
    slots: Vec<Slot>,
    children: Vec<Vec<usize>>,
}

impl Arena {
    const ROOT: usize = 0;

    fn new() -> Self {
        Self {
            slots: vec![Slot::Root],
            children: vec![Vec::new()],
        }
    }

    fn push(&mut self, slot: Slot) -> usize {
        self.slots.push(slot);
        self.children.push(Vec::new());
        self.slots.len() - 1
    }

    fn build(&self, index: usize) -> TreeNode {
        let mut node = match &self.slots[index] {
            Slot::Person(person_id, name) => TreeNode::person(*person_id, name.clone()),
            Slot::Marriage(relation_id) => TreeNode::marriage(*relation_id),
            Slot::Placeholder | Slot::Root => TreeNode::placeholder(),
        };
        *node.children_mut() = self.children[index]
            .iter()
            .map(|&child| self.build(child))
            .collect();
        node
    }

    fn into_tree(self) -> FamilyTree {
        FamilyTree {
            children: self.children[Self::ROOT]
                .iter()
                .map(|&child| self.build(child))
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
struct Household {
    persons: Vec<PersonId>,
    marriages: Vec<RelationId>,
}

/// Turns a generation walk into the rooted family tree
///
/// Works one generation at a time from the earliest ancestors down. Each
/// level gathers the persons hanging off a marriage together with everyone
/// they married, centers them, and hangs the new marriages under the center
/// so the next level can attach to them. A visited-set shared by all anchors
/// of a level keeps a person from showing up twice in that level.
pub struct TreeAssembler<'a> {
    genealogy: &'a Genealogy,
    walk: &'a GenerationWalk,
}

impl<'a> TreeAssembler<'a> {
    pub fn new(genealogy: &'a Genealogy, walk: &'a GenerationWalk) -> Self {
        Self { genealogy, walk }
    }

    #[instrument(skip(self))]
    pub fn assemble(&self) -> Result<FamilyTree> {
        let mut arena = Arena::new();
        let mut visited = HashSet::new();

        let mut generations = self.walk.generations();
        let Some((earliest, first_bucket)) = generations.next() else {
            return Ok(FamilyTree::default());
        };
        debug!("Anchoring tree at generation {}", earliest);

        let mut frontier =
            self.step_over_marriage(&mut arena, Arena::ROOT, first_bucket.persons(), &mut visited)?;

        for (generation, _) in generations {
            if frontier.is_empty() {
                break;
            }
            visited.clear();

            let mut next_frontier = Vec::new();
            for (relation_id, anchor) in frontier {
                let Some(children) = self.walk.children_of(relation_id) else {
                    continue;
                };
                next_frontier.extend(self.step_over_marriage(
                    &mut arena,
                    anchor,
                    children,
                    &mut visited,
                )?);
            }
            debug!(
                "Generation {} produced {} marriages",
                generation,
                next_frontier.len()
            );
            frontier = next_frontier;
        }

        Ok(arena.into_tree())
    }

    /// Hang `persons` and their households under `anchor`, returning the new
    /// marriage nodes to descend through next
    fn step_over_marriage(
        &self,
        arena: &mut Arena,
        anchor: usize,
        persons: &[PersonId],
        visited: &mut HashSet<PersonId>,
    ) -> Result<Vec<(RelationId, usize)>> {
        let household = self.new_household(persons, visited)?;

        let mut nodes = Vec::with_capacity(household.persons.len() + 1);
        for &person_id in &household.persons {
            let person = self.genealogy.person(person_id)?;
            nodes.push(arena.push(Slot::Person(person_id, person.name.clone())));
        }
        let center_position = insert_center(&mut nodes, || arena.push(Slot::Placeholder));
        let center = nodes[center_position];
        arena.children[anchor] = nodes;

        let mut marriages = Vec::with_capacity(household.marriages.len());
        for relation_id in household.marriages {
            let index = arena.push(Slot::Marriage(relation_id));
            arena.children[center].push(index);
            marriages.push((relation_id, index));
        }
        Ok(marriages)
    }

    fn new_household(
        &self,
        persons: &[PersonId],
        visited: &mut HashSet<PersonId>,
    ) -> Result<Household> {
        let mut household = Household::default();

        for &person_id in persons {
            if visited.contains(&person_id) {
                continue;
            }
            let before = household.persons.len();
            self.collect_household(person_id, visited, &mut household)?;
            if household.persons.len() == before {
                visited.insert(person_id);
                household.persons.push(person_id);
            }
        }

        Ok(household)
    }

    /// Follow marriage links from `person_id` through every spouse not yet
    /// visited, collecting the persons and marriages met on the way
    fn collect_household(
        &self,
        person_id: PersonId,
        visited: &mut HashSet<PersonId>,
        household: &mut Household,
    ) -> Result<()> {
        if visited.contains(&person_id) {
            return Ok(());
        }
        let marriages = self.walk.marriages_of(person_id);
        if marriages.is_empty() {
            return Ok(());
        }

        visited.insert(person_id);
        household.persons.push(person_id);

        for &relation_id in marriages {
            let spouse = self.genealogy.relation(relation_id)?.spouse_of(person_id);
            if visited.contains(&spouse) {
                continue;
            }
            household.marriages.push(relation_id);
            self.collect_household(spouse, visited, household)?;
        }

        Ok(())
    }
}
