use crate::error::Result;
use crate::genealogy::Genealogy;
use crate::types::{PersonId, RelationId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KinNode {
    Person(PersonId),
    Marriage(RelationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KinEdge {
    /// person -> marriage they are a partner in
    Partner,
    /// marriage -> child born into it
    Child,
}

/// Directed descent graph over a genealogy
///
/// Persons and marriages are both nodes. Partners point at their marriage and
/// marriages point at their children, so every directed path runs from an
/// ancestor to a descendant.
pub struct KinshipGraph {
    graph: DiGraph<KinNode, KinEdge>,
    person_nodes: HashMap<PersonId, NodeIndex>,
}

impl KinshipGraph {
    pub fn from_genealogy(genealogy: &Genealogy) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut person_nodes = HashMap::new();
        let mut marriage_nodes = HashMap::new();

        for person in genealogy.persons() {
            let index = graph.add_node(KinNode::Person(person.id));
            person_nodes.insert(person.id, index);
        }

        for relation in genealogy.relations() {
            let marriage_index = graph.add_node(KinNode::Marriage(relation.id));
            marriage_nodes.insert(relation.id, marriage_index);

            for partner in relation.partners() {
                let partner_index = person_nodes[&partner];
                graph.add_edge(partner_index, marriage_index, KinEdge::Partner);
            }
        }

        for person in genealogy.persons() {
            if let Some(relation_id) = person.parents_relation_id {
                genealogy.relation(relation_id)?;
                graph.add_edge(
                    marriage_nodes[&relation_id],
                    person_nodes[&person.id],
                    KinEdge::Child,
                );
            }
        }

        debug!(
            "Kinship graph built with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Self {
            graph,
            person_nodes,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Find a person who is recorded as their own ancestor
    ///
    /// Returns the lowest person ID inside the first strongly connected
    /// component that contains a cycle.
    pub fn find_descent_cycle(&self) -> Option<PersonId> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .filter_map(|component| {
                component
                    .into_iter()
                    .filter_map(|index| match self.graph[index] {
                        KinNode::Person(person_id) => Some(person_id),
                        KinNode::Marriage(_) => None,
                    })
                    .min()
            })
            .next()
    }

    /// Persons with no recorded parents
    pub fn root_persons(&self) -> Vec<PersonId> {
        let mut roots: Vec<PersonId> = self
            .person_nodes
            .iter()
            .filter(|(_, &index)| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(&person_id, _)| person_id)
            .collect();
        roots.sort();
        roots
    }

    /// Persons who never became a partner in a marriage
    pub fn unmarried_persons(&self) -> Vec<PersonId> {
        let mut unmarried: Vec<PersonId> = self
            .person_nodes
            .iter()
            .filter(|(_, &index)| {
                self.graph
                    .neighbors_directed(index, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|(&person_id, _)| person_id)
            .collect();
        unmarried.sort();
        unmarried
    }

    pub fn get_statistics(&self) -> GraphStatistics {
        let marriages = self
            .graph
            .node_weights()
            .filter(|node| matches!(node, KinNode::Marriage(_)))
            .count();
        let childless_marriages = self
            .graph
            .node_indices()
            .filter(|&index| matches!(self.graph[index], KinNode::Marriage(_)))
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .count();

        GraphStatistics {
            persons: self.person_nodes.len(),
            marriages,
            root_persons: self.root_persons().len(),
            unmarried_persons: self.unmarried_persons().len(),
            childless_marriages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
    pub persons: usize,
    pub marriages: usize,
    pub root_persons: usize,
    pub unmarried_persons: usize,
    pub childless_marriages: usize,
}
