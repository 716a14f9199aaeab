use crate::types::{PersonId, RelationId};

/// A node of the projected family tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Person(PersonNode),
    Marriage(MarriageNode),
    /// Zero-width node that gives an even sibling group a single center
    Placeholder(PlaceholderNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonNode {
    pub person_id: PersonId,
    pub name: String,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarriageNode {
    pub relation_id: RelationId,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderNode {
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn person(person_id: PersonId, name: impl Into<String>) -> Self {
        Self::Person(PersonNode {
            person_id,
            name: name.into(),
            children: Vec::new(),
        })
    }

    pub fn marriage(relation_id: RelationId) -> Self {
        Self::Marriage(MarriageNode {
            relation_id,
            children: Vec::new(),
        })
    }

    pub fn placeholder() -> Self {
        Self::Placeholder(PlaceholderNode::default())
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Person(node) => &node.children,
            Self::Marriage(node) => &node.children,
            Self::Placeholder(node) => &node.children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        match self {
            Self::Person(node) => &mut node.children,
            Self::Marriage(node) => &mut node.children,
            Self::Placeholder(node) => &mut node.children,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// Display name; marriages and placeholders have none
    pub fn name(&self) -> &str {
        match self {
            Self::Person(node) => &node.name,
            Self::Marriage(_) | Self::Placeholder(_) => "",
        }
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// The projected tree, held as the children of its hidden root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyTree {
    pub children: Vec<TreeNode>,
}

impl FamilyTree {
    /// Pre-order iteration over every node below the root
    pub fn nodes(&self) -> Vec<&TreeNode> {
        let mut nodes = Vec::new();
        for child in &self.children {
            child.walk(&mut |node| nodes.push(node));
        }
        nodes
    }

    pub fn person_count(&self) -> usize {
        self.nodes()
            .into_iter()
            .filter(|node| matches!(node, TreeNode::Person(_)))
            .count()
    }

    pub fn marriage_count(&self) -> usize {
        self.nodes()
            .into_iter()
            .filter(|node| matches!(node, TreeNode::Marriage(_)))
            .count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.nodes()
            .into_iter()
            .filter(|node| node.is_placeholder())
            .count()
    }

    /// Persons in the order they appear in the tree
    pub fn person_ids(&self) -> Vec<PersonId> {
        self.nodes()
            .into_iter()
            .filter_map(|node| match node {
                TreeNode::Person(person) => Some(person.person_id),
                _ => None,
            })
            .collect()
    }

    /// Number of levels below the hidden root
    pub fn depth(&self) -> usize {
        fn depth_of(node: &TreeNode) -> usize {
            1 + node.children().iter().map(depth_of).max().unwrap_or(0)
        }
        self.children.iter().map(depth_of).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FamilyTree {
        let mut center = TreeNode::placeholder();
        let mut marriage = TreeNode::marriage(RelationId(0));
        marriage
            .children_mut()
            .push(TreeNode::person(PersonId(2), "C"));
        center.children_mut().push(marriage);

        FamilyTree {
            children: vec![
                TreeNode::person(PersonId(0), "A"),
                center,
                TreeNode::person(PersonId(1), "B"),
            ],
        }
    }

    #[test]
    fn test_counts() {
        let tree = sample_tree();
        assert_eq!(tree.person_count(), 3);
        assert_eq!(tree.marriage_count(), 1);
        assert_eq!(tree.placeholder_count(), 1);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_person_ids_in_pre_order() {
        let tree = sample_tree();
        assert_eq!(tree.person_ids(), vec![PersonId(0), PersonId(2), PersonId(1)]);
    }

    #[test]
    fn test_empty_tree() {
        let tree = FamilyTree::default();
        assert_eq!(tree.depth(), 0);
        assert!(tree.nodes().is_empty());
    }
}
