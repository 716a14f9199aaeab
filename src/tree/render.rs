use crate::tree::node::{FamilyTree, TreeNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderNodeType {
    Person,
    Marriage,
}

/// Node in the shape the diagram renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(rename = "type")]
    pub node_type: RenderNodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_parent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit `person-<id>` / `marriage-<id>` identifiers
    pub include_ids: bool,
}

impl FamilyTree {
    pub fn render(&self, options: &RenderOptions) -> RenderNode {
        self.render_with(options, |_| None)
    }

    /// Render, attaching whatever payload `data` returns for each node
    pub fn render_with<F>(&self, options: &RenderOptions, mut data: F) -> RenderNode
    where
        F: FnMut(&TreeNode) -> Option<serde_json::Value>,
    {
        RenderNode {
            name: String::new(),
            id: None,
            hidden: Some(true),
            node_type: RenderNodeType::Person,
            no_parent: None,
            data: None,
            children: self
                .children
                .iter()
                .map(|child| render_node(child, options, &mut data))
                .collect(),
        }
    }
}

fn render_node<F>(node: &TreeNode, options: &RenderOptions, data: &mut F) -> RenderNode
where
    F: FnMut(&TreeNode) -> Option<serde_json::Value>,
{
    let (id, node_type, no_parent) = match node {
        TreeNode::Person(person) => (
            format!("person-{}", person.person_id),
            RenderNodeType::Person,
            None,
        ),
        TreeNode::Marriage(marriage) => (
            format!("marriage-{}", marriage.relation_id),
            RenderNodeType::Marriage,
            Some(true),
        ),
        TreeNode::Placeholder(_) => (String::new(), RenderNodeType::Person, Some(true)),
    };

    RenderNode {
        name: node.name().to_string(),
        id: (options.include_ids && !id.is_empty()).then_some(id),
        hidden: None,
        node_type,
        no_parent,
        data: data(node),
        children: node
            .children()
            .iter()
            .map(|child| render_node(child, options, data))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PersonId, RelationId};
    use serde_json::json;

    fn sample_tree() -> FamilyTree {
        let mut marriage = TreeNode::marriage(RelationId(0));
        marriage
            .children_mut()
            .push(TreeNode::person(PersonId(2), "C"));
        let mut center = TreeNode::placeholder();
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
    fn test_render_matches_renderer_shape() {
        let rendered = sample_tree().render(&RenderOptions::default());
        let value = serde_json::to_value(&rendered).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "",
                "hidden": true,
                "type": "person",
                "children": [
                    {"name": "A", "type": "person"},
                    {"name": "", "type": "person", "noParent": true, "children": [
                        {"name": "", "type": "marriage", "noParent": true, "children": [
                            {"name": "C", "type": "person"}
                        ]}
                    ]},
                    {"name": "B", "type": "person"}
                ]
            })
        );
    }

    #[test]
    fn test_render_with_ids() {
        let rendered = sample_tree().render(&RenderOptions { include_ids: true });

        assert_eq!(rendered.id, None);
        assert_eq!(rendered.children[0].id.as_deref(), Some("person-0"));
        assert_eq!(rendered.children[1].id, None);
        assert_eq!(
            rendered.children[1].children[0].id.as_deref(),
            Some("marriage-0")
        );
    }

    #[test]
    fn test_render_with_data() {
        let rendered = sample_tree().render_with(&RenderOptions::default(), |node| match node {
            TreeNode::Person(person) => Some(json!({ "personId": person.person_id })),
            _ => None,
        });

        assert_eq!(rendered.children[2].data, Some(json!({ "personId": 1 })));
        assert_eq!(rendered.children[1].data, None);
    }
}
