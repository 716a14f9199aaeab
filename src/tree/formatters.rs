use crate::error::Result;
use crate::tree::node::{FamilyTree, TreeNode};
use crate::tree::render::RenderOptions;

/// Trait for tree formatters
pub trait TreeFormatter {
    fn format(&self, tree: &FamilyTree) -> Result<String>;
}

/// JSON in the renderer's node shape
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
    pub options: RenderOptions,
}

impl TreeFormatter for JsonFormatter {
    fn format(&self, tree: &FamilyTree) -> Result<String> {
        let rendered = tree.render(&self.options);
        let output = if self.pretty {
            serde_json::to_string_pretty(&rendered)?
        } else {
            serde_json::to_string(&rendered)?
        };
        Ok(output)
    }
}

/// YAML in the renderer's node shape
#[derive(Debug, Clone, Default)]
pub struct YamlFormatter {
    pub options: RenderOptions,
}

impl TreeFormatter for YamlFormatter {
    fn format(&self, tree: &FamilyTree) -> Result<String> {
        Ok(serde_yaml::to_string(&tree.render(&self.options))?)
    }
}

/// Single-line outline: persons by name, `_` for placeholders, `+` for
/// marriages, children in brackets
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineFormatter;

impl OutlineFormatter {
    fn write_node(node: &TreeNode, out: &mut String) {
        match node {
            TreeNode::Person(person) => out.push_str(&person.name),
            TreeNode::Marriage(_) => out.push('+'),
            TreeNode::Placeholder(_) => out.push('_'),
        }
        if !node.children().is_empty() {
            Self::write_children(node.children(), out);
        }
    }

    fn write_children(children: &[TreeNode], out: &mut String) {
        out.push('[');
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            Self::write_node(child, out);
        }
        out.push(']');
    }
}

impl TreeFormatter for OutlineFormatter {
    fn format(&self, tree: &FamilyTree) -> Result<String> {
        let mut out = String::new();
        Self::write_children(&tree.children, &mut out);
        Ok(out)
    }
}
