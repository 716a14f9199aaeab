pub mod formatters;
pub mod node;
pub mod render;

pub use formatters::{JsonFormatter, OutlineFormatter, TreeFormatter, YamlFormatter};
pub use node::{FamilyTree, MarriageNode, PersonNode, PlaceholderNode, TreeNode};
pub use render::{RenderNode, RenderNodeType, RenderOptions};
