pub mod assembler;
pub mod builder;
pub mod graph;
pub mod walker;

pub use assembler::{insert_center, TreeAssembler};
pub use builder::FamilyTreeBuilder;
pub use graph::KinshipGraph;
pub use walker::{GenerationBucket, GenerationWalk, GenerationWalker};
