pub mod config;
pub mod error;
pub mod genealogy;
pub mod lineage;
pub mod tree;
pub mod types;

pub use error::{GenealogyError, Result};
pub use genealogy::Genealogy;
pub use lineage::FamilyTreeBuilder;
pub use tree::FamilyTree;
