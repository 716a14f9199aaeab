pub mod records;
pub mod store;

pub use records::{GenealogyRecords, PersonRecord, RelationRecord};
pub use store::{Genealogy, IdAllocator};
