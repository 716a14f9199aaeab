use crate::config::TreeConfig;
use crate::error::Result;
use crate::genealogy::Genealogy;
use crate::lineage::assembler::TreeAssembler;
use crate::lineage::walker::{GenerationWalk, GenerationWalker};
use crate::tree::FamilyTree;
use crate::types::PersonId;
use tracing::{info, instrument};

/// Projects a genealogy into a family tree anchored at a start person
pub struct FamilyTreeBuilder<'a> {
    genealogy: &'a Genealogy,
    max_visits: usize,
}

impl<'a> FamilyTreeBuilder<'a> {
    pub fn new(genealogy: &'a Genealogy, config: &TreeConfig) -> Self {
        Self {
            genealogy,
            max_visits: config.traversal.max_visits,
        }
    }

    pub fn walk(&self, start: PersonId) -> Result<GenerationWalk> {
        GenerationWalker::new(self.genealogy)
            .with_max_visits(self.max_visits)
            .walk(start)
    }

    #[instrument(skip(self))]
    pub fn build(&self, start: PersonId) -> Result<FamilyTree> {
        let start_person = self.genealogy.person(start)?;
        info!("Building family tree from {:?} (id {})", start_person.name, start);

        let walk = self.walk(start)?;
        let tree = TreeAssembler::new(self.genealogy, &walk).assemble()?;

        info!(
            "Family tree built with {} persons, {} marriages and {} placeholders over {} generations",
            tree.person_count(),
            tree.marriage_count(),
            tree.placeholder_count(),
            walk.generation_count()
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenealogyError;
    use crate::genealogy::GenealogyRecords;
    use crate::tree::{OutlineFormatter, TreeFormatter};
    use crate::types::NewPerson;

    fn romanov() -> Genealogy {
        let records =
            GenealogyRecords::from_yaml_str(include_str!("../../data/romanov.yaml")).unwrap();
        Genealogy::from_records(&records).unwrap()
    }

    #[test]
    fn test_romanov_tree_from_peter_ii() {
        let genealogy = romanov();
        let builder = FamilyTreeBuilder::new(&genealogy, &TreeConfig::default());
        let peter_ii = PersonId(23);
        assert_eq!(genealogy.person(peter_ii).unwrap().name, "Петр II");

        let walk = builder.walk(peter_ii).unwrap();
        // Each person is reached exactly once
        assert_eq!(walk.visits(), 81);
        assert_eq!(walk.earliest_generation(), Some(-4));
        assert_eq!(walk.latest_generation(), Some(6));
        assert_eq!(walk.generation(0).unwrap().persons()[0], peter_ii);

        let tree = builder.build(peter_ii).unwrap();
        let expected = include_str!("../../data/romanov_peter_ii.outline");
        assert_eq!(OutlineFormatter.format(&tree).unwrap(), expected.trim_end());
        assert_eq!(tree.person_count(), 81);
        assert_eq!(tree.marriage_count(), 18);
    }

    #[test]
    fn test_build_is_idempotent() {
        let genealogy = romanov();
        let builder = FamilyTreeBuilder::new(&genealogy, &TreeConfig::default());

        let first = builder.build(PersonId(23)).unwrap();
        let second = builder.build(PersonId(23)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_start_person_reaches_whole_dynasty() {
        let genealogy = romanov();
        let builder = FamilyTreeBuilder::new(&genealogy, &TreeConfig::default());

        for person in genealogy.persons() {
            let tree = builder.build(person.id).unwrap();
            assert_eq!(tree.person_count(), 81, "start {}", person.id);
        }
    }

    #[test]
    fn test_limit_comes_from_config() {
        let mut genealogy = Genealogy::new();
        let a = genealogy.add_person(NewPerson::named("A"));
        let b = genealogy.add_person(NewPerson::named("B"));
        genealogy.add_relation(a.id, b.id).unwrap();
        genealogy.add_relation(b.id, a.id).unwrap();

        let mut config = TreeConfig::default();
        config.traversal.max_visits = 64;
        let err = FamilyTreeBuilder::new(&genealogy, &config)
            .build(a.id)
            .unwrap_err();
        assert!(matches!(err, GenealogyError::TraversalLimitExceeded { limit: 64 }));
    }

    #[test]
    fn test_unknown_start_person() {
        let genealogy = romanov();
        let err = FamilyTreeBuilder::new(&genealogy, &TreeConfig::default())
            .build(PersonId(500))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
