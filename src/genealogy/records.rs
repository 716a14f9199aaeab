use crate::error::{GenealogyError, Result};
use crate::genealogy::store::Genealogy;
use crate::types::{NewPerson, PersonId, RelationId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Serialized form of a genealogy, as read from a YAML or JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenealogyRecords {
    #[serde(default)]
    pub persons: Vec<PersonRecord>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents_relation_id: Option<RelationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub id: RelationId,
    pub first_person_id: PersonId,
    pub second_person_id: PersonId,
}

impl GenealogyRecords {
    /// Load records from a file, picking the parser by extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading genealogy records from: {:?}", path);

        let content = fs::read_to_string(path)?;
        let records = if is_yaml(path) {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        info!(
            "Loaded {} persons and {} relations from {:?}",
            records.persons.len(),
            records.relations.len(),
            path
        );
        Ok(records)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        fs::write(path, content)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml") | Some("yaml")
    )
}

impl Genealogy {
    /// Rebuild a store from records
    ///
    /// The store hands out IDs sequentially, so record IDs must run `0..n` in
    /// file order for persons and relations alike.
    pub fn from_records(records: &GenealogyRecords) -> Result<Self> {
        let mut genealogy = Genealogy::new();

        for (position, record) in records.persons.iter().enumerate() {
            let person = genealogy.add_person(NewPerson {
                name: record.name.clone(),
                parents_relation_id: record.parents_relation_id,
            });
            if person.id != record.id {
                return Err(GenealogyError::InvalidRecords(format!(
                    "person at position {} has id {}, expected {}",
                    position, record.id, person.id
                )));
            }
        }

        for (position, record) in records.relations.iter().enumerate() {
            let relation = genealogy.add_relation(record.first_person_id, record.second_person_id)?;
            if relation.id != record.id {
                return Err(GenealogyError::InvalidRecords(format!(
                    "relation at position {} has id {}, expected {}",
                    position, record.id, relation.id
                )));
            }
        }

        genealogy.validate()?;
        Ok(genealogy)
    }

    pub fn to_records(&self) -> GenealogyRecords {
        GenealogyRecords {
            persons: self
                .persons()
                .iter()
                .map(|person| PersonRecord {
                    id: person.id,
                    name: person.name.clone(),
                    parents_relation_id: person.parents_relation_id,
                })
                .collect(),
            relations: self
                .relations()
                .iter()
                .map(|relation| RelationRecord {
                    id: relation.id,
                    first_person_id: relation.first_person_id,
                    second_person_id: relation.second_person_id,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FAMILY_YAML: &str = r#"
persons:
  - id: 0
    name: A
  - id: 1
    name: B
  - id: 2
    name: C
    parents_relation_id: 0
relations:
  - id: 0
    first_person_id: 0
    second_person_id: 1
"#;

    #[test]
    fn test_from_records_builds_store() {
        let records = GenealogyRecords::from_yaml_str(FAMILY_YAML).unwrap();
        let genealogy = Genealogy::from_records(&records).unwrap();

        assert_eq!(genealogy.person_count(), 3);
        assert_eq!(genealogy.relation_count(), 1);
        let child = genealogy.person(PersonId(2)).unwrap();
        assert_eq!(child.name, "C");
        assert_eq!(child.parents_relation_id, Some(RelationId(0)));
        assert_eq!(genealogy.to_records(), records);
    }

    #[test]
    fn test_rejects_non_sequential_person_ids() {
        let mut records = GenealogyRecords::from_yaml_str(FAMILY_YAML).unwrap();
        records.persons[1].id = PersonId(5);

        let err = Genealogy::from_records(&records).unwrap_err();
        assert!(matches!(err, GenealogyError::InvalidRecords(_)));
    }

    #[test]
    fn test_rejects_relation_to_unknown_person() {
        let mut records = GenealogyRecords::from_yaml_str(FAMILY_YAML).unwrap();
        records.relations[0].second_person_id = PersonId(8);

        let err = Genealogy::from_records(&records).unwrap_err();
        assert!(matches!(err, GenealogyError::PersonNotFound(PersonId(8))));
    }

    #[test]
    fn test_rejects_dangling_parent_reference() {
        let mut records = GenealogyRecords::from_yaml_str(FAMILY_YAML).unwrap();
        records.persons[2].parents_relation_id = Some(RelationId(4));

        let err = Genealogy::from_records(&records).unwrap_err();
        assert!(matches!(err, GenealogyError::RelationNotFound(RelationId(4))));
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let records = GenealogyRecords::from_yaml_str(FAMILY_YAML).unwrap();
        let temp_dir = TempDir::new().unwrap();

        for file_name in ["family.json", "family.yaml"] {
            let path = temp_dir.path().join(file_name);
            records.save_to_file(&path).unwrap();
            let loaded = GenealogyRecords::from_path(&path).unwrap();
            assert_eq!(loaded, records);
        }
    }

    #[test]
    fn test_bundled_romanov_dataset_loads() {
        let records = GenealogyRecords::from_yaml_str(include_str!("../../data/romanov.yaml")).unwrap();
        let genealogy = Genealogy::from_records(&records).unwrap();

        assert_eq!(genealogy.person_count(), 81);
        assert_eq!(genealogy.relation_count(), 18);
    }
}
