//! Finalized symbol table.
//!
//! A `SymbolTable` only exists once every source unit went through the
//! builder: [`crate::ingest::SymbolTableBuilder::freeze`] is the one place
//! that produces it, which makes the build/resolve barrier a type boundary.

use docscope_api::models::{
    DocumentedEntity, EntityId, EntityKind, EntityVariant, RelationKind, Relationship,
};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entities: Vec<DocumentedEntity>,
    relationships: Vec<Relationship>,
    /// Canonical name to entities of any kind sharing it.
    by_name: HashMap<String, Vec<EntityId>>,
    /// Display name to entities, used for selector lookups.
    by_display: HashMap<String, Vec<EntityId>>,
}

impl SymbolTable {
    /// Assemble a table from entities whose ids match their positions.
    ///
    /// Entities are ordered by id and relationships are sorted and deduplicated.
    pub fn from_parts(
        mut entities: Vec<DocumentedEntity>,
        mut relationships: Vec<Relationship>,
    ) -> Self {
        entities.sort_by_key(|e| e.id);
        relationships.sort();
        relationships.dedup();

        let mut by_name: HashMap<String, Vec<EntityId>> = HashMap::with_capacity(entities.len());
        let mut by_display: HashMap<String, Vec<EntityId>> = HashMap::new();
        for entity in &entities {
            by_name
                .entry(entity.common.name.clone())
                .or_default()
                .push(entity.id);
            by_display
                .entry(entity.common.display_name.clone())
                .or_default()
                .push(entity.id);
        }

        Self {
            entities,
            relationships,
            by_name,
            by_display,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[DocumentedEntity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn get(&self, id: EntityId) -> Option<&DocumentedEntity> {
        self.entities.get(id.index()).filter(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut DocumentedEntity> {
        self.entities.get_mut(id.index()).filter(|e| e.id == id)
    }

    pub fn lookup_id(&self, kind: EntityKind, name: &str) -> Option<EntityId> {
        self.by_name
            .get(name)?
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|e| e.kind() == kind))
    }

    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<&DocumentedEntity> {
        self.lookup_id(kind, name).and_then(|id| self.get(id))
    }

    /// Every entity named `name` regardless of kind, in id order.
    pub fn candidates(&self, name: &str) -> Vec<&DocumentedEntity> {
        self.by_name
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Entities of `kind` whose display name is `display`.
    pub fn with_display_name(&self, kind: EntityKind, display: &str) -> Vec<EntityId> {
        self.by_display
            .get(display)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.get(*id).is_some_and(|e| e.kind() == kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = &DocumentedEntity> + '_ {
        self.entities.iter().filter(move |e| e.kind() == kind)
    }

    pub fn members_of(&self, id: EntityId) -> Vec<&DocumentedEntity> {
        self.get(id)
            .map(|e| e.members().iter().filter_map(|m| self.get(*m)).collect())
            .unwrap_or_default()
    }

    /// Argument entities of a method, by position.
    pub fn arguments_of(&self, id: EntityId) -> Vec<&DocumentedEntity> {
        match self.get(id).map(|e| &e.variant) {
            Some(EntityVariant::Method(m)) => {
                m.arguments.iter().filter_map(|a| self.get(*a)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Categories and extensions whose class name is `class`, in id order.
    pub fn categories_of(&self, class: &str) -> Vec<&DocumentedEntity> {
        self.entities
            .iter()
            .filter(|e| e.extended_class().is_some_and(|r| r.name == class))
            .collect()
    }

    pub fn relations_from(&self, id: EntityId) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.iter().filter(move |r| r.from == id)
    }

    pub fn relations_to(&self, id: EntityId) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.iter().filter(move |r| r.to == id)
    }

    pub fn relations_of_kind(&self, kind: RelationKind) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }

    pub(crate) fn set_relationships(&mut self, mut relationships: Vec<Relationship>) {
        relationships.sort();
        relationships.dedup();
        self.relationships = relationships;
    }

    /// JSON schema of the serialized table.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(TableOwned)).unwrap_or_default()
    }

    pub fn count_by_kind(&self) -> Vec<(EntityKind, usize)> {
        EntityKind::ALL
            .iter()
            .map(|kind| (*kind, self.iter_kind(*kind).count()))
            .collect()
    }
}

#[derive(Serialize)]
struct TableRef<'a> {
    entities: &'a [DocumentedEntity],
    relationships: &'a [Relationship],
}

#[derive(Deserialize, JsonSchema)]
#[schemars(rename = "SymbolTable")]
struct TableOwned {
    entities: Vec<DocumentedEntity>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl Serialize for SymbolTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TableRef {
            entities: &self.entities,
            relationships: &self.relationships,
        }
        .serialize(serializer)
    }
}

// Indices are derived data and get rebuilt on load.
impl<'de> Deserialize<'de> for SymbolTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let owned = TableOwned::deserialize(deserializer)?;
        Ok(Self::from_parts(owned.entities, owned.relationships))
    }
}
