use super::documentation::Documentation;
use super::kind::{EntityKind, MethodScope};
use super::location::SourceLocation;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an entity inside a finalized symbol table.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A by-name reference to another entity. `target` stays empty until the
/// resolver finds a unique match; the literal name is never dropped.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct Reference {
    pub name: String,
    pub target: Option<EntityId>,
}

impl Reference {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// Fields every entity variant shares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct EntityCommon {
    /// Canonical, unique-per-kind name (`Foo(Bar)`, `-[Foo doThing:]`).
    pub name: String,
    /// Short name for display (`Bar`, `doThing:`).
    pub display_name: String,
    pub documentation: Documentation,
    /// Every place this entity was declared, in canonical order.
    pub locations: Vec<SourceLocation>,
    pub attributes: Vec<String>,
    pub deprecated: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ClassInfo {
    pub superclass: Option<Reference>,
    pub protocols: Vec<Reference>,
    pub members: Vec<EntityId>,
}

/// Category or extension of a class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct CategoryInfo {
    pub class: Reference,
    pub category_name: Option<String>,
    pub protocols: Vec<Reference>,
    pub members: Vec<EntityId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ProtocolInfo {
    pub protocols: Vec<Reference>,
    pub members: Vec<EntityId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct MethodInfo {
    pub owner: EntityId,
    pub scope: MethodScope,
    pub selector: String,
    pub return_type: Option<String>,
    pub arguments: Vec<EntityId>,
    pub variadic: bool,
    pub optional: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct PropertyInfo {
    pub owner: EntityId,
    pub type_name: String,
    pub attributes: Vec<String>,
    pub optional: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ArgumentInfo {
    /// The method declaring this argument.
    pub owner: EntityId,
    pub position: usize,
    pub selector_part: String,
    pub type_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityVariant {
    Class(ClassInfo),
    Category(CategoryInfo),
    Extension(CategoryInfo),
    Protocol(ProtocolInfo),
    Method(MethodInfo),
    Property(PropertyInfo),
    Argument(ArgumentInfo),
}

/// Canonical, deduplicated model node for one named symbol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct DocumentedEntity {
    pub id: EntityId,
    #[serde(flatten)]
    pub common: EntityCommon,
    pub variant: EntityVariant,
}

impl DocumentedEntity {
    pub fn kind(&self) -> EntityKind {
        match &self.variant {
            EntityVariant::Class(_) => EntityKind::Class,
            EntityVariant::Category(_) => EntityKind::Category,
            EntityVariant::Extension(_) => EntityKind::Extension,
            EntityVariant::Protocol(_) => EntityKind::Protocol,
            EntityVariant::Method(_) => EntityKind::Method,
            EntityVariant::Property(_) => EntityKind::Property,
            EntityVariant::Argument(_) => EntityKind::Argument,
        }
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn documentation(&self) -> &Documentation {
        &self.common.documentation
    }

    /// Owning entity of a method, property or argument.
    pub fn owner(&self) -> Option<EntityId> {
        match &self.variant {
            EntityVariant::Method(m) => Some(m.owner),
            EntityVariant::Property(p) => Some(p.owner),
            EntityVariant::Argument(a) => Some(a.owner),
            _ => None,
        }
    }

    /// Methods and properties of a container.
    pub fn members(&self) -> &[EntityId] {
        match &self.variant {
            EntityVariant::Class(c) => &c.members,
            EntityVariant::Category(c) | EntityVariant::Extension(c) => &c.members,
            EntityVariant::Protocol(p) => &p.members,
            _ => &[],
        }
    }

    pub fn adopted_protocols(&self) -> &[Reference] {
        match &self.variant {
            EntityVariant::Class(c) => &c.protocols,
            EntityVariant::Category(c) | EntityVariant::Extension(c) => &c.protocols,
            EntityVariant::Protocol(p) => &p.protocols,
            _ => &[],
        }
    }

    pub fn superclass(&self) -> Option<&Reference> {
        match &self.variant {
            EntityVariant::Class(c) => c.superclass.as_ref(),
            _ => None,
        }
    }

    /// Owning class of a category or extension.
    pub fn extended_class(&self) -> Option<&Reference> {
        match &self.variant {
            EntityVariant::Category(c) | EntityVariant::Extension(c) => Some(&c.class),
            _ => None,
        }
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Class to superclass.
    Extends,
    /// Class, category, extension or protocol to an adopted protocol.
    Adopts,
    /// Member to owner, argument to method, category or extension to its class.
    BelongsTo,
    /// Documentation mention to its target.
    CrossReferences,
}

/// Resolved, directed edge between two entities.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct Relationship {
    pub from: EntityId,
    pub to: EntityId,
    pub kind: RelationKind,
}
