//! Name lookup policy for reference tokens.

use crate::model::SymbolTable;
use docscope_api::models::naming::{RefShape, category_name, parse_ref_token};
use docscope_api::models::{EntityId, EntityKind, EntityVariant, MethodScope};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(EntityId),
    /// Several equally specific matches, in id order.
    Ambiguous(Vec<EntityId>),
    Missing,
}

impl Lookup {
    fn from_candidates(mut ids: Vec<EntityId>) -> Self {
        ids.sort();
        ids.dedup();
        match ids.len() {
            0 => Lookup::Missing,
            1 => Lookup::Found(ids[0]),
            _ => Lookup::Ambiguous(ids),
        }
    }

    pub fn target(&self) -> Option<EntityId> {
        match self {
            Lookup::Found(id) => Some(*id),
            _ => None,
        }
    }
}

/// Container a documented entity belongs to: containers are their own,
/// members use their owner and arguments the owner of their method.
pub fn context_container(table: &SymbolTable, id: EntityId) -> Option<EntityId> {
    let entity = table.get(id)?;
    if entity.kind().is_container() {
        return Some(id);
    }
    let owner = table.get(entity.owner()?)?;
    if owner.kind().is_container() {
        Some(owner.id)
    } else {
        owner.owner()
    }
}

/// Resolve a comment token written in the documentation of `context`.
pub fn lookup_token(table: &SymbolTable, token: &str, context: Option<EntityId>) -> Lookup {
    match parse_ref_token(token) {
        // A class and a protocol may share a name; prose means the class.
        Some(RefShape::Symbol(name)) => table
            .lookup_id(EntityKind::Class, &name)
            .or_else(|| table.lookup_id(EntityKind::Protocol, &name))
            .map_or(Lookup::Missing, Lookup::Found),
        Some(RefShape::Category { class, category }) => {
            let kind = if category.is_some() {
                EntityKind::Category
            } else {
                EntityKind::Extension
            };
            table
                .lookup_id(kind, &category_name(&class, category.as_deref()))
                .map_or(Lookup::Missing, Lookup::Found)
        }
        Some(RefShape::Member {
            scope,
            owner,
            member,
        }) => lookup_member(table, scope, &owner, &member),
        Some(RefShape::Selector(selector)) => lookup_selector(table, &selector, context),
        None => Lookup::Missing,
    }
}

/// Containers searched for `owner`: an explicit category, or the class, its
/// categories and extensions, then a protocol of that name.
fn owner_containers(table: &SymbolTable, owner: &str) -> Vec<EntityId> {
    if owner.contains('(') {
        return [EntityKind::Category, EntityKind::Extension]
            .into_iter()
            .filter_map(|kind| table.lookup_id(kind, owner))
            .collect();
    }
    let mut containers: Vec<EntityId> =
        table.lookup_id(EntityKind::Class, owner).into_iter().collect();
    containers.extend(table.categories_of(owner).into_iter().map(|c| c.id));
    containers.extend(table.lookup_id(EntityKind::Protocol, owner));
    containers
}

/// Containers related to `container` for local lookups, nearest first.
fn related_containers(table: &SymbolTable, container: EntityId) -> Vec<EntityId> {
    let Some(entity) = table.get(container) else {
        return Vec::new();
    };
    let class_name = match entity.extended_class() {
        Some(class) => class.name.as_str(),
        None if entity.kind() == EntityKind::Class => entity.name(),
        None => return vec![container],
    };
    let mut related = vec![container];
    related.extend(table.lookup_id(EntityKind::Class, class_name));
    related.extend(table.categories_of(class_name).into_iter().map(|c| c.id));
    let mut seen = HashSet::new();
    related.retain(|id| seen.insert(*id));
    related
}

fn members_named(
    table: &SymbolTable,
    container: EntityId,
    scope: Option<MethodScope>,
    member: &str,
) -> Vec<EntityId> {
    table
        .members_of(container)
        .into_iter()
        .filter(|m| m.common.display_name == member)
        .filter(|m| match (&m.variant, scope) {
            (EntityVariant::Method(info), Some(scope)) => info.scope == scope,
            (EntityVariant::Property(_), Some(_)) => false,
            _ => true,
        })
        .map(|m| m.id)
        .collect()
}

fn lookup_member(
    table: &SymbolTable,
    scope: Option<MethodScope>,
    owner: &str,
    member: &str,
) -> Lookup {
    for container in owner_containers(table, owner) {
        let hits = members_named(table, container, scope, member);
        if !hits.is_empty() {
            return Lookup::from_candidates(hits);
        }
    }
    Lookup::Missing
}

/// A bare selector: the documenting container and its relatives first, then
/// any method in the table with that selector.
fn lookup_selector(table: &SymbolTable, selector: &str, context: Option<EntityId>) -> Lookup {
    if let Some(context) = context {
        for container in related_containers(table, context) {
            let hits = members_named(table, container, None, selector);
            if !hits.is_empty() {
                return Lookup::from_candidates(hits);
            }
        }
    }
    Lookup::from_candidates(table.with_display_name(EntityKind::Method, selector))
}
