//! Cross-reference resolution.
//!
//! Runs on a frozen [`SymbolTable`] only, after every unit was built.
//! Lookups for all entities run in parallel against the immutable table;
//! their outcomes are then written back entity by entity.

pub mod lookup;

use crate::config::ResolverConfig;
use crate::model::SymbolTable;
use docscope_api::models::{
    Diagnostic, DiagnosticKind, DocumentedEntity, EntityId, EntityKind, EntityVariant,
    Reference, RelationKind, Relationship, SourceLocation,
};
use lookup::{Lookup, context_container, lookup_token};
use rayon::prelude::*;
use std::ops::AddAssign;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub references: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub ambiguous: usize,
    pub relations: usize,
    pub unresolved_relations: usize,
}

impl AddAssign for ResolveStats {
    fn add_assign(&mut self, other: Self) {
        self.references += other.references;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
        self.ambiguous += other.ambiguous;
        self.relations += other.relations;
        self.unresolved_relations += other.unresolved_relations;
    }
}

/// A resolved table plus everything the resolver reported.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ResolveStats,
}

/// Outcome of resolving one entity, computed without mutating the table.
#[derive(Debug)]
struct EntityPlan {
    id: EntityId,
    superclass: Option<EntityId>,
    protocols: Vec<Option<EntityId>>,
    class: Option<EntityId>,
    /// One entry per cross-reference, in [`docscope_api::models::Documentation::cross_refs`] order.
    refs: Vec<Option<EntityId>>,
    relationships: Vec<Relationship>,
    diagnostics: Vec<Diagnostic>,
    stats: ResolveStats,
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, mut table: SymbolTable) -> Resolution {
        let plans: Vec<EntityPlan> = table
            .entities()
            .par_iter()
            .map(|entity| self.plan(&table, entity))
            .collect();

        let mut relationships = table.relationships().to_vec();
        let mut diagnostics = Vec::new();
        let mut stats = ResolveStats::default();
        for mut plan in plans {
            stats += plan.stats;
            relationships.append(&mut plan.relationships);
            diagnostics.append(&mut plan.diagnostics);
            if let Some(entity) = table.get_mut(plan.id) {
                apply(entity, &plan);
            }
        }
        table.set_relationships(relationships);

        info!(
            references = stats.references,
            resolved = stats.resolved,
            unresolved = stats.unresolved,
            ambiguous = stats.ambiguous,
            unresolved_relations = stats.unresolved_relations,
            "Resolved cross-references"
        );
        Resolution {
            table,
            diagnostics,
            stats,
        }
    }

    fn plan(&self, table: &SymbolTable, entity: &DocumentedEntity) -> EntityPlan {
        let mut plan = EntityPlan {
            id: entity.id,
            superclass: None,
            protocols: Vec::new(),
            class: None,
            refs: Vec::new(),
            relationships: Vec::new(),
            diagnostics: Vec::new(),
            stats: ResolveStats::default(),
        };
        let location = entity.common.locations.first();

        if let Some(superclass) = entity.superclass() {
            let target = self.relation(table, entity, superclass, RelationKind::Extends, &mut plan);
            plan.superclass = target;
        }
        for protocol in entity.adopted_protocols() {
            let target = self.relation(table, entity, protocol, RelationKind::Adopts, &mut plan);
            plan.protocols.push(target);
        }
        if let Some(class) = entity.extended_class() {
            let target = self.relation(table, entity, class, RelationKind::BelongsTo, &mut plan);
            plan.class = target;
        }

        let context = context_container(table, entity.id);
        for cross_ref in entity.documentation().cross_refs() {
            plan.stats.references += 1;
            let lookup = lookup_token(table, &cross_ref.token, context);
            match &lookup {
                Lookup::Found(target) => {
                    plan.stats.resolved += 1;
                    plan.relationships.push(Relationship {
                        from: entity.id,
                        to: *target,
                        kind: RelationKind::CrossReferences,
                    });
                }
                Lookup::Ambiguous(candidates) => {
                    plan.stats.ambiguous += 1;
                    let names: Vec<String> = candidates
                        .iter()
                        .filter_map(|id| table.get(*id))
                        .map(|c| format!("{} `{}`", c.kind(), c.name()))
                        .collect();
                    plan.diagnostics.push(located(
                        Diagnostic::warning(
                            DiagnosticKind::AmbiguousReference,
                            format!(
                                "`{}` in the documentation of `{}` could mean {}",
                                cross_ref.literal,
                                entity.name(),
                                names.join(", ")
                            ),
                        )
                        .about(cross_ref.token.clone()),
                        location,
                    ));
                }
                Lookup::Missing => {
                    plan.stats.unresolved += 1;
                    plan.diagnostics.push(located(
                        Diagnostic::warning(
                            DiagnosticKind::UnresolvedReference,
                            format!(
                                "`{}` in the documentation of `{}` does not name a known symbol",
                                cross_ref.literal,
                                entity.name()
                            ),
                        )
                        .about(cross_ref.token.clone()),
                        location,
                    ));
                }
            }
            plan.refs.push(lookup.target());
        }
        plan
    }

    /// Resolve a superclass, adopted protocol or owning class by exact
    /// (kind, name) lookup.
    fn relation(
        &self,
        table: &SymbolTable,
        entity: &DocumentedEntity,
        reference: &Reference,
        relation: RelationKind,
        plan: &mut EntityPlan,
    ) -> Option<EntityId> {
        let (kind, role) = match relation {
            RelationKind::Extends => (EntityKind::Class, "superclass"),
            RelationKind::Adopts => (EntityKind::Protocol, "protocol"),
            _ => (EntityKind::Class, "class"),
        };
        match table.lookup_id(kind, &reference.name) {
            Some(target) => {
                plan.stats.relations += 1;
                plan.relationships.push(Relationship {
                    from: entity.id,
                    to: target,
                    kind: relation,
                });
                Some(target)
            }
            None => {
                plan.stats.unresolved_relations += 1;
                if self.config.report_unresolved_relations {
                    plan.diagnostics.push(located(
                        Diagnostic::warning(
                            DiagnosticKind::UnresolvedRelation,
                            format!(
                                "{role} `{}` of `{}` is not declared in the input",
                                reference.name,
                                entity.name()
                            ),
                        )
                        .about(reference.name.clone()),
                        entity.common.locations.first(),
                    ));
                }
                None
            }
        }
    }
}

fn located(diagnostic: Diagnostic, location: Option<&SourceLocation>) -> Diagnostic {
    match location {
        Some(location) => diagnostic.at(location.clone()),
        None => diagnostic,
    }
}

fn apply(entity: &mut DocumentedEntity, plan: &EntityPlan) {
    match &mut entity.variant {
        EntityVariant::Class(class) => {
            if let Some(superclass) = class.superclass.as_mut() {
                superclass.target = plan.superclass;
            }
            set_targets(&mut class.protocols, &plan.protocols);
        }
        EntityVariant::Category(category) | EntityVariant::Extension(category) => {
            category.class.target = plan.class;
            set_targets(&mut category.protocols, &plan.protocols);
        }
        EntityVariant::Protocol(protocol) => set_targets(&mut protocol.protocols, &plan.protocols),
        _ => {}
    }
    for (cross_ref, target) in entity
        .common
        .documentation
        .cross_refs_mut()
        .into_iter()
        .zip(&plan.refs)
    {
        cross_ref.target = *target;
    }
}

fn set_targets(references: &mut [Reference], targets: &[Option<EntityId>]) {
    for (reference, target) in references.iter_mut().zip(targets) {
        reference.target = *target;
    }
}
