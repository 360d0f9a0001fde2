//! Symbol model builder.
//!
//! Units are ingested concurrently. Every (kind, name) key owns one entry of
//! a `DashMap`, so sightings of the same entity are appended under that
//! entry's shard lock while unrelated keys proceed in parallel. Nothing is
//! merged until [`SymbolTableBuilder::freeze`]: sightings are sorted into
//! canonical source order there and folded, so the outcome does not depend
//! on the order in which units were ingested.

use crate::config::ResolverConfig;
use crate::markup::MarkupParser;
use crate::model::SymbolTable;
use dashmap::DashMap;
use docscope_api::models::naming::{argument_name, method_name, property_name};
use docscope_api::models::util::collapse_whitespace;
use docscope_api::models::{
    ArgumentInfo, AssociatedDeclaration, AssociationOutput, CategoryInfo, ClassInfo,
    DeclarationDetail, Diagnostic, DiagnosticKind, DocSection, DocText, DocumentedEntity,
    Documentation, EntityCommon, EntityId, EntityKind, EntityVariant, MethodInfo, MethodScope,
    ParamDoc, PropertyInfo, ProtocolInfo, Range, Reference, RelationKind, Relationship,
    SourceLocation,
};
use lasso::{Spur, ThreadedRodeo};
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SymbolKey {
    kind: EntityKind,
    name: Spur,
}

#[derive(Debug, Clone)]
enum SightingDetail {
    Class {
        superclass: Option<String>,
        protocols: Vec<String>,
    },
    Category {
        class: String,
        category: Option<String>,
        protocols: Vec<String>,
    },
    Protocol {
        protocols: Vec<String>,
    },
    Method {
        owner: SymbolKey,
        scope: MethodScope,
        selector: String,
        return_type: Option<String>,
        variadic: bool,
        optional: bool,
    },
    Property {
        owner: SymbolKey,
        type_name: String,
        attributes: Vec<String>,
        optional: bool,
    },
    Argument {
        owner: SymbolKey,
        position: usize,
        selector_part: String,
        type_name: Option<String>,
    },
}

impl SightingDetail {
    fn owner(&self) -> Option<SymbolKey> {
        match self {
            SightingDetail::Method { owner, .. }
            | SightingDetail::Property { owner, .. }
            | SightingDetail::Argument { owner, .. } => Some(*owner),
            _ => None,
        }
    }
}

/// One declaration of an entity, as found in one unit.
#[derive(Debug, Clone)]
struct Sighting {
    location: SourceLocation,
    display_name: String,
    documentation: Documentation,
    attributes: Vec<String>,
    deprecated: bool,
    detail: SightingDetail,
}

/// Collects sightings from every unit; [`Self::freeze`] turns them into a [`SymbolTable`].
pub struct SymbolTableBuilder {
    rodeo: ThreadedRodeo,
    entries: DashMap<SymbolKey, Vec<Sighting>>,
    parser: MarkupParser,
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl SymbolTableBuilder {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
            entries: DashMap::new(),
            parser: MarkupParser::new(config),
        }
    }

    /// Number of distinct (kind, name) keys seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times (kind, name) has been declared so far.
    pub fn sightings(&self, kind: EntityKind, name: &str) -> usize {
        let Some(name) = self.rodeo.get(name) else {
            return 0;
        };
        self.entries
            .get(&SymbolKey { kind, name })
            .map_or(0, |entry| entry.len())
    }

    fn key(&self, kind: EntityKind, name: &str) -> SymbolKey {
        SymbolKey {
            kind,
            name: self.rodeo.get_or_intern(name),
        }
    }

    fn record(&self, key: SymbolKey, sighting: Sighting) {
        self.entries.entry(key).or_default().push(sighting);
    }

    /// Documentation of one declaration: the leading comment, gaps filled
    /// from the same-line trailing comment.
    fn documentation_of(&self, associated: &AssociatedDeclaration) -> Documentation {
        let mut documentation = associated
            .comment
            .as_ref()
            .map(|c| self.parser.parse(&c.text))
            .unwrap_or_default();
        if let Some(trailing) = &associated.trailing {
            documentation.fill_gaps_from(&self.parser.parse(&trailing.text));
        }
        documentation
    }

    /// Record every declaration of one associated unit.
    ///
    /// Returns the unit's association diagnostics followed by the builder's own.
    pub fn ingest(&self, output: AssociationOutput) -> Vec<Diagnostic> {
        let AssociationOutput {
            file,
            declarations,
            mut diagnostics,
        } = output;

        // Canonical name and key per declaration index, for member lookups.
        let mut containers: Vec<Option<(SymbolKey, String)>> = Vec::with_capacity(declarations.len());

        for associated in &declarations {
            let declaration = &associated.declaration;
            let mut documentation = self.documentation_of(associated);
            let owner = declaration
                .parent
                .and_then(|p| containers.get(p).cloned().flatten());

            let (name, display_name, detail) = match &declaration.detail {
                DeclarationDetail::Class(class) => (
                    declaration.name.to_string(),
                    declaration.name.to_string(),
                    SightingDetail::Class {
                        superclass: class.superclass.as_ref().map(|s| s.to_string()),
                        protocols: class.protocols.iter().map(|p| p.to_string()).collect(),
                    },
                ),
                DeclarationDetail::Category(category) | DeclarationDetail::Extension(category) => {
                    let display_name = match &category.category_name {
                        Some(name) => name.to_string(),
                        None => declaration.name.to_string(),
                    };
                    (
                        declaration.name.to_string(),
                        display_name,
                        SightingDetail::Category {
                            class: category.class_name.to_string(),
                            category: category.category_name.as_ref().map(|c| c.to_string()),
                            protocols: category.protocols.iter().map(|p| p.to_string()).collect(),
                        },
                    )
                }
                DeclarationDetail::Protocol(protocol) => (
                    declaration.name.to_string(),
                    declaration.name.to_string(),
                    SightingDetail::Protocol {
                        protocols: protocol.protocols.iter().map(|p| p.to_string()).collect(),
                    },
                ),
                DeclarationDetail::Method(method) => {
                    let Some((owner_key, owner_name)) = owner else {
                        debug!(name = %declaration.name, "Skipping method without a container");
                        containers.push(None);
                        continue;
                    };
                    let name = method_name(method.scope, &owner_name, &declaration.name);
                    self.document_arguments(&mut documentation, associated);
                    diagnostics.extend(unknown_parameters(&name, &documentation, associated));

                    let method_key = self.key(EntityKind::Method, &name);
                    for (position, argument) in method.arguments.iter().enumerate() {
                        let argument_doc = documentation
                            .param(&argument.name)
                            .filter(|p| !p.description.is_empty())
                            .map(|p| Documentation {
                                // Refs stay with the method's parameter section only.
                                abstract_text: Some(DocText::new(p.description.text.clone())),
                                ..Default::default()
                            })
                            .unwrap_or_default();
                        let end_col = argument.col + argument.name.len();
                        let full_name = argument_name(&name, position);
                        self.record(
                            self.key(EntityKind::Argument, &full_name),
                            Sighting {
                                location: SourceLocation::new(
                                    file.clone(),
                                    Range::new(argument.line, argument.col, argument.line, end_col),
                                ),
                                display_name: argument.name.to_string(),
                                documentation: argument_doc,
                                attributes: Vec::new(),
                                deprecated: false,
                                detail: SightingDetail::Argument {
                                    owner: method_key,
                                    position,
                                    selector_part: argument.selector_part.to_string(),
                                    type_name: argument.type_name.clone(),
                                },
                            },
                        );
                    }

                    (
                        name,
                        declaration.name.to_string(),
                        SightingDetail::Method {
                            owner: owner_key,
                            scope: method.scope,
                            selector: declaration.name.to_string(),
                            return_type: method.return_type.clone(),
                            variadic: method.variadic,
                            optional: method.optional,
                        },
                    )
                }
                DeclarationDetail::Property(property) => {
                    let Some((owner_key, owner_name)) = owner else {
                        debug!(name = %declaration.name, "Skipping property without a container");
                        containers.push(None);
                        continue;
                    };
                    (
                        property_name(&owner_name, &declaration.name),
                        declaration.name.to_string(),
                        SightingDetail::Property {
                            owner: owner_key,
                            type_name: property.type_name.clone(),
                            attributes: property.attributes.iter().map(|a| a.to_string()).collect(),
                            optional: property.optional,
                        },
                    )
                }
            };

            let key = self.key(declaration.kind, &name);
            let deprecated =
                declaration.is_deprecated_by_attribute() || documentation.is_deprecated();
            self.record(
                key,
                Sighting {
                    location: declaration.location.clone(),
                    display_name,
                    documentation,
                    attributes: declaration.attributes.iter().map(|a| a.to_string()).collect(),
                    deprecated,
                    detail,
                },
            );
            containers.push(declaration.kind.is_container().then(|| (key, name)));
        }

        debug!(file = %file, declarations = declarations.len(), "Ingested unit");
        diagnostics
    }

    /// Fill missing `@param` sections from comments trailing individual
    /// arguments, then order parameters by argument position.
    fn document_arguments(&self, documentation: &mut Documentation, associated: &AssociatedDeclaration) {
        let arguments = associated.declaration.arguments();
        for (position, comment) in &associated.argument_comments {
            let Some(argument) = arguments.get(*position) else {
                continue;
            };
            if documentation.param(&argument.name).is_some() {
                continue;
            }
            let name = argument.name.to_string();
            let description = self
                .parser
                .doc_text(comment.text.trim().to_string(), DocSection::Parameter(name.clone()));
            documentation.params.push(ParamDoc { name, description });
        }
        documentation.params.sort_by_key(|p| {
            arguments
                .iter()
                .position(|a| a.name == p.name)
                .unwrap_or(usize::MAX)
        });
    }

    /// Fold all sightings into the finalized table.
    ///
    /// Entity ids follow (kind, name) order. Returns merge-conflict diagnostics.
    pub fn freeze(self) -> (SymbolTable, Vec<Diagnostic>) {
        let rodeo = self.rodeo;
        let mut drafts: Vec<(SymbolKey, String, Vec<Sighting>)> = self
            .entries
            .into_iter()
            .map(|(key, mut sightings)| {
                sightings.sort_by(|a, b| a.location.cmp(&b.location));
                (key, rodeo.resolve(&key.name).to_string(), sightings)
            })
            .collect();

        let present: HashSet<SymbolKey> = drafts.iter().map(|(key, _, _)| *key).collect();
        drafts.retain(|(_, _, sightings)| {
            sightings
                .first()
                .and_then(|s| s.detail.owner())
                .is_none_or(|owner| present.contains(&owner))
        });
        drafts.sort_by(|a, b| (a.0.kind, &a.1).cmp(&(b.0.kind, &b.1)));

        let ids: HashMap<SymbolKey, EntityId> = drafts
            .iter()
            .enumerate()
            .map(|(i, (key, _, _))| (*key, EntityId(i as u32)))
            .collect();

        let mut diagnostics = Vec::new();
        let mut entities = Vec::with_capacity(drafts.len());
        let mut memberships: Vec<(EntityId, SourceLocation, EntityId)> = Vec::new();
        let mut arguments: Vec<(EntityId, usize, EntityId)> = Vec::new();
        let mut relationships = Vec::new();

        for (index, (_, name, sightings)) in drafts.into_iter().enumerate() {
            let id = EntityId(index as u32);
            let Some(first) = sightings.first() else {
                continue;
            };
            let variant = Folder {
                name: &name,
                rodeo: &rodeo,
                diagnostics: &mut diagnostics,
            }
            .fold_variant(&sightings, &ids);

            if let Some(owner) = variant_owner(&variant) {
                relationships.push(Relationship {
                    from: id,
                    to: owner,
                    kind: RelationKind::BelongsTo,
                });
                match &variant {
                    EntityVariant::Argument(argument) => {
                        arguments.push((owner, argument.position, id))
                    }
                    _ => memberships.push((owner, first.location.clone(), id)),
                }
            }

            let mut documentation = first.documentation.clone();
            for sighting in &sightings[1..] {
                documentation.fill_gaps_from(&sighting.documentation);
            }
            let mut attributes: Vec<String> = Vec::new();
            for sighting in &sightings {
                union(&mut attributes, &sighting.attributes);
            }
            let mut locations: Vec<SourceLocation> =
                sightings.iter().map(|s| s.location.clone()).collect();
            locations.dedup();

            entities.push(DocumentedEntity {
                id,
                common: EntityCommon {
                    display_name: first.display_name.clone(),
                    name,
                    documentation,
                    locations,
                    attributes,
                    deprecated: sightings.iter().any(|s| s.deprecated),
                },
                variant,
            });
        }

        memberships.sort();
        for (owner, _, member) in memberships {
            if let Some(members) = entities.get_mut(owner.index()).and_then(members_mut) {
                members.push(member);
            }
        }
        arguments.sort();
        for (method, _, argument) in arguments {
            if let Some(EntityVariant::Method(info)) =
                entities.get_mut(method.index()).map(|e| &mut e.variant)
            {
                info.arguments.push(argument);
            }
        }

        debug!(
            entities = entities.len(),
            conflicts = diagnostics.len(),
            "Froze symbol table"
        );
        (SymbolTable::from_parts(entities, relationships), diagnostics)
    }
}

fn variant_owner(variant: &EntityVariant) -> Option<EntityId> {
    match variant {
        EntityVariant::Method(m) => Some(m.owner),
        EntityVariant::Property(p) => Some(p.owner),
        EntityVariant::Argument(a) => Some(a.owner),
        _ => None,
    }
}

fn members_mut(entity: &mut DocumentedEntity) -> Option<&mut Vec<EntityId>> {
    match &mut entity.variant {
        EntityVariant::Class(c) => Some(&mut c.members),
        EntityVariant::Category(c) | EntityVariant::Extension(c) => Some(&mut c.members),
        EntityVariant::Protocol(p) => Some(&mut p.members),
        _ => None,
    }
}

fn unknown_parameters(
    method: &str,
    documentation: &Documentation,
    associated: &AssociatedDeclaration,
) -> Vec<Diagnostic> {
    let arguments = associated.declaration.arguments();
    let location = associated
        .comment
        .as_ref()
        .map(|c| c.location.clone())
        .unwrap_or_else(|| associated.declaration.location.clone());
    documentation
        .params
        .iter()
        .filter(|p| !arguments.iter().any(|a| a.name == p.name))
        .map(|p| {
            Diagnostic::warning(
                DiagnosticKind::UnknownParameter,
                format!("`{method}` has no parameter named `{}`", p.name),
            )
            .at(location.clone())
            .about(method.to_string())
        })
        .collect()
}

fn union(into: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !into.contains(item) {
            into.push(item.clone());
        }
    }
}

/// Folds the kind-specific metadata of one entity's sightings, first
/// sighting winning and later disagreements reported.
struct Folder<'a> {
    name: &'a str,
    rodeo: &'a ThreadedRodeo,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl Folder<'_> {
    fn conflict(&mut self, sighting: &Sighting, message: String) {
        self.diagnostics.push(
            Diagnostic::warning(DiagnosticKind::MergeConflict, message)
                .at(sighting.location.clone())
                .about(self.name.to_string()),
        );
    }

    fn check_owner(&mut self, first: SymbolKey, sighting: &Sighting) {
        if let Some(owner) = sighting.detail.owner().filter(|o| *o != first) {
            let message = format!(
                "`{}` is declared by {} `{}` and by {} `{}`; keeping the first",
                self.name,
                first.kind,
                self.rodeo.resolve(&first.name),
                owner.kind,
                self.rodeo.resolve(&owner.name),
            );
            self.conflict(sighting, message);
        }
    }

    fn fold_variant(&mut self, sightings: &[Sighting], ids: &HashMap<SymbolKey, EntityId>) -> EntityVariant {
        let owner_id = |key: SymbolKey| ids.get(&key).copied().unwrap_or(EntityId(u32::MAX));
        let first = &sightings[0];
        let rest = &sightings[1..];

        match &first.detail {
            SightingDetail::Class {
                superclass,
                protocols,
            } => {
                let mut superclass = superclass.clone();
                let mut protocols = protocols.clone();
                for sighting in rest {
                    if let SightingDetail::Class {
                        superclass: other,
                        protocols: more,
                    } = &sighting.detail
                    {
                        match (&superclass, other) {
                            (None, Some(other)) => superclass = Some(other.clone()),
                            (Some(kept), Some(other)) if kept != other => {
                                let message = format!(
                                    "`{}` declares superclass `{other}` here but `{kept}` elsewhere; keeping `{kept}`",
                                    self.name
                                );
                                self.conflict(sighting, message);
                            }
                            _ => {}
                        }
                        union(&mut protocols, more);
                    }
                }
                EntityVariant::Class(ClassInfo {
                    superclass: superclass.map(Reference::pending),
                    protocols: protocols.into_iter().map(Reference::pending).collect(),
                    members: Vec::new(),
                })
            }
            SightingDetail::Category {
                class,
                category,
                protocols,
            } => {
                let mut protocols = protocols.clone();
                for sighting in rest {
                    if let SightingDetail::Category { protocols: more, .. } = &sighting.detail {
                        union(&mut protocols, more);
                    }
                }
                let info = CategoryInfo {
                    class: Reference::pending(class.clone()),
                    category_name: category.clone(),
                    protocols: protocols.into_iter().map(Reference::pending).collect(),
                    members: Vec::new(),
                };
                if category.is_some() {
                    EntityVariant::Category(info)
                } else {
                    EntityVariant::Extension(info)
                }
            }
            SightingDetail::Protocol { protocols } => {
                let mut protocols = protocols.clone();
                for sighting in rest {
                    if let SightingDetail::Protocol { protocols: more } = &sighting.detail {
                        union(&mut protocols, more);
                    }
                }
                EntityVariant::Protocol(ProtocolInfo {
                    protocols: protocols.into_iter().map(Reference::pending).collect(),
                    members: Vec::new(),
                })
            }
            SightingDetail::Method {
                owner,
                scope,
                selector,
                return_type,
                variadic,
                optional,
            } => {
                let mut return_type = return_type.clone();
                for sighting in rest {
                    self.check_owner(*owner, sighting);
                    if let SightingDetail::Method {
                        return_type: Some(other),
                        ..
                    } = &sighting.detail
                    {
                        return_type.get_or_insert_with(|| other.clone());
                    }
                }
                EntityVariant::Method(MethodInfo {
                    owner: owner_id(*owner),
                    scope: *scope,
                    selector: selector.clone(),
                    return_type,
                    arguments: Vec::new(),
                    variadic: *variadic,
                    optional: *optional,
                })
            }
            SightingDetail::Property {
                owner,
                type_name,
                attributes,
                optional,
            } => {
                let mut type_name = type_name.clone();
                let mut attributes = attributes.clone();
                for sighting in rest {
                    self.check_owner(*owner, sighting);
                    if let SightingDetail::Property {
                        type_name: other,
                        attributes: more,
                        ..
                    } = &sighting.detail
                    {
                        if type_name.is_empty() {
                            type_name = other.clone();
                        } else if !other.is_empty()
                            && collapse_whitespace(other) != collapse_whitespace(&type_name)
                        {
                            let message = format!(
                                "`{}` is declared with type `{other}` here but `{type_name}` elsewhere; keeping `{type_name}`",
                                self.name
                            );
                            self.conflict(sighting, message);
                        }
                        union(&mut attributes, more);
                    }
                }
                EntityVariant::Property(PropertyInfo {
                    owner: owner_id(*owner),
                    type_name,
                    attributes,
                    optional: *optional,
                })
            }
            SightingDetail::Argument {
                owner,
                position,
                selector_part,
                type_name,
            } => {
                let mut type_name = type_name.clone();
                for sighting in rest {
                    if let SightingDetail::Argument {
                        type_name: Some(other),
                        ..
                    } = &sighting.detail
                    {
                        type_name.get_or_insert_with(|| other.clone());
                    }
                }
                EntityVariant::Argument(ArgumentInfo {
                    owner: owner_id(*owner),
                    position: *position,
                    selector_part: selector_part.clone(),
                    type_name,
                })
            }
        }
    }
}

impl std::fmt::Debug for SymbolTableBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTableBuilder")
            .field("keys", &self.entries.len())
            .finish()
    }
}
