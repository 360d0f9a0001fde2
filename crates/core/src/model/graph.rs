//! Relation graph over a resolved symbol table.

use super::table::SymbolTable;
use docscope_api::models::{EntityId, EntityKind, RelationKind};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// One class and its subclasses, recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    pub id: EntityId,
    pub name: String,
    pub children: Vec<HierarchyNode>,
}

/// Directed graph of entities and their resolved relationships.
///
/// Cross-reference edges may form cycles; every traversal here tracks
/// visited nodes.
pub struct RelationGraph<'a> {
    table: &'a SymbolTable,
    topology: StableDiGraph<EntityId, RelationKind>,
    index: HashMap<EntityId, NodeIndex>,
}

impl<'a> RelationGraph<'a> {
    pub fn from_table(table: &'a SymbolTable) -> Self {
        let mut topology = StableDiGraph::with_capacity(table.len(), table.relationships().len());
        let mut index = HashMap::with_capacity(table.len());
        for entity in table.entities() {
            index.insert(entity.id, topology.add_node(entity.id));
        }
        for relation in table.relationships() {
            if let (Some(&from), Some(&to)) = (index.get(&relation.from), index.get(&relation.to)) {
                topology.add_edge(from, to, relation.kind);
            }
        }
        Self {
            table,
            topology,
            index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    fn neighbors(&self, id: EntityId, kind: RelationKind, direction: Direction) -> Vec<EntityId> {
        let Some(&node) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<EntityId> = self
            .topology
            .edges_directed(node, direction)
            .filter(|e| *e.weight() == kind)
            .map(|e| match direction {
                Direction::Outgoing => self.topology[e.target()],
                Direction::Incoming => self.topology[e.source()],
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn outgoing(&self, id: EntityId, kind: RelationKind) -> Vec<EntityId> {
        self.neighbors(id, kind, Direction::Outgoing)
    }

    pub fn incoming(&self, id: EntityId, kind: RelationKind) -> Vec<EntityId> {
        self.neighbors(id, kind, Direction::Incoming)
    }

    /// Direct subclasses of a class.
    pub fn subclasses(&self, id: EntityId) -> Vec<EntityId> {
        self.incoming(id, RelationKind::Extends)
    }

    /// Classes, categories, extensions and protocols adopting a protocol.
    pub fn adopters(&self, id: EntityId) -> Vec<EntityId> {
        self.incoming(id, RelationKind::Adopts)
    }

    /// Entities whose documentation mentions `id`.
    pub fn referenced_by(&self, id: EntityId) -> Vec<EntityId> {
        self.incoming(id, RelationKind::CrossReferences)
    }

    /// Resolved superclasses from the direct parent upwards. Stops at the
    /// first unresolved superclass or at a cycle.
    pub fn superclass_chain(&self, id: EntityId) -> Vec<EntityId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = id;
        while let Some(&parent) = self.outgoing(current, RelationKind::Extends).first() {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Class forest rooted at classes without a resolved superclass, sorted by name.
    pub fn class_hierarchy(&self) -> Vec<HierarchyNode> {
        let mut roots: Vec<EntityId> = self
            .table
            .iter_kind(EntityKind::Class)
            .filter(|c| self.outgoing(c.id, RelationKind::Extends).is_empty())
            .map(|c| c.id)
            .collect();
        self.sort_by_name(&mut roots);

        let mut seen = HashSet::new();
        let mut forest: Vec<HierarchyNode> = roots
            .into_iter()
            .filter_map(|id| self.hierarchy_node(id, &mut seen))
            .collect();

        // Classes caught in a superclass cycle have no root; list them flat.
        let mut leftover: Vec<EntityId> = self
            .table
            .iter_kind(EntityKind::Class)
            .map(|c| c.id)
            .filter(|id| !seen.contains(id))
            .collect();
        self.sort_by_name(&mut leftover);
        for id in leftover {
            if let Some(node) = self.hierarchy_node(id, &mut seen) {
                forest.push(node);
            }
        }
        forest
    }

    fn hierarchy_node(&self, id: EntityId, seen: &mut HashSet<EntityId>) -> Option<HierarchyNode> {
        if !seen.insert(id) {
            return None;
        }
        let name = self.table.get(id)?.name().to_string();
        let mut children = self.subclasses(id);
        self.sort_by_name(&mut children);
        let children = children
            .into_iter()
            .filter_map(|child| self.hierarchy_node(child, seen))
            .collect();
        Some(HierarchyNode { id, name, children })
    }

    fn sort_by_name(&self, ids: &mut [EntityId]) {
        ids.sort_by(|a, b| {
            let name = |id: &EntityId| self.table.get(*id).map(|e| e.name().to_string());
            name(a).cmp(&name(b))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscope_api::models::{
        ClassInfo, Documentation, DocumentedEntity, EntityCommon, EntityVariant, Reference,
        Relationship,
    };

    fn class(id: u32, name: &str, superclass: Option<&str>) -> DocumentedEntity {
        DocumentedEntity {
            id: EntityId(id),
            common: EntityCommon {
                name: name.to_string(),
                display_name: name.to_string(),
                documentation: Documentation::default(),
                locations: Vec::new(),
                attributes: Vec::new(),
                deprecated: false,
            },
            variant: EntityVariant::Class(ClassInfo {
                superclass: superclass.map(Reference::pending),
                protocols: Vec::new(),
                members: Vec::new(),
            }),
        }
    }

    fn extends(from: u32, to: u32) -> Relationship {
        Relationship {
            from: EntityId(from),
            to: EntityId(to),
            kind: RelationKind::Extends,
        }
    }

    #[test]
    fn test_hierarchy_sorted_by_name() {
        let table = SymbolTable::from_parts(
            vec![
                class(0, "Animal", None),
                class(1, "Dog", Some("Animal")),
                class(2, "Cat", Some("Animal")),
                class(3, "Widget", Some("NSObject")),
            ],
            vec![extends(1, 0), extends(2, 0)],
        );
        let graph = RelationGraph::from_table(&table);
        let forest = graph.class_hierarchy();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].name, "Animal");
        let children: Vec<_> = forest[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["Cat", "Dog"]);
        assert_eq!(forest[1].name, "Widget");
        assert_eq!(graph.superclass_chain(EntityId(1)), vec![EntityId(0)]);
    }

    #[test]
    fn test_superclass_cycle_terminates() {
        let table = SymbolTable::from_parts(
            vec![class(0, "A", Some("B")), class(1, "B", Some("A"))],
            vec![extends(0, 1), extends(1, 0)],
        );
        let graph = RelationGraph::from_table(&table);
        assert_eq!(graph.superclass_chain(EntityId(0)), vec![EntityId(1)]);
        let forest = graph.class_hierarchy();
        let total: usize = forest.iter().map(|n| 1 + n.children.len()).sum();
        assert_eq!(total, 2);
    }
}
