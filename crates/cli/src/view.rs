use docscope_api::models::{Diagnostic, EntityKind, Severity};
use docscope_core::model::HierarchyNode;
use docscope_core::SymbolTable;
use nu_ansi_term::Color;
use tabled::Tabled;

/// One row of the per-kind summary table.
#[derive(Tabled)]
pub struct KindCountView {
    pub kind: String,
    pub count: usize,
    pub documented: usize,
}

impl KindCountView {
    pub fn rows(table: &SymbolTable) -> Vec<Self> {
        table
            .count_by_kind()
            .into_iter()
            .map(|(kind, count)| Self {
                kind: kind.to_string(),
                count,
                documented: documented(table, kind),
            })
            .collect()
    }
}

fn documented(table: &SymbolTable, kind: EntityKind) -> usize {
    table
        .iter_kind(kind)
        .filter(|e| !e.documentation().is_empty())
        .count()
}

pub fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    let (color, label) = match diagnostic.severity {
        Severity::Error => (Color::Red, "error"),
        Severity::Warning => (Color::Yellow, "warning"),
    };
    let head = color.bold().paint(format!("{label}[{}]", diagnostic.kind));
    match &diagnostic.location {
        Some(loc) => format!("{} {head}: {}", Color::LightGray.paint(loc.to_string()), diagnostic.message),
        None => format!("{head}: {}", diagnostic.message),
    }
}

/// Indented tree lines, two spaces per level.
pub fn render_hierarchy(forest: &[HierarchyNode]) -> Vec<String> {
    let mut lines = Vec::new();
    for node in forest {
        push_node(node, 0, &mut lines);
    }
    lines
}

fn push_node(node: &HierarchyNode, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}", "  ".repeat(depth), node.name));
    for child in &node.children {
        push_node(child, depth + 1, lines);
    }
}
