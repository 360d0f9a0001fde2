mod common;

use common::{entity, generate, generate_with};
use docscope_api::models::{DiagnosticKind, EntityKind, EntityVariant, RelationKind};
use docscope_core::{DocConfig, RelationGraph};

#[test]
fn test_category_in_another_file_links_to_its_class() {
    let output = generate(&[
        ("A.h", "@interface Foo : NSObject\n@end\n"),
        (
            "B.h",
            "#import \"A.h\"\n\n/** Adds bar behavior. */\n@interface Foo (Bar)\n- (void)bar;\n@end\n",
        ),
    ]);

    let classes: Vec<_> = output.table.iter_kind(EntityKind::Class).collect();
    assert_eq!(classes.len(), 1);
    let foo = classes[0];
    assert_eq!(foo.name(), "Foo");
    assert_eq!(foo.superclass().map(|r| r.name.as_str()), Some("NSObject"));
    assert!(foo.superclass().is_some_and(|r| r.target.is_none()));

    let category = entity(&output, EntityKind::Category, "Foo(Bar)");
    assert_eq!(category.documentation().abstract_str(), Some("Adds bar behavior."));
    assert_eq!(category.extended_class().and_then(|r| r.target), Some(foo.id));
    assert!(output.table.relationships().iter().any(|r| {
        r.from == category.id && r.to == foo.id && r.kind == RelationKind::BelongsTo
    }));

    let bar = entity(&output, EntityKind::Method, "-[Foo(Bar) bar]");
    assert_eq!(bar.owner(), Some(category.id));

    // NSObject is not part of the input.
    let unresolved: Vec<_> = output
        .diagnostics_of_kind(DiagnosticKind::UnresolvedRelation)
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].subject.as_deref(), Some("NSObject"));
}

#[test]
fn test_unresolved_mention_is_reported_once_and_kept_verbatim() {
    let output = generate(&[(
        "A.h",
        "/**\n * A widget.\n *\n * Talks to [SomeUndeclaredClass] when ready.\n */\n@interface Foo : NSObject\n@end\n",
    )]);

    let foo = entity(&output, EntityKind::Class, "Foo");
    let discussion = foo.documentation().discussion_str().unwrap();
    assert!(discussion.contains("[SomeUndeclaredClass]"));

    let unresolved: Vec<_> = output
        .diagnostics_of_kind(DiagnosticKind::UnresolvedReference)
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].subject.as_deref(), Some("SomeUndeclaredClass"));
    assert!(unresolved[0].location.is_some());
    assert!(!output.has_errors());
}

#[test]
fn test_messages_to_self_and_super_are_not_references() {
    let output = generate(&[(
        "A.h",
        "/** Call [self setNeedsDisplay] or [super layout] afterwards. */\n@interface Foo : NSObject\n@end\n",
    )]);

    let unresolved = output
        .diagnostics_of_kind(DiagnosticKind::UnresolvedReference)
        .count();
    assert_eq!(unresolved, 0);
    let foo = entity(&output, EntityKind::Class, "Foo");
    assert!(foo.documentation().abstract_str().unwrap().contains("[self setNeedsDisplay]"));
}

#[test]
fn test_results_do_not_depend_on_input_order() {
    let header = (
        "A.h",
        "@interface Foo : NSObject\n/** Doc from header. */\n- (void)run;\n@end\n",
    );
    let implementation = (
        "Foo.m",
        "/**\n * Implementation notes.\n *\n * See [Foo run].\n */\n@implementation Foo\n/** From implementation. */\n- (void)run {\n    [self go];\n}\n@end\n",
    );

    let forward = generate(&[header, implementation]);
    let backward = generate(&[implementation, header]);

    assert_eq!(
        serde_json::to_value(&forward.table).unwrap(),
        serde_json::to_value(&backward.table).unwrap()
    );
    assert_eq!(forward.diagnostics, backward.diagnostics);

    let run = entity(&forward, EntityKind::Method, "-[Foo run]");
    assert_eq!(run.documentation().abstract_str(), Some("Doc from header."));
    assert_eq!(run.common.locations.len(), 2);
    assert_eq!(&*run.common.locations[0].file, "A.h");

    let foo = entity(&forward, EntityKind::Class, "Foo");
    assert_eq!(foo.documentation().abstract_str(), Some("Implementation notes."));
    let mention = &foo.documentation().discussion.as_ref().unwrap().refs[0];
    assert_eq!(mention.target, Some(run.id));
}

#[test]
fn test_param_docs_follow_argument_entities() {
    let output = generate(&[(
        "A.h",
        "@interface Foo : NSObject\n/**\n * Moves the thing.\n * @param x The x.\n * @param y The y.\n * @return Whether it moved.\n */\n- (BOOL)moveToX:(CGFloat)x y:(CGFloat)y;\n@end\n",
    )]);

    let method = entity(&output, EntityKind::Method, "-[Foo moveToX:y:]");
    let documentation = method.documentation();
    let params: Vec<_> = documentation.params.iter().map(|p| p.name.as_str()).collect();
    let arguments: Vec<_> = output
        .table
        .arguments_of(method.id)
        .into_iter()
        .map(|a| a.common.display_name.as_str())
        .collect();
    assert_eq!(params, arguments);
    assert_eq!(arguments, vec!["x", "y"]);
    assert_eq!(
        documentation.returns.as_ref().map(|r| r.text.as_str()),
        Some("Whether it moved.")
    );

    let x = entity(&output, EntityKind::Argument, "-[Foo moveToX:y:]#0");
    assert_eq!(x.documentation().abstract_str(), Some("The x."));
    assert_eq!(output.diagnostics_of_kind(DiagnosticKind::UnknownParameter).count(), 0);
}

#[test]
fn test_param_for_missing_argument_is_reported() {
    let output = generate(&[(
        "A.h",
        "@interface Foo : NSObject\n/** Sets.\n @param value The value.\n @param other Nothing. */\n- (void)setValue:(id)value;\n@end\n",
    )]);

    let unknown: Vec<_> = output
        .diagnostics_of_kind(DiagnosticKind::UnknownParameter)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].subject.as_deref(), Some("-[Foo setValue:]"));
    assert!(unknown[0].message.contains("`other`"));

    let method = entity(&output, EntityKind::Method, "-[Foo setValue:]");
    assert!(method.documentation().param("other").is_some());
}

#[test]
fn test_class_and_protocol_may_share_a_name() {
    let output = generate(&[(
        "A.h",
        "@protocol Foo\n- (void)ping;\n@end\n\n@interface Foo : NSObject <Foo>\n@end\n",
    )]);

    let candidates = output.table.candidates("Foo");
    assert_eq!(candidates.len(), 2);
    let protocol = entity(&output, EntityKind::Protocol, "Foo");
    let class = entity(&output, EntityKind::Class, "Foo");
    assert_eq!(class.adopted_protocols()[0].target, Some(protocol.id));
    assert!(output.table.relationships().iter().any(|r| {
        r.from == class.id && r.to == protocol.id && r.kind == RelationKind::Adopts
    }));
}

#[test]
fn test_many_units_extending_one_category_merge() {
    let files: Vec<(String, String)> = (0..40)
        .map(|i| {
            (
                format!("Part{i:02}.h"),
                format!("@interface Foo (Parts)\n- (void)part{i};\n@end\n"),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(f, t)| (f.as_str(), t.as_str()))
        .collect();
    let output = generate_with(
        DocConfig {
            threads: Some(4),
            ..Default::default()
        },
        &borrowed,
    );

    let categories: Vec<_> = output.table.iter_kind(EntityKind::Category).collect();
    assert_eq!(categories.len(), 1);
    let category = categories[0];
    assert_eq!(category.members().len(), 40);
    assert_eq!(category.common.locations.len(), 40);
    assert_eq!(
        output.table.get(category.members()[0]).map(|m| m.name()),
        Some("-[Foo(Parts) part0]")
    );
    let EntityVariant::Category(info) = &category.variant else {
        panic!("expected a category");
    };
    assert_eq!(info.category_name.as_deref(), Some("Parts"));
    assert_eq!(output.diagnostics_of_kind(DiagnosticKind::UnresolvedRelation).count(), 1);
}

#[test]
fn test_hierarchy_over_resolved_superclasses() {
    let output = generate(&[
        ("Base.h", "@interface Base : NSObject\n@end\n"),
        ("Mid.h", "@interface Mid : Base\n@end\n"),
        ("Leaf.h", "@interface Leaf : Mid\n@end\n@interface Other : Mid\n@end\n"),
    ]);

    let graph = RelationGraph::from_table(&output.table);
    let forest = graph.class_hierarchy();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].name, "Base");
    assert_eq!(forest[0].children[0].name, "Mid");
    let leaves: Vec<_> = forest[0].children[0]
        .children
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(leaves, vec!["Leaf", "Other"]);

    let leaf = entity(&output, EntityKind::Class, "Leaf");
    let chain: Vec<_> = graph
        .superclass_chain(leaf.id)
        .into_iter()
        .filter_map(|id| output.table.get(id).map(|e| e.name()))
        .collect();
    assert_eq!(chain, vec!["Mid", "Base"]);
}
