mod common;

use common::scan_source;
use docscope_api::models::{DeclarationDetail, DiagnosticKind, EntityKind, SourceItem};

const HEADER: &str = r#"#import <Foundation/Foundation.h>

NS_ASSUME_NONNULL_BEGIN

@class Baz;
@protocol Forward;

/** Something that draws. */
@protocol Drawing <NSObject>
- (void)draw;
@optional
/** Optional hook. */
- (void)willDraw;
@end

/**
 * A foo.
 */
NS_SWIFT_NAME(Foo)
@interface Foo<ObjectType> : NSObject <Drawing, NSCopying> {
    int _hidden;
}
@property (nonatomic, readonly) NSArray<ObjectType> *items;
+ (instancetype)fooWithItems:(NSArray<ObjectType> *)items;
- (instancetype)init NS_UNAVAILABLE;
@end

@interface Foo (Bar)
- (void)bar;
@end

@interface Foo ()
@property (nonatomic) BOOL secret;
@end

NS_ASSUME_NONNULL_END
"#;

#[test]
fn test_full_header_declarations() {
    let out = scan_source("Foo.h", HEADER);
    assert!(
        out.diagnostics
            .iter()
            .all(|d| d.kind != DiagnosticKind::UnterminatedConstruct),
        "{:?}",
        out.diagnostics
    );

    let summary: Vec<(EntityKind, &str)> = out
        .unit
        .declarations
        .iter()
        .map(|d| (d.kind, d.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (EntityKind::Protocol, "Drawing"),
            (EntityKind::Method, "draw"),
            (EntityKind::Method, "willDraw"),
            (EntityKind::Class, "Foo"),
            (EntityKind::Property, "items"),
            (EntityKind::Method, "fooWithItems:"),
            (EntityKind::Method, "init"),
            (EntityKind::Category, "Foo(Bar)"),
            (EntityKind::Method, "bar"),
            (EntityKind::Extension, "Foo()"),
            (EntityKind::Property, "secret"),
        ]
    );
}

#[test]
fn test_class_header_details() {
    let out = scan_source("Foo.h", HEADER);
    let foo = &out.unit.declarations[3];
    let DeclarationDetail::Class(class) = &foo.detail else {
        panic!("expected class, got {:?}", foo.detail);
    };
    assert_eq!(class.superclass.as_deref(), Some("NSObject"));
    assert_eq!(class.protocols, vec!["Drawing", "NSCopying"]);
    assert_eq!(foo.attributes, vec!["NS_SWIFT_NAME(Foo)"]);

    let init = &out.unit.declarations[6];
    assert_eq!(init.attributes, vec!["NS_UNAVAILABLE"]);
    assert_eq!(init.parent, Some(3));
}

#[test]
fn test_optional_protocol_members() {
    let out = scan_source("Foo.h", HEADER);
    let optional: Vec<bool> = out.unit.declarations[1..3]
        .iter()
        .map(|d| match &d.detail {
            DeclarationDetail::Method(m) => m.optional,
            _ => panic!("expected method"),
        })
        .collect();
    assert_eq!(optional, vec![false, true]);
}

#[test]
fn test_missing_end_keeps_container() {
    let out = scan_source("Open.h", "@interface Open : NSObject\n- (void)a;\n");
    assert_eq!(out.unit.declarations.len(), 2);
    let unterminated: Vec<_> = out
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnterminatedConstruct)
        .collect();
    assert_eq!(unterminated.len(), 1);
    assert_eq!(unterminated[0].subject.as_deref(), Some("Open"));
}

#[test]
fn test_malformed_container_is_skipped() {
    let out = scan_source(
        "Bad.h",
        "@interface 123\n- (void)lost;\n@end\n@interface Good\n@end\n",
    );
    let names: Vec<_> = out.unit.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Good"]);
    assert!(out.diagnostics.iter().any(|d| {
        d.kind == DiagnosticKind::MalformedDeclaration
            && d.location.as_ref().map(|l| l.line()) == Some(1)
    }));
}

#[test]
fn test_items_follow_source_order() {
    let out = scan_source("Order.h", "/** A. */\n@interface A\n@end\nint x;\n/** B. */\n@interface B\n@end\n");
    let shape: Vec<&str> = out
        .unit
        .items
        .iter()
        .map(|item| match item {
            SourceItem::Declaration { .. } => "decl",
            SourceItem::Comment { .. } => "comment",
            SourceItem::Code { .. } => "code",
        })
        .collect();
    assert_eq!(shape, vec!["comment", "decl", "code", "comment", "decl", "code"]);
}

#[test]
fn test_scan_output_serializes() {
    let out = scan_source("Foo.h", HEADER);
    let json = serde_json::to_value(&out.unit).unwrap();
    assert_eq!(json["file"], "Foo.h");
    assert_eq!(json["declarations"][0]["kind"], "protocol");
}

#[test]
fn test_nested_comment_markers_and_strings_stay_opaque() {
    let src = "/** Uses \"@end\" in prose. */\n@interface Foo\n- (NSString *)tag; // @interface inside a comment\n@end\n";
    let out = scan_source("Quote.h", src);
    let names: Vec<_> = out.unit.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Foo", "tag"]);
    assert_eq!(out.unit.comments.len(), 1);
}

#[test]
fn test_implementation_with_semicolon_before_body() {
    let out = scan_source(
        "Foo.m",
        "@implementation Foo\n- (void)run; {\n    /** inside */\n}\n- (void)stop {}\n@end\n",
    );
    let methods: Vec<(&str, bool)> = out
        .unit
        .declarations
        .iter()
        .filter_map(|d| match &d.detail {
            DeclarationDetail::Method(m) => Some((d.name.as_str(), m.implementation)),
            _ => None,
        })
        .collect();
    assert_eq!(methods, vec![("run", true), ("stop", true)]);
    assert!(out.unit.comments.is_empty());
}
