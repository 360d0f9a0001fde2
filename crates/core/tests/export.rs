mod common;

use common::{engine_with, generate};
use docscope_api::models::{EntityKind, SourceInput};
use docscope_core::{DocConfig, SymbolTable};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_exported_table_reloads_with_indices() {
    let output = generate(&[(
        "A.h",
        "/** A widget. */\n@interface Foo : NSObject\n/** Size. */\n@property (nonatomic) CGFloat size;\n- (void)grow;\n@end\n",
    )]);

    let dir = tempdir().unwrap();
    let path = dir.path().join("symbols.json");
    fs::write(&path, serde_json::to_string_pretty(&output.table).unwrap()).unwrap();

    let reloaded: SymbolTable = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded.len(), output.table.len());
    assert_eq!(reloaded.relationships(), output.table.relationships());

    let size = reloaded.lookup(EntityKind::Property, "Foo.size").unwrap();
    assert_eq!(size.documentation().abstract_str(), Some("Size."));
    let foo = reloaded.lookup_id(EntityKind::Class, "Foo").unwrap();
    assert_eq!(reloaded.members_of(foo).len(), 2);
}

#[test]
fn test_config_file_drives_the_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("docscope.json");
    fs::write(
        &path,
        r#"{ "resolver": { "report_unresolved_relations": false }, "threads": 2 }"#,
    )
    .unwrap();

    let config = DocConfig::from_json_file(&path).unwrap();
    assert_eq!(config.threads, Some(2));

    let output = engine_with(config)
        .generate(vec![SourceInput::new("A.h", "@interface Foo : NSObject\n@end\n")])
        .unwrap();
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.stats.units, 1);
    assert_eq!(output.stats.entities, 1);
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("docscope.json");
    fs::write(&path, r#"{ "threads": 0 }"#).unwrap();
    assert!(DocConfig::from_json_file(&path).is_err());
}
