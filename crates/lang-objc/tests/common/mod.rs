use docscope_api::models::{AssociatedDeclaration, AssociationOutput, ScanOutput};
use docscope_api::{AssociationConfig, LanguageFrontend};
use docscope_objc::ObjcFrontend;
use std::sync::Arc;

#[allow(dead_code)]
pub fn frontend() -> ObjcFrontend {
    ObjcFrontend::new().expect("objc grammar loads")
}

#[allow(dead_code)]
pub fn scan_source(file: &str, src: &str) -> ScanOutput {
    frontend().scan(Arc::from(file), src)
}

#[allow(dead_code)]
pub fn associate_source(file: &str, src: &str) -> AssociationOutput {
    let frontend = frontend();
    let scanned = frontend.scan(Arc::from(file), src);
    let mut out = frontend.associate(scanned.unit, &AssociationConfig::default());
    out.diagnostics.extend(scanned.diagnostics);
    out
}

#[allow(dead_code)]
pub fn find<'a>(out: &'a AssociationOutput, name: &str) -> &'a AssociatedDeclaration {
    out.declarations
        .iter()
        .find(|d| d.declaration.name == name)
        .unwrap_or_else(|| panic!("declaration `{name}` not found"))
}
