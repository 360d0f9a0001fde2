use docscope_api::models::{DocumentedEntity, EntityKind, SourceInput};
use docscope_core::{DocConfig, DocEngine, GenerationOutput};
use docscope_objc::ObjcFrontend;
use std::sync::Arc;

#[allow(dead_code)]
pub fn engine_with(config: DocConfig) -> DocEngine {
    DocEngine::new(config)
        .expect("valid config")
        .with_frontend(Arc::new(ObjcFrontend::new().expect("objc grammar loads")))
}

#[allow(dead_code)]
pub fn generate(files: &[(&str, &str)]) -> GenerationOutput {
    generate_with(DocConfig::default(), files)
}

#[allow(dead_code)]
pub fn generate_with(config: DocConfig, files: &[(&str, &str)]) -> GenerationOutput {
    let inputs = files
        .iter()
        .map(|(file, text)| SourceInput::new(*file, *text))
        .collect();
    engine_with(config).generate(inputs).expect("generation succeeds")
}

#[allow(dead_code)]
pub fn entity<'a>(
    output: &'a GenerationOutput,
    kind: EntityKind,
    name: &str,
) -> &'a DocumentedEntity {
    output
        .table
        .lookup(kind, name)
        .unwrap_or_else(|| panic!("{kind} `{name}` not found"))
}
