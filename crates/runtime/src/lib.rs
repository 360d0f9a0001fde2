use docscope_api::LanguageFrontend;
use docscope_core::{DocConfig, DocEngine, DocscopeError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Assembles a generation engine with every bundled language frontend.
pub fn build_default_engine(config: DocConfig) -> docscope_core::Result<DocEngine> {
    let mut engine = DocEngine::new(config)?;
    let objc = docscope_objc::ObjcFrontend::new().map_err(|e| DocscopeError::FrontendInit {
        language: "objc".to_string(),
        reason: e.to_string(),
    })?;
    engine.register_frontend(Arc::new(objc));
    Ok(engine)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(docscope_core::logging::init_logging(component, to_stderr))
}

fn is_source_path(engine: &DocEngine, path: &Path) -> bool {
    path.to_str()
        .is_some_and(|p| engine.frontends().iter().any(|f| f.supports_file(p)))
}

/// Files under `roots` that one of the engine's frontends claims, honoring
/// ignore files, sorted and deduplicated. A root that is itself a file is taken as is.
pub fn discover_sources(engine: &DocEngine, roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.exists() {
            warn!(path = %root.display(), "Input path does not exist");
            continue;
        }
        files.extend(
            WalkBuilder::new(root)
                .build()
                .filter_map(|entry| {
                    let entry = entry.ok()?;
                    let path = entry.path();
                    if path.is_file() && is_source_path(engine, path) {
                        return Some(path.to_path_buf());
                    }
                    None
                }),
        );
    }
    files.sort();
    files.dedup();
    debug!(count = files.len(), "Discovered source files");
    files
}

/// Reads every file as raw bytes, keyed by its path as written.
pub fn read_sources(files: &[PathBuf]) -> std::io::Result<Vec<(String, Vec<u8>)>> {
    files
        .iter()
        .map(|path| Ok((path.display().to_string(), std::fs::read(path)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discovers_objc_sources_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("A.h"), "@interface A\n@end\n").unwrap();
        fs::write(dir.path().join("sub/B.m"), "@implementation A\n@end\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing").unwrap();

        let engine = build_default_engine(DocConfig::default()).unwrap();
        let files = discover_sources(&engine, &[dir.path().to_path_buf()]);
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["A.h", "B.m"]);
    }

    #[test]
    fn test_default_engine_generates_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("A.h"),
            "/** Root. */\n@interface A : NSObject\n@end\n",
        )
        .unwrap();

        let engine = build_default_engine(DocConfig::default()).unwrap();
        let files = discover_sources(&engine, &[dir.path().to_path_buf()]);
        let output = engine.generate_bytes(read_sources(&files).unwrap()).unwrap();
        assert_eq!(output.stats.entities, 1);
        assert!(!output.has_errors());
    }
}
