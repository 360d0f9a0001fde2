//! Generation engine for docscope
//!
//! One [`DocEngine::generate`] call runs a whole generation:
//!
//! - **Per-unit phase**: scan, associate and ingest every source unit in
//!   parallel into a shared [`SymbolTableBuilder`]
//! - **Barrier**: the builder is frozen into a [`SymbolTable`] once every unit is in
//! - **Resolve phase**: cross-references and relations are resolved on the frozen table

use crate::config::DocConfig;
use crate::error::{DocscopeError, Result};
use crate::ingest::{IngestPipeline, SymbolTableBuilder, process_unit};
use crate::model::SymbolTable;
use crate::resolver::{ResolveStats, Resolver};
use docscope_api::LanguageFrontend;
use docscope_api::models::{Diagnostic, DiagnosticKind, Severity, SourceInput, sort_diagnostics};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub units: usize,
    pub skipped_units: usize,
    pub entities: usize,
    pub resolve: ResolveStats,
}

/// Finalized symbol table plus every diagnostic of the run, sorted.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: GenerationStats,
}

impl GenerationOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn diagnostics_of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

pub struct DocEngine {
    config: DocConfig,
    frontends: Vec<Arc<dyn LanguageFrontend>>,
    pipeline: IngestPipeline,
}

impl DocEngine {
    pub fn new(config: DocConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frontends: Vec::new(),
            pipeline: IngestPipeline::default(),
        })
    }

    pub fn with_frontend(mut self, frontend: Arc<dyn LanguageFrontend>) -> Self {
        self.register_frontend(frontend);
        self
    }

    pub fn register_frontend(&mut self, frontend: Arc<dyn LanguageFrontend>) {
        self.frontends.push(frontend);
    }

    pub fn with_pipeline(mut self, pipeline: IngestPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &DocConfig {
        &self.config
    }

    pub fn frontends(&self) -> &[Arc<dyn LanguageFrontend>] {
        &self.frontends
    }

    /// Frontend claiming `file` by extension; the first registered one otherwise.
    pub fn frontend_for(&self, file: &str) -> Option<Arc<dyn LanguageFrontend>> {
        self.frontends
            .iter()
            .find(|f| f.supports_file(file))
            .or_else(|| self.frontends.first())
            .cloned()
    }

    /// Decode raw bytes and generate. A unit that is not UTF-8 fails the run.
    pub fn generate_bytes(&self, inputs: Vec<(String, Vec<u8>)>) -> Result<GenerationOutput> {
        let inputs = inputs
            .into_iter()
            .map(|(file, bytes)| SourceInput::from_bytes(file, bytes).map_err(DocscopeError::from))
            .collect::<Result<Vec<_>>>()?;
        self.generate(inputs)
    }

    /// Build and resolve the symbol model for `inputs`.
    ///
    /// Fails only on an empty input set, a unit no frontend handles, or a
    /// thread-pool failure; everything else ends up in the diagnostics.
    pub fn generate(&self, inputs: Vec<SourceInput>) -> Result<GenerationOutput> {
        if inputs.is_empty() {
            return Err(DocscopeError::EmptyInput);
        }

        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();
        let mut jobs: Vec<(Arc<dyn LanguageFrontend>, SourceInput)> = Vec::with_capacity(inputs.len());
        for input in inputs {
            if !seen.insert(input.file.clone()) {
                warn!(file = %input.file, "Skipping duplicate source unit");
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::DuplicateSource,
                        format!("source `{}` was supplied more than once; later copy skipped", input.file),
                    )
                    .about(input.file.to_string()),
                );
                continue;
            }
            let frontend = self.frontend_for(&input.file).ok_or_else(|| {
                DocscopeError::NoFrontend {
                    file: input.file.to_string(),
                }
            })?;
            jobs.push((frontend, input));
        }
        let skipped_units = diagnostics.len();

        let run = || self.run(&jobs);
        let (table, mut run_diagnostics, resolve) = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| DocscopeError::Internal(format!("thread pool: {e}")))?
                .install(run),
            None => run(),
        };
        diagnostics.append(&mut run_diagnostics);
        sort_diagnostics(&mut diagnostics);

        let stats = GenerationStats {
            units: jobs.len(),
            skipped_units,
            entities: table.len(),
            resolve,
        };
        info!(
            units = stats.units,
            entities = stats.entities,
            diagnostics = diagnostics.len(),
            "Generated symbol model"
        );
        Ok(GenerationOutput {
            table,
            diagnostics,
            stats,
        })
    }

    fn run(
        &self,
        jobs: &[(Arc<dyn LanguageFrontend>, SourceInput)],
    ) -> (SymbolTable, Vec<Diagnostic>, ResolveStats) {
        let builder = SymbolTableBuilder::new(&self.config.resolver);
        let mut diagnostics = Vec::new();
        self.pipeline.execute(
            jobs,
            |(frontend, input)| {
                process_unit(frontend.as_ref(), input, &self.config.association, &builder)
            },
            |batch| diagnostics.extend(batch.into_iter().flatten()),
        );

        // Barrier: every unit is in the builder before anything resolves.
        let (table, mut merge_diagnostics) = builder.freeze();
        diagnostics.append(&mut merge_diagnostics);

        let resolution = Resolver::new(self.config.resolver.clone()).resolve(table);
        diagnostics.extend(resolution.diagnostics);
        (resolution.table, diagnostics, resolution.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscope_api::models::{
        AssociationOutput, Language, ScanOutput, SourceUnit,
    };
    use docscope_api::AssociationConfig;

    /// Frontend that recognizes nothing.
    struct NullFrontend;

    impl LanguageFrontend for NullFrontend {
        fn language(&self) -> Language {
            Language::UNKNOWN
        }

        fn supported_extensions(&self) -> &[&str] {
            &["txt"]
        }

        fn scan(&self, file: Arc<str>, _text: &str) -> ScanOutput {
            ScanOutput {
                unit: SourceUnit::new(file),
                diagnostics: Vec::new(),
            }
        }

        fn associate(&self, unit: SourceUnit, _config: &AssociationConfig) -> AssociationOutput {
            AssociationOutput {
                file: unit.file,
                declarations: Vec::new(),
                diagnostics: Vec::new(),
            }
        }
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let engine = DocEngine::new(DocConfig::default()).unwrap();
        assert!(matches!(engine.generate(Vec::new()), Err(DocscopeError::EmptyInput)));
    }

    #[test]
    fn test_missing_frontend_is_fatal() {
        let engine = DocEngine::new(DocConfig::default()).unwrap();
        let result = engine.generate(vec![SourceInput::new("a.h", "")]);
        assert!(matches!(result, Err(DocscopeError::NoFrontend { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let engine = DocEngine::new(DocConfig::default())
            .unwrap()
            .with_frontend(Arc::new(NullFrontend));
        let result = engine.generate_bytes(vec![("bad.txt".into(), vec![0xff, 0xfe])]);
        assert!(matches!(result, Err(DocscopeError::UnreadableSource { .. })));
    }

    #[test]
    fn test_duplicate_sources_are_reported() {
        let engine = DocEngine::new(DocConfig::default())
            .unwrap()
            .with_frontend(Arc::new(NullFrontend));
        let output = engine
            .generate(vec![
                SourceInput::new("a.txt", ""),
                SourceInput::new("a.txt", ""),
            ])
            .unwrap();
        assert!(output.has_errors());
        assert_eq!(output.stats.units, 1);
        assert_eq!(output.stats.skipped_units, 1);
        assert_eq!(
            output.diagnostics_of_kind(DiagnosticKind::DuplicateSource).count(),
            1
        );
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = DocConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert!(matches!(DocEngine::new(config), Err(DocscopeError::Config(_))));
    }
}
