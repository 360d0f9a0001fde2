use super::builder::SymbolTableBuilder;
use docscope_api::models::{Diagnostic, ScanOutput, SourceInput};
use docscope_api::{AssociationConfig, LanguageFrontend};
use rayon::prelude::*;
use tracing::debug;

pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Scan one unit, attach its comments and record its declarations.
///
/// Touches nothing shared but the builder, so units can run concurrently.
pub fn process_unit(
    frontend: &dyn LanguageFrontend,
    input: &SourceInput,
    config: &AssociationConfig,
    builder: &SymbolTableBuilder,
) -> Vec<Diagnostic> {
    let ScanOutput {
        unit,
        mut diagnostics,
    } = frontend.scan(input.file.clone(), &input.text);
    debug!(
        file = %input.file,
        declarations = unit.declarations.len(),
        comments = unit.comments.len(),
        "Scanned unit"
    );
    let associated = frontend.associate(unit, config);
    diagnostics.extend(builder.ingest(associated));
    diagnostics
}

/// Batched parallel driver for the per-unit phase
pub struct IngestPipeline {
    batch_size: usize,
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl IngestPipeline {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: if batch_size == 0 {
                DEFAULT_BATCH_SIZE
            } else {
                batch_size
            },
        }
    }

    /// Runs `stage` over every item, one batch at a time with the items of a
    /// batch in parallel, and hands each batch's outputs (in item order) to
    /// `committer`.
    pub fn execute<T, O, S, C>(&self, items: &[T], stage: S, mut committer: C)
    where
        T: Sync,
        O: Send,
        S: Fn(&T) -> O + Sync,
        C: FnMut(Vec<O>),
    {
        for (batch, chunk) in items.chunks(self.batch_size).enumerate() {
            let outputs: Vec<O> = chunk.par_iter().map(&stage).collect();
            debug!(batch, items = chunk.len(), "Committed batch");
            committer(outputs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_keep_item_order() {
        let items: Vec<usize> = (0..10).collect();
        let mut seen = Vec::new();
        let mut batches = 0;
        IngestPipeline::new(4).execute(
            &items,
            |n| n * 2,
            |outputs| {
                batches += 1;
                seen.extend(outputs);
            },
        );
        assert_eq!(batches, 3);
        assert_eq!(seen, (0..10).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_batch_size_falls_back() {
        let items = [1, 2, 3];
        let mut total = 0;
        IngestPipeline::new(0).execute(&items, |n| *n, |outputs| total += outputs.len());
        assert_eq!(total, 3);
    }
}
