//! The concrete workloads measured by a benchmark run.

use crate::chunk_store::source::BatchSource;
use crate::chunk_store::ChunkStore;
use crate::config::TrialStart;
use crate::error::{IndisortError, Result};
use crate::harness::Trial;
use crate::logical_index::LogicalIndex;
use crate::ordering::{self, Algorithm, KeyPolicyKind};

/// Decodes every source into a fresh store on each iteration.
pub struct LoadTrial<'a, S: BatchSource> {
    sources: &'a [S],
    prefix: usize,
    store: Option<ChunkStore>,
}

impl<'a, S: BatchSource> LoadTrial<'a, S> {
    pub fn new(sources: &'a [S], prefix: usize) -> Self {
        Self {
            sources,
            prefix,
            store: None,
        }
    }

    /// The store decoded by the last iteration.
    pub fn into_store(self) -> Result<ChunkStore> {
        self.store.ok_or_else(|| {
            IndisortError::InternalError("load trial finished without running".to_string())
        })
    }
}

impl<S: BatchSource> Trial for LoadTrial<'_, S> {
    fn run(&mut self) -> Result<()> {
        self.store = Some(ChunkStore::load(self.sources, self.prefix)?);
        Ok(())
    }

    fn rows(&self) -> usize {
        self.store.as_ref().map_or(0, ChunkStore::total_rows)
    }
}

/// Builds the natural-order index on each iteration.
pub struct IndexBuildTrial<'a> {
    store: &'a ChunkStore,
    index: Option<LogicalIndex>,
}

impl<'a> IndexBuildTrial<'a> {
    pub fn new(store: &'a ChunkStore) -> Self {
        Self { store, index: None }
    }

    pub fn into_index(self) -> LogicalIndex {
        self.index.unwrap_or_else(|| LogicalIndex::build(self.store))
    }
}

impl Trial for IndexBuildTrial<'_> {
    fn run(&mut self) -> Result<()> {
        self.index = Some(LogicalIndex::build(self.store));
        Ok(())
    }

    fn rows(&self) -> usize {
        self.store.total_rows()
    }
}

/// One `(key policy, algorithm)` combination over a shared index.
pub struct SortTrial<'a> {
    store: &'a ChunkStore,
    index: &'a mut LogicalIndex,
    kind: KeyPolicyKind,
    algorithm: Algorithm,
    start: TrialStart,
    verify: bool,
}

impl<'a> SortTrial<'a> {
    pub fn new(
        store: &'a ChunkStore,
        index: &'a mut LogicalIndex,
        kind: KeyPolicyKind,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            store,
            index,
            kind,
            algorithm,
            start: TrialStart::default(),
            verify: false,
        }
    }

    pub fn with_start(mut self, start: TrialStart) -> Self {
        self.start = start;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Report name, e.g. `sort/two_step/radix`.
    pub fn name(&self) -> String {
        variant_name(self.kind, self.algorithm)
    }
}

impl Trial for SortTrial<'_> {
    fn setup(&mut self) -> Result<()> {
        if self.start == TrialStart::Natural {
            self.index.reset(self.store);
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        ordering::sort_by_kind(&mut *self.index, self.store, self.kind, self.algorithm);
        Ok(())
    }

    fn verify(&self) -> Result<()> {
        if !self.verify {
            return Ok(());
        }
        self.index.check_permutation(self.store)?;
        if !ordering::is_sorted_by_kind(&*self.index, self.store, self.kind) {
            return Err(IndisortError::InvalidIndex(format!(
                "{} left the index out of order",
                self.name()
            )));
        }
        Ok(())
    }

    fn rows(&self) -> usize {
        self.index.len()
    }
}

pub fn variant_name(kind: KeyPolicyKind, algorithm: Algorithm) -> String {
    format!("sort/{}/{}", kind, algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::TrialSet;
    use crate::synthetic::SyntheticSpec;

    #[test]
    fn test_sort_trial_from_natural_each_time() {
        let store = SyntheticSpec::default().with_shape(2, 100).generate().unwrap();
        let mut index = LogicalIndex::build(&store);

        let mut trial = SortTrial::new(&store, &mut index, KeyPolicyKind::Single, Algorithm::Stable)
            .with_verify(true);
        assert_eq!(trial.name(), "sort/single/stable");

        let report = TrialSet::new(trial.name())
            .with_trials(3)
            .with_warmup(1)
            .run(&mut trial)
            .unwrap();
        assert_eq!(report.trials, 3);
        assert_eq!(report.rows, 200);
    }

    #[test]
    fn test_sort_trial_keeps_previous_order() {
        let store = SyntheticSpec::default().with_shape(1, 50).generate().unwrap();
        let mut index = LogicalIndex::build(&store);
        {
            let mut trial =
                SortTrial::new(&store, &mut index, KeyPolicyKind::TwoStep, Algorithm::Radix)
                    .with_start(TrialStart::Previous)
                    .with_verify(true);
            trial.setup().unwrap();
            trial.run().unwrap();
            trial.verify().unwrap();
            // No reset: the sorted order survives the next setup.
            trial.setup().unwrap();
        }
        assert!(ordering::is_sorted_by_kind(&index, &store, KeyPolicyKind::TwoStep));
    }

    #[test]
    fn test_index_build_trial_yields_natural_index() {
        let store = SyntheticSpec::default().with_shape(3, 7).generate().unwrap();
        let mut trial = IndexBuildTrial::new(&store);
        trial.run().unwrap();
        assert_eq!(trial.rows(), 21);
        assert_eq!(trial.into_index(), LogicalIndex::build(&store));
    }
}
