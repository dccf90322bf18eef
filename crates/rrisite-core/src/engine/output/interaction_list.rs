use super::{OutputError, OutputHandler};
use crate::core::models::interaction::{Interaction, InteractionRange};
use std::sync::{Mutex, PoisonError};
use tracing::{trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ranking used by [`OutputHandlerInteractionList::new`].
pub type DefaultOrdering = fn(&Interaction, &Interaction) -> bool;

#[derive(Debug, Default)]
struct StoreState {
    storage: Vec<Interaction>,
    reported: usize,
}

/// Keeps the `max_to_store` best-ranked distinct interactions reported by any
/// number of concurrent producers.
///
/// The ranking is a strict weak ordering `less(a, b)` ("a ranks before b").
/// Two interactions are considered duplicates if neither ranks before the
/// other; only the first one reported is kept. Counting, ranking, insertion
/// and eviction happen in one critical section, so the stored list is sorted
/// and duplicate-free at any time.
pub struct OutputHandlerInteractionList<C = DefaultOrdering> {
    state: Mutex<StoreState>,
    max_to_store: usize,
    less: C,
}

impl OutputHandlerInteractionList {
    /// Store ranking by [`Interaction::less_than`]: lowest energy first.
    pub fn new(max_to_store: usize) -> Self {
        Self::with_ordering(max_to_store, Interaction::less_than)
    }
}

impl<C> OutputHandlerInteractionList<C>
where
    C: Fn(&Interaction, &Interaction) -> bool + Send + Sync,
{
    pub fn with_ordering(max_to_store: usize, less: C) -> Self {
        Self {
            state: Mutex::new(StoreState {
                storage: Vec::with_capacity(max_to_store.min(1024)),
                reported: 0,
            }),
            max_to_store,
            less,
        }
    }

    pub fn max_to_store(&self) -> usize {
        self.max_to_store
    }

    /// Reports all given interactions, in parallel when the `parallel` feature
    /// is enabled. The stored result does not depend on the reporting order
    /// unless the ranking considers interactions equivalent.
    pub fn add_all(&self, interactions: &[Interaction]) {
        #[cfg(not(feature = "parallel"))]
        let iterator = interactions.iter();

        #[cfg(feature = "parallel")]
        let iterator = interactions.par_iter();

        iterator.for_each(|interaction| self.add(interaction));
    }

    /// The stored interactions, best first.
    pub fn interactions(&mut self) -> &[Interaction] {
        &self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .storage
    }

    pub fn into_interactions(self) -> Vec<Interaction> {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .storage
    }

    pub fn len(&self) -> usize {
        self.lock().storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().storage.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // every update completes before anything can panic
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> OutputHandler for OutputHandlerInteractionList<C>
where
    C: Fn(&Interaction, &Interaction) -> bool + Send + Sync,
{
    fn add(&self, interaction: &Interaction) {
        let mut state = self.lock();
        state.reported += 1;
        if interaction.is_empty() {
            return;
        }

        let less = &self.less;
        let storage = &mut state.storage;
        let qualifies = storage.len() < self.max_to_store
            || storage.last().is_some_and(|last| less(interaction, last));
        if !qualifies {
            return;
        }

        let mut position = storage.partition_point(|stored| less(stored, interaction));
        if storage
            .get(position)
            .is_some_and(|stored| !less(interaction, stored))
        {
            return;
        }

        if storage.len() >= self.max_to_store {
            if let Some(evicted) = storage.pop() {
                trace!(
                    energy = evicted.energy,
                    "Evicted interaction from full store"
                );
            }
            position = position.min(storage.len());
        }
        storage.insert(position, interaction.clone());
    }

    fn add_range(&self, range: &InteractionRange) -> Result<(), OutputError> {
        warn!(
            "Interaction ranges cannot be stored in an interaction list (got {} x {})",
            range.r1, range.r2
        );
        Err(OutputError::NotImplemented(
            "OutputHandlerInteractionList::add_range",
        ))
    }

    fn reported(&self) -> usize {
        self.lock().reported
    }
}

impl<C> std::fmt::Debug for OutputHandlerInteractionList<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("OutputHandlerInteractionList")
            .field("max_to_store", &self.max_to_store)
            .field("stored", &state.storage.len())
            .field("reported", &state.reported)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::energy::{E_INF, Energy};
    use crate::core::models::interaction::BasePair;
    use crate::core::range::IndexRange;
    use std::fs::File;
    use std::sync::Arc;
    use std::thread;
    use tracing_subscriber::{fmt, prelude::*};

    fn interaction(first: usize, energy: Energy) -> Interaction {
        Interaction::new(vec![BasePair::new(first, 10 - first)], energy)
    }

    fn energies(store: &mut OutputHandlerInteractionList) -> Vec<Energy> {
        store.interactions().iter().map(|i| i.energy).collect()
    }

    #[test]
    fn keeps_best_interactions_in_rank_order() {
        let mut store = OutputHandlerInteractionList::new(3);
        for (first, energy) in [(1, 5.0), (2, 3.0), (3, 8.0), (4, 1.0), (5, 9.0)] {
            store.add(&interaction(first, energy));
        }
        assert_eq!(energies(&mut store), vec![1.0, 3.0, 5.0]);
        assert_eq!(store.reported(), 5);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn empty_interactions_are_counted_but_not_stored() {
        let mut store = OutputHandlerInteractionList::new(3);
        store.add(&Interaction::default());
        store.add(&Interaction::new(Vec::new(), -10.0));
        assert!(store.is_empty());
        assert_eq!(store.reported(), 2);
        assert!(store.interactions().is_empty());
    }

    #[test]
    fn equivalent_interactions_are_stored_once() {
        let mut store = OutputHandlerInteractionList::new(3);
        store.add(&interaction(1, -2.0));
        store.add(&interaction(1, -2.0));
        store.add(&interaction(2, -2.0));
        assert_eq!(store.reported(), 3);
        assert_eq!(
            store.interactions(),
            &[interaction(1, -2.0), interaction(2, -2.0)]
        );
    }

    #[test]
    fn full_store_rejects_interactions_not_better_than_last() {
        let mut store = OutputHandlerInteractionList::new(2);
        store.add(&interaction(1, -3.0));
        store.add(&interaction(2, -1.0));
        store.add(&interaction(3, -1.0));
        store.add(&interaction(4, 0.0));
        assert_eq!(energies(&mut store), vec![-3.0, -1.0]);
        assert_eq!(store.interactions()[1], interaction(2, -1.0));
        assert_eq!(store.reported(), 4);
    }

    #[test]
    fn insertion_before_evicted_last_entry_lands_at_end() {
        let mut store = OutputHandlerInteractionList::new(3);
        for (first, energy) in [(1, -5.0), (2, -3.0), (3, -1.0)] {
            store.add(&interaction(first, energy));
        }
        store.add(&interaction(4, -2.0));
        assert_eq!(energies(&mut store), vec![-5.0, -3.0, -2.0]);
        store.add(&interaction(5, -10.0));
        assert_eq!(energies(&mut store), vec![-10.0, -5.0, -3.0]);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let store = OutputHandlerInteractionList::new(0);
        store.add(&interaction(1, -100.0));
        store.add(&interaction(2, E_INF));
        assert!(store.into_interactions().is_empty());
    }

    #[test]
    fn custom_ordering_defines_rank_and_duplicates() {
        let by_first_pair = |a: &Interaction, b: &Interaction| a.base_pairs[0] < b.base_pairs[0];
        let store = OutputHandlerInteractionList::with_ordering(2, by_first_pair);
        store.add(&interaction(3, -1.0));
        store.add(&interaction(1, 4.0));
        store.add(&interaction(3, -9.0));
        store.add(&interaction(2, 0.0));
        let stored = store.into_interactions();
        assert_eq!(stored, vec![interaction(1, 4.0), interaction(2, 0.0)]);
    }

    #[test]
    fn add_range_is_not_supported() {
        let store = OutputHandlerInteractionList::new(1);
        let range = InteractionRange::new(IndexRange::new(0, 3), IndexRange::new(2, 5), -1.0);
        assert_eq!(
            store.add_range(&range),
            Err(OutputError::NotImplemented(
                "OutputHandlerInteractionList::add_range"
            ))
        );
        assert_eq!(store.reported(), 0);
    }

    #[test]
    fn add_range_warns_about_unsupported_call() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("output.log");
        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false),
        );

        let store = OutputHandlerInteractionList::new(1);
        let range = InteractionRange::new(IndexRange::new(0, 3), IndexRange::new(2, 5), -1.0);
        tracing::subscriber::with_default(subscriber, || {
            let _ = store.add_range(&range);
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("WARN"));
        assert!(content.contains("0-3 x 2-5"));
    }

    #[test]
    fn add_all_matches_sequential_insertion() {
        let interactions: Vec<Interaction> = (0..200)
            .map(|k| interaction(k % 10, -(((k * 37) % 101) as Energy)))
            .collect();
        let mut sequential = OutputHandlerInteractionList::new(7);
        for i in &interactions {
            sequential.add(i);
        }
        let mut batched = OutputHandlerInteractionList::new(7);
        batched.add_all(&interactions);
        assert_eq!(batched.reported(), 200);
        assert_eq!(batched.interactions(), sequential.interactions());
    }

    #[test]
    fn concurrent_producers_leave_a_sorted_duplicate_free_list() {
        let store = Arc::new(OutputHandlerInteractionList::new(25));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for k in 0..500usize {
                        let energy = -(((k * 7 + worker * 13) % 97) as Energy);
                        store.add(&interaction(k % 5, energy));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = Arc::try_unwrap(store).unwrap();
        assert_eq!(store.reported(), 8 * 500);
        let stored = store.into_interactions();
        assert_eq!(stored.len(), 25);
        for pair in stored.windows(2) {
            assert!(Interaction::less_than(&pair[0], &pair[1]));
        }
        assert_eq!(stored[0].energy, -96.0);
    }
}
