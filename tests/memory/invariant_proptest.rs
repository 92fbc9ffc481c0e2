/*!
 * Property Tests
 * Registry invariants under random allocate/deallocate sequences
 */

use memory_sim::memory::{FitStrategy, MemoryManager};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Alloc { owner: u8, size: usize, unused: usize },
    Free { owner: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12, 1usize..40, 0usize..10).prop_map(|(owner, size, unused)| Op::Alloc {
            owner,
            size,
            unused
        }),
        (0u8..12).prop_map(|owner| Op::Free { owner }),
    ]
}

fn strategy() -> impl Strategy<Value = FitStrategy> {
    prop_oneof![
        Just(FitStrategy::FirstFit),
        Just(FitStrategy::BestFit),
        Just(FitStrategy::WorstFit),
    ]
}

fn apply(manager: &mut MemoryManager, op: &Op) {
    match op {
        Op::Alloc {
            owner,
            size,
            unused,
        } => {
            let used = size.saturating_sub(*unused);
            let _ = manager.allocate(&format!("P{}", owner), *size, Some(used));
        }
        Op::Free { owner } => {
            let _ = manager.deallocate(&format!("P{}", owner));
        }
    }
}

proptest! {
    #[test]
    fn prop_partition_and_coalescing_hold(
        total in 1usize..200,
        fit in strategy(),
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let mut manager = MemoryManager::new(total, fit).unwrap();

        for op in &ops {
            apply(&mut manager, op);
            prop_assert_eq!(manager.registry().check_invariants(), Ok(()));

            let snapshot = manager.snapshot();
            prop_assert_eq!(snapshot.first().map(|b| b.start), Some(0));
            prop_assert_eq!(snapshot.iter().map(|b| b.size).sum::<usize>(), total);
            for pair in snapshot.windows(2) {
                prop_assert_eq!(pair[0].start + pair[0].size, pair[1].start);
                prop_assert!(!(pair[0].is_free && pair[1].is_free));
            }
        }
    }

    #[test]
    fn prop_stats_balance(
        total in 1usize..200,
        fit in strategy(),
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let mut manager = MemoryManager::new(total, fit).unwrap();
        for op in &ops {
            apply(&mut manager, op);
        }

        let stats = manager.stats();
        prop_assert_eq!(stats.reserved_used + stats.total_free, total);
        prop_assert_eq!(stats.reserved_used - stats.actual_used, stats.internal_fragmentation);
        prop_assert_eq!(stats.total_free - stats.largest_free, stats.external_fragmentation);
        prop_assert!(stats.largest_free <= stats.total_free);
    }

    #[test]
    fn prop_releasing_everything_restores_initial_state(
        total in 1usize..200,
        fit in strategy(),
        ops in prop::collection::vec(op(), 0..60),
    ) {
        let mut manager = MemoryManager::new(total, fit).unwrap();
        for op in &ops {
            apply(&mut manager, op);
        }

        for owner in 0u8..12 {
            let _ = manager.deallocate(&format!("P{}", owner));
        }

        let snapshot = manager.snapshot();
        prop_assert_eq!(snapshot.len(), 1);
        prop_assert!(snapshot[0].is_free);
        prop_assert_eq!(snapshot[0].size, total);
    }

    #[test]
    fn prop_failed_operations_do_not_mutate(
        total in 1usize..200,
        fit in strategy(),
        ops in prop::collection::vec(op(), 0..40),
        request in 1usize..400,
    ) {
        let mut manager = MemoryManager::new(total, fit).unwrap();
        for op in &ops {
            apply(&mut manager, op);
        }
        let before = manager.snapshot();

        prop_assert!(manager.deallocate("never-allocated").is_err());
        prop_assert_eq!(&manager.snapshot(), &before);

        if request > manager.stats().largest_free {
            prop_assert!(manager.allocate("fresh", request, None).is_err());
            prop_assert_eq!(&manager.snapshot(), &before);
        }
    }
}
