/*!
 * Memory Manager Tests
 * Allocation, deallocation, coalescing and error handling
 */

use memory_sim::memory::{Allocator, FitStrategy, MemoryError, MemoryInfo, MemoryManager};
use pretty_assertions::assert_eq;

fn layout(manager: &MemoryManager) -> Vec<(usize, usize, Option<String>)> {
    manager
        .snapshot()
        .into_iter()
        .map(|b| (b.start, b.size, b.owner.map(String::from)))
        .collect()
}

#[test]
fn test_memory_manager_initialization() {
    let mem_mgr = MemoryManager::new(100, FitStrategy::FirstFit).unwrap();
    let (total, reserved, free) = mem_mgr.info();

    assert_eq!(total, 100);
    assert_eq!(reserved, 0);
    assert_eq!(free, 100);
    assert_eq!(layout(&mem_mgr), vec![(0, 100, None)]);
    assert_eq!(mem_mgr.strategy_name(), "First Fit");
}

#[test]
fn test_zero_sized_memory_rejected() {
    assert_eq!(
        MemoryManager::new(0, FitStrategy::BestFit).unwrap_err(),
        MemoryError::InvalidSize(0)
    );
}

#[test]
fn test_default_manager() {
    let mem_mgr = MemoryManager::default();
    assert_eq!(mem_mgr.total_memory(), 100);
    assert_eq!(mem_mgr.strategy(), FitStrategy::FirstFit);
}

#[test]
fn test_split_on_allocate() {
    let mut mem_mgr = MemoryManager::with_capacity(10).unwrap();

    let block = mem_mgr.allocate("P1", 5, None).unwrap();

    assert_eq!((block.start, block.size, block.used), (0, 5, 5));
    assert!(!block.is_free);
    assert_eq!(
        layout(&mem_mgr),
        vec![(0, 5, Some("P1".into())), (5, 5, None)]
    );
}

#[test]
fn test_exact_fit_does_not_split() {
    let mut mem_mgr = MemoryManager::with_capacity(10).unwrap();

    mem_mgr.allocate("P1", 10, Some(4)).unwrap();

    let snapshot = mem_mgr.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].used, 4);
    assert!(!snapshot[0].is_free);
}

#[test]
fn test_coalescing_round_trip() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("A", 30, None).unwrap();
    mem_mgr.allocate("B", 20, None).unwrap();
    mem_mgr.allocate("C", 10, None).unwrap();

    mem_mgr.deallocate("B").unwrap();
    assert_eq!(
        layout(&mem_mgr),
        vec![
            (0, 30, Some("A".into())),
            (30, 20, None),
            (50, 10, Some("C".into())),
            (60, 40, None),
        ]
    );

    // C sits between two holes and merges with both
    mem_mgr.deallocate("C").unwrap();
    assert_eq!(
        layout(&mem_mgr),
        vec![(0, 30, Some("A".into())), (30, 70, None)]
    );

    mem_mgr.deallocate("A").unwrap();
    assert_eq!(layout(&mem_mgr), vec![(0, 100, None)]);
}

#[test]
fn test_free_merges_with_predecessor() {
    let mut mem_mgr = MemoryManager::with_capacity(30).unwrap();
    mem_mgr.allocate("A", 10, None).unwrap();
    mem_mgr.allocate("B", 10, None).unwrap();
    mem_mgr.allocate("C", 10, None).unwrap();

    mem_mgr.deallocate("A").unwrap();
    mem_mgr.deallocate("B").unwrap();

    assert_eq!(
        layout(&mem_mgr),
        vec![(0, 20, None), (20, 10, Some("C".into()))]
    );
    assert!(mem_mgr.registry().check_invariants().is_ok());
}

#[test]
fn test_deallocate_returns_released_block() {
    let mut mem_mgr = MemoryManager::with_capacity(50).unwrap();
    mem_mgr.allocate("P1", 20, Some(12)).unwrap();

    let released = mem_mgr.deallocate("P1").unwrap();

    assert_eq!((released.start, released.size, released.used), (0, 20, 12));
    assert_eq!(released.owner.as_deref(), Some("P1"));
    assert!(!mem_mgr.contains("P1"));
}

#[test]
fn test_unknown_owner_leaves_memory_untouched() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("A", 30, Some(10)).unwrap();
    let before = mem_mgr.snapshot();

    let result = mem_mgr.deallocate("ghost");

    assert_eq!(result, Err(MemoryError::OwnerNotFound("ghost".into())));
    assert_eq!(mem_mgr.snapshot(), before);
}

#[test]
fn test_double_deallocation() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("A", 30, None).unwrap();
    mem_mgr.deallocate("A").unwrap();

    assert!(matches!(
        mem_mgr.deallocate("A"),
        Err(MemoryError::OwnerNotFound(_))
    ));
}

#[test]
fn test_out_of_memory_leaves_memory_untouched() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("A", 40, None).unwrap();
    mem_mgr.allocate("B", 20, None).unwrap();
    mem_mgr.deallocate("A").unwrap();
    let before = mem_mgr.snapshot();

    // 80 units are free in total, but no single hole holds 50
    let result = mem_mgr.allocate("C", 50, None);

    match result {
        Err(MemoryError::OutOfMemory {
            requested,
            largest_free,
            total_free,
        }) => {
            assert_eq!(requested, 50);
            assert_eq!(largest_free, 40);
            assert_eq!(total_free, 80);
        }
        other => panic!("Expected OutOfMemory error, got {:?}", other),
    }
    assert_eq!(mem_mgr.snapshot(), before);
}

#[test]
fn test_contract_violations_rejected() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    let before = mem_mgr.snapshot();

    assert_eq!(mem_mgr.allocate("", 10, None), Err(MemoryError::EmptyOwner));
    assert_eq!(
        mem_mgr.allocate("P1", 0, None),
        Err(MemoryError::InvalidSize(0))
    );
    assert_eq!(
        mem_mgr.allocate("P1", 10, Some(11)),
        Err(MemoryError::UsedExceedsSize { used: 11, size: 10 })
    );
    assert_eq!(mem_mgr.snapshot(), before);
}

#[test]
fn test_duplicate_owner_rejected() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("P1", 10, None).unwrap();

    let err = mem_mgr.allocate("P1", 5, None).unwrap_err();

    assert_eq!(err, MemoryError::DuplicateOwner("P1".into()));
    assert!(err.is_contract_violation());
    assert_eq!(mem_mgr.snapshot().len(), 2);
}

#[test]
fn test_owner_can_allocate_again_after_release() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("P1", 10, None).unwrap();
    mem_mgr.deallocate("P1").unwrap();

    assert!(mem_mgr.allocate("P1", 25, None).is_ok());
    assert_eq!(mem_mgr.owner_block("P1").unwrap().size, 25);
}

#[test]
fn test_zero_used_allowed() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    let block = mem_mgr.allocate("idle", 10, Some(0)).unwrap();
    assert_eq!(block.used, 0);
    assert_eq!(mem_mgr.stats().internal_fragmentation, 10);
}

#[test]
fn test_reset() {
    let mut mem_mgr = MemoryManager::with_capacity(100).unwrap();
    mem_mgr.allocate("A", 30, None).unwrap();
    mem_mgr.allocate("B", 30, None).unwrap();

    mem_mgr.reset();

    assert_eq!(layout(&mem_mgr), vec![(0, 100, None)]);
    assert!(!mem_mgr.contains("A"));
}

#[test]
fn test_allocator_trait_object() {
    let mut mem_mgr = MemoryManager::with_capacity(64).unwrap();
    let allocator: &mut dyn Allocator = &mut mem_mgr;

    allocator.allocate("P1", 16, None).unwrap();
    assert!(allocator.contains("P1"));
    allocator.deallocate("P1").unwrap();
    assert!(!allocator.contains("P1"));
}
