use pretty_assertions::assert_eq;

use crate::{Arena, ArenaError, ArenaKind, BLOCK_CAP};

#[test]
fn alloc_get_round_trip() {
    let mut arena = Arena::new(ArenaKind::Node);
    let a = arena.alloc(10u64);
    let b = arena.alloc(20u64);
    assert_eq!(arena.get(a), Ok(&10));
    assert_eq!(arena.get(b), Ok(&20));
    assert_eq!(arena.len(), 2);
}

#[test]
fn handles_ascend_in_allocation_order() {
    let mut arena = Arena::new(ArenaKind::Node);
    let a = arena.alloc(1u32);
    let b = arena.alloc(2u32);
    let c = arena.alloc(3u32);
    assert!(a < b && b < c);
    assert_eq!(a.index(), 0);
    assert_eq!(c.index(), 2);
}

/// Growth across many blocks keeps earlier handles valid.
#[test]
fn growth_preserves_old_handles() {
    let mut arena = Arena::new(ArenaKind::Node);
    let first = arena.alloc(0usize);
    let handles: Vec<_> = (1..=BLOCK_CAP * 3).map(|i| arena.alloc(i)).collect();
    assert_eq!(arena.get(first), Ok(&0));
    for (i, h) in handles.iter().enumerate() {
        assert_eq!(arena.get(*h), Ok(&(i + 1)));
    }
}

#[test]
fn get_mut_updates_in_place() {
    let mut arena = Arena::new(ArenaKind::Node);
    let h = arena.alloc(String::from("x"));
    if let Ok(slot) = arena.get_mut(h) {
        slot.push('y');
    }
    assert_eq!(arena.get(h).map(String::as_str), Ok("xy"));
}

#[test]
fn reset_makes_handles_stale() {
    let mut arena = Arena::new(ArenaKind::Symbol);
    let h = arena.alloc(7i64);
    arena.reset();
    assert_eq!(
        arena.get(h),
        Err(ArenaError::StaleHandle {
            kind: ArenaKind::Symbol,
            index: 0,
            handle_gen: 0,
            arena_gen: 1,
        })
    );
    // A new allocation reuses slot 0 but under a new generation; the old
    // handle must not alias it.
    let fresh = arena.alloc(8i64);
    assert_eq!(fresh.index(), 0);
    assert!(arena.get(h).is_err());
    assert_eq!(arena.get(fresh), Ok(&8));
}

#[test]
fn foreign_handle_is_rejected() {
    let mut a = Arena::new(ArenaKind::Type);
    let mut b = Arena::new(ArenaKind::Type);
    let ha = a.alloc(1u8);
    let _hb = b.alloc(2u8);
    assert!(matches!(
        b.get(ha),
        Err(ArenaError::ForeignHandle { index: 0, .. })
    ));
}

#[test]
fn iter_visits_in_order() {
    let mut arena = Arena::new(ArenaKind::Constant);
    for i in 0..5u32 {
        arena.alloc(i * 2);
    }
    let collected: Vec<_> = arena.iter().map(|(h, v)| (h.index(), *v)).collect();
    assert_eq!(collected, vec![(0, 0), (1, 2), (2, 4), (3, 6), (4, 8)]);
}

#[test]
fn handle_at_matches_issued_handle() {
    let mut arena = Arena::new(ArenaKind::Node);
    let h = arena.alloc(42u32);
    assert_eq!(arena.handle_at(0), Some(h));
    assert_eq!(arena.handle_at(1), None);
}
