use super::*;

#[test]
fn test_enter_leave_tracks_depth() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Relation);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.depth(), 2);
    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_exceeded());
}

#[test]
fn test_reentering_a_visiting_key_is_a_cycle() {
    let mut guard: RecursionGuard<(u32, u32)> = RecursionGuard::new(10, 100);
    assert!(guard.enter((1, 2)).is_entered());
    let again = guard.enter((1, 2));
    assert!(again.is_cycle());
    assert!(again.is_denied());
    assert!(!again.is_exceeded());
    assert!(guard.is_visiting(&(1, 2)));
    guard.leave((1, 2));
    assert!(!guard.is_visiting(&(1, 2)));
}

#[test]
fn test_depth_limit() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::with_profile(RecursionProfile::Custom {
        max_depth: 2,
        max_iterations: 100,
    });
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
}

#[test]
fn test_iteration_budget_and_reset() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 2);
    for key in 0..2 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(9), RecursionResult::IterationExceeded);
    guard.reset_budget();
    assert!(!guard.is_exceeded());
    assert!(guard.enter(9).is_entered());
    guard.leave(9);
}

#[test]
fn test_profile_limits() {
    assert_eq!(RecursionProfile::Relation.max_depth(), 100);
    assert_eq!(RecursionProfile::TypePrinting.max_depth(), 10);
}
