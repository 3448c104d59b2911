//! Integration tests for cycle detection over visit chains.

use probe_core::payload::{is_cyclic, is_cyclic_path, CyclicGuard, VisitChain};

// === is_cyclic ===

#[test]
fn indirect_cycle_past_the_threshold() {
    assert!(is_cyclic(&["a", "b", "a", "b", "a", "b"], 2));
}

#[test]
fn indirect_cycle_at_the_threshold_is_tolerated() {
    assert!(!is_cyclic(&["a", "b", "a", "b"], 2));
}

#[test]
fn direct_self_reference() {
    assert!(is_cyclic(&["node", "node", "node"], 2));
    assert!(!is_cyclic(&["node", "node"], 2));
}

#[test]
fn longer_periods_are_found_without_being_told() {
    let chain = ["root", "a", "b", "c", "a", "b", "c", "a", "b", "c", "leaf"];
    assert!(is_cyclic(&chain, 2));
    assert!(!is_cyclic(&chain, 3));
}

#[test]
fn distinct_segments_are_never_cyclic() {
    assert!(!is_cyclic(&["a", "b", "c"], 5));
    assert!(!is_cyclic(&["a", "b", "c", "d", "e", "f"], 1));
}

#[test]
fn empty_chain_or_zero_threshold_is_never_cyclic() {
    let empty: [&str; 0] = [];
    for n in 0..5 {
        assert!(!is_cyclic(&empty, n));
    }
    assert!(!is_cyclic(&["a", "a", "a", "a"], 0));
}

#[test]
fn works_on_any_comparable_segment() {
    assert!(is_cyclic(&[1, 2, 1, 2, 1, 2], 2));
}

// === Flat paths and guards ===

#[test]
fn flat_path_form() {
    assert!(is_cyclic_path("pet#owner#pet#owner#pet#owner", 2));
    assert!(!is_cyclic_path("pet#owner#name", 2));
    assert!(!is_cyclic_path("", 2));
}

#[test]
fn guard_admits_until_the_cycle_closes() {
    let guard = CyclicGuard::new(2);
    let mut chain = VisitChain::new();
    let mut admitted = 0;
    for segment in ["employee", "manager"].iter().cycle().take(10) {
        if !guard.admits(&chain, segment) {
            break;
        }
        chain.push(*segment);
        admitted += 1;
    }
    // employee,manager repeated twice, plus the next employee.
    assert_eq!(admitted, 5);
    assert!(!guard.is_cyclic(chain.segments()));
}

#[test]
fn visit_chain_from_iterator() {
    let chain: VisitChain = ["a", "b", "a", "b", "a", "b"].into_iter().collect();
    assert_eq!(chain.len(), 6);
    assert!(CyclicGuard::new(2).is_cyclic(chain.segments()));
}
