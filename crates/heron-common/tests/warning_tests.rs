//! Tests for the deduplicated warning log and positions.

use heron_common::{Position, clear_warnings, warn_once};

// One test: the warning set is process-wide and clearing it would race with
// any other test running in parallel.
#[test]
fn test_warn_once_deduplicates_until_cleared() {
    assert!(warn_once("tokenizer", "dedup-check message"));
    assert!(!warn_once("tokenizer", "dedup-check message"));
    // Same text from another component is a different warning.
    assert!(warn_once("tree-builder", "dedup-check message"));

    clear_warnings();
    assert!(warn_once("tokenizer", "dedup-check message"));
}

#[test]
fn test_position_display_and_order() {
    let a = Position::new(1, 9);
    let b = Position::new(2, 1);

    assert_eq!(a.to_string(), "1:9");
    assert!(a < b);
    assert_eq!(Position::default(), Position::START);
}
