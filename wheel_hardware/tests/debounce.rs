use std::time::{Duration, Instant};

use rstest::rstest;
use wheel_hardware::util::EdgeDebouncer;

#[rstest]
#[case(0, false)]
#[case(5, false)]
#[case(19, false)]
#[case(20, true)]
#[case(250, true)]
fn second_edge_respects_min_interval(#[case] after_ms: u64, #[case] accepted: bool) {
    let mut d = EdgeDebouncer::new(Duration::from_millis(20));
    let t0 = Instant::now();
    assert!(d.accept(t0), "first edge is always accepted");
    assert_eq!(d.accept(t0 + Duration::from_millis(after_ms)), accepted);
}

#[test]
fn rejected_edges_do_not_extend_the_window() {
    let mut d = EdgeDebouncer::new(Duration::from_millis(20));
    let t0 = Instant::now();
    assert!(d.accept(t0));
    assert!(!d.accept(t0 + Duration::from_millis(10)));
    assert!(!d.accept(t0 + Duration::from_millis(15)));
    // Measured from the last accepted edge (t0), not the last rejected one.
    assert!(d.accept(t0 + Duration::from_millis(21)));
}
