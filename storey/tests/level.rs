//! Behavioural tests for `Level` through its public API.

use proptest::prelude::*;
use storey::{ColorMatch, Level, LevelError};

fn positions(level: &Level) -> Vec<u32> {
    level.slots().map(|slot| slot.position()).collect()
}

// ============================================================================
// Allocation policy
// ============================================================================

#[test]
fn full_level_rejects_and_keeps_occupancy() {
    let mut level = Level::with_capacity(3);
    for plate in ["P1", "P2", "P3"] {
        level.allocate(plate, "white").unwrap();
    }

    assert_eq!(
        level.allocate("P4", "white"),
        Err(LevelError::CapacityExceeded { capacity: 3 })
    );
    assert_eq!(level.occupancy_count(), 3);
    assert_eq!(positions(&level), vec![1, 2, 3]);
}

#[test]
fn freed_position_is_reused_before_extending() {
    let mut level = Level::with_capacity(6);
    level.allocate("P1", "white").unwrap();
    level.allocate("P2", "white").unwrap();
    level.allocate("P3", "white").unwrap();

    assert_eq!(level.release_by_position(2).unwrap().position, 2);
    assert_eq!(level.allocate("P4", "white"), Ok(2));
    assert_eq!(level.allocate("P5", "white"), Ok(4));
}

#[test]
fn release_then_find_is_not_found() {
    let mut level = Level::with_capacity(4);
    level.allocate("KA-01", "white").unwrap();
    level.allocate("KA-02", "white").unwrap();

    level.release_by_plate("KA-01").unwrap();

    assert_eq!(level.find_by_plate("KA-01"), Err(LevelError::NotFound));
}

#[test]
fn releasing_first_slot_retargets_head() {
    let mut level = Level::with_capacity(4);
    level.allocate("P1", "white").unwrap();
    level.allocate("P2", "white").unwrap();

    level.release_by_position(1).unwrap();

    assert_eq!(level.occupancy_count(), 1);
    assert_eq!(level.head_position(), Some(2));
    assert_eq!(level.find_by_plate("P2"), Ok(2));
    assert!(level.is_well_formed());
}

#[test]
fn releasing_middle_slot_keeps_back_links() {
    let mut level = Level::with_capacity(4);
    for plate in ["P1", "P2", "P3"] {
        level.allocate(plate, "white").unwrap();
    }

    level.release_by_plate("P2").unwrap();
    assert!(level.is_well_formed());

    let back: Vec<_> = level.slots().rev().map(|slot| slot.position()).collect();
    assert_eq!(back, vec![3, 1]);
}

// ============================================================================
// Empty level
// ============================================================================

#[test]
fn empty_level_queries_report_no_vehicles() {
    let mut level = Level::with_capacity(4);

    assert_eq!(level.find_by_plate("KA-01"), Err(LevelError::NoVehiclesParked));
    assert_eq!(level.find_all_by_color("red"), Err(LevelError::NoVehiclesParked));
    assert_eq!(level.release_by_plate("KA-01"), Err(LevelError::NoVehiclesParked));
    assert_eq!(level.release_by_position(1), Err(LevelError::NoVehiclesParked));
    assert_eq!(level.list_all(), Err(LevelError::NoVehiclesParked));
    assert_eq!(level.occupancy_count(), 0);
}

#[test]
fn emptied_level_reports_no_vehicles_again() {
    let mut level = Level::with_capacity(4);
    level.allocate("P1", "red").unwrap();
    level.release_by_plate("P1").unwrap();

    assert!(level.is_empty());
    assert_eq!(level.find_by_plate("P1"), Err(LevelError::NoVehiclesParked));
    assert_eq!(level.allocate("P2", "red"), Ok(1));
}

// ============================================================================
// Color queries
// ============================================================================

#[test]
fn color_matches_follow_position_order() {
    let mut level = Level::with_capacity(4);
    level.allocate("P1", "red").unwrap();
    level.allocate("P2", "blue").unwrap();
    level.allocate("P3", "red").unwrap();

    assert_eq!(
        level.find_all_by_color("red").unwrap(),
        vec![
            ColorMatch {
                position: 1,
                plate: "P1".into(),
            },
            ColorMatch {
                position: 3,
                plate: "P3".into(),
            },
        ]
    );
}

#[test]
fn color_matches_follow_position_after_gap_fill() {
    let mut level = Level::with_capacity(4);
    level.allocate("P1", "red").unwrap();
    level.allocate("P2", "blue").unwrap();
    level.allocate("P3", "red").unwrap();
    level.release_by_plate("P1").unwrap();

    // P4 lands in slot 1, ahead of P3
    level.allocate("P4", "red").unwrap();

    assert_eq!(level.plates_by_color("red").unwrap(), vec!["P4", "P3"]);
}

#[test]
fn unmatched_color_is_attribute_not_found() {
    let mut level = Level::with_capacity(4);
    level.allocate("P1", "red").unwrap();

    assert_eq!(
        level.find_all_by_color("green"),
        Err(LevelError::AttributeNotFound {
            color: "green".into()
        })
    );
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn operations_run_under_a_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut level = Level::with_capacity(1);
        level.allocate("P1", "red").unwrap();
        assert!(level.allocate("P2", "red").is_err());
        level.release_by_plate("P1").unwrap();
        assert!(level.release_by_plate("P1").is_err());
    });
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Allocate(u8),
    ReleasePlate(u8),
    ReleasePosition(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..24).prop_map(Op::Allocate),
        1 => (0u8..24).prop_map(Op::ReleasePlate),
        1 => (0u32..18).prop_map(Op::ReleasePosition),
    ]
}

fn lowest_vacant(occupied: &[u32]) -> u32 {
    let mut candidate = 1;
    for &position in occupied {
        if position != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}

proptest! {
    #[test]
    fn random_churn_keeps_invariants(
        capacity in 1usize..16,
        ops in prop::collection::vec(op(), 1..120),
    ) {
        let mut level = Level::with_capacity(capacity);

        for op in ops {
            let before = positions(&level);

            match op {
                Op::Allocate(id) => {
                    let plate = format!("P{id}");
                    let already_parked = level.find_by_plate(&plate).is_ok();

                    match level.allocate(plate, "grey") {
                        Ok(position) => {
                            prop_assert_eq!(position, lowest_vacant(&before));
                            prop_assert!(before.len() < capacity);
                        }
                        Err(LevelError::CapacityExceeded { .. }) => {
                            prop_assert_eq!(before.len(), capacity);
                        }
                        Err(LevelError::DuplicatePlate { .. }) => prop_assert!(already_parked),
                        Err(e) => prop_assert!(false, "unexpected error {e}"),
                    }
                }
                Op::ReleasePlate(id) => {
                    let result = level.release_by_plate(&format!("P{id}"));
                    if before.is_empty() {
                        prop_assert_eq!(result, Err(LevelError::NoVehiclesParked));
                    } else if let Ok(released) = result {
                        prop_assert!(before.contains(&released.position));
                    }
                }
                Op::ReleasePosition(position) => {
                    let result = level.release_by_position(position);
                    match result {
                        Ok(released) => prop_assert!(before.contains(&released.position)),
                        Err(LevelError::NoVehiclesParked) => prop_assert!(before.is_empty()),
                        Err(LevelError::NotFound) => prop_assert!(!before.contains(&position)),
                        Err(e) => prop_assert!(false, "unexpected error {e}"),
                    }
                }
            }

            let after = positions(&level);
            prop_assert!(after.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(after.len() <= capacity);
            prop_assert_eq!(after.len(), level.occupancy_count());
            prop_assert!(level.is_well_formed());
        }
    }
}
