//! Status ordering, cycling and parsing.

use crate::task::domain::{ClosingStatus, ParseStatusError, Status};
use rstest::rstest;

#[rstest]
#[case(Status::Active, Status::InProgress)]
#[case(Status::InProgress, Status::Hold)]
#[case(Status::Hold, Status::Cancelled)]
#[case(Status::Cancelled, Status::Completed)]
#[case(Status::Completed, Status::Active)]
fn successor_follows_fixed_order_and_wraps(#[case] current: Status, #[case] expected: Status) {
    assert_eq!(current.successor(), expected);
}

#[rstest]
fn cycling_visits_every_status_once() {
    let mut seen = vec![Status::Active];
    let mut current = Status::Active.successor();
    while current != Status::Active {
        seen.push(current);
        current = current.successor();
    }
    assert_eq!(seen, Status::ALL);
}

#[rstest]
fn derived_order_matches_lifecycle_positions() {
    let mut shuffled = vec![
        Status::Completed,
        Status::Hold,
        Status::Active,
        Status::Cancelled,
        Status::InProgress,
    ];
    shuffled.sort();
    assert_eq!(shuffled, Status::ALL);
    for (index, status) in Status::ALL.iter().enumerate() {
        assert_eq!(status.position(), index);
    }
}

#[rstest]
#[case("active", Status::Active)]
#[case("in_progress", Status::InProgress)]
#[case(" HOLD ", Status::Hold)]
#[case("Cancelled", Status::Cancelled)]
#[case("completed", Status::Completed)]
fn parses_storage_strings(#[case] raw: &str, #[case] expected: Status) {
    assert_eq!(Status::try_from(raw), Ok(expected));
}

#[rstest]
#[case("done")]
#[case("")]
#[case("In Progress")]
fn rejects_unknown_status_strings(#[case] raw: &str) {
    assert_eq!(
        Status::try_from(raw),
        Err(ParseStatusError(raw.to_owned()))
    );
}

#[rstest]
fn storage_strings_round_trip() {
    for status in Status::ALL {
        assert_eq!(Status::try_from(status.as_str()), Ok(status));
    }
}

#[rstest]
fn labels_are_human_readable() {
    assert_eq!(Status::InProgress.label(), "In Progress");
    assert_eq!(Status::Hold.to_string(), "On Hold");
}

#[rstest]
fn completed_closes_by_default() {
    let closing = ClosingStatus::default();
    assert!(closing.closes(Status::Completed));
    assert!(!closing.closes(Status::Cancelled));
}
