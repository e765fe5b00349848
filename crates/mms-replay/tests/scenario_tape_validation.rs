use std::io::Write;

use mms_engine::Side;
use mms_replay::{load_tape_file, parse_tape, TapeError};

const HEADER: &str = "step,bid,ask,buy_volume,sell_volume\n";

#[test]
fn scenario_minimal_columns_default_the_rest() {
    let rows = parse_tape(&format!("{HEADER}1,100.0,100.2,5,7\n")).unwrap();
    assert_eq!(rows.len(), 1);
    let r = &rows[0];
    assert_eq!(r.tick().buy_volume, 5.0);
    assert_eq!(r.tick().sell_volume, 7.0);
    assert!((r.midpoint() - 100.1).abs() < 1e-12);
    assert_eq!(r.order_for(Side::Long), None);
    assert_eq!(r.order_for(Side::Short), None);
    assert!(!r.flattens());
}

#[test]
fn scenario_columns_in_any_order_and_missing_queue_is_front() {
    let tape = "ask,long_price,step,sell_volume,bid,buy_volume,midpoint\n100.2,99.9,3,0,100.0,0,100.15\n";
    let rows = parse_tape(tape).unwrap();
    assert_eq!(rows[0].step, 3);
    assert_eq!(rows[0].order_for(Side::Long), Some((99.9, 0.0)));
    assert_eq!(rows[0].midpoint(), 100.15);
}

#[test]
fn scenario_empty_tape_is_rejected() {
    assert_eq!(parse_tape(HEADER), Err(TapeError::Empty));
}

#[test]
fn scenario_crossed_book_is_rejected() {
    let err = parse_tape(&format!("{HEADER}1,100.3,100.2,0,0\n")).unwrap_err();
    match err {
        TapeError::InvalidRow { step, reason } => {
            assert_eq!(step, 1);
            assert!(reason.contains("crossed"), "reason={reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scenario_negative_volume_and_bad_order_price_are_rejected() {
    let err = parse_tape(&format!("{HEADER}1,100.0,100.2,-1,0\n")).unwrap_err();
    assert!(err.to_string().contains("buy_volume"), "{err}");

    let tape = "step,bid,ask,buy_volume,sell_volume,short_price\n1,100.0,100.2,0,0,0\n";
    let err = parse_tape(tape).unwrap_err();
    assert!(err.to_string().contains("short_price"), "{err}");
}

#[test]
fn scenario_non_finite_price_is_rejected() {
    let err = parse_tape(&format!("{HEADER}1,NaN,100.2,0,0\n")).unwrap_err();
    assert!(matches!(err, TapeError::InvalidRow { .. }), "{err}");
}

#[test]
fn scenario_steps_must_strictly_increase() {
    let tape = format!("{HEADER}1,100.0,100.2,0,0\n1,100.0,100.2,0,0\n");
    assert_eq!(
        parse_tape(&tape),
        Err(TapeError::NonIncreasingStep {
            previous: 1,
            step: 1
        })
    );
}

#[test]
fn scenario_unparseable_cell_reports_record() {
    let err = parse_tape(&format!("{HEADER}1,100.0,100.2,0,0\n2,abc,100.2,0,0\n")).unwrap_err();
    match err {
        TapeError::Csv { record, .. } => assert_eq!(record, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scenario_load_from_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "{HEADER}1,100.0,100.2,0,0\n2,100.0,100.2,10,0\n").unwrap();
    let rows = load_tape_file(f.path()).unwrap();
    assert_eq!(rows.len(), 2);

    let missing = load_tape_file(f.path().with_extension("missing"));
    assert!(matches!(missing, Err(TapeError::Io(_))));
}
