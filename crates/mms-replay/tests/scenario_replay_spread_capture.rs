use mms_engine::{EngineParams, EMPTY_FLATTEN_PENALTY};
use mms_replay::{parse_tape, ReplayRunner, ReplaySettings};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

const SPREAD_TAPE: &str = "\
step,bid,ask,buy_volume,sell_volume,long_price,long_queue,short_price,short_queue
1,100.0,100.2,0,0,100.0,0,100.2,0
2,100.0,100.2,1000,1000,,,,
";

#[test]
fn scenario_both_quotes_fill_and_net_into_one_round_trip() {
    // GIVEN: quotes on both sides placed after step 1, both marketable at step 2
    let rows = parse_tape(SPREAD_TAPE).unwrap();
    let mut runner = ReplayRunner::new(EngineParams::default(), ReplaySettings::default());

    // WHEN
    let report = runner.run(&rows);

    // THEN: the short fill closes the long at 100.2
    let spread_pnl = (100.2 - 100.0) / 100.0;
    let empty_flatten = 2.0 * EMPTY_FLATTEN_PENALTY / 0.006;
    assert_eq!(report.steps, 2);
    assert_eq!(report.orders_placed, 2);
    assert_eq!(report.rejected_orders, 0);
    assert_eq!(report.fills, 2);
    assert_eq!(report.trade_count, 1);
    assert!(approx(report.realized_pnl, spread_pnl));
    assert!(approx(report.total_pnl, spread_pnl));
    assert!(
        approx(report.total_reward, spread_pnl / 0.006 + empty_flatten),
        "total_reward={}",
        report.total_reward
    );

    assert_eq!(report.reward_curve.len(), 2);
    assert_eq!(report.reward_curve[0].step, 1);
    assert_eq!(report.reward_curve[0].cumulative_reward, 0.0);
    assert!(approx(report.reward_curve[1].cumulative_reward, report.total_reward));

    assert_eq!(runner.broker().long_inventory_count(), 0);
    assert_eq!(runner.broker().short_inventory_count(), 0);
}

#[test]
fn scenario_held_inventory_is_flattened_at_the_end() {
    // GIVEN: a long fills at 100 and the book then moves up
    let tape = "\
step,bid,ask,buy_volume,sell_volume,long_price
1,100.0,100.2,0,0,100.0
2,100.0,100.2,1000,0,
3,101.0,101.2,0,0,
";
    let rows = parse_tape(tape).unwrap();
    let mut runner = ReplayRunner::new(EngineParams::default(), ReplaySettings::default());

    // WHEN
    let report = runner.run(&rows);

    // THEN: closed at the last bid, fee charged on the exit
    let pnl = (101.0 - 100.0) / 100.0 - 0.003;
    assert_eq!(report.fills, 1);
    assert_eq!(report.trade_count, 1);
    assert!(approx(report.realized_pnl, pnl));
    assert!(approx(report.total_reward, (pnl + EMPTY_FLATTEN_PENALTY) / 0.006));
    assert_eq!(report.final_features.long_inventory, 0.0);
}

#[test]
fn scenario_flatten_disabled_leaves_inventory_open() {
    let tape = "\
step,bid,ask,buy_volume,sell_volume,long_price
1,100.0,100.2,0,0,100.0
2,100.0,100.2,1000,0,
3,101.0,101.2,0,0,
";
    let rows = parse_tape(tape).unwrap();
    let settings = ReplaySettings {
        flatten_at_end: false,
        ..ReplaySettings::default()
    };
    let mut runner = ReplayRunner::new(EngineParams::default(), settings);

    let report = runner.run(&rows);

    assert_eq!(report.trade_count, 0);
    assert_eq!(report.realized_pnl, 0.0);
    assert_eq!(report.total_reward, 0.0);
    // Marked at the last midpoint 101.1.
    assert!(approx(report.total_pnl, (101.1 - 100.0) / 100.0));
    assert_eq!(report.final_features.long_inventory, 1.0);
    assert_eq!(runner.broker().long_inventory_count(), 1);
}

#[test]
fn scenario_flatten_row_closes_mid_tape() {
    let tape = "\
step,bid,ask,buy_volume,sell_volume,short_price,flatten
1,100.0,100.2,0,0,100.2,
2,100.0,100.2,0,1000,,
3,99.0,99.2,0,0,,true
4,99.0,99.2,0,0,,
";
    let rows = parse_tape(tape).unwrap();
    let settings = ReplaySettings {
        flatten_at_end: false,
        ..ReplaySettings::default()
    };
    let mut runner = ReplayRunner::new(EngineParams::default(), settings);

    let report = runner.run(&rows);

    // Short at 100.2 bought back at the ask 99.2; the empty long side adds
    // its penalty.
    let pnl = (100.2 - 99.2) / 100.2 - 0.003;
    assert_eq!(report.trade_count, 1);
    assert!(approx(report.realized_pnl, pnl));
    assert!(approx(
        report.reward_curve[2].cumulative_reward,
        (pnl + EMPTY_FLATTEN_PENALTY) / 0.006
    ));
    assert_eq!(report.reward_curve[3].cumulative_reward, report.reward_curve[2].cumulative_reward);
}

#[test]
fn scenario_orders_beyond_capacity_are_counted_as_rejected() {
    // GIVEN: max_position 1 and a long already held
    let tape = "\
step,bid,ask,buy_volume,sell_volume,long_price,long_queue
1,100.0,100.2,0,0,100.0,0
2,100.0,100.2,1000,0,99.9,0
3,100.0,100.2,0,0,99.8,50
";
    let rows = parse_tape(tape).unwrap();
    let mut runner = ReplayRunner::new(EngineParams::default(), ReplaySettings::default());

    // WHEN
    let report = runner.run(&rows);

    // THEN: the re-quotes after the fill never reach the book
    assert_eq!(report.orders_placed, 3);
    assert_eq!(report.rejected_orders, 2);
    assert_eq!(report.fills, 1);
}
