//! End-to-end scenarios
//!
//! Games are loaded through the document parser and played through the
//! engine, the same path the command-line driver takes.

use std::collections::HashSet;

use rf_slot_math::{
    GameConfig, GameParser, HistogramSpec, Odometer, RunOptions, ScatterPay, SlotEngine,
    StatisticsReport, run,
};

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

const FRUIT: &str = r#"
name: Fruit
grid: { reels: 3, rows: 1 }
symbols:
  - { name: CHERRY }
  - { name: LEMON }
paytable:
  CHERRY: [0, 0, 10]
paylines:
  - rows: [0, 0, 0]
reels:
  base:
    - [CHERRY, LEMON]
    - [CHERRY, LEMON]
    - [CHERRY, LEMON]
"#;

const SCATTERED: &str = r#"
name: Scattered
grid: { reels: 3, rows: 3 }
symbols:
  - { name: A }
  - { name: B }
  - { name: STAR, kinds: [scatter] }
paytable:
  STAR: [0, 0, 5]
paylines:
  - rows: [0, 0, 0]
reels:
  base:
    - [STAR, A, B]
    - [A, STAR, B]
    - [A, B, STAR]
"#;

const WILD_RUN: &str = r#"
name: Wild run
grid: { reels: 3, rows: 1 }
symbols:
  - { name: A }
  - { name: WILD, kinds: [wild] }
paytable:
  A: [0, 0, 5]
  WILD: [0, 0, 50]
paylines:
  - rows: [0, 0, 0]
reels:
  base:
    - [WILD, A]
    - [WILD, A]
    - [WILD, A]
"#;

const FULL: &str = r#"
name: Full
grid: { reels: 5, rows: 3 }
symbols:
  - { name: TEN }
  - { name: JACK }
  - { name: QUEEN }
  - { name: SEVEN }
  - { name: WILD, kinds: [wild] }
  - { name: STAR, kinds: [scatter] }
paytable:
  TEN: [0, 0, 2, 5, 10]
  JACK: [0, 0, 3, 8, 15]
  QUEEN: [0, 0, 4, 10, 20]
  SEVEN: [0, 2, 10, 40, 100]
  WILD: [0, 0, 20, 80, 200]
  STAR: [0, 0, 2, 10, 50]
paylines:
  - rows: [1, 1, 1, 1, 1]
  - rows: [0, 0, 0, 0, 0]
  - rows: [2, 2, 2, 2, 2]
  - rows: [0, 1, 2, 1, 0]
  - rows: [2, 1, 0, 1, 2]
reels:
  base:
    - [TEN, JACK, QUEEN, SEVEN, TEN, WILD, JACK, STAR, QUEEN, TEN, JACK]
    - [JACK, TEN, QUEEN, WILD, TEN, SEVEN, JACK, QUEEN, STAR, TEN]
    - [QUEEN, TEN, JACK, SEVEN, STAR, TEN, WILD, JACK, QUEEN, TEN, JACK]
    - [TEN, QUEEN, JACK, TEN, SEVEN, WILD, QUEEN, STAR, JACK]
    - [JACK, TEN, QUEEN, STAR, JACK, TEN, SEVEN, QUEEN, WILD, TEN]
multipliers: { scatter: 1, wild_in_line: 2, free_spins: 3 }
rules:
  preset: scatter_free_spins
  both_ways: true
"#;

fn load(yaml: &str) -> GameConfig {
    GameParser::new().parse_yaml(yaml).expect("fixture parses")
}

fn report(engine: &SlotEngine) -> StatisticsReport {
    engine
        .stats()
        .report(&engine.config().symbols, &HistogramSpec::default())
}

// ═══════════════════════════════════════════════════════════════════════════════
// LINE AND SCATTER PAYS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_three_cherries_pay_ten_times_stake() {
    let mut engine = SlotEngine::with_seed(load(FRUIT), 1).unwrap();

    let outcome = engine.play_round_at(&[0, 0, 0]);
    assert_eq!(outcome.base_win, 10 * outcome.bet);
    assert_eq!(engine.line_wins(), &[10]);

    let outcome = engine.play_round_at(&[1, 1, 1]);
    assert_eq!(outcome.base_win, 0);
    assert!(engine.winners().is_clear());
}

#[test]
fn test_line_bet_scales_line_wins() {
    let game = load(FRUIT).with_line_bet(4);
    let mut engine = SlotEngine::with_seed(game, 1).unwrap();
    let outcome = engine.play_round_at(&[0, 0, 0]);
    assert_eq!(outcome.bet, 4);
    assert_eq!(outcome.base_win, 40);
}

#[test]
fn test_scatter_pays_stake() {
    let mut engine = SlotEngine::with_seed(load(SCATTERED), 1).unwrap();
    let outcome = engine.play_round_at(&[0, 0, 0]);
    assert_eq!(outcome.base_win, 5);
    assert_eq!(engine.line_wins(), &[0]);
    assert_eq!(engine.winners().marked(), 3);

    let game = load(SCATTERED).with_line_bet(3);
    let mut engine = SlotEngine::with_seed(game, 1).unwrap();
    assert_eq!(engine.play_round_at(&[0, 0, 0]).base_win, 15);
}

#[test]
fn test_scatter_pays_fixed_multiplier() {
    let yaml = format!("{SCATTERED}multipliers: {{ scatter: 2 }}\nrules: {{ scatter_pay: fixed }}\n");
    let game = load(&yaml).with_line_bet(3);
    assert_eq!(game.rules.scatter_pay, ScatterPay::Fixed);

    let mut engine = SlotEngine::with_seed(game, 1).unwrap();
    assert_eq!(engine.play_round_at(&[0, 0, 0]).base_win, 10);
}

#[test]
fn test_wild_run_beats_substitution() {
    let mut engine = SlotEngine::with_seed(load(WILD_RUN), 1).unwrap();

    // Three wilds: own pay 50 beats nothing to substitute for
    assert_eq!(engine.play_round_at(&[0, 0, 0]).base_win, 50);
    let hit = engine.attributions()[0];
    assert_eq!((hit.symbol, hit.count, hit.amount), (1, 3, 50));

    // Two wilds and an A: substitution pays 5, two wilds pay nothing
    assert_eq!(engine.play_round_at(&[0, 0, 1]).base_win, 5);
    assert_eq!(engine.attributions()[0].symbol, 0);
}

#[test]
fn test_zero_count_never_pays() {
    let game = load(FULL);
    for symbol in 0..game.symbols.len() as u32 {
        assert_eq!(game.paytable.pay(symbol, 0), 0);
    }
}

#[test]
fn test_round_win_is_sum_of_attributions() {
    let mut game = load(FULL);
    game.rules.free_spins = Default::default();
    let mut engine = SlotEngine::with_seed(game, 2024).unwrap();

    for _ in 0..2000 {
        let outcome = engine.play_one_round();
        let attributed: u64 = engine.attributions().iter().map(|a| a.amount).sum();
        assert_eq!(outcome.base_win, attributed);
        assert_eq!(outcome.free_win, 0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FEATURES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_collapse_chains_terminate() {
    let yaml = FULL.replace("preset: scatter_free_spins", "preset: blast_collapse");
    let game = load(&yaml);
    assert!(game.rules.collapse);

    let mut engine = SlotEngine::with_seed(game, 77).unwrap();
    engine.simulate(3000);
    assert!(engine.stats().max_collapses < 1000);
    assert_eq!(engine.stats().base.games, 3000);
}

#[test]
fn test_free_spins_are_played_and_counted() {
    let mut engine = SlotEngine::with_seed(load(FULL), 5).unwrap();
    engine.simulate(20_000);

    let report = report(&engine);
    assert!(report.free_starts > 0);
    assert!(report.free_spins >= 15 * report.free_starts);
    assert!(report.max_free_spins_run >= 15);
    assert_eq!(report.won, report.base_money + report.free_money);
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMERATION AND STATISTICS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_odometer_visits_each_combination_once() {
    let seen: HashSet<Vec<usize>> = Odometer::new(vec![3, 3]).collect();
    assert_eq!(seen.len(), 9);
    assert_eq!(Odometer::new(vec![3, 3]).count(), 9);
}

#[test]
fn test_brute_force_two_reels() {
    let yaml = r#"
grid: { reels: 2, rows: 1 }
symbols:
  - { name: A }
  - { name: B }
  - { name: C }
paytable:
  A: [0, 6]
  B: [0, 3]
paylines:
  - rows: [0, 0]
reels:
  base:
    - [A, B, C]
    - [A, B, C]
"#;
    let game = load(yaml);
    let result = run(&game, &RunOptions::default().brute_force()).unwrap();
    let stats = &result.statistics;

    assert_eq!(stats.base.games, 9);
    assert_eq!(stats.base.hits, 2);
    assert_eq!(stats.base.money, 9);
    assert_eq!(stats.free.games, 0);
}

#[test]
fn test_histogram_covers_every_hit() {
    let mut engine = SlotEngine::with_seed(load(FULL), 11).unwrap();
    engine.simulate(5000);

    let stats = engine.stats();
    for spec in [
        HistogramSpec::default(),
        HistogramSpec {
            initial_bin: 5,
            increment: 3,
        },
    ] {
        let report = stats.report(&engine.config().symbols, &spec);
        let base: u64 = report.base_histogram.iter().map(|b| b.count).sum();
        let free: u64 = report.free_histogram.iter().map(|b| b.count).sum();
        assert_eq!(base, stats.base.hits);
        assert_eq!(free, stats.free.hits);
    }
}

#[test]
fn test_all_zero_outcomes() {
    let yaml = FRUIT.replace("CHERRY: [0, 0, 10]", "LEMON: [0, 0, 0]");
    let mut engine = SlotEngine::with_seed(load(&yaml), 3).unwrap();
    engine.simulate(500);

    let report = report(&engine);
    assert_eq!(report.base_mean, 0.0);
    assert_eq!(report.base_std_dev, 0.0);
    assert_eq!(report.total_rtp, 0.0);
    assert!(report.free_mean.is_nan());
    assert!(report.free_to_free_frequency.is_nan());
}

#[test]
fn test_parallel_brute_force_matches_sequential() {
    let game = load(FULL);
    let options = RunOptions::default().brute_force();
    let single = run(&game, &options).unwrap();
    let split = run(&game, &options.clone().with_workers(4)).unwrap();

    assert_eq!(single.statistics.base.games, game.base_combinations() as u64);
    assert_eq!(single.statistics.base.games, split.statistics.base.games);
    assert_eq!(single.statistics.base.money, split.statistics.base.money);
    assert_eq!(single.statistics.base.outcomes, split.statistics.base.outcomes);
    assert_eq!(split.statistics.free.games, 0);
}
