//! Engine Benchmarks
//!
//! Hot path of a simulation: spin, evaluate, and whole rounds per rule preset.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rf_slot_math::{
    Evaluator, GameConfig, GridSpec, PayTable, ReelStrip, RulePreset, SlotEngine, Symbol,
    SymbolKind, SymbolSet, View, WinPass, spin_random, standard_5x3_paylines,
};

const ROUNDS: u64 = 1000;

fn bench_game(preset: RulePreset) -> GameConfig {
    let symbols = SymbolSet::new(vec![
        Symbol::regular(0, "TEN"),
        Symbol::regular(1, "JACK"),
        Symbol::regular(2, "QUEEN"),
        Symbol::regular(3, "SEVEN"),
        Symbol::new(4, "WILD", &[SymbolKind::ExtendingWild]),
        Symbol::new(5, "STAR", &[SymbolKind::Scatter]),
    ]);
    let paytable = PayTable::new(5, 6)
        .with_row(0, &[0, 0, 2, 5, 10])
        .with_row(1, &[0, 0, 3, 8, 15])
        .with_row(2, &[0, 0, 4, 10, 20])
        .with_row(3, &[0, 2, 10, 40, 100])
        .with_row(4, &[0, 0, 20, 80, 200])
        .with_row(5, &[0, 0, 2, 10, 50]);
    let strip = ReelStrip::new(vec![0, 1, 2, 3, 0, 4, 1, 5, 2, 0, 1, 3, 2, 0]);

    GameConfig::new(
        "bench",
        GridSpec::standard_5x3(),
        symbols,
        paytable,
        standard_5x3_paylines(),
        vec![strip; 5],
    )
    .with_rules(preset.rules())
}

fn bench_spin_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("spin_evaluate");
    group.throughput(Throughput::Elements(ROUNDS));

    let game = bench_game(RulePreset::Classic);
    let evaluator = Evaluator::new(&game, true);
    let mut view = View::new(game.grid);
    let mut pass = WinPass::new(&game);
    let mut stops = vec![0; game.grid.reels];
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    group.bench_function("classic_5x3", |b| {
        b.iter(|| {
            let mut total = 0;
            for _ in 0..ROUNDS {
                spin_random(&mut view, &game.base_reels, &mut stops, &mut rng);
                total += evaluator.evaluate(black_box(&view), &mut pass);
            }
            black_box(total)
        })
    });

    group.finish();
}

fn bench_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounds");
    group.throughput(Throughput::Elements(ROUNDS));

    for preset in [
        RulePreset::Classic,
        RulePreset::SpreadingWilds,
        RulePreset::ScatterFreeSpins,
        RulePreset::BlastCollapse,
        RulePreset::StarReveal,
    ] {
        let mut engine = SlotEngine::with_seed(bench_game(preset), 42).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", preset)),
            &preset,
            |b, _| {
                b.iter(|| {
                    let mut won = 0;
                    for _ in 0..ROUNDS {
                        won += engine.play_one_round().total_win();
                    }
                    black_box(won)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_spin_evaluate, bench_rounds);
criterion_main!(benches);
