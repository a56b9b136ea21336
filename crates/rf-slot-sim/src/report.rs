//! Text formatting for reports, game listings and played rounds

use std::fmt::{self, Write};

use rf_slot_math::{
    GameConfig, HistogramBucket, ReelStrip, RoundOutcome, SimulationRun, SlotEngine,
    StatisticsReport, StripCensus, SymbolSet, SymbolStats,
};

const RULE: &str = "---------------------------------------------";

fn percent(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.4}%", value * 100.0)
    }
}

fn decimal(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.4}", value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUN REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Full statistics report of a run
pub fn write_report(
    out: &mut impl Write,
    game: &GameConfig,
    run: &SimulationRun,
    report: &StatisticsReport,
) -> fmt::Result {
    writeln!(out, "Game:\t{}", game.name)?;
    match run.seed {
        Some(seed) => writeln!(out, "Mode:\tMonte Carlo (seed {})", seed)?,
        None => writeln!(out, "Mode:\tBrute force")?,
    }
    writeln!(out, "Workers:\t{}", run.workers)?;
    writeln!(out, "Elapsed:\t{:.3}s", run.elapsed_secs)?;
    writeln!(out)?;

    writeln!(out, "Games:\t{}", report.games)?;
    writeln!(out, "Free spins:\t{}", report.free_spins)?;
    writeln!(out, "Wagered:\t{}", report.wagered)?;
    writeln!(out, "Won:\t{}", report.won)?;
    writeln!(out, "Base money:\t{}", report.base_money)?;
    writeln!(out, "Free money:\t{}", report.free_money)?;
    writeln!(out)?;

    writeln!(out, "Total RTP:\t{}", percent(report.total_rtp))?;
    writeln!(out, "Base RTP:\t{}", percent(report.base_rtp))?;
    writeln!(out, "Free RTP:\t{}", percent(report.free_rtp))?;
    writeln!(out)?;

    writeln!(out, "Base hit frequency:\t{}", percent(report.base_hit_frequency))?;
    writeln!(out, "Free hit frequency:\t{}", percent(report.free_hit_frequency))?;
    writeln!(
        out,
        "Base to free frequency:\t{}\t({} starts)",
        percent(report.base_to_free_frequency),
        report.free_starts
    )?;
    writeln!(
        out,
        "Free to free frequency:\t{}\t({} restarts)",
        percent(report.free_to_free_frequency),
        report.free_restarts
    )?;
    writeln!(out)?;

    writeln!(out, "Max base win:\t{}", report.max_base_win)?;
    writeln!(out, "Max free win:\t{}", report.max_free_win)?;
    writeln!(out, "Max free spins in a run:\t{}", report.max_free_spins_run)?;
    writeln!(out, "Max collapse chain:\t{}", report.max_collapses)?;
    writeln!(out)?;

    writeln!(
        out,
        "Base mean / std dev:\t{}\t{}",
        decimal(report.base_mean),
        decimal(report.base_std_dev)
    )?;
    writeln!(
        out,
        "Free mean / std dev:\t{}\t{}",
        decimal(report.free_mean),
        decimal(report.free_std_dev)
    )?;
    writeln!(out)?;

    write_symbols(out, "Base Game Symbols RTP:", &report.base_symbols)?;
    write_symbols(out, "Free Games Symbols RTP:", &report.free_symbols)?;
    write_histogram(out, "Base Game Histogram:", &report.base_histogram)?;
    write_histogram(out, "Free Games Histogram:", &report.free_histogram)
}

fn write_symbols(out: &mut impl Write, title: &str, rows: &[SymbolStats]) -> fmt::Result {
    writeln!(out, "{}", title)?;
    let Some(first) = rows.first() else {
        return writeln!(out);
    };

    // Count 0 never pays, so columns start at 1
    for count in 1..first.rtp.len() {
        write!(out, "\t{} of", count)?;
    }
    writeln!(out)?;
    for row in rows {
        if row.hits.iter().all(|&h| h == 0) {
            continue;
        }
        write!(out, "{}", row.name)?;
        for count in 1..row.rtp.len() {
            write!(out, "\t{}", percent(row.rtp[count]))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Hit frequency:")?;
    for row in rows {
        if row.hits.iter().all(|&h| h == 0) {
            continue;
        }
        write!(out, "{}", row.name)?;
        for count in 1..row.hit_frequency.len() {
            write!(out, "\t{}", percent(row.hit_frequency[count]))?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn write_histogram(out: &mut impl Write, title: &str, buckets: &[HistogramBucket]) -> fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "From\tTo\tCount")?;
    for bucket in buckets {
        writeln!(out, "{}\t{}\t{}", bucket.lower, bucket.upper, bucket.count)?;
    }
    writeln!(out)
}

// ═══════════════════════════════════════════════════════════════════════════════
// GAME LISTING
// ═══════════════════════════════════════════════════════════════════════════════

/// Symbols, paytable, lines, strips and census of a loaded game
pub fn write_game(out: &mut impl Write, game: &GameConfig) -> fmt::Result {
    let symbols = &game.symbols;

    writeln!(out, "Game:\t{}", game.name)?;
    writeln!(
        out,
        "Window:\t{} x {}\tLine bet:\t{}\tTotal bet:\t{}",
        game.grid.reels,
        game.grid.rows,
        game.line_bet,
        game.total_bet()
    )?;
    writeln!(out, "Expansion:\t{}", game.rules.expansion.name())?;
    writeln!(out)?;

    writeln!(out, "Symbols:")?;
    writeln!(out, "Name\tIndex\tType")?;
    for symbol in symbols.symbols() {
        let kinds: Vec<&str> = symbol.kinds.iter().map(|k| k.display_name()).collect();
        let kinds = if kinds.is_empty() {
            "Regular".to_string()
        } else {
            kinds.join(", ")
        };
        writeln!(out, "{}\t{}\t{}", symbol.name, symbol.id, kinds)?;
    }
    writeln!(out)?;

    writeln!(out, "Paytable:")?;
    for count in 1..=game.paytable.reels() {
        write!(out, "\t{} of", count)?;
    }
    writeln!(out)?;
    for symbol in symbols.symbols() {
        write!(out, "{}", symbol.name)?;
        for count in 1..=game.paytable.reels() {
            write!(out, "\t{}", game.paytable.pay(symbol.id, count))?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    // One column per line, '*' where the line passes
    writeln!(out, "Lines:")?;
    for row in 0..game.grid.rows {
        for line in &game.paylines {
            for &line_row in &line.rows {
                out.write_char(if line_row == row { '*' } else { 'O' })?;
            }
            out.write_char('\t')?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    write_strips(out, "Base Game Reels:", &game.base_reels, symbols)?;
    write_strips(out, "Free Games Reels:", &game.free_reels, symbols)?;
    write_census(
        out,
        "Base Game Reels:",
        &rf_slot_math::strip_census(&game.base_reels, symbols),
        symbols,
    )?;
    write_census(
        out,
        "Free Games Reels:",
        &rf_slot_math::strip_census(&game.free_reels, symbols),
        symbols,
    )
}

/// Strips printed vertically, one column per reel
pub fn write_strips(
    out: &mut impl Write,
    title: &str,
    strips: &[ReelStrip],
    symbols: &SymbolSet,
) -> fmt::Result {
    writeln!(out, "{}", title)?;
    let longest = strips.iter().map(ReelStrip::len).max().unwrap_or(0);
    for position in 0..longest {
        for strip in strips {
            if let Some(&symbol) = strip.symbols.get(position) {
                write!(out, "{}", symbols.name(symbol))?;
            }
            out.write_char('\t')?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Per-reel symbol counts and the combination total
pub fn write_census(
    out: &mut impl Write,
    title: &str,
    census: &StripCensus,
    symbols: &SymbolSet,
) -> fmt::Result {
    writeln!(out, "{}", title)?;
    for reel in 0..census.counts.len() {
        write!(out, "\tReel {}", reel + 1)?;
    }
    writeln!(out)?;
    for symbol in symbols.symbols() {
        write!(out, "{}", symbol.name)?;
        for reel in 0..census.counts.len() {
            write!(out, "\t{}", census.count(reel, symbol.id))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{}", RULE)?;
    write!(out, "Total:")?;
    for length in &census.lengths {
        write!(out, "\t{}", length)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Combinations:\t{}", census.combinations)?;
    writeln!(out)
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLAYED ROUND
// ═══════════════════════════════════════════════════════════════════════════════

/// Final window of a round with winning cells in brackets, then its line wins
pub fn write_round(
    out: &mut impl Write,
    round: u64,
    engine: &SlotEngine,
    outcome: &RoundOutcome,
) -> fmt::Result {
    let symbols = &engine.config().symbols;
    let view = engine.view();
    let winners = engine.winners();

    writeln!(out, "Round {}\tstops {:?}", round, engine.stops())?;
    for row in 0..view.rows() {
        for reel in 0..view.reels() {
            let name = symbols.name(view.get(reel, row));
            if winners.get(reel, row) {
                write!(out, "[{}]\t", name)?;
            } else {
                write!(out, " {} \t", name)?;
            }
        }
        writeln!(out)?;
    }

    for (line, &amount) in engine.line_wins().iter().enumerate() {
        if amount > 0 {
            writeln!(out, "Line {}:\t{}", line + 1, amount)?;
        }
    }
    for hit in engine.attributions() {
        writeln!(
            out,
            "{} x {}:\t{}",
            hit.count,
            symbols.name(hit.symbol),
            hit.amount
        )?;
    }

    writeln!(
        out,
        "Bet {}\tbase win {}\tfree win {}\tcollapses {}\tfree spins {}",
        outcome.bet, outcome.base_win, outcome.free_win, outcome.collapses, outcome.free_spins
    )?;
    writeln!(out, "{}", RULE)
}
