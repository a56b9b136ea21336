//! Slot Math Simulator
//!
//! Usage:
//!   slot-sim run game.yaml -n 20m           - Monte Carlo RTP report
//!   slot-sim run game.yaml --brute-force    - Enumerate every base stop
//!   slot-sim play game.yaml -n 5            - Show rounds one by one
//!   slot-sim verify game.yaml               - List the loaded game
//!   slot-sim initial game.yaml -l 60        - Draft strips from the paytable
//!   slot-sim shuffle game.yaml -s 2 -r 1    - Reshuffle strips in stacks
//!
//! Logging goes to stderr through `env_logger` (`RUST_LOG` overrides
//! `--verbose`); reports go to stdout.

mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use rf_slot_math::{
    GameConfig, GameDocument, GameParser, HistogramSpec, RunOptions, SlotEngine, StatisticsReport,
    initial_strips, shuffle_strips, strip_census,
};

#[derive(Parser)]
#[command(name = "slot-sim", about = "Slot game math simulator", version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate rounds and print the statistics report
    Run(RunArgs),
    /// Play rounds and print each final window
    Play {
        /// Game document (YAML or JSON)
        game: PathBuf,
        /// Rounds to play
        #[arg(short = 'n', long, default_value = "1", value_parser = parse_count)]
        rounds: u64,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Treat wilds as plain symbols
        #[arg(long)]
        wilds_off: bool,
        /// Never award free spins
        #[arg(long)]
        free_spins_off: bool,
    },
    /// Print the loaded game: symbols, paytable, lines, strips, census
    Verify {
        /// Game document (YAML or JSON)
        game: PathBuf,
        /// Print the strip census as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draft strips from the paytable and print the rewritten document
    Initial {
        /// Game document (YAML or JSON)
        game: PathBuf,
        /// Target strip length
        #[arg(short, long)]
        length: usize,
    },
    /// Reshuffle the strips and print the rewritten document
    Shuffle {
        /// Game document (YAML or JSON)
        game: PathBuf,
        /// Stack size (0 keeps existing runs together)
        #[arg(short, long, default_value_t = 1)]
        stack: usize,
        /// Equal neighbouring stacks allowed per reel
        #[arg(short, long, default_value_t = 1)]
        repeats: usize,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Game document (YAML or JSON)
    game: PathBuf,
    /// Rounds to simulate (accepts k and m suffixes)
    #[arg(short = 'n', long, default_value = "1m", value_parser = parse_count)]
    rounds: u64,
    /// Rounds between progress lines, 0 for none (accepts k and m suffixes)
    #[arg(short, long, default_value = "0", value_parser = parse_count)]
    progress: u64,
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Parallel workers
    #[arg(short = 'j', long, default_value_t = 1)]
    workers: usize,
    /// Enumerate every base stop combination instead of sampling
    #[arg(long)]
    brute_force: bool,
    /// Treat wilds as plain symbols
    #[arg(long)]
    wilds_off: bool,
    /// Never award free spins
    #[arg(long)]
    free_spins_off: bool,
    /// Upper bound of the first histogram bucket
    #[arg(long, default_value_t = 1)]
    initial_bin: u64,
    /// Added to each doubled histogram bound
    #[arg(long, default_value_t = 0)]
    bin_increment: u64,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn options(&self) -> RunOptions {
        RunOptions {
            rounds: self.rounds,
            progress_interval: self.progress,
            seed: self.seed,
            workers: self.workers.max(1),
            brute_force: self.brute_force,
            wilds_off: self.wilds_off,
            free_spins_off: self.free_spins_off,
            histogram: HistogramSpec {
                initial_bin: self.initial_bin,
                increment: self.bin_increment,
            },
        }
    }
}

/// JSON form of a run
#[derive(Serialize)]
struct RunSummary<'a> {
    game: &'a str,
    seed: Option<u64>,
    workers: usize,
    elapsed_secs: f64,
    report: &'a StatisticsReport,
}

/// Parse a count with an optional `k` (thousand) or `m` (million) suffix
fn parse_count(text: &str) -> Result<u64> {
    let text = text.trim();
    let (digits, scale) = match text.chars().last() {
        Some('k' | 'K') => (&text[..text.len() - 1], 1_000),
        Some('m' | 'M') => (&text[..text.len() - 1], 1_000_000),
        _ => (text, 1),
    };
    let value: u64 = digits
        .parse()
        .with_context(|| format!("'{}' is not a count", text))?;
    value
        .checked_mul(scale)
        .with_context(|| format!("'{}' is too large", text))
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load(path: &Path) -> Result<GameConfig> {
    GameParser::new()
        .load(path)
        .with_context(|| format!("Failed to load game from {}", path.display()))
}

fn rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Play {
            game,
            rounds,
            seed,
            wilds_off,
            free_spins_off,
        } => {
            let options = RunOptions {
                seed,
                wilds_off,
                free_spins_off,
                ..Default::default()
            };
            play(&game, rounds, &options)
        }
        Commands::Verify { game, json } => verify(&game, json),
        Commands::Initial { game, length } => initial(&game, length),
        Commands::Shuffle {
            game,
            stack,
            repeats,
            seed,
        } => shuffle(&game, stack, repeats, seed),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let game = load(&args.game)?;
    let options = args.options();
    if options.brute_force {
        log::info!("Free spins are not played in brute force mode");
    }

    let result = rf_slot_math::run(&game, &options)?;
    let report = result.statistics.report(&game.symbols, &options.histogram);

    if args.json {
        let summary = RunSummary {
            game: &game.name,
            seed: result.seed,
            workers: result.workers,
            elapsed_secs: result.elapsed_secs,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let mut out = String::new();
        report::write_report(&mut out, &game, &result, &report)?;
        print!("{}", out);
    }
    Ok(())
}

fn play(path: &Path, rounds: u64, options: &RunOptions) -> Result<()> {
    let game = load(path)?;
    let mut engine = SlotEngine::from_options(game, options)?;

    let mut out = String::new();
    for round in 1..=rounds {
        let outcome = engine.play_one_round();
        report::write_round(&mut out, round, &engine, &outcome)?;
    }
    print!("{}", out);
    Ok(())
}

fn verify(path: &Path, json: bool) -> Result<()> {
    let game = load(path)?;

    if json {
        #[derive(Serialize)]
        struct Census<'a> {
            game: &'a str,
            base: rf_slot_math::StripCensus,
            free: rf_slot_math::StripCensus,
        }
        let census = Census {
            game: &game.name,
            base: strip_census(&game.base_reels, &game.symbols),
            free: strip_census(&game.free_reels, &game.symbols),
        };
        println!("{}", serde_json::to_string_pretty(&census)?);
    } else {
        let mut out = String::new();
        report::write_game(&mut out, &game)?;
        print!("{}", out);
    }
    Ok(())
}

fn initial(path: &Path, length: usize) -> Result<()> {
    let mut game = load(path)?;
    let strips = initial_strips(&game, length).context("Failed to build initial strips")?;
    game.free_reels = strips.clone();
    game.base_reels = strips;

    let census = strip_census(&game.base_reels, &game.symbols);
    log::info!(
        "Initial strips of {} cells, {} combinations",
        census.lengths.first().copied().unwrap_or(0),
        census.combinations
    );
    print!("{}", GameDocument::from_config(&game).to_yaml()?);
    Ok(())
}

fn shuffle(path: &Path, stack: usize, repeats: usize, seed: Option<u64>) -> Result<()> {
    let mut game = load(path)?;
    let mut rng = rng(seed);

    game.base_reels = shuffle_strips(&game.base_reels, stack, repeats, &mut rng)
        .context("Failed to shuffle base strips")?;
    game.free_reels = shuffle_strips(&game.free_reels, stack, repeats, &mut rng)
        .context("Failed to shuffle free strips")?;

    print!("{}", GameDocument::from_config(&game).to_yaml()?);
    Ok(())
}
