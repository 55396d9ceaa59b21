//! Marga replay tool.
//!
//! Runs a navigation session over a recorded (or simulated) ride and prints
//! the announcements a rider would have heard.
//!
//! # Usage
//!
//! ```bash
//! marga ride.json
//! marga demos/sognefjellet.json --config demos/sognefjellet.toml
//! marga ride.json --config marga.toml --phrases nb.toml
//! marga ride.json --simulate --interval 2.0
//! RUST_LOG=debug marga ride.json --quiet
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use marga::announce::{Announcement, PhraseTable, Phrasebook};
use marga::{
    MargaConfig, NavState, NavigationSession, PositionFix, ReplayLog, Result, RideSimulator,
};

/// Replay a ride through the navigation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Replay file (JSON route plus recorded fixes)
    replay: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Phrase table (TOML) for announcement text
    #[arg(long)]
    phrases: Option<PathBuf>,

    /// Ride the route at the configured average speed instead of the recording
    #[arg(long)]
    simulate: bool,

    /// Seconds between simulated fixes
    #[arg(long, default_value = "1.0")]
    interval: f64,

    /// Only print the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Totals printed at the end of a replay.
#[derive(Debug, Default)]
struct ReplaySummary {
    fixes: usize,
    off_route_episodes: usize,
    final_state: NavState,
    progress_fraction: f64,
    distance_remaining_m: f64,
    announcements: usize,
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            MargaConfig::load(path)?
        }
        None => MargaConfig::default(),
    };

    let replay = ReplayLog::load(&args.replay)?;
    let polyline = replay.route.polyline()?;

    let fixes: Vec<PositionFix> = if args.simulate || replay.fixes.is_empty() {
        if !args.simulate {
            log::info!("No recorded fixes, simulating the ride");
        }
        RideSimulator::new(
            polyline.coordinates(),
            config.tracker.average_speed_mps,
            args.interval,
        )
        .collect()
    } else {
        replay.fixes()
    };

    log::info!(
        "Replaying '{}' ({} -> {}): {} points, {:.2}km, {} fixes",
        replay.route.name,
        replay.route.start.name,
        replay.route.end.name,
        polyline.len(),
        polyline.total_length() / 1000.0,
        fixes.len()
    );

    let mut session = match &args.phrases {
        Some(path) => {
            let table = PhraseTable::load(path)?;
            let phrasebook: Box<dyn Phrasebook> = Box::new(table);
            NavigationSession::with_phrasebook(&config, phrasebook, Vec::<Announcement>::new())
        }
        None => NavigationSession::new(&config, Vec::<Announcement>::new()),
    };

    session.start_route(&replay.route)?;

    if !args.quiet {
        println!("Instructions:");
        for (i, instruction) in session.tracker().instructions().iter().enumerate() {
            println!(
                "  {:>3}  {:<13} {:>8.2}km  {}",
                i,
                instruction.turn_kind.as_str(),
                instruction.cumulative_distance_m / 1000.0,
                instruction.street_name.as_deref().unwrap_or("")
            );
        }
        println!();
    }

    let summary = replay_fixes(&mut session, &fixes, args.quiet);
    print_summary(&replay, &summary);
    Ok(())
}

fn replay_fixes(
    session: &mut NavigationSession<Vec<Announcement>>,
    fixes: &[PositionFix],
    quiet: bool,
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    let first_us = fixes.first().map(|f| f.timestamp_us).unwrap_or(0);

    for fix in fixes {
        let spoken_before = session.sink().len();
        let update = session.update(fix);
        summary.fixes += 1;

        let elapsed = fix.timestamp_us.saturating_sub(first_us) as f64 / 1e6;

        if update.state_changed() {
            log::info!(
                "{:.1}s: {} -> {}",
                elapsed,
                update.previous_state,
                update.snapshot.state
            );
        }
        if update.entered(NavState::OffRoute) {
            summary.off_route_episodes += 1;
        }

        if !quiet {
            for announcement in &session.sink()[spoken_before..] {
                println!(
                    "{:>8.1}s  {:<9} {}",
                    elapsed,
                    announcement.kind.to_string(),
                    announcement.text
                );
            }
        }

        if update.snapshot.state == NavState::Arrived {
            break;
        }
    }

    let snapshot = session.snapshot();
    summary.final_state = snapshot.state;
    summary.progress_fraction = snapshot.progress_fraction;
    summary.distance_remaining_m = snapshot.distance_remaining_m;
    summary.announcements = session.announcement_count();
    summary
}

fn print_summary(replay: &ReplayLog, summary: &ReplaySummary) {
    println!();
    println!("=== Replay summary: {} ===", replay.route.name);
    println!("  Fixes processed:    {}", summary.fixes);
    println!("  Final state:        {}", summary.final_state);
    println!(
        "  Progress:           {:.1}%",
        summary.progress_fraction * 100.0
    );
    println!(
        "  Remaining:          {:.2}km",
        summary.distance_remaining_m / 1000.0
    );
    println!("  Off-route episodes: {}", summary.off_route_episodes);
    println!("  Announcements:      {}", summary.announcements);
}
