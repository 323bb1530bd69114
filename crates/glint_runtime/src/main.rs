//! Glint Runtime
//!
//! Headless driver: boots the core, plays one timed round with a scripted
//! player at a fixed tick rate and persists the high score.

use anyhow::{bail, Context, Result};
use clap::Parser;
use glint_core::time::{TICK_DURATION, TICK_RATE_HZ};
use glint_core::{BackAction, Game, GameConfig, GameEvent, LifecycleState};
use glint_metrics::FrameTimer;
use glint_services::Settings;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// How long the scripted player stays paused.
const PAUSE_LENGTH: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "glint", about = "Headless run of a timed pickup round")]
struct Args {
    /// Game config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings JSON holding audio preferences and the high score.
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Seed for spawn timing and placement; overrides the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Game-time seconds between scripted taps.
    #[arg(long, default_value_t = 0.75)]
    tap_every: f32,
}

#[derive(Debug, Default)]
struct Tally {
    spawned: u32,
    collected: u32,
    expired: u32,
}

impl Tally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Spawned { .. } => self.spawned += 1,
            GameEvent::Collected { .. } => self.collected += 1,
            GameEvent::Expired { .. } => self.expired += 1,
            GameEvent::StateChanged { from, to } => info!(%from, %to, "state changed"),
            GameEvent::Ended { final_score } => info!(final_score, "round over"),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Glint v{}", glint_core::VERSION);

    if !(args.tap_every.is_finite() && args.tap_every > 0.0) {
        bail!("--tap-every must be a positive number of seconds");
    }
    let tap_every = Duration::from_secs_f32(args.tap_every);

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            info!("no config given, using defaults");
            GameConfig::default()
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut settings = Settings::load(&args.settings)
        .with_context(|| format!("loading settings {}", args.settings.display()))?;

    let mut game = Game::with_pickups(config).context("building game")?;
    game.request_transition(LifecycleState::Active);

    let round = game.time_remaining();
    let pause_at = round / 3;
    // Generous cap so a broken config cannot spin forever.
    let max_ticks = round
        .saturating_add(PAUSE_LENGTH)
        .as_secs()
        .saturating_mul(u64::from(TICK_RATE_HZ) * 2)
        .saturating_add(1_000);

    let mut tally = Tally::default();
    let mut frame_timer = FrameTimer::new(TICK_RATE_HZ as usize);
    let mut since_tap = Duration::ZERO;
    let mut paused_at: Option<Duration> = None;
    let mut paused_once = false;

    while game.current_state() != LifecycleState::Terminal {
        if game.time().tick_count() >= max_ticks {
            bail!("round did not finish after {max_ticks} ticks");
        }

        frame_timer.begin();
        game.tick(TICK_DURATION);
        let now = game.time().total_time();

        match paused_at {
            None if !paused_once && round.saturating_sub(game.time_remaining()) >= pause_at => {
                if game.handle_back() == BackAction::Paused {
                    info!(remaining = ?game.time_remaining(), "paused");
                    paused_at = Some(now);
                    paused_once = true;
                }
            }
            Some(at) if now - at >= PAUSE_LENGTH => {
                if game.handle_back() == BackAction::Resumed {
                    info!("resumed");
                    paused_at = None;
                }
            }
            _ => {}
        }

        if paused_at.is_none() {
            since_tap += TICK_DURATION;
            if since_tap >= tap_every {
                since_tap = Duration::ZERO;
                let target = game.live_entities().next().map(|(_, position)| position);
                if let Some(position) = target {
                    game.collect_at(position);
                }
            }
        }

        for event in game.drain_events() {
            tally.record(&event);
        }
        frame_timer.end();
    }

    settings.record_score(game.score());
    settings
        .save(&args.settings)
        .with_context(|| format!("saving settings {}", args.settings.display()))?;

    let pool = game.pool_stats();
    info!(
        score = game.score(),
        high_score = settings.high_score,
        spawned = tally.spawned,
        collected = tally.collected,
        expired = tally.expired,
        ticks = game.time().tick_count(),
        "summary"
    );
    info!(
        created = pool.created,
        free = pool.free,
        active = pool.active,
        max = pool.max_size,
        "pool"
    );
    for (outcome, count) in game.spawn_outcomes().iter() {
        info!(outcome, count, "spawn outcome");
    }
    let (min_ms, max_ms) = frame_timer.frame_time_range_ms();
    info!(
        avg_ms = frame_timer.frame_time_ms(),
        min_ms,
        max_ms,
        "tick cost"
    );

    Ok(())
}
