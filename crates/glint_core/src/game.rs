//! The game facade
//!
//! Wires the lifecycle machine to the spawner, session counters and event
//! queue. Collaborators are passed in at construction; nothing here is
//! global. Presentation code drives it with `tick`, sends commands and
//! transition requests, and drains events.

use crate::config::GameConfig;
use crate::entity::{Lifetime, Pickup, Spawnable};
use crate::error::ConfigError;
use crate::events::{EventQueue, GameEvent};
use crate::lifecycle::{LifecycleHooks, LifecycleMachine, LifecycleState, Transition};
use crate::math::{seeded_rng, GameRng, Vec2};
use crate::pool::{Handle, PoolStats};
use crate::scheduler::{SpawnOutcome, SpawnScheduler};
use crate::session::Session;
use crate::time::SimulationTime;
use glint_metrics::Counter;
use std::time::Duration;

/// What the back/escape input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    Paused,
    Resumed,
    /// The round is over; the presentation layer should leave to its menu.
    ExitToMenu,
    Ignored,
}

/// Everything the lifecycle hooks operate on.
struct GameContext<T> {
    spawner: SpawnScheduler<T>,
    session: Session,
    events: EventQueue,
    rng: GameRng,
}

impl<T: Spawnable> LifecycleHooks for GameContext<T> {
    fn exit(&mut self, state: LifecycleState) {
        if state == LifecycleState::Active {
            self.spawner.stop();
        }
    }

    fn enter(&mut self, state: LifecycleState, previous: LifecycleState) {
        match state {
            LifecycleState::Active => {
                if previous == LifecycleState::Suspended {
                    self.session.resume();
                    self.events.push(GameEvent::Resumed);
                } else {
                    self.session.start(&mut self.events);
                    tracing::info!(duration = ?self.session.duration(), "session started");
                }
                self.spawner.start(&mut self.rng);
            }
            LifecycleState::Suspended => {
                self.events.push(GameEvent::Paused);
            }
            LifecycleState::Terminal => {
                self.spawner.stop();
                self.session.end();
                let final_score = self.session.score();
                tracing::info!(final_score, "session ended");
                self.events.push(GameEvent::Ended { final_score });
            }
            LifecycleState::Loading => {}
        }
    }
}

pub struct Game<T> {
    lifecycle: LifecycleMachine,
    ctx: GameContext<T>,
    time: SimulationTime,
    pick_radius: f32,
}

impl Game<Pickup> {
    /// A game of stock pickups built entirely from `config`.
    pub fn with_pickups(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let factory = Pickup::factory(&config.pickup, config.session.base_point_value);
        Game::new(config, factory)
    }
}

impl<T: Spawnable> Game<T> {
    /// Validate `config` and build a game in the `Loading` state.
    pub fn new(
        config: GameConfig,
        factory: impl FnMut() -> T + 'static,
    ) -> Result<Self, ConfigError> {
        let spawner = SpawnScheduler::new(&config, factory)?;
        tracing::debug!(
            mode = ?spawner.placement().mode(),
            max_on_screen = config.spawn.max_on_screen,
            pool_max = config.pool.max_size,
            "game created"
        );

        Ok(Self {
            lifecycle: LifecycleMachine::new(),
            ctx: GameContext {
                spawner,
                session: Session::new(&config.session),
                events: EventQueue::new(),
                rng: seeded_rng(config.seed),
            },
            time: SimulationTime::new(),
            pick_radius: config.pickup.pick_radius,
        })
    }

    /// Advance the game by one externally timed step.
    pub fn tick(&mut self, delta: Duration) {
        self.time.advance(delta);

        if self.lifecycle.current() == LifecycleState::Active
            && self.ctx.session.countdown(delta, &mut self.ctx.events)
        {
            self.request_transition(LifecycleState::Terminal);
        }

        self.expire_entities(delta);

        let state = self.lifecycle.current();
        if let SpawnOutcome::Spawned { handle, slot } =
            self.ctx.spawner.tick(delta, state, &mut self.ctx.rng)
        {
            self.ctx.events.push(GameEvent::Spawned {
                handle,
                position: slot.position,
            });
        }
    }

    fn expire_entities(&mut self, delta: Duration) {
        let spawner = &mut self.ctx.spawner;
        let expired: Vec<Handle> = spawner
            .active()
            .handles()
            .into_iter()
            .filter(|&handle| {
                spawner
                    .entity_mut(handle)
                    .is_some_and(|entity| entity.advance(delta) == Lifetime::Expired)
            })
            .collect();

        for handle in expired {
            if let Some(slot) = spawner.consume(handle) {
                self.ctx.events.push(GameEvent::Expired {
                    handle,
                    position: slot.position,
                });
            }
        }
    }

    /// Request a lifecycle transition. Disallowed and duplicate requests are
    /// ignored.
    pub fn request_transition(&mut self, target: LifecycleState) -> Transition {
        let transition = self.lifecycle.request(target, &mut self.ctx);
        if let Transition::Changed { from, to } = transition {
            self.ctx.events.push(GameEvent::StateChanged { from, to });
        }
        transition
    }

    /// Back/escape input: toggles pause, or asks to leave once the round is
    /// over.
    pub fn handle_back(&mut self) -> BackAction {
        match self.lifecycle.current() {
            LifecycleState::Active => {
                self.request_transition(LifecycleState::Suspended);
                BackAction::Paused
            }
            LifecycleState::Suspended => {
                self.request_transition(LifecycleState::Active);
                BackAction::Resumed
            }
            LifecycleState::Terminal => BackAction::ExitToMenu,
            LifecycleState::Loading => BackAction::Ignored,
        }
    }

    /// Start a new round from scratch. The finished machine is replaced
    /// rather than transitioned, so `Terminal` stays absorbing.
    pub fn restart(&mut self) -> Transition {
        self.ctx.spawner.stop();
        self.ctx.spawner.clear_all();
        self.lifecycle = LifecycleMachine::new();
        self.request_transition(LifecycleState::Active)
    }

    /// Collect a live entity. Only allowed while `Active`.
    pub fn collect(&mut self, handle: Handle) -> Option<u32> {
        if self.lifecycle.current() != LifecycleState::Active {
            return None;
        }
        let points = self.ctx.spawner.entity_mut(handle)?.collect()?;
        let slot = self.ctx.spawner.consume(handle)?;

        self.ctx.session.add_score(points, &mut self.ctx.events);
        self.ctx.events.push(GameEvent::Collected {
            handle,
            position: slot.position,
            points,
        });
        Some(points)
    }

    /// Collect whatever live entity lies under `point`, if any.
    pub fn collect_at(&mut self, point: Vec2) -> Option<u32> {
        if self.lifecycle.current() != LifecycleState::Active {
            return None;
        }
        let handle = self.ctx.spawner.find_at(point, self.pick_radius)?;
        self.collect(handle)
    }

    pub fn start_spawning(&mut self) {
        self.ctx.spawner.start(&mut self.ctx.rng);
    }

    pub fn stop_spawning(&mut self) {
        self.ctx.spawner.stop();
    }

    /// Release every live entity and empty placement tracking. Pool
    /// instances are kept.
    pub fn clear_all(&mut self) {
        self.ctx.spawner.clear_all();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.ctx.events.drain()
    }

    pub fn current_state(&self) -> LifecycleState {
        self.lifecycle.current()
    }

    pub fn active_count(&self) -> usize {
        self.ctx.spawner.active_count()
    }

    pub fn is_spawning(&self) -> bool {
        self.ctx.spawner.is_spawning()
    }

    pub fn score(&self) -> u32 {
        self.ctx.session.score()
    }

    pub fn time_remaining(&self) -> Duration {
        self.ctx.session.time_remaining()
    }

    pub fn entity(&self, handle: Handle) -> Option<&T> {
        self.ctx.spawner.entity(handle)
    }

    /// Live entities in spawn order with their positions.
    pub fn live_entities(&self) -> impl Iterator<Item = (Handle, Vec2)> + '_ {
        self.ctx
            .spawner
            .active()
            .iter()
            .map(|(handle, slot)| (handle, slot.position))
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.ctx.spawner.pool_stats()
    }

    pub fn spawn_outcomes(&self) -> &Counter {
        self.ctx.spawner.outcomes()
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    const SECOND: Duration = Duration::from_secs(1);

    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.seed = Some(42);
        config.spawn.min_interval = 1.0;
        config.spawn.max_interval = 1.0;
        config.session.duration = 10.0;
        config.pickup.lifetime = 3.0;
        config
    }

    fn game() -> Game<Pickup> {
        Game::with_pickups(config()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = config();
        config.spawn.min_interval = 5.0;
        assert!(Game::with_pickups(config).is_err());
    }

    #[test]
    fn unrepresentable_settings_are_config_errors() {
        let mut config = config();
        config.spawn.max_interval = 1e20;
        assert!(matches!(
            Game::with_pickups(config),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = self::config();
        config.placement.grid_width = 65536;
        config.placement.grid_height = 65536;
        assert!(matches!(
            Game::with_pickups(config),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn zero_length_round_ends_on_first_tick() {
        let mut config = config();
        config.session.duration = 0.0;
        let mut game = Game::with_pickups(config).unwrap();
        game.request_transition(Active);

        game.tick(Duration::from_millis(100));
        assert_eq!(game.current_state(), Terminal);
        let ended = game
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::Ended { final_score: 0 }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn loading_to_active_starts_spawning_and_resets_counters() {
        let mut game = game();
        assert_eq!(game.current_state(), Loading);
        assert!(!game.is_spawning());

        game.tick(SECOND);
        assert_eq!(game.active_count(), 0);

        assert!(game.request_transition(Active).is_changed());
        assert!(game.is_spawning());
        assert_eq!(game.score(), 0);
        assert_eq!(game.time_remaining(), Duration::from_secs(10));

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
        assert!(events.contains(&GameEvent::StateChanged { from: Loading, to: Active }));
    }

    #[test]
    fn suspend_and_resume_keep_counters() {
        let mut game = game();
        game.request_transition(Active);
        game.tick(SECOND);
        let (handle, _) = game.live_entities().next().unwrap();
        assert_eq!(game.collect(handle), Some(1));
        game.tick(SECOND);

        assert!(game.request_transition(Suspended).is_changed());
        assert!(!game.is_spawning());
        let remaining = game.time_remaining();

        game.tick(SECOND);
        assert_eq!(game.time_remaining(), remaining);

        assert!(game.request_transition(Active).is_changed());
        assert!(game.is_spawning());
        assert_eq!(game.score(), 1);
        assert_eq!(game.time_remaining(), remaining);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn entities_keep_expiring_while_suspended() {
        let mut game = game();
        game.request_transition(Active);
        game.tick(SECOND);
        assert_eq!(game.active_count(), 1);

        game.request_transition(Suspended);
        for _ in 0..3 {
            game.tick(SECOND);
        }
        assert_eq!(game.active_count(), 0);
        assert!(game
            .drain_events()
            .iter()
            .any(|event| matches!(event, GameEvent::Expired { .. })));
        assert_eq!(game.pool_stats().active, 0);
    }

    #[test]
    fn no_spawns_while_suspended() {
        let mut game = game();
        game.request_transition(Active);
        game.request_transition(Suspended);
        for _ in 0..5 {
            game.tick(SECOND);
        }
        assert_eq!(game.active_count(), 0);

        game.request_transition(Active);
        game.tick(SECOND);
        assert_eq!(game.active_count(), 1);
    }

    #[test]
    fn timer_runs_out_into_terminal_once() {
        let mut game = game();
        game.request_transition(Active);
        for _ in 0..15 {
            game.tick(SECOND);
        }

        assert_eq!(game.current_state(), Terminal);
        assert!(!game.is_spawning());
        let ended = game
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::Ended { .. }))
            .count();
        assert_eq!(ended, 1);

        assert!(!game.request_transition(Active).is_changed());
        assert!(!game.request_transition(Terminal).is_changed());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn collect_requires_active_and_pays_once() {
        let mut game = game();
        game.request_transition(Active);
        game.tick(SECOND);
        let (handle, position) = game.live_entities().next().unwrap();

        game.request_transition(Suspended);
        assert_eq!(game.collect_at(position), None);

        game.request_transition(Active);
        assert_eq!(game.collect_at(position), Some(1));
        assert_eq!(game.collect(handle), None);
        assert_eq!(game.score(), 1);
        assert_eq!(game.active_count(), 0);
    }

    #[test]
    fn collect_at_misses_empty_space() {
        let mut game = game();
        game.request_transition(Active);
        game.tick(SECOND);
        assert_eq!(game.collect_at(Vec2::new(100.0, 100.0)), None);
        assert_eq!(game.active_count(), 1);
    }

    #[test]
    fn back_button_toggles_pause() {
        let mut game = game();
        assert_eq!(game.handle_back(), BackAction::Ignored);
        game.request_transition(Active);
        assert_eq!(game.handle_back(), BackAction::Paused);
        assert_eq!(game.current_state(), Suspended);
        assert_eq!(game.handle_back(), BackAction::Resumed);
        assert_eq!(game.current_state(), Active);
        game.request_transition(Terminal);
        assert_eq!(game.handle_back(), BackAction::ExitToMenu);
    }

    #[test]
    fn start_and_stop_spawning_commands() {
        let mut game = game();
        game.request_transition(Active);
        game.stop_spawning();
        game.stop_spawning();
        game.tick(SECOND * 3);
        assert_eq!(game.active_count(), 0);

        game.start_spawning();
        game.start_spawning();
        game.tick(SECOND);
        assert_eq!(game.active_count(), 1);
    }

    #[test]
    fn clear_all_releases_without_destroying_pool() {
        let mut game = game();
        game.request_transition(Active);
        game.tick(SECOND);
        game.tick(SECOND);
        assert_eq!(game.active_count(), 2);

        let created = game.pool_stats().created;
        game.clear_all();
        assert_eq!(game.active_count(), 0);
        assert_eq!(game.pool_stats().created, created);
        assert_eq!(game.pool_stats().active, 0);
    }

    #[test]
    fn restart_begins_a_fresh_round() {
        let mut game = game();
        game.request_transition(Active);
        game.tick(SECOND);
        let (handle, _) = game.live_entities().next().unwrap();
        game.collect(handle);
        game.request_transition(Terminal);

        assert!(game.restart().is_changed());
        assert_eq!(game.current_state(), Active);
        assert_eq!(game.score(), 0);
        assert_eq!(game.active_count(), 0);
        assert_eq!(game.time_remaining(), Duration::from_secs(10));
        assert!(game.is_spawning());
    }

    #[test]
    fn spawned_entities_keep_their_distance() {
        let mut config = config();
        config.session.duration = 120.0;
        config.pickup.lifetime = 30.0;
        config.spawn.max_on_screen = 8;
        let min_distance = config.placement.min_distance;
        let mut game = Game::with_pickups(config).unwrap();
        game.request_transition(Active);

        for _ in 0..60 {
            game.tick(SECOND);
            let live: Vec<Vec2> = game.live_entities().map(|(_, position)| position).collect();
            for (i, a) in live.iter().enumerate() {
                for b in &live[i + 1..] {
                    assert!(a.distance(*b) >= min_distance);
                }
            }
        }
    }
}
