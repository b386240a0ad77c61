//! Scene driver
//!
//! Owns the running `GameState`, advances it on a fixed timestep and mirrors
//! every visible change into a `SceneSink`. Round outcomes are reported to a
//! `RoundObserver`.

use crate::config::{ConfigError, JumpConfig};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{Camera, GameEvent, GameState, Platform, Player, SimError, TickInput, tick};

/// Rendering backend receiving scene mutations
pub trait SceneSink {
    fn add_platform(&mut self, platform: &Platform);
    fn remove_oldest_platform(&mut self);
    /// Drop every platform (level restart)
    fn clear(&mut self);
    fn update_player(&mut self, player: &Player);
    fn update_camera(&mut self, camera: &Camera);
    /// Draw the current scene
    fn render(&mut self);
}

/// Success / failure notifications, one per round resolution
pub trait RoundObserver {
    fn on_player_success(&mut self);
    fn on_player_fail(&mut self);
}

/// Drives a round and keeps the sink in sync with it
pub struct SceneDriver<S: SceneSink, O: RoundObserver> {
    state: Option<GameState>,
    pub sink: S,
    pub observer: O,
    input: TickInput,
    accumulator: f32,
}

impl<S: SceneSink, O: RoundObserver> SceneDriver<S, O> {
    pub fn new(sink: S, observer: O) -> Self {
        Self {
            state: None,
            sink,
            observer,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Build platforms and player for a new round and draw them
    pub fn start_level(&mut self, config: JumpConfig, seed: u64) -> Result<(), ConfigError> {
        config.validate()?;
        log::info!(
            "Starting level ({}, seed {})",
            config.difficulty.as_str(),
            seed
        );
        if let Ok(json) = serde_json::to_string(&config) {
            log::debug!("Level config: {}", json);
        }

        let mut state = GameState::new(config, seed);
        self.input = TickInput::default();
        self.accumulator = 0.0;

        self.sink.clear();
        self.apply_events(&mut state);
        self.sync(&mut state);
        self.state = Some(state);
        Ok(())
    }

    /// Same as `start_level`; kept separate for log clarity
    pub fn restart(&mut self, config: JumpConfig, seed: u64) -> Result<(), ConfigError> {
        log::info!("Restarting level");
        self.start_level(config, seed)
    }

    /// Queue a press for the next tick
    pub fn press(&mut self) {
        self.input.press = true;
    }

    /// Queue a release for the next tick
    pub fn release(&mut self) {
        self.input.release = true;
    }

    /// Run as many fixed ticks as `dt` (seconds) covers
    pub fn update(&mut self, dt: f32) -> Result<(), SimError> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step()?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog a slow frame could not cover
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        Ok(())
    }

    /// Advance exactly one tick, then render if anything visible changed
    pub fn step(&mut self) -> Result<(), SimError> {
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };

        let input = std::mem::take(&mut self.input);
        let result = tick(&mut state, &input);
        if let Err(e) = &result {
            log::error!("Tick rejected: {}", e);
        }

        self.apply_events(&mut state);
        self.sync(&mut state);
        self.state = Some(state);
        result
    }

    fn apply_events(&mut self, state: &mut GameState) {
        for event in state.drain_events() {
            match event {
                GameEvent::PlatformAdded(platform) => self.sink.add_platform(&platform),
                GameEvent::PlatformEvicted => self.sink.remove_oldest_platform(),
                GameEvent::PlayerSuccess => self.observer.on_player_success(),
                GameEvent::PlayerFail => self.observer.on_player_fail(),
                other => log::trace!("Event: {:?}", other),
            }
        }
    }

    fn sync(&mut self, state: &mut GameState) {
        if state.dirty {
            self.sink.update_player(&state.player);
            self.sink.update_camera(&state.camera);
            self.sink.render();
            state.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::JumpStatus;
    use glam::Vec3;

    /// Sink that mirrors the platform list and counts calls
    #[derive(Default)]
    struct RecordingSink {
        platforms: Vec<Platform>,
        player: Option<Player>,
        camera: Option<Camera>,
        renders: usize,
        clears: usize,
    }

    impl SceneSink for RecordingSink {
        fn add_platform(&mut self, platform: &Platform) {
            self.platforms.push(platform.clone());
        }
        fn remove_oldest_platform(&mut self) {
            self.platforms.remove(0);
        }
        fn clear(&mut self) {
            self.platforms.clear();
            self.clears += 1;
        }
        fn update_player(&mut self, player: &Player) {
            self.player = Some(player.clone());
        }
        fn update_camera(&mut self, camera: &Camera) {
            self.camera = Some(*camera);
        }
        fn render(&mut self) {
            self.renders += 1;
        }
    }

    #[derive(Default)]
    struct Tally {
        successes: u32,
        failures: u32,
    }

    impl RoundObserver for Tally {
        fn on_player_success(&mut self) {
            self.successes += 1;
        }
        fn on_player_fail(&mut self) {
            self.failures += 1;
        }
    }

    fn driver() -> SceneDriver<RecordingSink, Tally> {
        let mut d = SceneDriver::new(RecordingSink::default(), Tally::default());
        d.start_level(JumpConfig::default(), 2024).unwrap();
        d
    }

    #[test]
    fn test_start_level_draws_initial_scene() {
        let d = driver();
        assert_eq!(d.sink.platforms.len(), 2);
        assert_eq!(d.sink.renders, 1);
        assert_eq!(d.sink.clears, 1);
        assert_eq!(d.sink.player.as_ref().unwrap().position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(d.state().unwrap().platforms, d.sink.platforms);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut d = SceneDriver::new(RecordingSink::default(), Tally::default());
        let mut config = JumpConfig::default();
        config.visible_platforms = 0;
        assert_eq!(
            d.start_level(config, 1),
            Err(ConfigError::WindowTooSmall(0))
        );
        assert!(d.state().is_none());
        // No state yet: stepping is a no-op
        assert_eq!(d.step(), Ok(()));
        assert_eq!(d.sink.renders, 0);
    }

    #[test]
    fn test_renders_after_every_visible_tick() {
        let mut d = driver();
        d.press();
        for _ in 0..5 {
            d.step().unwrap();
        }
        // One render for the level, one per charging tick
        assert_eq!(d.sink.renders, 6);
        assert!(d.sink.player.as_ref().unwrap().scale.y < 1.0);
    }

    #[test]
    fn test_idle_ticks_do_not_render() {
        let mut d = driver();
        for _ in 0..10 {
            d.step().unwrap();
        }
        assert_eq!(d.sink.renders, 1);
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut d = driver();
        d.update(SIM_DT * 3.5).unwrap();
        assert_eq!(d.state().unwrap().time_ticks, 3);
        // Clamped to MAX_SUBSTEPS per call
        d.update(1.0).unwrap();
        assert_eq!(d.state().unwrap().time_ticks, 3 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_slow_frames_do_not_build_backlog() {
        let mut d = driver();
        for _ in 0..300 {
            d.update(0.1).unwrap();
        }
        assert!(d.accumulator <= SIM_DT);

        // Back at 60 fps: one second of frames is about one second of ticks
        let before = d.state().unwrap().time_ticks;
        for _ in 0..60 {
            d.update(SIM_DT).unwrap();
        }
        let ticks = d.state().unwrap().time_ticks - before;
        assert!((59..=61).contains(&ticks), "ran {} ticks", ticks);
    }

    #[test]
    fn test_inputs_are_one_shot() {
        let mut d = driver();
        d.press();
        d.step().unwrap();
        d.release();
        d.step().unwrap();
        assert_eq!(d.state().unwrap().status, JumpStatus::Airborne);
        d.step().unwrap();
        assert_eq!(d.state().unwrap().status, JumpStatus::Airborne);
    }

    #[test]
    fn test_failure_notified_once_and_input_ignored() {
        let mut d = driver();
        // A zero-charge hop never reaches the next platform
        d.press();
        d.release();
        for _ in 0..50 {
            d.step().unwrap();
        }
        assert_eq!(d.state().unwrap().status, JumpStatus::GameOver);
        assert_eq!(d.observer.failures, 1);
        assert_eq!(d.observer.successes, 0);

        let renders = d.sink.renders;
        d.press();
        for _ in 0..20 {
            d.step().unwrap();
        }
        assert_eq!(d.observer.failures, 1);
        assert_eq!(d.sink.renders, renders);
    }

    #[test]
    fn test_restart_resets_scene() {
        let mut d = driver();
        d.press();
        d.release();
        for _ in 0..50 {
            d.step().unwrap();
        }
        assert_eq!(d.state().unwrap().status, JumpStatus::GameOver);

        d.restart(JumpConfig::default(), 7).unwrap();
        assert_eq!(d.state().unwrap().status, JumpStatus::Idle);
        assert_eq!(d.sink.platforms.len(), 2);
        assert_eq!(d.sink.clears, 2);
    }

    #[test]
    fn test_sink_mirrors_window_eviction() {
        let mut d = driver();
        {
            let state = d.state_mut().unwrap();
            for _ in 0..8 {
                state.add_platform();
            }
        }
        d.step().unwrap();
        assert_eq!(d.sink.platforms.len(), 6);
        assert_eq!(d.state().unwrap().platforms, d.sink.platforms);
    }
}
