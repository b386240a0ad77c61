//! Game state and core simulation types
//!
//! Everything the jump state machine reads or mutates lives here.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::{Camera, CameraFollow};
use super::placement::place_next_platform;
use crate::Axis;
use crate::config::JumpConfig;

/// Lifecycle of a single jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpStatus {
    /// Standing on a platform, waiting for a press
    Idle,
    /// Input held down, player squashing and gaining speed
    Charging,
    /// In flight between platforms
    Airborne,
    /// Touched down, outcome being played out (edge topple)
    Resolving,
    /// Round ended; only a restart leaves this state
    GameOver,
}

/// Axis along which the next platform is offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Offset along the depth (z) axis
    Extend,
    /// Offset along the width (x) axis
    Turn,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Extend => Axis::Z,
            Direction::Turn => Axis::X,
        }
    }
}

/// Where the player came down relative to the target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingRelation {
    Center,
    Edge,
    Outside,
}

/// A platform box
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Center of the box
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub color: [f32; 4],
}

impl Platform {
    pub fn new(position: Vec3, config: &JumpConfig) -> Self {
        Self {
            position,
            width: config.cube_width,
            depth: config.cube_depth,
            height: config.cube_height,
            color: config.cube_rgba(),
        }
    }

    /// Extent of the platform along a horizontal axis
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }
}

/// The jumping character
///
/// The pivot is the base of the box, so `position.y` is where the feet are.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    /// `scale.y` doubles as the charge gauge
    pub scale: Vec3,
    /// Euler angles (radians), used by the topple animation
    pub rotation: Vec3,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub color: [f32; 4],
}

impl Player {
    pub fn new(config: &JumpConfig) -> Self {
        Self {
            position: Vec3::new(0.0, config.ground_level(), 0.0),
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            width: config.player_width,
            height: config.player_height,
            depth: config.player_depth,
            color: config.player_rgba(),
        }
    }

    /// Extent of the player along a horizontal axis
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Z => self.depth,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.scale.is_finite() && self.rotation.is_finite()
    }
}

/// Speed accumulated while charging, spent while airborne
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerSpeed {
    /// Horizontal travel per tick (constant during flight)
    pub lateral: f32,
    /// Vertical travel per tick (decays with gravity)
    pub vertical: f32,
}

/// In-progress topple off a platform edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topple {
    /// Movement axis of the jump; the player rotates about the other one
    pub axis: Axis,
    /// +1 or -1
    pub direction: f32,
    /// Current rotation magnitude (radians)
    pub angle: f32,
}

/// Something the host needs to react to, produced by a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ChargeStarted,
    Launched(PlayerSpeed),
    Landed(LandingRelation),
    PlatformAdded(Platform),
    /// The oldest platform left the visible window
    PlatformEvicted,
    PlayerSuccess,
    PlayerFail,
}

/// Complete game state for one round
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: JumpConfig,
    /// Round seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub status: JumpStatus,
    pub player: Player,
    pub speed: PlayerSpeed,
    /// Visible platforms, oldest first
    pub platforms: Vec<Platform>,
    pub camera: Camera,
    pub camera_follow: Option<CameraFollow>,
    pub topple: Option<Topple>,
    /// Ticks spent shrinking during the current charge
    pub charge_ticks: u32,
    /// Successful landings this round
    pub landings: u32,
    /// Set by a tick that changed anything visible
    pub dirty: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new round: two platforms, player on the first
    pub fn new(config: JumpConfig, seed: u64) -> Self {
        let player = Player::new(&config);
        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            status: JumpStatus::Idle,
            player,
            speed: PlayerSpeed::default(),
            platforms: Vec::new(),
            camera: Camera::looking_at(Vec3::ZERO),
            camera_follow: None,
            topple: None,
            charge_ticks: 0,
            landings: 0,
            dirty: true,
            events: Vec::new(),
        };

        state.add_platform();
        state.add_platform();
        state.camera = Camera::looking_at(state.framing_target());

        log::debug!(
            "New round (seed {}): platforms at {:?}",
            seed,
            state.platforms.iter().map(|p| p.position).collect::<Vec<_>>()
        );

        state
    }

    /// Reset everything for a fresh round with a new seed
    pub fn restart(&mut self, seed: u64) {
        let config = self.config.clone();
        *self = Self::new(config, seed);
    }

    /// Place the next platform and add it to the visible window
    pub fn add_platform(&mut self) {
        let platform = place_next_platform(&self.platforms, &self.config, &mut self.rng);
        self.push_platform(platform);
    }

    /// Append a platform, evicting the oldest when the window overflows
    pub fn push_platform(&mut self, platform: Platform) {
        self.platforms.push(platform.clone());
        self.events.push(GameEvent::PlatformAdded(platform));
        if self.platforms.len() > self.config.visible_platforms {
            self.platforms.remove(0);
            self.events.push(GameEvent::PlatformEvicted);
        }
        self.dirty = true;
    }

    /// Newest platform (the jump target)
    pub fn last_platform(&self) -> Option<&Platform> {
        self.platforms.last()
    }

    /// The two newest platforms, newest first
    pub fn last_two_platforms(&self) -> Option<(&Platform, &Platform)> {
        match self.platforms.as_slice() {
            [.., second, last] => Some((last, second)),
            _ => None,
        }
    }

    /// Where the camera should look to frame the newest platforms
    pub fn framing_target(&self) -> Vec3 {
        let mid = match self.last_two_platforms() {
            Some((last, second)) => (last.position + second.position) * 0.5,
            None => self
                .last_platform()
                .map(|p| p.position)
                .unwrap_or(Vec3::ZERO),
        };
        mid + crate::consts::CAMERA_LOOK_OFFSET
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.status == JumpStatus::GameOver
    }
}
