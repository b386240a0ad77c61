//! Tap Jump - press, hold, release, land on the next platform
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jump state machine, placement, landing)
//! - `scene`: Scene driver bridging the simulation to a rendering sink
//! - `renderer`: WebGPU box renderer
//! - `platform`: Browser/native platform abstraction
//! - `config`: Data-driven game tuning and difficulty presets

pub mod config;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod sim;

pub use config::{ConfigError, Difficulty, JumpConfig};
pub use scene::{RoundObserver, SceneDriver, SceneSink};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (one tick per 60 Hz animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Camera eye relative to its look-at target
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(100.0, 100.0, 100.0);
    /// Added to the midpoint of the two newest platforms when framing them
    pub const CAMERA_LOOK_OFFSET: Vec3 = Vec3::new(-1.0, 0.0, -1.0);
    /// Vertical field of view (degrees) - very narrow, near-orthographic look
    pub const CAMERA_FOV_DEG: f32 = 6.0;
    pub const CAMERA_NEAR: f32 = 1.0;
    pub const CAMERA_FAR: f32 = 10_000.0;
    /// Look-at advance per tick during a camera pan
    pub const CAMERA_FOLLOW_STEP: f32 = 0.1;
    /// Ticks between a successful landing and the start of the camera pan
    pub const CAMERA_FOLLOW_DELAY_TICKS: u32 = 12;

    /// Rotation limit of the topple animation (radians)
    pub const TOPPLE_LIMIT: f32 = std::f32::consts::FRAC_PI_2;
}

/// Horizontal axis along which the player travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    /// Mutable component of `v` along this axis
    #[inline]
    pub fn of_mut(self, v: &mut Vec3) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Z => &mut v.z,
        }
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into an RGBA color in the 0-1 range
pub fn parse_hex_color(s: &str) -> Option<[f32; 4]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
}
