//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per animation frame, driven by the host
//! - Seeded RNG only
//! - Transitions reported as `GameEvent`s, never via callbacks
//! - No rendering or platform dependencies

pub mod camera;
pub mod landing;
pub mod placement;
pub mod state;
pub mod tick;

pub use camera::{Camera, CameraFollow, FollowStep};
pub use landing::{Footprint, active_axis, classify, classify_landing};
pub use placement::{place_next_platform, place_with};
pub use state::{
    Direction, GameEvent, GameState, JumpStatus, LandingRelation, Platform, Player, PlayerSpeed,
    Topple,
};
pub use tick::{SimError, TickInput, tick};
