//! Camera framing and the post-landing pan

use glam::Vec3;

use crate::consts::{CAMERA_FOLLOW_DELAY_TICKS, CAMERA_OFFSET};

/// Scene camera: eye position and look-at target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Camera {
    /// Camera at the fixed offset from `target`
    pub fn looking_at(target: Vec3) -> Self {
        Self {
            position: target + CAMERA_OFFSET,
            look_at: target,
        }
    }

    /// Shift eye and target together
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.look_at += delta;
    }
}

/// Result of advancing a camera pan by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStep {
    /// Still in the start delay
    Waiting,
    /// Camera moved this tick
    Moved,
    /// Target reached; the pan is over
    Done,
}

/// Pending pan toward a new framing target
///
/// The look-at only ever moves toward -x / -z (the direction platforms are
/// placed in). X is resolved fully before z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFollow {
    pub delay_ticks: u32,
    pub target: Vec3,
}

impl CameraFollow {
    pub fn new(target: Vec3) -> Self {
        Self {
            delay_ticks: CAMERA_FOLLOW_DELAY_TICKS,
            target,
        }
    }

    pub fn step(&mut self, camera: &mut Camera, step: f32) -> FollowStep {
        if self.delay_ticks > 0 {
            self.delay_ticks -= 1;
            return FollowStep::Waiting;
        }

        let look = camera.look_at;
        if look.x > self.target.x {
            let dx = step.min(look.x - self.target.x);
            camera.translate(Vec3::new(-dx, 0.0, 0.0));
            FollowStep::Moved
        } else if look.z > self.target.z {
            let dz = step.min(look.z - self.target.z);
            camera.translate(Vec3::new(0.0, 0.0, -dz));
            FollowStep::Moved
        } else {
            FollowStep::Done
        }
    }
}
