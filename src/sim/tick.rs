//! Fixed timestep simulation tick
//!
//! One call advances the jump state machine by one animation frame:
//!
//! ```text
//! Idle --press--> Charging --release--> Airborne --touchdown--> Resolving
//!   ^                                                  |  Center  |  Edge (topple)  |  Outside
//!   +--------------------------------------------------+          v                 v
//!                                                              GameOver <-----------+
//! ```

use thiserror::Error;

use super::camera::{CameraFollow, FollowStep};
use super::landing::{active_axis, classify_landing};
use super::state::{GameEvent, GameState, JumpStatus, LandingRelation, PlayerSpeed, Topple};
use crate::Axis;
use crate::consts::{CAMERA_FOLLOW_STEP, TOPPLE_LIMIT};

/// Broken preconditions; game outcomes are never errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("no platforms in the scene")]
    NoPlatforms,
    #[error("a jump needs at least two platforms, found {found}")]
    TooFewPlatforms { found: usize },
    #[error("player transform is not finite")]
    InvalidPlayer,
}

/// Input commands for a single tick (one-shot)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch went down
    pub press: bool,
    /// Pointer/touch went up
    pub release: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    if state.platforms.is_empty() {
        return Err(SimError::NoPlatforms);
    }
    if !state.player.is_finite() {
        return Err(SimError::InvalidPlayer);
    }

    // Terminal; input listeners are effectively detached
    if state.status == JumpStatus::GameOver {
        return Ok(());
    }

    state.time_ticks += 1;

    if input.press && state.status == JumpStatus::Idle {
        if state.platforms.len() < 2 {
            return Err(SimError::TooFewPlatforms {
                found: state.platforms.len(),
            });
        }
        state.status = JumpStatus::Charging;
        state.charge_ticks = 0;
        state.speed = PlayerSpeed::default();
        state.emit(GameEvent::ChargeStarted);
        log::debug!("Charging");
    }

    if input.release && state.status == JumpStatus::Charging {
        state.status = JumpStatus::Airborne;
        state.emit(GameEvent::Launched(state.speed));
        log::debug!(
            "Launched after {} charge ticks: lateral {:.4}, vertical {:.4}",
            state.charge_ticks,
            state.speed.lateral,
            state.speed.vertical
        );
    }

    match state.status {
        JumpStatus::Charging => charge(state),
        JumpStatus::Airborne => {
            recover_scale(state);
            fly(state);
        }
        JumpStatus::Resolving => {
            recover_scale(state);
            topple(state);
        }
        JumpStatus::Idle => recover_scale(state),
        JumpStatus::GameOver => {}
    }

    follow_camera(state);

    Ok(())
}

/// Squash the player and build up speed until the scale floor
fn charge(state: &mut GameState) {
    let cfg = &state.config;
    if state.player.scale.y > cfg.player_min_scale {
        state.player.scale.y -= cfg.charge_scale_step;
        state.speed.lateral += cfg.player_speed_d;
        state.speed.vertical += cfg.player_speed_y;
        state.charge_ticks += 1;
        state.dirty = true;
    }
}

/// Spring back toward full height, independent of the trajectory
fn recover_scale(state: &mut GameState) {
    if state.player.scale.y < 1.0 {
        state.player.scale.y = (state.player.scale.y + state.config.recovery_scale_step).min(1.0);
        state.dirty = true;
    }
}

fn fly(state: &mut GameState) {
    let Some((last, second)) = state.last_two_platforms() else {
        return;
    };
    let axis = active_axis(last, second);
    let ground = state.config.ground_level();

    if state.player.position.y >= ground {
        state.player.position.y += state.speed.vertical;
        *axis.of_mut(&mut state.player.position) -= state.speed.lateral;
        state.speed.vertical -= state.config.gravity_step;
        state.dirty = true;
        log::trace!("Flight: {:?}", state.player.position);
    } else {
        touch_down(state, axis);
    }
}

fn touch_down(state: &mut GameState, axis: Axis) {
    state.status = JumpStatus::Resolving;
    state.player.position.y = state.config.ground_level();
    state.speed = PlayerSpeed::default();
    state.dirty = true;

    let Some(target) = state.last_platform().cloned() else {
        return;
    };
    let relation = classify_landing(&state.player, &target, axis);
    log::debug!(
        "Touched down at {:?} on platform {:?}: {:?}",
        state.player.position,
        target.position,
        relation
    );
    state.emit(GameEvent::Landed(relation));

    match relation {
        LandingRelation::Center => {
            state.landings += 1;
            state.add_platform();
            state.emit(GameEvent::PlayerSuccess);
            state.camera_follow = Some(CameraFollow::new(state.framing_target()));
            state.status = JumpStatus::Idle;
        }
        LandingRelation::Edge => {
            // Fall toward the side of the platform the player overhangs
            let overhang = axis.of(state.player.position) - axis.of(target.position);
            let direction = match axis {
                Axis::Z => {
                    if overhang < 0.0 {
                        -1.0
                    } else {
                        1.0
                    }
                }
                Axis::X => {
                    if overhang < 0.0 {
                        1.0
                    } else {
                        -1.0
                    }
                }
            };
            state.topple = Some(Topple {
                axis,
                direction,
                angle: 0.0,
            });
        }
        LandingRelation::Outside => game_over(state),
    }
}

/// Rotate the player off the edge, then end the round
fn topple(state: &mut GameState) {
    let Some(mut t) = state.topple else {
        // Nothing left to animate
        game_over(state);
        return;
    };

    t.angle = (t.angle + state.config.topple_step).min(TOPPLE_LIMIT);
    // A jump along z tips about x, and vice versa
    match t.axis {
        Axis::Z => state.player.rotation.x = t.direction * t.angle,
        Axis::X => state.player.rotation.z = t.direction * t.angle,
    }
    state.dirty = true;

    if t.angle >= TOPPLE_LIMIT {
        state.topple = None;
        game_over(state);
    } else {
        state.topple = Some(t);
    }
}

fn game_over(state: &mut GameState) {
    state.status = JumpStatus::GameOver;
    state.topple = None;
    state.camera_follow = None;
    // Through the floor
    state.player.position.y = -(state.config.cube_height + state.player.height);
    state.dirty = true;
    state.emit(GameEvent::PlayerFail);
    log::info!("Game over after {} landings", state.landings);
}

fn follow_camera(state: &mut GameState) {
    let Some(mut follow) = state.camera_follow else {
        return;
    };
    match follow.step(&mut state.camera, CAMERA_FOLLOW_STEP) {
        FollowStep::Waiting => state.camera_follow = Some(follow),
        FollowStep::Moved => {
            state.camera_follow = Some(follow);
            state.dirty = true;
        }
        FollowStep::Done => state.camera_follow = None,
    }
}
