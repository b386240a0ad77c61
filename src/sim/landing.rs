//! Landing classification
//!
//! Landings are judged in one dimension: the player's footprint against the
//! target platform's footprint along the axis the jump travelled.

use super::state::{LandingRelation, Platform, Player};
use crate::Axis;

/// A 1-D interval `center ± width / 2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center: f32,
    pub width: f32,
}

impl Footprint {
    pub fn new(center: f32, width: f32) -> Self {
        Self { center, width }
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.center - self.width / 2.0
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.center + self.width / 2.0
    }
}

/// Compare the player's footprint against the platform's
///
/// All comparisons are strict: a player center exactly on the platform
/// boundary is an `Edge`, and footprints that merely touch are not `Outside`.
pub fn classify(player: Footprint, platform: Footprint) -> LandingRelation {
    if player.max() < platform.min() || player.min() > platform.max() {
        LandingRelation::Outside
    } else if player.center > platform.min() && player.center < platform.max() {
        LandingRelation::Center
    } else {
        LandingRelation::Edge
    }
}

/// Axis of travel between `second_last` and `last`
///
/// Platforms sharing an x coordinate were extended along z.
pub fn active_axis(last: &Platform, second_last: &Platform) -> Axis {
    if last.position.x == second_last.position.x {
        Axis::Z
    } else {
        Axis::X
    }
}

/// Classify a player standing at its current position on `target`
pub fn classify_landing(player: &Player, target: &Platform, axis: Axis) -> LandingRelation {
    classify(
        Footprint::new(axis.of(player.position), player.extent(axis)),
        Footprint::new(axis.of(target.position), target.extent(axis)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JumpConfig;
    use glam::Vec3;
    use proptest::prelude::*;

    #[test]
    fn test_centered_landing() {
        let r = classify(Footprint::new(0.0, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Center);
    }

    #[test]
    fn test_far_past_platform_is_outside() {
        // 3 - 0.5 = 2.5 > 0 + 2
        let r = classify(Footprint::new(3.0, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Outside);
        let r = classify(Footprint::new(-3.0, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Outside);
    }

    #[test]
    fn test_overhanging_is_edge() {
        // Center past the boundary but footprints still overlap
        let r = classify(Footprint::new(2.3, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Edge);
        let r = classify(Footprint::new(-2.4, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Edge);
    }

    #[test]
    fn test_boundary_ties() {
        // Center exactly on the platform boundary
        let r = classify(Footprint::new(2.0, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Edge);
        // Footprints exactly touching
        let r = classify(Footprint::new(2.5, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Edge);
        let r = classify(Footprint::new(-2.5, 1.0), Footprint::new(0.0, 4.0));
        assert_eq!(r, LandingRelation::Edge);
    }

    #[test]
    fn test_active_axis() {
        let config = JumpConfig::default();
        let a = Platform::new(Vec3::ZERO, &config);
        let along_z = Platform::new(Vec3::new(0.0, 0.0, -6.0), &config);
        let along_x = Platform::new(Vec3::new(-6.0, 0.0, 0.0), &config);
        assert_eq!(active_axis(&along_z, &a), Axis::Z);
        assert_eq!(active_axis(&along_x, &a), Axis::X);
    }

    #[test]
    fn test_classify_landing_uses_axis_extents() {
        let mut config = JumpConfig::default();
        config.cube_width = 2.0;
        config.cube_depth = 4.0;
        let target = Platform::new(Vec3::new(-5.0, 0.0, -7.0), &config);
        let mut player = crate::sim::state::Player::new(&config);
        player.position = Vec3::new(-5.0, 1.0, -5.5);

        // Along z the platform is 4 deep: -5.5 is within -9..-5
        assert_eq!(classify_landing(&player, &target, Axis::Z), LandingRelation::Center);

        // Along x the platform is 2 wide: -3.8 overhangs -6..-4
        player.position = Vec3::new(-3.8, 1.0, -7.0);
        assert_eq!(classify_landing(&player, &target, Axis::X), LandingRelation::Edge);
    }

    proptest! {
        #[test]
        fn prop_translation_invariant(
            pc in -20.0f32..20.0,
            pw in 0.1f32..4.0,
            sc in -20.0f32..20.0,
            sw in 0.1f32..8.0,
            shift in -64i32..64,
        ) {
            // Power-of-two shifts keep the arithmetic exact
            let shift = shift as f32 * 0.25;
            let pc = (pc * 8.0).round() / 8.0;
            let sc = (sc * 8.0).round() / 8.0;
            let pw = (pw * 8.0).round().max(1.0) / 8.0;
            let sw = (sw * 8.0).round().max(1.0) / 8.0;

            let base = classify(Footprint::new(pc, pw), Footprint::new(sc, sw));
            let moved = classify(Footprint::new(pc + shift, pw), Footprint::new(sc + shift, sw));
            prop_assert_eq!(base, moved);
        }

        #[test]
        fn prop_disjoint_is_outside(
            sc in -20.0f32..20.0,
            sw in 0.1f32..8.0,
            pw in 0.1f32..4.0,
            gap in 0.01f32..10.0,
            right in any::<bool>(),
        ) {
            let offset = (sw + pw) / 2.0 + gap;
            let pc = if right { sc + offset } else { sc - offset };
            prop_assert_eq!(
                classify(Footprint::new(pc, pw), Footprint::new(sc, sw)),
                LandingRelation::Outside
            );
        }

        #[test]
        fn prop_center_inside_is_center(
            sc in -20.0f32..20.0,
            sw in 0.5f32..8.0,
            pw in 0.1f32..4.0,
            t in -0.99f32..0.99,
        ) {
            let pc = sc + t * sw / 2.0;
            prop_assume!(pc > sc - sw / 2.0 && pc < sc + sw / 2.0);
            prop_assert_eq!(
                classify(Footprint::new(pc, pw), Footprint::new(sc, sw)),
                LandingRelation::Center
            );
        }
    }
}
