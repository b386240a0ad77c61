//! Procedural platform placement
//!
//! Each new platform sits behind the previous one along either the depth or
//! the width axis, separated by a random gap. The path therefore only ever
//! moves toward -x / -z.

use glam::Vec3;
use rand::Rng;

use super::state::{Direction, Platform};
use crate::config::JumpConfig;

/// Pick the next platform given the current sequence (oldest first)
///
/// Pure apart from drawing from `rng`; the caller appends the result.
pub fn place_next_platform<R: Rng>(
    platforms: &[Platform],
    config: &JumpConfig,
    rng: &mut R,
) -> Platform {
    let Some(prev) = platforms.last() else {
        return Platform::new(Vec3::ZERO, config);
    };

    let direction = random_direction(rng);
    let gap = random_gap(rng, config.max_distance);
    log::debug!("Placing platform: {:?}, gap {:.3}", direction, gap);

    place_with(prev, config, direction, gap)
}

/// Deterministic placement relative to `prev`
pub fn place_with(prev: &Platform, config: &JumpConfig, direction: Direction, gap: f32) -> Platform {
    let mut position = prev.position;
    match direction {
        Direction::Extend => position.z -= config.cube_depth + gap,
        Direction::Turn => position.x -= config.cube_width + gap,
    }
    Platform::new(position, config)
}

pub fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    if rng.random_bool(0.5) {
        Direction::Turn
    } else {
        Direction::Extend
    }
}

/// Uniform in `[0, max_distance)`
pub fn random_gap<R: Rng>(rng: &mut R, max_distance: f32) -> f32 {
    rng.random::<f32>() * max_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_empty_sequence_places_at_origin() {
        let config = JumpConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let platform = place_next_platform(&[], &config, &mut rng);
        assert_eq!(platform.position, Vec3::ZERO);
        assert_eq!(platform.width, config.cube_width);
        assert_eq!(platform.depth, config.cube_depth);
    }

    #[test]
    fn test_turn_with_zero_gap() {
        let config = JumpConfig::default();
        let origin = Platform::new(Vec3::ZERO, &config);
        let next = place_with(&origin, &config, Direction::Turn, 0.0);
        assert_eq!(next.position, Vec3::new(-config.cube_width, 0.0, 0.0));
    }

    #[test]
    fn test_extend_uses_depth() {
        let mut config = JumpConfig::default();
        config.cube_depth = 3.0;
        let prev = Platform::new(Vec3::new(-2.0, 0.0, -1.0), &config);
        let next = place_with(&prev, &config, Direction::Extend, 1.5);
        assert_eq!(next.position, Vec3::new(-2.0, 0.0, -5.5));
    }

    #[test]
    fn test_zero_max_distance_gives_adjacent_platforms() {
        let mut config = JumpConfig::default();
        config.max_distance = 0.0;
        let mut rng = Pcg32::seed_from_u64(5);
        let first = place_next_platform(&[], &config, &mut rng);
        let second = place_next_platform(std::slice::from_ref(&first), &config, &mut rng);
        let step = (first.position - second.position).abs();
        assert!(step == Vec3::new(config.cube_width, 0.0, 0.0) || step == Vec3::new(0.0, 0.0, config.cube_depth));
    }

    #[test]
    fn test_both_directions_occur() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let draws: Vec<Direction> = (0..64).map(|_| random_direction(&mut rng)).collect();
        assert!(draws.contains(&Direction::Turn));
        assert!(draws.contains(&Direction::Extend));
    }

    proptest! {
        #[test]
        fn prop_path_is_monotonic(seed in any::<u64>(), x in -50.0f32..50.0, z in -50.0f32..50.0) {
            let config = JumpConfig::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let prev = Platform::new(Vec3::new(x, 0.0, z), &config);
            let next = place_next_platform(std::slice::from_ref(&prev), &config, &mut rng);

            prop_assert_eq!(next.position.y, prev.position.y);
            if next.position.x == prev.position.x {
                // Extend: fixed x, z strictly decreases
                prop_assert!(next.position.z < prev.position.z);
                prop_assert!(prev.position.z - next.position.z < config.cube_depth + config.max_distance + 1e-3);
            } else {
                // Turn: fixed z, x strictly decreases
                prop_assert_eq!(next.position.z, prev.position.z);
                prop_assert!(next.position.x < prev.position.x);
                prop_assert!(prev.position.x - next.position.x < config.cube_width + config.max_distance + 1e-3);
            }
        }

        #[test]
        fn prop_gap_in_range(seed in any::<u64>(), max in prop_oneof![Just(0.0f32), 0.0f32..20.0]) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let gap = random_gap(&mut rng, max);
            prop_assert!(gap >= 0.0);
            if max > 0.0 {
                prop_assert!(gap < max);
            } else {
                prop_assert_eq!(gap, 0.0);
            }
        }
    }
}
