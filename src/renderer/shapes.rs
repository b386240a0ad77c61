//! Shape generation for lit boxes

use glam::{EulerRot, Mat4, Quat, Vec3};

use super::vertex::Vertex;
use crate::sim::{Platform, Player};

/// A box ready to be triangulated
#[derive(Debug, Clone, PartialEq)]
pub struct BoxInstance {
    /// Maps the unit cube `[-0.5, 0.5]^3` into world space
    pub model: Mat4,
    /// Rotation part of `model`, used for normals
    pub rotation: Quat,
    /// World-space center, used for draw ordering
    pub center: Vec3,
    pub color: [f32; 4],
}

/// Platform boxes are centered on their position
pub fn platform_box(platform: &Platform) -> BoxInstance {
    let size = Vec3::new(platform.width, platform.height, platform.depth);
    BoxInstance {
        model: Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, platform.position),
        rotation: Quat::IDENTITY,
        center: platform.position,
        color: platform.color,
    }
}

/// The player box pivots at its base so squash and topple keep the feet planted
pub fn player_box(player: &Player) -> BoxInstance {
    let size = Vec3::new(player.width, player.height, player.depth) * player.scale;
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        player.rotation.x,
        player.rotation.y,
        player.rotation.z,
    );
    let model = Mat4::from_scale_rotation_translation(size, rotation, player.position)
        * Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0));
    BoxInstance {
        center: model.transform_point3(Vec3::ZERO),
        model,
        rotation,
        color: player.color,
    }
}

/// Outward normals of the six faces, each with an in-face tangent
const FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y),
    (Vec3::NEG_X, Vec3::Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::Z),
    (Vec3::Z, Vec3::X),
    (Vec3::NEG_Z, Vec3::X),
];

/// Triangulate a box: 6 faces, 2 triangles each, CCW seen from outside
pub fn cuboid(instance: &BoxInstance) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(36);

    for (n, u) in FACES {
        let v = n.cross(u);
        let corners = [
            (n - u - v) * 0.5,
            (n + u - v) * 0.5,
            (n + u + v) * 0.5,
            (n - u + v) * 0.5,
        ]
        .map(|c| instance.model.transform_point3(c).to_array());
        let normal = (instance.rotation * n).to_array();

        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex::new(corners[i], normal, instance.color));
        }
    }

    vertices
}

/// Triangulate all boxes, farthest from `eye` first
///
/// Back-face culling plus this ordering is enough for separate convex
/// boxes, so no depth buffer is needed.
pub fn scene_vertices(mut boxes: Vec<BoxInstance>, eye: Vec3) -> Vec<Vertex> {
    boxes.sort_by(|a, b| {
        let da = a.center.distance_squared(eye);
        let db = b.center.distance_squared(eye);
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });
    boxes.iter().flat_map(cuboid).collect()
}
