//! Applying drag scalars to object poses.

use bevy::prelude::*;

/// Move `transform` by `scalar` units along `axis_dir`.
pub fn apply_translation(transform: &mut Transform, axis_dir: Vec3, scalar: f32) {
    transform.translation += axis_dir * scalar;
}

/// Rotate `transform` about the world-space `axis_dir` through its own
/// origin by `scalar * radians_per_unit` radians.
///
/// The rotation is composed onto the current orientation, so successive
/// calls accumulate.
pub fn apply_rotation(
    transform: &mut Transform,
    axis_dir: Vec3,
    scalar: f32,
    radians_per_unit: f32,
) {
    let Some(axis) = axis_dir.try_normalize() else {
        return;
    };
    let delta = Quat::from_axis_angle(axis, scalar * radians_per_unit);
    transform.rotation = (delta * transform.rotation).normalize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_round_trip() {
        let start = Vec3::new(0.25, -1.0, 3.0);
        let mut transform = Transform::from_translation(start);
        apply_translation(&mut transform, Vec3::X, 0.37);
        assert!((transform.translation.x - 0.62).abs() < 1e-6);
        apply_translation(&mut transform, Vec3::X, -0.37);
        assert!(transform.translation.distance(start) < 1e-6);
    }

    #[test]
    fn rotation_accumulates() {
        let theta = 0.3;
        let mut stepped = Transform::from_rotation(Quat::from_rotation_x(0.2));
        let mut single = stepped;
        for _ in 0..3 {
            apply_rotation(&mut stepped, Vec3::Y, theta, 1.0);
        }
        apply_rotation(&mut single, Vec3::Y, 3.0 * theta, 1.0);
        assert!(stepped.rotation.angle_between(single.rotation) < 1e-5);
    }

    #[test]
    fn rotation_is_about_world_axis_and_keeps_position() {
        let position = Vec3::new(2.0, 0.0, 0.0);
        // Tilt the object first so its local Y differs from world Y.
        let mut transform = Transform::from_translation(position)
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        apply_rotation(&mut transform, Vec3::Y, std::f32::consts::FRAC_PI_2, 1.0);

        assert_eq!(transform.translation, position);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
            * Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(transform.rotation.angle_between(expected) < 1e-5);
    }

    #[test]
    fn multiplier_scales_angle() {
        let mut transform = Transform::IDENTITY;
        apply_rotation(&mut transform, Vec3::Z, 0.5, 2.0);
        let (axis, angle) = transform.rotation.to_axis_angle();
        assert!((angle - 1.0).abs() < 1e-5);
        assert!(axis.distance(Vec3::Z) < 1e-5);
    }
}
