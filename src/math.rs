//! Math utilities for hit testing against handle and object shapes.

use bevy::math::Ray3d;
use bevy::prelude::*;

/// Threshold for considering vectors as parallel or zero-length.
const EPSILON: f32 = 1e-6;

/// Threshold for choosing perpendicular helper vector.
const AXIS_PARALLEL_THRESHOLD: f32 = 0.9;

/// Build an orthonormal basis (t1, t2) in the plane perpendicular to `axis`.
pub fn axis_basis(axis: Vec3) -> (Vec3, Vec3) {
    let axis = axis.normalize_or_zero();
    if axis.length_squared() < EPSILON {
        return (Vec3::X, Vec3::Y);
    }

    // Pick a helper vector that is not parallel to axis.
    let helper = if axis.abs().dot(Vec3::Y) < AXIS_PARALLEL_THRESHOLD {
        Vec3::Y
    } else {
        Vec3::X
    };

    let t1 = axis.cross(helper).normalize_or_zero();
    let t2 = axis.cross(t1).normalize_or_zero();
    (t1, t2)
}

/// Point on a circle of `radius` around `center` in the plane spanned by
/// `(t1, t2)`, at `angle` radians.
pub fn circle_point(center: Vec3, t1: Vec3, t2: Vec3, radius: f32, angle: f32) -> Vec3 {
    center + radius * (t1 * angle.cos() + t2 * angle.sin())
}

/// Solve intersection between a ray and a sphere. Returns distance along the
/// ray if there is an intersection, otherwise `None`.
pub fn ray_sphere_intersection(ray: &Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let m = ray.origin - center;
    let b = m.dot(*ray.direction);
    let c = m.length_squared() - radius * radius;

    // Exit if ray origin is outside sphere (c > 0) and ray is pointing away
    // from sphere (b > 0).
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discr = b * b - c;
    if discr < 0.0 {
        return None;
    }

    let t = -b - discr.sqrt();
    if t < 0.0 {
        Some(0.0)
    } else {
        Some(t)
    }
}

/// Intersect a ray with a capsule around the segment `start..end`.
///
/// Returns the approximate entry distance along the ray: the parameter of
/// the closest approach pulled back by the chord half-length.
pub fn ray_capsule_intersection(ray: &Ray3d, start: Vec3, end: Vec3, radius: f32) -> Option<f32> {
    let dir = *ray.direction;
    let seg = end - start;
    let seg_len_sq = seg.length_squared();
    if seg_len_sq < EPSILON {
        return ray_sphere_intersection(ray, start, radius);
    }

    let w = ray.origin - start;
    let b = dir.dot(seg);
    let d = dir.dot(w);
    let e = seg.dot(w);
    let denom = seg_len_sq - b * b;

    // Closest parameters on the infinite lines, then clamp to the ray
    // (t >= 0) and the segment (0 <= s <= 1).
    let mut s = if denom > EPSILON {
        ((e - b * d) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = (start + seg * s - ray.origin).dot(dir);
    if t < 0.0 {
        t = 0.0;
    }
    s = ((ray.origin + dir * t - start).dot(seg) / seg_len_sq).clamp(0.0, 1.0);
    t = (start + seg * s - ray.origin).dot(dir).max(0.0);

    let closest_on_ray = ray.origin + dir * t;
    let closest_on_seg = start + seg * s;
    let dist_sq = closest_on_ray.distance_squared(closest_on_seg);
    let radius_sq = radius * radius;
    if dist_sq > radius_sq {
        return None;
    }

    Some((t - (radius_sq - dist_sq).sqrt()).max(0.0))
}

/// Intersect a ray with a thin tube bent into a ring.
///
/// The ring lies in the plane through `center` with normal `normal`. The
/// tube is approximated by `segments` capsules of radius `thickness`, which
/// keeps the ring hittable even when seen edge-on.
pub fn ray_ring_intersection(
    ray: &Ray3d,
    center: Vec3,
    normal: Vec3,
    radius: f32,
    thickness: f32,
    segments: usize,
) -> Option<f32> {
    let (t1, t2) = axis_basis(normal);
    let steps = segments.max(3);

    // Coarse rejection against the ring's bounding sphere.
    ray_sphere_intersection(ray, center, radius + thickness)?;

    let mut best: Option<f32> = None;
    let mut prev = circle_point(center, t1, t2, radius, 0.0);
    for i in 1..=steps {
        let angle = std::f32::consts::TAU * i as f32 / steps as f32;
        let point = circle_point(center, t1, t2, radius, angle);
        if let Some(t) = ray_capsule_intersection(ray, prev, point, thickness) {
            if best.is_none_or(|b| t < b) {
                best = Some(t);
            }
        }
        prev = point;
    }
    best
}

/// Intersect a ray with an oriented box. Returns the entry distance.
///
/// Slab test performed in the box's local frame.
pub fn ray_obb_intersection(
    ray: &Ray3d,
    center: Vec3,
    rotation: Quat,
    half_extents: Vec3,
) -> Option<f32> {
    let inverse = rotation.inverse();
    let origin = inverse * (ray.origin - center);
    let dir = inverse * *ray.direction;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for i in 0..3 {
        let o = origin[i];
        let d = dir[i];
        let he = half_extents[i];
        if d.abs() < EPSILON {
            // Parallel to this slab: must already be inside it.
            if o < -he || o > he {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (-he - o) * inv;
        let mut t1 = (he - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
    }

    if t_max >= t_min.max(0.0) {
        Some(t_min.max(0.0))
    } else {
        None
    }
}
