//! Screen-space conversions at the camera seam.
//!
//! The controller never talks to a Bevy camera directly. It asks a
//! [`ViewportProjection`] to map world points to normalized device
//! coordinates and NDC positions to rays, and converts between NDC and
//! pointer pixels with its own [`Viewport`]. [`CameraView`] adapts a Bevy
//! camera; [`PerspectiveView`] is a plain perspective camera for headless
//! use and tests.

use bevy::math::Ray3d;
use bevy::prelude::*;

/// Clip-space `w` below which a point counts as behind the camera.
const MIN_CLIP_W: f32 = 1e-6;

/// Maps between world space and normalized device coordinates (`[-1, 1]`,
/// y up).
pub trait ViewportProjection {
    /// Project a world-space point to NDC.
    ///
    /// Returns `None` when the point cannot be projected, e.g. it lies
    /// behind the camera.
    fn world_to_ndc(&self, world: Vec3) -> Option<Vec2>;

    /// Build the picking ray through an NDC position.
    fn ndc_to_ray(&self, ndc: Vec2) -> Option<Ray3d>;
}

/// Size of the drawing surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

fn usable_dimension(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl Viewport {
    /// Create a viewport, or `None` if either dimension is zero, negative or
    /// not finite.
    pub fn new(width: f32, height: f32) -> Option<Self> {
        (usable_dimension(width) && usable_dimension(height)).then_some(Self { width, height })
    }

    /// Apply a resize event. Returns `false` and keeps the old size when
    /// either dimension is unusable, so the aspect ratio never divides by
    /// zero.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        match Self::new(width, height) {
            Some(resized) => {
                *self = resized;
                true
            }
            None => false,
        }
    }

    /// Width and height in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Convert a pixel position to normalized device coordinates in
    /// `[-1, 1]` with y up.
    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            pixel.x / self.width * 2.0 - 1.0,
            -(pixel.y / self.height) * 2.0 + 1.0,
        )
    }

    /// Convert normalized device coordinates back to a pixel position.
    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Clip transform of a perspective camera.
#[derive(Debug, Clone, Copy)]
struct ClipSpace {
    eye: Vec3,
    clip_from_world: Mat4,
    world_from_clip: Mat4,
}

impl ClipSpace {
    fn new(eye: Vec3, clip_from_world: Mat4) -> Self {
        Self {
            eye,
            clip_from_world,
            world_from_clip: clip_from_world.inverse(),
        }
    }

    fn world_to_ndc(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.clip_from_world * world.extend(1.0);
        if clip.w <= MIN_CLIP_W {
            return None;
        }
        let ndc = clip.truncate().truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }

    fn ndc_to_ray(&self, ndc: Vec2) -> Option<Ray3d> {
        if !ndc.is_finite() {
            return None;
        }
        // Any depth strictly inside the frustum works for both depth
        // conventions (standard and reversed).
        let point = self.world_from_clip.project_point3(ndc.extend(0.5));
        let direction = Dir3::new(point - self.eye).ok()?;
        Some(Ray3d::new(self.eye, direction))
    }
}

/// [`ViewportProjection`] backed by a Bevy camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    clip: ClipSpace,
}

impl CameraView {
    /// Snapshot the projection of a camera at its global transform.
    pub fn new(camera: &Camera, transform: &GlobalTransform) -> Self {
        let world_from_view = Mat4::from(transform.affine());
        let clip_from_world = camera.clip_from_view() * world_from_view.inverse();
        Self {
            clip: ClipSpace::new(transform.translation(), clip_from_world),
        }
    }
}

impl ViewportProjection for CameraView {
    fn world_to_ndc(&self, world: Vec3) -> Option<Vec2> {
        self.clip.world_to_ndc(world)
    }

    fn ndc_to_ray(&self, ndc: Vec2) -> Option<Ray3d> {
        self.clip.ndc_to_ray(ndc)
    }
}

/// A right-handed perspective camera computed with plain matrix math.
#[derive(Debug, Clone)]
pub struct PerspectiveView {
    eye: Vec3,
    target: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    viewport: Viewport,
    clip: ClipSpace,
}

impl PerspectiveView {
    /// Camera at `eye` looking at `target` with +Y up.
    pub fn new(eye: Vec3, target: Vec3, fov_y_radians: f32, viewport: Viewport) -> Self {
        let mut view = Self {
            eye,
            target,
            fov_y: fov_y_radians,
            near: 0.1,
            far: 1000.0,
            viewport,
            clip: ClipSpace::new(eye, Mat4::IDENTITY),
        };
        view.rebuild();
        view
    }

    /// Move the camera.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
        self.rebuild();
    }

    /// Resize the viewport; zero-sized resizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let resized = self.viewport.resize(width, height);
        if resized {
            self.rebuild();
        }
        resized
    }

    /// Camera position.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Project a world point straight to pixels of this view's viewport.
    pub fn world_to_pixel(&self, world: Vec3) -> Option<Vec2> {
        self.world_to_ndc(world)
            .map(|ndc| self.viewport.ndc_to_pixel(ndc))
    }

    fn rebuild(&mut self) {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let projection =
            Mat4::perspective_rh(self.fov_y, self.viewport.aspect(), self.near, self.far);
        self.clip = ClipSpace::new(self.eye, projection * view);
    }
}

impl ViewportProjection for PerspectiveView {
    fn world_to_ndc(&self, world: Vec3) -> Option<Vec2> {
        self.clip.world_to_ndc(world)
    }

    fn ndc_to_ray(&self, ndc: Vec2) -> Option<Ray3d> {
        self.clip.ndc_to_ray(ndc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_view() -> PerspectiveView {
        PerspectiveView::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            60f32.to_radians(),
            Viewport::new(800.0, 600.0).unwrap(),
        )
    }

    #[test]
    fn zero_resize_is_ignored() {
        let mut viewport = Viewport::new(800.0, 600.0).unwrap();
        assert!(!viewport.resize(0.0, 600.0));
        assert!(!viewport.resize(800.0, 0.0));
        assert_eq!(viewport.size(), Vec2::new(800.0, 600.0));
        assert!(viewport.resize(1024.0, 512.0));
        assert_eq!(viewport.aspect(), 2.0);
        assert!(Viewport::new(0.0, 0.0).is_none());
    }

    #[test]
    fn ndc_corners() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        assert_eq!(viewport.pixel_to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.pixel_to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(viewport.ndc_to_pixel(Vec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn target_projects_to_center() {
        let view = front_view();
        let center = view.world_to_pixel(Vec3::ZERO).unwrap();
        assert!(center.distance(Vec2::new(400.0, 300.0)) < 1e-3);

        // +X goes right and +Y goes up (smaller pixel y).
        let right = view.world_to_pixel(Vec3::X).unwrap();
        let up = view.world_to_pixel(Vec3::Y).unwrap();
        assert!(right.x > center.x);
        assert!(up.y < center.y);
    }

    #[test]
    fn behind_camera_does_not_project() {
        let view = front_view();
        assert!(view.world_to_ndc(Vec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn ray_passes_through_projected_point() {
        let view = front_view();
        let point = Vec3::new(0.6, -0.3, 0.2);
        let ndc = view.world_to_ndc(point).unwrap();
        let ray = view.ndc_to_ray(ndc).unwrap();
        assert_eq!(ray.origin, view.eye());

        let to_point = point - ray.origin;
        let along = to_point.dot(*ray.direction);
        let closest = ray.origin + *ray.direction * along;
        assert!(closest.distance(point) < 1e-3);
    }

    #[test]
    fn resize_changes_projection() {
        let mut view = front_view();
        let before = view.world_to_ndc(Vec3::X).unwrap();
        assert!(view.resize(1600.0, 600.0));
        let after = view.world_to_ndc(Vec3::X).unwrap();
        assert!(after != before);
        assert!(!view.resize(0.0, 0.0));
    }

    #[test]
    fn non_finite_ndc_has_no_ray() {
        let view = front_view();
        assert!(view.ndc_to_ray(Vec2::new(f32::NAN, 0.0)).is_none());
        assert!(view.ndc_to_ray(Vec2::new(f32::INFINITY, 0.0)).is_none());
    }
}
