//! Gizmo handle construction and teardown.
//!
//! Every handle is a visual (arrow or ring) paired with an invisible,
//! axis-tagged collider registered in the [`SelectableSet`]. The pair is
//! created and destroyed as a unit.

use bevy::math::Ray3d;
use bevy::prelude::*;
use slotmap::SlotMap;

use crate::math::{ray_capsule_intersection, ray_ring_intersection};
use crate::registry::{Selectable, SelectableSet};
use crate::settings::HandleGeometry;
use crate::types::{GizmoAxis, HandleId, HandleRole, SelectableKey};

/// Hit-test proxy of a handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Capsule around a segment (arrow handles).
    Capsule {
        /// Segment start.
        start: Vec3,
        /// Segment end.
        end: Vec3,
        /// Capsule radius.
        radius: f32,
    },
    /// Tube bent into a ring (rotation handles).
    Ring {
        /// Ring center.
        center: Vec3,
        /// Normal of the ring plane.
        normal: Vec3,
        /// Ring radius.
        radius: f32,
        /// Tube radius.
        thickness: f32,
        /// Segments of the polyline approximation.
        segments: usize,
    },
}

impl ColliderShape {
    /// Distance along `ray` to the collider, if hit.
    pub fn intersect(&self, ray: &Ray3d) -> Option<f32> {
        match *self {
            ColliderShape::Capsule { start, end, radius } => {
                ray_capsule_intersection(ray, start, end, radius)
            }
            ColliderShape::Ring {
                center,
                normal,
                radius,
                thickness,
                segments,
            } => ray_ring_intersection(ray, center, normal, radius, thickness, segments),
        }
    }
}

/// Invisible hit-test counterpart of a handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// The handle this collider belongs to.
    pub handle: HandleId,
    /// Axis the handle manipulates.
    pub axis: GizmoAxis,
    /// Translate or rotate.
    pub role: HandleRole,
    /// Hit-test geometry.
    pub shape: ColliderShape,
}

/// What a handle looks like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleVisual {
    /// Arrow from `origin` along `direction`.
    Arrow {
        /// Arrow tail.
        origin: Vec3,
        /// Unit direction.
        direction: Vec3,
        /// Length including the head.
        length: f32,
    },
    /// Circle around `center` in the plane with normal `normal`.
    Ring {
        /// Ring center.
        center: Vec3,
        /// Unit normal of the ring plane.
        normal: Vec3,
        /// Ring radius.
        radius: f32,
        /// Line segments used to draw the circle.
        segments: usize,
    },
}

/// A spawned handle: visual plus the key of its collider.
#[derive(Debug, Clone)]
pub struct GizmoHandle {
    /// Axis the handle manipulates.
    pub axis: GizmoAxis,
    /// Translate or rotate.
    pub role: HandleRole,
    /// How to draw it.
    pub visual: HandleVisual,
    /// Collider as registered in the selectable set.
    pub collider: Collider,
    collider_key: SelectableKey,
}

impl GizmoHandle {
    /// Key of the paired collider in the selectable set.
    pub fn collider_key(&self) -> SelectableKey {
        self.collider_key
    }
}

/// Creates and destroys handle sets.
#[derive(Debug, Default)]
pub struct GizmoFactory {
    geometry: HandleGeometry,
    handles: SlotMap<HandleId, GizmoHandle>,
}

impl GizmoFactory {
    /// A factory producing handles of the given sizes.
    pub fn new(geometry: HandleGeometry) -> Self {
        Self {
            geometry,
            handles: SlotMap::with_key(),
        }
    }

    /// Handle sizes.
    pub fn geometry(&self) -> &HandleGeometry {
        &self.geometry
    }

    /// Spawned handles.
    pub fn handles(&self) -> impl Iterator<Item = (HandleId, &GizmoHandle)> {
        self.handles.iter()
    }

    /// Look up a handle.
    pub fn handle(&self, id: HandleId) -> Option<&GizmoHandle> {
        self.handles.get(id)
    }

    /// Number of spawned handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handles are spawned.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Role of the current handle set, if any is spawned.
    pub fn role(&self) -> Option<HandleRole> {
        self.handles.values().next().map(|handle| handle.role)
    }

    /// Replace the current handles with three arrows at `position`.
    pub fn spawn_move_handles(
        &mut self,
        selectable: &mut SelectableSet,
        position: Vec3,
    ) -> [HandleId; 3] {
        self.clear_handles(selectable);
        let length = self.geometry.arrow_length;
        let radius = self.geometry.arrow_collider_radius;
        GizmoAxis::ALL.map(|axis| {
            let direction = axis.to_vec3();
            let visual = HandleVisual::Arrow {
                origin: position,
                direction,
                length,
            };
            let shape = ColliderShape::Capsule {
                start: position,
                end: position + direction * length,
                radius,
            };
            self.spawn_pair(selectable, axis, HandleRole::Translate, visual, shape)
        })
    }

    /// Replace the current handles with three rings at `position`.
    pub fn spawn_rotate_handles(
        &mut self,
        selectable: &mut SelectableSet,
        position: Vec3,
    ) -> [HandleId; 3] {
        self.clear_handles(selectable);
        let radius = self.geometry.ring_radius;
        let thickness = self.geometry.ring_collider_thickness;
        let segments = self.geometry.ring_segments;
        GizmoAxis::ALL.map(|axis| {
            let normal = axis.to_vec3();
            let visual = HandleVisual::Ring {
                center: position,
                normal,
                radius,
                segments,
            };
            let shape = ColliderShape::Ring {
                center: position,
                normal,
                radius,
                thickness,
                segments,
            };
            self.spawn_pair(selectable, axis, HandleRole::Rotate, visual, shape)
        })
    }

    /// Replace the current handles with the set for `role`.
    pub fn spawn(
        &mut self,
        selectable: &mut SelectableSet,
        role: HandleRole,
        position: Vec3,
    ) -> [HandleId; 3] {
        match role {
            HandleRole::Translate => self.spawn_move_handles(selectable, position),
            HandleRole::Rotate => self.spawn_rotate_handles(selectable, position),
        }
    }

    /// Remove every handle and its collider. Safe to call with nothing
    /// spawned. Returns the number of handles removed.
    pub fn clear_handles(&mut self, selectable: &mut SelectableSet) -> usize {
        let removed = self.handles.len();
        for (_, handle) in self.handles.drain() {
            selectable.remove(handle.collider_key);
        }
        removed
    }

    /// Whether handles and colliders are in one-to-one correspondence: every
    /// handle's collider is registered, and every registered collider
    /// belongs to a live handle.
    pub fn is_consistent_with(&self, selectable: &SelectableSet) -> bool {
        let handles_registered = self.handles.iter().all(|(id, handle)| {
            matches!(
                selectable.get(handle.collider_key),
                Some(Selectable::Collider(collider)) if collider.handle == id
            )
        });
        handles_registered && selectable.collider_count() == self.handles.len()
    }

    fn spawn_pair(
        &mut self,
        selectable: &mut SelectableSet,
        axis: GizmoAxis,
        role: HandleRole,
        visual: HandleVisual,
        shape: ColliderShape,
    ) -> HandleId {
        self.handles.insert_with_key(|handle| {
            let collider = Collider {
                handle,
                axis,
                role,
                shape,
            };
            let collider_key = selectable.insert(Selectable::Collider(collider));
            GizmoHandle {
                axis,
                role,
                visual,
                collider,
                collider_key,
            }
        })
    }
}
