//! Scene registry and picking.
//!
//! The registry owns the scene objects and the [`SelectableSet`], the keyed
//! collection of everything a picking ray may hit: objects and the colliders
//! of whatever gizmo handles are currently spawned.

use bevy::math::Ray3d;
use bevy::prelude::*;
use slotmap::SlotMap;

use crate::gizmo::Collider;
use crate::types::{ObjectId, SelectableKey};

/// An editable object in the scene: a box with a pose and a color.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Display name, used in log output.
    pub name: String,
    /// Position and orientation. Scale is left at one.
    pub transform: Transform,
    /// Color restored when the object is deselected.
    pub base_color: Color,
    /// Color currently displayed.
    pub color: Color,
    /// Half size of the pick box in local space.
    pub half_extents: Vec3,
}

impl SceneObject {
    /// A cube of edge length `size` at `translation`.
    pub fn cube(name: impl Into<String>, translation: Vec3, size: f32, color: Color) -> Self {
        Self {
            name: name.into(),
            transform: Transform::from_translation(translation),
            base_color: color,
            color,
            half_extents: Vec3::splat(size * 0.5),
        }
    }

    /// Entry distance of `ray` into the object's box.
    pub fn intersect(&self, ray: &Ray3d) -> Option<f32> {
        crate::math::ray_obb_intersection(
            ray,
            self.transform.translation,
            self.transform.rotation,
            self.half_extents,
        )
    }
}

/// Something a picking ray can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selectable {
    /// A scene object.
    Object(ObjectId),
    /// The collider of a spawned gizmo handle.
    Collider(Collider),
}

#[derive(Debug, Clone)]
struct SelectableEntry {
    seq: u64,
    target: Selectable,
}

/// Keyed set of pickable things.
///
/// Keys stay valid across unrelated inserts and removals. Every entry
/// remembers its insertion order, which breaks ties between equally distant
/// hits.
#[derive(Debug, Default)]
pub struct SelectableSet {
    entries: SlotMap<SelectableKey, SelectableEntry>,
    next_seq: u64,
}

impl SelectableSet {
    /// Add an entry.
    pub fn insert(&mut self, target: Selectable) -> SelectableKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(SelectableEntry { seq, target })
    }

    /// Remove an entry. Removing a stale key is a no-op.
    pub fn remove(&mut self, key: SelectableKey) -> Option<Selectable> {
        self.entries.remove(key).map(|entry| entry.target)
    }

    /// Look up an entry.
    pub fn get(&self, key: SelectableKey) -> Option<&Selectable> {
        self.entries.get(key).map(|entry| &entry.target)
    }

    /// Whether `key` is still present.
    pub fn contains(&self, key: SelectableKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (SelectableKey, &Selectable)> {
        self.entries.iter().map(|(key, entry)| (key, &entry.target))
    }

    /// Gizmo colliders currently in the set.
    pub fn colliders(&self) -> impl Iterator<Item = (SelectableKey, &Collider)> {
        self.iter().filter_map(|(key, target)| match target {
            Selectable::Collider(collider) => Some((key, collider)),
            Selectable::Object(_) => None,
        })
    }

    /// Number of gizmo colliders in the set.
    pub fn collider_count(&self) -> usize {
        self.colliders().count()
    }

    /// Nearest entry hit by `ray` among those accepted by `filter`.
    ///
    /// `intersect` computes the hit distance of an entry. Equal distances go
    /// to the earliest inserted entry.
    fn nearest<F, I>(&self, filter: F, mut intersect: I) -> Option<&Selectable>
    where
        F: Fn(&Selectable) -> bool,
        I: FnMut(&Selectable) -> Option<f32>,
    {
        let mut best: Option<(f32, u64, &Selectable)> = None;
        for entry in self.entries.values() {
            if !filter(&entry.target) {
                continue;
            }
            let Some(t) = intersect(&entry.target) else {
                continue;
            };
            let closer = match best {
                None => true,
                Some((best_t, best_seq, _)) => t < best_t || (t == best_t && entry.seq < best_seq),
            };
            if closer {
                best = Some((t, entry.seq, &entry.target));
            }
        }
        best.map(|(_, _, target)| target)
    }
}

/// Owner of scene objects and the selectable set.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    objects: SlotMap<ObjectId, SceneObject>,
    selectable: SelectableSet,
}

impl SceneRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and make it selectable.
    pub fn insert_object(&mut self, object: SceneObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.selectable.insert(Selectable::Object(id));
        id
    }

    /// Look up an object.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Look up an object for mutation.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// All objects.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    /// Number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The selectable set.
    pub fn selectable(&self) -> &SelectableSet {
        &self.selectable
    }

    /// The selectable set, for spawning and clearing gizmo colliders.
    pub fn selectable_mut(&mut self) -> &mut SelectableSet {
        &mut self.selectable
    }

    /// Nearest object under `ray`. Gizmo colliders never win an object pick.
    pub fn pick_object(&self, ray: &Ray3d) -> Option<ObjectId> {
        let hit = self.selectable.nearest(
            |target| matches!(target, Selectable::Object(_)),
            |target| match target {
                Selectable::Object(id) => self.objects.get(*id)?.intersect(ray),
                Selectable::Collider(_) => None,
            },
        )?;
        match hit {
            Selectable::Object(id) => Some(*id),
            Selectable::Collider(_) => None,
        }
    }

    /// Nearest gizmo collider under `ray`. Objects never occlude colliders.
    pub fn pick_collider(&self, ray: &Ray3d) -> Option<&Collider> {
        let hit = self.selectable.nearest(
            |target| matches!(target, Selectable::Collider(_)),
            |target| match target {
                Selectable::Collider(collider) => collider.shape.intersect(ray),
                Selectable::Object(_) => None,
            },
        )?;
        match hit {
            Selectable::Collider(collider) => Some(collider),
            Selectable::Object(_) => None,
        }
    }

    /// Set an object's display color to `color`.
    pub fn highlight(&mut self, id: ObjectId, color: Color) {
        if let Some(object) = self.objects.get_mut(id) {
            object.color = color;
        }
    }

    /// Restore an object's base color.
    pub fn reset_color(&mut self, id: ObjectId) {
        if let Some(object) = self.objects.get_mut(id) {
            object.color = object.base_color;
        }
    }
}

/// Procedurally generated start-up scene.
///
/// One object yields a single red cube at the origin. More objects are laid
/// out on a ring around the origin with evenly spread hues.
pub fn procedural_layout(count: usize) -> Vec<SceneObject> {
    if count == 1 {
        return vec![SceneObject::cube("cube", Vec3::ZERO, 1.0, Color::srgb(1.0, 0.0, 0.0))];
    }

    let radius = (count as f32 * 0.45).max(2.5);
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let angle = t * std::f32::consts::TAU;
            let translation = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            let color = Color::hsl(t * 360.0, 0.7, 0.5);
            SceneObject::cube(format!("cube {i}"), translation, 1.0, color)
        })
        .collect()
}
