/// Scene - ordered collection of SceneObjects
///
/// Uses a SlotMap for O(1) insert/remove with stable generational keys, plus
/// an order vector preserving insertion order (update/draw order is
/// significant). The selection is a non-owning key: removing the selected
/// object self-invalidates the selection through key generations.

use std::time::Instant;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_trace;
use crate::graphics_device::FrameContext;
use super::scene_object::SceneObject;

new_key_type! {
    /// Stable generational key identifying a SceneObject within its Scene
    pub struct SceneObjectKey;
}

/// A scene: ordered SceneObjects plus an optional selection
pub struct Scene {
    /// Object ownership, keyed by stable generational keys
    objects: SlotMap<SceneObjectKey, SceneObject>,
    /// Insertion order (= update/draw order)
    order: Vec<SceneObjectKey>,
    /// Selected object, if any (validated on access)
    selection: Option<SceneObjectKey>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            order: Vec::new(),
            selection: None,
        }
    }

    // ===== OBJECT MANAGEMENT =====

    /// Create an object with a default Transform component and append it
    ///
    /// The first object added to an empty collection becomes the selection.
    pub fn create_object(&mut self, name: impl Into<String>) -> SceneObjectKey {
        self.add_object(SceneObject::new(name))
    }

    /// Append a caller-constructed object (used by deserialization)
    ///
    /// Same first-object-selection rule as `create_object`.
    pub fn add_object(&mut self, object: SceneObject) -> SceneObjectKey {
        let was_empty = self.order.is_empty();
        let key = self.objects.insert(object);
        self.order.push(key);
        if was_empty {
            self.selection = Some(key);
        }
        key
    }

    /// Detach and drop one object
    ///
    /// Returns false for a stale key. A selection pointing at the removed
    /// object self-invalidates (the generational key no longer resolves).
    pub fn remove_object(&mut self, key: SceneObjectKey) -> bool {
        if self.objects.remove(key).is_none() {
            return false;
        }
        self.order.retain(|k| *k != key);
        true
    }

    // ===== FRAME HOOKS =====

    /// Update every object front to back in insertion order
    ///
    /// Total wall time is added to `ctx.timings.scene_update_ms`.
    pub fn update(&mut self, ctx: &mut FrameContext, dt: f32) -> Result<()> {
        let start = Instant::now();
        let result = self.for_each_in_order(|object| object.update(ctx, dt));
        ctx.timings.scene_update_ms += start.elapsed().as_secs_f32() * 1000.0;
        result
    }

    /// Draw every object front to back in insertion order
    ///
    /// Must run after `update` for the same frame (single-threaded contract).
    pub fn draw(&mut self, ctx: &mut FrameContext) -> Result<()> {
        self.for_each_in_order(|object| object.draw(ctx))
    }

    fn for_each_in_order(
        &mut self,
        mut f: impl FnMut(&mut SceneObject) -> Result<()>,
    ) -> Result<()> {
        for key in &self.order {
            if let Some(object) = self.objects.get_mut(*key) {
                f(object)?;
            }
        }
        Ok(())
    }

    /// Tear down every object and empty the scene
    ///
    /// Idempotent: a second call iterates an empty collection and is a no-op.
    pub fn cleanup(&mut self, ctx: &mut FrameContext) {
        if !self.order.is_empty() {
            engine_trace!("nebula3d::Scene", "Cleaning up {} objects", self.order.len());
        }
        for key in &self.order {
            if let Some(object) = self.objects.get_mut(*key) {
                object.cleanup(ctx);
            }
        }
        self.objects.clear();
        self.order.clear();
        self.selection = None;
    }

    // ===== ACCESSORS =====

    /// Ordered iterator over the objects
    pub fn objects(&self) -> impl Iterator<Item = (SceneObjectKey, &SceneObject)> {
        self.order
            .iter()
            .filter_map(|key| self.objects.get(*key).map(|object| (*key, object)))
    }

    pub fn object(&self, key: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    pub fn object_mut(&mut self, key: SceneObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    pub fn object_count(&self) -> usize {
        self.order.len()
    }

    /// The selection, validated on access (a stale key reads as no selection)
    pub fn selection(&self) -> Option<SceneObjectKey> {
        self.selection.filter(|key| self.objects.contains_key(*key))
    }

    /// Set or clear the selection (external editor logic)
    pub fn set_selection(&mut self, selection: Option<SceneObjectKey>) {
        self.selection = selection;
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
