/// SceneObject - a named entity composed of components
///
/// Owns its components in attachment order (update/draw delegate in that
/// order). Objects are born with a default TransformComponent; at most one
/// component of each kind is attached.

use glam::Mat4;
use serde_yaml::Value;
use crate::engine_debug;
use crate::error::Result;
use crate::graphics_device::FrameContext;
use super::component::{Component, ComponentKind, TransformComponent};
use super::transform::Transform;

/// A named scene entity with an open set of components
pub struct SceneObject {
    /// Object name (unique within a scene by convention, not enforced)
    name: String,
    /// Attached components, in attachment order
    components: Vec<Box<dyn Component>>,
}

impl SceneObject {
    /// Create an object with a default Transform component attached
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: vec![Box::new(TransformComponent::default())],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ===== COMPONENT MANAGEMENT =====

    /// Attach a component
    ///
    /// At most one component of each kind: a duplicate-kind add replaces the
    /// existing instance in place, retaining its attachment position.
    pub fn add_component(&mut self, component: Box<dyn Component>) {
        let kind = component.kind();
        match self.components.iter_mut().find(|c| c.kind() == kind) {
            Some(slot) => {
                engine_debug!("nebula3d::SceneObject",
                    "Replacing {:?} component on '{}'", kind, self.name);
                *slot = component;
            }
            None => self.components.push(component),
        }
    }

    /// The component of the given kind, if attached
    pub fn component(&self, kind: ComponentKind) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.kind() == kind)
            .map(|c| c.as_ref())
    }

    /// Mutable access to the component of the given kind, if attached
    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut (dyn Component + 'static)> {
        self.components
            .iter_mut()
            .find(|c| c.kind() == kind)
            .map(|c| c.as_mut())
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Typed access to the object's Transform
    ///
    /// Some for every object built through the engine; None only if a custom
    /// component claimed the Transform kind without holding a Transform.
    pub fn transform(&self) -> Option<&Transform> {
        self.component(ComponentKind::Transform)
            .and_then(|c| c.as_any().downcast_ref::<TransformComponent>())
            .map(|c| &c.transform)
    }

    /// Typed mutable access to the object's Transform
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.component_mut(ComponentKind::Transform)
            .and_then(|c| c.as_any_mut().downcast_mut::<TransformComponent>())
            .map(|c| &mut c.transform)
    }

    /// World matrix of this object (identity when no Transform is readable)
    pub fn model_matrix(&self) -> Mat4 {
        self.transform().map(Transform::matrix).unwrap_or(Mat4::IDENTITY)
    }

    // ===== FRAME HOOKS =====

    /// Update every component in attachment order, propagating the first error
    pub fn update(&mut self, ctx: &mut FrameContext, dt: f32) -> Result<()> {
        for component in &mut self.components {
            component.update(ctx, dt)?;
        }
        Ok(())
    }

    /// Draw every component in attachment order, propagating the first error
    ///
    /// Publishes this object's world matrix into the context before
    /// delegating, so components see the right model matrix.
    pub fn draw(&mut self, ctx: &mut FrameContext) -> Result<()> {
        ctx.model_matrix = self.model_matrix();
        for component in &mut self.components {
            component.draw(ctx)?;
        }
        Ok(())
    }

    /// Invoke every component's teardown hook
    pub fn cleanup(&mut self, ctx: &mut FrameContext) {
        for component in &mut self.components {
            component.cleanup(ctx);
        }
    }

    // ===== PERSISTENCE =====

    /// Persisted node for this object: name plus one node per component that
    /// opts into serialization, keyed by the component kind's document key
    pub fn serialize(&self) -> Value {
        let mut mapping = serde_yaml::Mapping::new();
        mapping.insert(
            Value::String("name".to_string()),
            Value::String(self.name.clone()),
        );
        for component in &self.components {
            if let Some(node) = component.serialize() {
                mapping.insert(
                    Value::String(component.kind().document_key().to_string()),
                    node,
                );
            }
        }
        Value::Mapping(mapping)
    }
}

#[cfg(test)]
#[path = "scene_object_tests.rs"]
mod tests;
