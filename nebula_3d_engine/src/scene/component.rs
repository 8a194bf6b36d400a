/// Component model - open set of capabilities attached to SceneObjects
///
/// Components are dispatched through the Component trait and identified by a
/// ComponentKind capability tag. A SceneObject holds at most one component of
/// each kind. Concrete kinds today: Transform (always present) and Mesh.

use std::any::Any;
use std::sync::Arc;
use glam::{Quat, Vec3};
use serde_yaml::Value;
use crate::error::{Error, Result};
use crate::engine_err;
use crate::graphics_device::{
    Buffer, DescriptorBinding, DescriptorResource, DescriptorType,
    DescriptorWrite, FrameContext, IndexType, Pipeline, ShaderStageFlags,
};
use super::transform::Transform;

// ============================================================================
// Component kind and trait
// ============================================================================

/// Capability tag identifying a component kind
///
/// At most one component of each kind is attached to a SceneObject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Position/rotation/scale (every object has exactly one)
    Transform,
    /// Renderable mesh
    Mesh,
}

impl ComponentKind {
    /// Key used for this kind's node in persisted scene documents
    pub fn document_key(&self) -> &'static str {
        match self {
            ComponentKind::Transform => "transform",
            ComponentKind::Mesh => "mesh",
        }
    }
}

/// A capability attached to a SceneObject
///
/// update/draw receive the per-frame context; serialize/deserialize opt into
/// scene persistence (a component that returns None from serialize is skipped
/// when saving).
pub trait Component: Send + Sync {
    /// Capability tag of this component
    fn kind(&self) -> ComponentKind;

    /// Per-frame update
    fn update(&mut self, _ctx: &mut FrameContext, _dt: f32) -> Result<()> {
        Ok(())
    }

    /// Record draw commands for this component
    fn draw(&mut self, _ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    /// Release per-component resources (GPU handles etc.)
    fn cleanup(&mut self, _ctx: &mut FrameContext) {}

    /// Produce the persisted node for this component, or None to skip it
    fn serialize(&self) -> Option<Value> {
        None
    }

    /// Patch this component from its persisted node
    fn deserialize(&mut self, _node: &Value) -> Result<()> {
        Ok(())
    }

    /// Typed access for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Typed mutable access for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ============================================================================
// YAML helpers
// ============================================================================

fn floats_to_yaml(values: &[f32]) -> Value {
    Value::Sequence(
        values
            .iter()
            .map(|v| Value::Number(serde_yaml::Number::from(*v as f64)))
            .collect(),
    )
}

fn yaml_to_floats(node: &Value, field: &str, expected: usize) -> Result<Vec<f32>> {
    let seq = node.as_sequence().ok_or_else(|| {
        Error::ParseError(format!("transform field '{}' is not a sequence", field))
    })?;
    if seq.len() != expected {
        return Err(Error::ParseError(format!(
            "transform field '{}' has {} elements, expected {}",
            field, seq.len(), expected
        )));
    }
    seq.iter()
        .map(|v| {
            v.as_f64().map(|f| f as f32).ok_or_else(|| {
                Error::ParseError(format!(
                    "transform field '{}' contains a non-numeric element", field
                ))
            })
        })
        .collect()
}

// ============================================================================
// TransformComponent
// ============================================================================

/// Holds the object's Transform and provides its model matrix
///
/// Every SceneObject is born with one; it is the only component that is
/// always present.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformComponent {
    /// The object's local transform
    pub transform: Transform,
}

impl TransformComponent {
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }
}

impl Component for TransformComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Transform
    }

    fn serialize(&self) -> Option<Value> {
        let mut mapping = serde_yaml::Mapping::new();
        mapping.insert(
            Value::String("position".to_string()),
            floats_to_yaml(&self.transform.position.to_array()),
        );
        mapping.insert(
            Value::String("rotation".to_string()),
            floats_to_yaml(&self.transform.rotation.to_array()),
        );
        mapping.insert(
            Value::String("scale".to_string()),
            floats_to_yaml(&self.transform.scale.to_array()),
        );
        Some(Value::Mapping(mapping))
    }

    fn deserialize(&mut self, node: &Value) -> Result<()> {
        let mapping = node.as_mapping().ok_or_else(|| {
            Error::ParseError("transform node is not a mapping".to_string())
        })?;

        let field = |name: &str| -> Result<&Value> {
            mapping.get(name).ok_or_else(|| {
                Error::ParseError(format!("transform node is missing '{}'", name))
            })
        };

        let position = yaml_to_floats(field("position")?, "position", 3)?;
        let rotation = yaml_to_floats(field("rotation")?, "rotation", 4)?;
        let scale = yaml_to_floats(field("scale")?, "scale", 3)?;

        self.transform.position = Vec3::from_slice(&position);
        self.transform.rotation = Quat::from_xyzw(rotation[0], rotation[1], rotation[2], rotation[3]);
        self.transform.scale = Vec3::from_slice(&scale);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// MeshComponent
// ============================================================================

/// GPU geometry attached to a MeshComponent by the application
///
/// Not persisted: after a scene load the application looks the mesh up by
/// name and re-attaches its surface.
pub struct MeshSurface {
    /// Vertex buffer
    pub vertex_buffer: Arc<dyn Buffer>,
    /// Index buffer (None for non-indexed geometry)
    pub index_buffer: Option<Arc<dyn Buffer>>,
    /// Index element type (ignored when index_buffer is None)
    pub index_type: IndexType,
    /// Index count when indexed, vertex count otherwise
    pub element_count: u32,
    /// Pipeline used to draw this surface
    pub pipeline: Arc<dyn Pipeline>,
}

/// Renderable mesh reference
///
/// Push constant layout (vertex stage): MVP matrix at offset 0, model matrix
/// at offset 64. The frame-global uniform buffer is bound at set 0, binding 0.
pub struct MeshComponent {
    /// Mesh name (the persisted reference)
    pub mesh_name: String,
    /// GPU geometry, attached by the application
    pub surface: Option<MeshSurface>,
}

impl MeshComponent {
    pub fn new(mesh_name: impl Into<String>) -> Self {
        Self {
            mesh_name: mesh_name.into(),
            surface: None,
        }
    }

    pub fn with_surface(mesh_name: impl Into<String>, surface: MeshSurface) -> Self {
        Self {
            mesh_name: mesh_name.into(),
            surface: Some(surface),
        }
    }
}

impl Component for MeshComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Mesh
    }

    fn draw(&mut self, ctx: &mut FrameContext) -> Result<()> {
        // A mesh with no surface draws nothing
        let Some(surface) = &self.surface else {
            return Ok(());
        };

        ctx.command_list.bind_pipeline(&surface.pipeline)?;

        // Set 0, binding 0: frame-global uniform buffer
        let layout = ctx.layout_cache.create_layout(&[DescriptorBinding {
            binding: 0,
            binding_type: DescriptorType::UniformBuffer,
            count: 1,
            stage_flags: ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT,
        }])?;
        let set = ctx.descriptor_allocator.allocate(&layout)?;
        {
            let device = ctx.device.lock().map_err(|_| {
                engine_err!("nebula3d::MeshComponent", "Graphics device lock poisoned")
            })?;
            device.update_descriptor_set(&set, &[DescriptorWrite {
                binding: 0,
                resource: DescriptorResource::UniformBuffer(
                    Arc::clone(ctx.frame_uniform_buffer),
                ),
            }])?;
        }
        ctx.command_list.bind_descriptor_set(&surface.pipeline, 0, &set)?;

        ctx.command_list.bind_vertex_buffer(&surface.vertex_buffer, 0)?;

        let model = ctx.model_matrix;
        let mvp = ctx.view_projection * model;
        ctx.command_list.push_constants(
            ShaderStageFlags::VERTEX, 0, bytemuck::bytes_of(&mvp))?;
        ctx.command_list.push_constants(
            ShaderStageFlags::VERTEX, 64, bytemuck::bytes_of(&model))?;

        match &surface.index_buffer {
            Some(index_buffer) => {
                ctx.command_list.bind_index_buffer(index_buffer, 0, surface.index_type)?;
                ctx.command_list.draw_indexed(surface.element_count, 0, 0)?;
            }
            None => {
                ctx.command_list.draw(surface.element_count, 0)?;
            }
        }
        ctx.timings.draw_calls += 1;
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut FrameContext) {
        // Buffers are RAII; dropping the surface releases the geometry
        self.surface = None;
    }

    fn serialize(&self) -> Option<Value> {
        Some(Value::String(self.mesh_name.clone()))
    }

    fn deserialize(&mut self, node: &Value) -> Result<()> {
        let name = node.as_str().ok_or_else(|| {
            Error::ParseError("mesh node is not a string".to_string())
        })?;
        self.mesh_name = name.to_string();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
