/// SceneSerializer - YAML persistence for scenes
///
/// The persisted document has a top-level `objects` list, one entry per
/// object in collection order. Unknown keys are ignored on load; GPU
/// resources (mesh surfaces) are not persisted and get re-attached by the
/// application after a load.

use std::fs;
use std::path::Path;
use serde_yaml::Value;
use crate::error::{Error, Result};
use crate::{engine_err, engine_info, engine_warn};
use super::component::{Component, ComponentKind, MeshComponent};
use super::scene::Scene;
use super::scene_object::SceneObject;

/// Serializes scenes to YAML documents and back
pub struct SceneSerializer;

impl SceneSerializer {
    /// Build the persisted document for a scene
    pub fn serialize(scene: &Scene) -> Value {
        let objects: Vec<Value> = scene
            .objects()
            .map(|(_, object)| object.serialize())
            .collect();

        let mut root = serde_yaml::Mapping::new();
        root.insert(
            Value::String("objects".to_string()),
            Value::Sequence(objects),
        );
        Value::Mapping(root)
    }

    /// Reconstruct a scene from a persisted document
    ///
    /// Document order becomes collection order. Unknown keys are ignored;
    /// missing required fields fail with `Error::ParseError`.
    pub fn deserialize(document: &Value) -> Result<Scene> {
        let root = document.as_mapping().ok_or_else(|| {
            Error::ParseError("scene document is not a mapping".to_string())
        })?;
        let objects = root
            .get("objects")
            .ok_or_else(|| Error::ParseError("scene document is missing 'objects'".to_string()))?
            .as_sequence()
            .ok_or_else(|| Error::ParseError("'objects' is not a sequence".to_string()))?;

        let mut scene = Scene::new();
        for node in objects {
            scene.add_object(Self::deserialize_object(node)?);
        }
        Ok(scene)
    }

    fn deserialize_object(node: &Value) -> Result<SceneObject> {
        let mapping = node.as_mapping().ok_or_else(|| {
            Error::ParseError("object entry is not a mapping".to_string())
        })?;
        let name = mapping
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::ParseError("object entry is missing 'name'".to_string()))?;

        let mut object = SceneObject::new(name);
        for (key, value) in mapping {
            let Some(key) = key.as_str() else { continue };
            match key {
                "name" => {}
                key if key == ComponentKind::Transform.document_key() => {
                    // Objects are born with a Transform; patch it in place
                    if let Some(transform) = object.component_mut(ComponentKind::Transform) {
                        transform.deserialize(value)?;
                    }
                }
                key if key == ComponentKind::Mesh.document_key() => {
                    let mut mesh = MeshComponent::new("");
                    mesh.deserialize(value)?;
                    object.add_component(Box::new(mesh));
                }
                // Unknown keys are ignored (forward compatibility)
                _ => {}
            }
        }
        Ok(object)
    }

    /// Serialize a scene and write it as YAML text
    pub fn save_to_file(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let document = Self::serialize(scene);
        let text = serde_yaml::to_string(&document)
            .map_err(|e| engine_err!("nebula3d::SceneSerializer",
                "Failed to serialize scene: {}", e))?;
        fs::write(path, text)
            .map_err(|e| engine_err!("nebula3d::SceneSerializer",
                "Failed to write scene file {}: {}", path.display(), e))?;
        engine_info!("nebula3d::SceneSerializer",
            "Saved scene ({} objects) to {}", scene.object_count(), path.display());
        Ok(())
    }

    /// Load a scene from a YAML file
    ///
    /// A missing or unreadable file yields an empty scene (logged, not an
    /// error); unparseable or malformed text fails with `Error::ParseError`.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Scene> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                engine_warn!("nebula3d::SceneSerializer",
                    "Scene file {} not readable ({}), starting with an empty scene",
                    path.display(), e);
                return Ok(Scene::new());
            }
        };

        let document: Value = serde_yaml::from_str(&text)
            .map_err(|e| Error::ParseError(format!(
                "scene file {} is not valid YAML: {}", path.display(), e)))?;
        let scene = Self::deserialize(&document)?;
        engine_info!("nebula3d::SceneSerializer",
            "Loaded scene ({} objects) from {}", scene.object_count(), path.display());
        Ok(scene)
    }
}

#[cfg(test)]
#[path = "scene_serializer_tests.rs"]
mod tests;
