//! Scene module
//!
//! Provides the scene graph (Scene, SceneObject), the component model
//! (Transform, Mesh) and YAML scene persistence.

mod transform;
mod component;
mod scene_object;
mod scene;
mod scene_serializer;

pub use transform::Transform;
pub use component::{
    Component, ComponentKind, MeshComponent, MeshSurface, TransformComponent,
};
pub use scene_object::SceneObject;
pub use scene::{Scene, SceneObjectKey};
pub use scene_serializer::SceneSerializer;
