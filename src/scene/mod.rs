//! Scene layer.
//!
//! Manages the entity hierarchy and render membership:
//! - Node: scene node (hierarchy, transform, enabled state)
//! - Transform: TRS component with matrix caching
//! - SceneGraph: the node arena with attach/detach/remove semantics
//! - RenderScene: draw set and shadow-caster set

pub mod graph;
pub mod node;
pub mod render_scene;
pub mod transform;

// Re-export common types
pub use graph::SceneGraph;
pub use node::{AnimationLink, Node};
pub use render_scene::{ModelInstanceId, RenderScene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
