//! An in-memory scene that the save/load engine can read from and write into.

pub mod component;
pub mod scene;
pub mod transform;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::component::Component;
    pub use crate::scene::{Scene, SceneError};
    pub use crate::transform::Transform;
}
