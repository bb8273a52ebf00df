//! Saves and restores the `#[game_state]` fields of the components in a scene, plus each
//! entity's activation, position and euler angles.
//!
//! Saving walks the scene and produces a [`Document`](document::Document) keyed by entity name.
//! Loading applies a document back onto the entities already in the scene. References between
//! entities and components are written as entity names and resolved again through a
//! [`ReferenceContext`](context::ReferenceContext) built for each load.

// Lets `#[derive(GameState)]` refer to `::gs_save_load` from inside this crate.
extern crate self as gs_save_load;

pub mod context;
pub mod decode;
pub mod diagnostic;
pub mod document;
pub mod encode;
pub mod entity;
pub mod field;
pub mod format;
pub mod graph;
pub mod manager;
pub mod settings;
pub mod storage;
pub mod value;


pub use gs_save_load_derive::GameState;

pub mod prelude {
    pub use crate::context::ReferenceContext;
    pub use crate::decode::{decode_document, decode_into};
    pub use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
    pub use crate::document::{ComponentState, Document, EntityState};
    pub use crate::encode::encode_document;
    pub use crate::entity::Entity;
    pub use crate::field::{
        FieldType, FieldValue, GameState, NamedState, Persistable, StateRef,
    };
    pub use crate::format::{FormatKind, Json, Ron, SaveFormat};
    pub use crate::graph::{PersistableEntity, SceneGraph};
    pub use crate::manager::{GameStateManager, SaveLoadError};
    pub use crate::settings::{DiagnosticPolicy, SaveSettings};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage, StorageError};
    pub use crate::value::Value;
    pub use gs_save_load_derive::GameState;
}
