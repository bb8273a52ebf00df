use gs_math::Vec3;
use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    diagnostic::{Diagnostic, Diagnostics},
    format::FormatError,
    value::{vec3_from_tree, SerVec3, Value},
};

pub const ACTIVE_SELF_KEY: &str = "activeSelf";
pub const POSITION_KEY: &str = "position";
pub const EULER_ANGLES_KEY: &str = "eulerAngles";
pub const BEHAVIOURS_KEY: &str = "behaviours";

/// Field name to value, for one component.
pub type ComponentState = IndexMap<String, Value>;

/// The saved state of one entity. Each of `active_self`, `position` and `euler_angles` is
/// optional; a piece missing from the document leaves the live value alone on load.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntityState {
    pub active_self: Option<bool>,
    pub position: Option<Vec3>,
    pub euler_angles: Option<Vec3>,
    /// Component type name to component state.
    pub behaviours: IndexMap<String, ComponentState>,
}

/// Entity name to entity state, in the order the entities were saved (or appear in the text).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    pub entities: IndexMap<String, EntityState>,
}

impl Document {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&EntityState> {
        self.entities.get(name)
    }

    /// Inserts an entity state. Returns the state previously stored under the same name.
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, state: EntityState) -> Option<EntityState> {
        self.entities.insert(name.into(), state)
    }

    #[inline]
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, EntityState> {
        self.entities.iter()
    }

    /// Builds a document from a parsed tree. Only a top level that isn't an object is an error;
    /// malformed entries further down are reported and skipped.
    pub fn from_tree(
        tree: serde_json::Value,
        diagnostics: &mut Diagnostics,
    ) -> Result<Document, FormatError> {
        let serde_json::Value::Object(root) = tree else {
            return Err(FormatError::Malformed(
                "the top level of a save must be an object keyed by entity name".into(),
            ));
        };

        let mut document = Document::new();
        for (name, state) in root {
            match state {
                serde_json::Value::Object(obj) => {
                    let state = entity_state_from_tree(&name, obj, diagnostics);
                    document.insert(name, state);
                }
                _ => diagnostics.push(Diagnostic::MalformedEntry {
                    path: name,
                    reason: "entity state must be an object".into(),
                }),
            }
        }

        Ok(document)
    }
}

fn entity_state_from_tree(
    name: &str,
    mut obj: serde_json::Map<String, serde_json::Value>,
    diagnostics: &mut Diagnostics,
) -> EntityState {
    let mut state = EntityState::default();

    if let Some(active) = obj.remove(ACTIVE_SELF_KEY) {
        match active.as_bool() {
            Some(active) => state.active_self = Some(active),
            None => diagnostics.push(Diagnostic::MalformedEntry {
                path: format!("{name}.{ACTIVE_SELF_KEY}"),
                reason: "expected a bool".into(),
            }),
        }
    }

    state.position = obj
        .remove(POSITION_KEY)
        .and_then(|v| coordinates_from_tree(&v, &format!("{name}.{POSITION_KEY}"), diagnostics));
    state.euler_angles = obj.remove(EULER_ANGLES_KEY).and_then(|v| {
        coordinates_from_tree(&v, &format!("{name}.{EULER_ANGLES_KEY}"), diagnostics)
    });

    match obj.remove(BEHAVIOURS_KEY) {
        Some(serde_json::Value::Object(behaviours)) => {
            for (component, fields) in behaviours {
                let path = format!("{name}.{component}");
                let serde_json::Value::Object(fields) = fields else {
                    diagnostics.push(Diagnostic::MalformedEntry {
                        path,
                        reason: "component state must be an object".into(),
                    });
                    continue;
                };

                let mut component_state = ComponentState::with_capacity(fields.len());
                for (field, value) in fields {
                    let field_path = format!("{path}.{field}");
                    if let Some(value) = Value::from_tree(value, &field_path, diagnostics) {
                        component_state.insert(field, value);
                    }
                }
                state.behaviours.insert(component, component_state);
            }
        }
        Some(_) => diagnostics.push(Diagnostic::MalformedEntry {
            path: format!("{name}.{BEHAVIOURS_KEY}"),
            reason: "expected an object keyed by component type".into(),
        }),
        None => {}
    }

    state
}

fn coordinates_from_tree(
    tree: &serde_json::Value,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Vec3> {
    let v = vec3_from_tree(tree);
    if v.is_none() {
        diagnostics.push(Diagnostic::MalformedEntry {
            path: path.to_owned(),
            reason: "expected an object with numeric 'x', 'y' and 'z'".into(),
        });
    }
    v
}

impl Serialize for EntityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(active) = &self.active_self {
            map.serialize_entry(ACTIVE_SELF_KEY, active)?;
        }
        if let Some(position) = &self.position {
            map.serialize_entry(POSITION_KEY, &SerVec3(position))?;
        }
        if let Some(euler_angles) = &self.euler_angles {
            map.serialize_entry(EULER_ANGLES_KEY, &SerVec3(euler_angles))?;
        }
        map.serialize_entry(BEHAVIOURS_KEY, &self.behaviours)?;
        map.end()
    }
}

impl Serialize for Document {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entities.serialize(serializer)
    }
}
