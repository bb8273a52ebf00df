use crate::{
    diagnostic::{Diagnostic, Diagnostics},
    document::{ComponentState, Document, EntityState},
    field::{persistable_fields, FieldValue, GameState},
    graph::SceneGraph,
    value::Value,
};

/// Captures every persistable entity of `graph`. Entities are keyed by name; if two share a name
/// the one enumerated last is kept and the collision is reported.
pub fn encode_document<G: SceneGraph + ?Sized>(graph: &G, diagnostics: &mut Diagnostics) -> Document {
    let mut document = Document::new();

    for persistable in graph.persistable_entities() {
        let entity = persistable.entity;
        let Some(name) = graph.entity_name(entity) else {
            continue;
        };

        let mut state = EntityState {
            active_self: Some(graph.active_self(entity)),
            position: Some(graph.position(entity)),
            euler_angles: Some(graph.euler_angles(entity)),
            ..Default::default()
        };

        for type_name in persistable.components {
            if let Some(component) = graph.component(entity, type_name) {
                state
                    .behaviours
                    .insert(type_name.to_owned(), encode_component(graph, component));
            }
        }

        if document.insert(name, state).is_some() {
            diagnostics.push(Diagnostic::DuplicateEntityName {
                name: name.to_owned(),
            });
        }
    }

    document
}

/// Encodes the `#[game_state]` fields of one component, in declaration order.
pub fn encode_component<G: SceneGraph + ?Sized>(
    graph: &G,
    component: &dyn GameState,
) -> ComponentState {
    let fields = persistable_fields(component);
    let mut state = ComponentState::with_capacity(fields.len());
    for field in fields {
        if let Some(value) = component.get_field(field.name) {
            state.insert(field.name.to_owned(), encode_value(graph, value));
        }
    }
    state
}

/// Converts a live value. Entities and components are written as the name of their entity; a
/// handle to an entity that no longer exists is written as `Null`.
pub fn encode_value<G: SceneGraph + ?Sized>(graph: &G, value: FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(b),
        FieldValue::Int(i) => Value::Int(i),
        FieldValue::Float(f) => Value::Float(f),
        FieldValue::Double(d) => Value::Double(d),
        FieldValue::Vector3(v) => Value::Vector3(v),
        FieldValue::String(s) => Value::String(s),
        FieldValue::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| encode_value(graph, item))
                .collect(),
        ),
        FieldValue::Entity(entity) => match graph.entity_name(entity) {
            Some(name) => Value::EntityRef(name.to_owned()),
            None => Value::Null,
        },
        FieldValue::Component(handle) => match graph.entity_name(handle.entity) {
            Some(name) => Value::EntityRef(name.to_owned()),
            None => Value::Null,
        },
    }
}
