use crate::{
    context::ReferenceContext,
    diagnostic::{Diagnostic, Diagnostics},
    document::{ComponentState, Document, EntityState},
    entity::Entity,
    field::{ComponentHandle, FieldTable, FieldType, FieldValue},
    graph::SceneGraph,
    value::Value,
};

/// Builds a reference context over `graph` and applies `document` to it.
pub fn decode_into<G: SceneGraph + ?Sized>(
    graph: &mut G,
    document: &Document,
    diagnostics: &mut Diagnostics,
) {
    let context = ReferenceContext::build(graph, diagnostics);
    decode_document(graph, document, &context, diagnostics);
}

/// Applies every entity state of `document`, in document order, to the entity of the same name.
/// Names missing from `context` are reported and skipped.
pub fn decode_document<G: SceneGraph + ?Sized>(
    graph: &mut G,
    document: &Document,
    context: &ReferenceContext,
    diagnostics: &mut Diagnostics,
) {
    for (name, state) in document.iter() {
        match context.lookup(name) {
            Some(entity) => {
                log::debug!("loading entity '{name}'");
                decode_entity(graph, state, entity, context, diagnostics);
            }
            None => diagnostics.push(Diagnostic::UnknownEntity { name: name.clone() }),
        }
    }
}

pub fn decode_entity<G: SceneGraph + ?Sized>(
    graph: &mut G,
    state: &EntityState,
    entity: Entity,
    context: &ReferenceContext,
    diagnostics: &mut Diagnostics,
) {
    if let Some(active) = state.active_self {
        graph.set_active_self(entity, active);
    }
    if let Some(position) = state.position {
        graph.set_position(entity, position);
    }
    if let Some(euler_angles) = state.euler_angles {
        graph.set_euler_angles(entity, euler_angles);
    }

    for (type_name, component_state) in &state.behaviours {
        decode_component(
            graph,
            component_state,
            entity,
            type_name,
            context,
            diagnostics,
        );
    }
}

/// Applies one component state to the component called `type_name` on `entity`. Every value is
/// converted first, against a shared view of the scene, and then assigned in one go. A value
/// the field can't hold (for example an absent value for a non-optional field) leaves the field
/// unchanged.
pub fn decode_component<G: SceneGraph + ?Sized>(
    graph: &mut G,
    state: &ComponentState,
    entity: Entity,
    type_name: &str,
    context: &ReferenceContext,
    diagnostics: &mut Diagnostics,
) {
    let entity_name = graph.entity_name(entity).unwrap_or_default().to_owned();

    let updates = {
        let scene: &G = graph;
        let Some(component) = scene.component(entity, type_name) else {
            diagnostics.push(Diagnostic::MissingComponent {
                entity: entity_name,
                component: type_name.to_owned(),
            });
            return;
        };

        let fields = FieldTable::new(component);
        let mut updates = Vec::with_capacity(state.len());
        for (field, value) in state {
            let Some(ty) = fields.get(field) else {
                diagnostics.push(Diagnostic::UnknownField {
                    entity: entity_name.clone(),
                    component: type_name.to_owned(),
                    field: field.clone(),
                });
                continue;
            };

            let path = format!("{entity_name}.{type_name}.{field}");
            let reported = diagnostics.len();
            let decoded = decode_value(value, ty, context, scene, &path, diagnostics);
            let reported = diagnostics.len() > reported;
            updates.push((field.as_str(), ty, path, decoded, reported));
        }
        updates
    };

    let Some(component) = graph.component_mut(entity, type_name) else {
        return;
    };

    // A value already reported during conversion isn't reported again if the field rejects it.
    for (field, ty, path, decoded, reported) in updates {
        let found = decoded.tag_name();
        if !component.set_field(field, decoded) && !reported {
            diagnostics.push(Diagnostic::TypeMismatch {
                path,
                expected: ty.to_string(),
                found: found.to_owned(),
            });
        }
    }
}

/// Converts `value` into the shape `target` declares. Never fails: anything that can't be
/// converted is reported and comes back as [`FieldValue::Null`].
///
/// Scalars are forced across numeric and bool types (`as` casts, `0`/`1` for bools, strings are
/// parsed). References are resolved through `context`.
pub fn decode_value<G: SceneGraph + ?Sized>(
    value: &Value,
    target: &FieldType,
    context: &ReferenceContext,
    graph: &G,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> FieldValue {
    if value.is_null() {
        return FieldValue::Null;
    }

    let mismatch = |diagnostics: &mut Diagnostics, found: &str| {
        diagnostics.push(Diagnostic::TypeMismatch {
            path: path.to_owned(),
            expected: target.to_string(),
            found: found.to_owned(),
        });
        FieldValue::Null
    };

    match target {
        FieldType::Bool | FieldType::Int | FieldType::Float | FieldType::Double => {
            if let Value::Array(_) = value {
                return mismatch(diagnostics, "an array into a scalar field");
            }
            match cast_scalar(value, target) {
                Some(converted) => converted,
                None => mismatch(diagnostics, value.tag_name()),
            }
        }
        FieldType::Vector3 => match value {
            Value::Vector3(v) => FieldValue::Vector3(*v),
            _ => mismatch(diagnostics, value.tag_name()),
        },
        FieldType::String => match value {
            Value::String(s) | Value::EntityRef(s) => FieldValue::String(s.clone()),
            Value::Bool(b) => FieldValue::String(b.to_string()),
            Value::Int(i) => FieldValue::String(i.to_string()),
            Value::Float(f) => FieldValue::String(f.to_string()),
            Value::Double(d) => FieldValue::String(d.to_string()),
            _ => mismatch(diagnostics, value.tag_name()),
        },
        FieldType::Sequence(elem) => match value {
            Value::Array(items) => FieldValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let path = format!("{path}[{i}]");
                        decode_value(item, elem, context, graph, &path, diagnostics)
                    })
                    .collect(),
            ),
            _ => mismatch(diagnostics, value.tag_name()),
        },
        FieldType::Entity => {
            let Some(name) = value.as_name() else {
                return mismatch(diagnostics, value.tag_name());
            };
            match context.lookup(name) {
                Some(entity) => FieldValue::Entity(entity),
                None => {
                    diagnostics.push(Diagnostic::UnknownEntity {
                        name: name.to_owned(),
                    });
                    FieldValue::Null
                }
            }
        }
        FieldType::Component(type_name) => {
            let type_name: &'static str = *type_name;
            let Some(name) = value.as_name() else {
                return mismatch(diagnostics, value.tag_name());
            };
            let entity = context
                .lookup(name)
                .filter(|entity| graph.component(*entity, type_name).is_some());
            match entity {
                Some(entity) => FieldValue::Component(ComponentHandle { entity, type_name }),
                None => {
                    diagnostics.push(Diagnostic::UnknownEntityOrComponent {
                        entity: name.to_owned(),
                        component: type_name.to_owned(),
                    });
                    FieldValue::Null
                }
            }
        }
    }
}

fn cast_scalar(value: &Value, target: &FieldType) -> Option<FieldValue> {
    let converted = match target {
        FieldType::Bool => FieldValue::Bool(match value {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Double(d) => *d != 0.0,
            Value::String(s) | Value::EntityRef(s) => s.trim().parse::<bool>().ok()?,
            _ => return None,
        }),
        FieldType::Int => FieldValue::Int(match value {
            Value::Bool(b) => *b as i64,
            Value::Int(i) => *i,
            Value::Float(f) => *f as i64,
            Value::Double(d) => *d as i64,
            Value::String(s) | Value::EntityRef(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(i) => i,
                    Err(_) => s.parse::<f64>().ok()? as i64,
                }
            }
            _ => return None,
        }),
        FieldType::Float => FieldValue::Float(as_f64(value)? as f32),
        FieldType::Double => FieldValue::Double(as_f64(value)?),
        _ => return None,
    };
    Some(converted)
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f as f64),
        Value::Double(d) => Some(*d),
        Value::String(s) | Value::EntityRef(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
