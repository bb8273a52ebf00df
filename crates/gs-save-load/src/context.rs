use rustc_hash::FxHashMap;

use crate::{
    diagnostic::{Diagnostic, Diagnostics},
    entity::Entity,
    graph::SceneGraph,
};

/// Name to entity index over the live scene. Built fresh for every load and thrown away after,
/// so it never goes stale.
#[derive(Default)]
pub struct ReferenceContext {
    by_name: FxHashMap<String, Entity>,
}

impl ReferenceContext {
    /// Indexes every entity of `graph` by its current name. When names collide the last entity
    /// wins and the collision is reported.
    pub fn build<G: SceneGraph + ?Sized>(graph: &G, diagnostics: &mut Diagnostics) -> Self {
        let entities = graph.all_entities();
        let mut s = Self::default();
        s.by_name.reserve(entities.len());
        for entity in entities {
            let Some(name) = graph.entity_name(entity) else {
                continue;
            };
            if s.by_name.insert(name.to_owned(), entity).is_some() {
                diagnostics.push(Diagnostic::DuplicateEntityName {
                    name: name.to_owned(),
                });
            }
        }
        s
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    #[inline(always)]
    pub fn lookup(&self, name: &str) -> Option<Entity> {
        self.by_name.get(name).copied()
    }
}
