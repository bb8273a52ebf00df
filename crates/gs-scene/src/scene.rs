use std::num::NonZeroU32;

use gs_math::Vec3;
use gs_save_load::{
    entity::Entity,
    field::{GameState, NamedState},
    graph::{PersistableEntity, SceneGraph},
};
use thiserror::Error;

use crate::{
    component::{Attached, Component},
    transform::Transform,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("entity {0} does not exist")]
    NoSuchEntity(Entity),
}

/// An entity slot. The version is bumped every time the slot is freed so stale handles stop
/// resolving.
struct Slot {
    ver: NonZeroU32,
    node: Option<Node>,
}

struct Node {
    name: String,
    active: bool,
    transform: Transform,
    components: Vec<Attached>,
}

/// A flat collection of named entities, each with a transform, an activation flag and any number
/// of attached components.
#[derive(Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates an active entity at the origin. Names need not be unique.
    pub fn spawn(&mut self, name: impl Into<String>) -> Entity {
        let node = Node {
            name: name.into(),
            active: true,
            transform: Transform::default(),
            components: Vec::new(),
        };

        match self.free.pop() {
            Some(id) => {
                let slot = &mut self.slots[id as usize];
                slot.node = Some(node);
                Entity::new(id, slot.ver)
            }
            None => {
                let ver = NonZeroU32::MIN;
                self.slots.push(Slot {
                    ver,
                    node: Some(node),
                });
                Entity::new(self.slots.len() as u32 - 1, ver)
            }
        }
    }

    /// Destroys an entity. Its handle, and every copy of it, stops resolving. Returns `false` if
    /// the entity was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = &mut self.slots[entity.id() as usize];
        if let Some(node) = slot.node.take() {
            log::debug!("despawned '{}' ({entity})", node.name);
        }
        slot.ver = NonZeroU32::new(slot.ver.get().wrapping_add(1)).unwrap_or(NonZeroU32::MIN);
        self.free.push(entity.id());
        true
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.node(entity).is_some()
    }

    /// Live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().enumerate().filter_map(|(id, slot)| {
            slot.node
                .as_ref()
                .map(|_| Entity::new(id as u32, slot.ver))
        })
    }

    #[inline]
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.node(entity).map(|node| node.name.as_str())
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<(), SceneError> {
        self.node_mut(entity)?.name = name.into();
        Ok(())
    }

    /// The first entity, in slot order, called `name`.
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.entities().find(|e| self.name(*e) == Some(name))
    }

    #[inline]
    pub fn is_active_self(&self, entity: Entity) -> bool {
        self.node(entity).map(|node| node.active).unwrap_or(false)
    }

    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), SceneError> {
        self.node_mut(entity)?.active = active;
        Ok(())
    }

    #[inline]
    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.node(entity).map(|node| &node.transform)
    }

    #[inline]
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.node_mut(entity).ok().map(|node| &mut node.transform)
    }

    /// Attaches plain data to an entity. Plain components are not saved.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> Result<(), SceneError> {
        self.node_mut(entity)?
            .components
            .push(Attached::Plain(Box::new(component)));
        Ok(())
    }

    /// Attaches a component whose `#[game_state]` fields are saved and loaded. If the entity
    /// already carries one of the same type, lookups find the one added last.
    pub fn add_state<T: NamedState>(&mut self, entity: Entity, state: T) -> Result<(), SceneError> {
        self.node_mut(entity)?
            .components
            .push(Attached::State(Box::new(state)));
        Ok(())
    }

    /// Latest attached component of type `C`, plain or persistable.
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.node(entity)?
            .components
            .iter()
            .rev()
            .find_map(|c| c.downcast_ref::<C>())
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.node_mut(entity)
            .ok()?
            .components
            .iter_mut()
            .rev()
            .find_map(|c| c.downcast_mut::<C>())
    }

    /// Removes every component of type `C`. Returns how many were removed.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> usize {
        let Ok(node) = self.node_mut(entity) else {
            return 0;
        };
        let before = node.components.len();
        node.components.retain(|c| c.downcast_ref::<C>().is_none());
        before - node.components.len()
    }

    #[inline]
    fn node(&self, entity: Entity) -> Option<&Node> {
        let slot = self.slots.get(entity.id() as usize)?;
        if slot.ver.get() != entity.ver() {
            return None;
        }
        slot.node.as_ref()
    }

    #[inline]
    fn node_mut(&mut self, entity: Entity) -> Result<&mut Node, SceneError> {
        self.slots
            .get_mut(entity.id() as usize)
            .filter(|slot| slot.ver.get() == entity.ver())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(SceneError::NoSuchEntity(entity))
    }
}

impl SceneGraph for Scene {
    fn persistable_entities(&self) -> Vec<PersistableEntity> {
        self.entities()
            .filter_map(|entity| {
                let components: Vec<_> = self
                    .node(entity)?
                    .components
                    .iter()
                    .filter_map(|c| c.as_state().map(|state| state.type_name()))
                    .collect();
                if components.is_empty() {
                    None
                } else {
                    Some(PersistableEntity { entity, components })
                }
            })
            .collect()
    }

    fn all_entities(&self) -> Vec<Entity> {
        self.entities().collect()
    }

    #[inline]
    fn entity_name(&self, entity: Entity) -> Option<&str> {
        self.name(entity)
    }

    #[inline]
    fn active_self(&self, entity: Entity) -> bool {
        self.is_active_self(entity)
    }

    fn set_active_self(&mut self, entity: Entity, active: bool) {
        let _ = self.set_active(entity, active);
    }

    fn position(&self, entity: Entity) -> Vec3 {
        self.transform(entity)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_position(&mut self, entity: Entity, position: Vec3) {
        if let Some(transform) = self.transform_mut(entity) {
            transform.position = position;
        }
    }

    fn euler_angles(&self, entity: Entity) -> Vec3 {
        self.transform(entity)
            .map(|t| t.euler_angles)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_euler_angles(&mut self, entity: Entity, euler_angles: Vec3) {
        if let Some(transform) = self.transform_mut(entity) {
            transform.euler_angles = euler_angles;
        }
    }

    fn component(&self, entity: Entity, type_name: &str) -> Option<&dyn GameState> {
        self.node(entity)?
            .components
            .iter()
            .rev()
            .filter_map(Attached::as_state)
            .find(|state| state.type_name() == type_name)
    }

    fn component_mut(&mut self, entity: Entity, type_name: &str) -> Option<&mut dyn GameState> {
        let node = self.node_mut(entity).ok()?;
        for attached in node.components.iter_mut().rev() {
            if let Some(state) = attached.as_state_mut() {
                if state.type_name() == type_name {
                    return Some(state);
                }
            }
        }
        None
    }
}
