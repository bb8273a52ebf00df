use gs_math::Vec3;

use crate::{entity::Entity, field::GameState};

/// An entity that owns at least one [`GameState`] component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistableEntity {
    pub entity: Entity,
    /// Type names of the entity's `GameState` components, in attachment order.
    pub components: Vec<&'static str>,
}

/// What the save/load engine needs from the scene that owns entities and components. The engine
/// reads through `&self` when saving and writes through `&mut self` when loading; it never
/// creates or destroys anything.
pub trait SceneGraph {
    /// Every entity with at least one `GameState` component, inactive entities included.
    fn persistable_entities(&self) -> Vec<PersistableEntity>;

    /// Every live entity, used to resolve names. Defaults to [`Self::persistable_entities`].
    fn all_entities(&self) -> Vec<Entity> {
        self.persistable_entities()
            .into_iter()
            .map(|e| e.entity)
            .collect()
    }

    /// `None` if the entity no longer exists.
    fn entity_name(&self, entity: Entity) -> Option<&str>;

    fn active_self(&self, entity: Entity) -> bool;

    fn set_active_self(&mut self, entity: Entity, active: bool);

    fn position(&self, entity: Entity) -> Vec3;

    fn set_position(&mut self, entity: Entity, position: Vec3);

    fn euler_angles(&self, entity: Entity) -> Vec3;

    fn set_euler_angles(&mut self, entity: Entity, euler_angles: Vec3);

    fn component(&self, entity: Entity, type_name: &str) -> Option<&dyn GameState>;

    fn component_mut(&mut self, entity: Entity, type_name: &str) -> Option<&mut dyn GameState>;
}
