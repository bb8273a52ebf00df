use std::any::Any;

use gs_save_load::field::GameState;

/// Any plain data that can be attached to an entity. Plain components are never saved.
pub trait Component: Any + Send + Sync {}

impl<T: Any + Send + Sync> Component for T {}

/// A component attached to an entity.
pub(crate) enum Attached {
    Plain(Box<dyn Any + Send + Sync>),
    State(Box<dyn GameState>),
}

impl Attached {
    #[inline]
    pub fn as_state(&self) -> Option<&dyn GameState> {
        match self {
            Attached::State(state) => Some(state.as_ref()),
            Attached::Plain(_) => None,
        }
    }

    #[inline]
    pub fn as_state_mut(&mut self) -> Option<&mut dyn GameState> {
        match self {
            Attached::State(state) => {
                let state: &mut dyn GameState = state.as_mut();
                Some(state)
            }
            Attached::Plain(_) => None,
        }
    }

    #[inline]
    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        match self {
            Attached::Plain(value) => value.downcast_ref::<C>(),
            Attached::State(state) => state.as_any().downcast_ref::<C>(),
        }
    }

    #[inline]
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        match self {
            Attached::Plain(value) => value.downcast_mut::<C>(),
            Attached::State(state) => state.as_any_mut().downcast_mut::<C>(),
        }
    }
}
