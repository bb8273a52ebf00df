use std::{fmt, num::NonZeroU32};

/// A handle to an entity owned by the host scene. Handles are only meaningful to the scene that
/// issued them; on disk an entity is always identified by its name.
///
/// [`Entity::NULL`] is how a field without an `Option` holds "no entity". A saved reference that
/// is absent, or names an entity the scene doesn't have, loads as `NULL`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    id: u32,
    ver: NonZeroU32,
}

impl Entity {
    pub const NULL: Entity = Entity {
        id: u32::MAX,
        ver: NonZeroU32::MAX,
    };

    /// `ver` is the generation of slot `id` when the handle was issued.
    #[inline]
    pub fn new(id: u32, ver: NonZeroU32) -> Entity {
        Entity { id, ver }
    }

    #[inline]
    pub const fn null() -> Entity {
        Entity::NULL
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        *self == Entity::NULL
    }

    /// `None` for the null handle.
    #[inline]
    pub fn to_option(self) -> Option<Entity> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn ver(&self) -> u32 {
        self.ver.get()
    }
}

impl Default for Entity {
    #[inline]
    fn default() -> Self {
        Entity::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "#{}v{}", self.id, self.ver)
        }
    }
}
