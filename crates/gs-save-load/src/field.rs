use std::{any::Any, fmt, marker::PhantomData};

use gs_math::Vec3;
use rustc_hash::FxHashMap;

use crate::entity::Entity;

/// The declared shape of a persistable field. Decoding is directed by this, not by the tag of the
/// value found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Double,
    Vector3,
    String,
    Sequence(Box<FieldType>),
    /// A handle to an entity.
    Entity,
    /// A handle to the component with the given type name on some entity.
    Component(&'static str),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Double => f.write_str("double"),
            FieldType::Vector3 => f.write_str("vector3"),
            FieldType::String => f.write_str("string"),
            FieldType::Sequence(elem) => write!(f, "[{elem}]"),
            FieldType::Entity => f.write_str("entity"),
            FieldType::Component(name) => write!(f, "component '{name}'"),
        }
    }
}

/// A handle to a component, identified by its entity and its type name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    pub entity: Entity,
    pub type_name: &'static str,
}

/// A live value, as read from or written to a field. `Null` stands for "absent".
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    Vector3(Vec3),
    String(String),
    Array(Vec<FieldValue>),
    Entity(Entity),
    Component(ComponentHandle),
}

impl FieldValue {
    pub fn tag_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::Vector3(_) => "vector3",
            FieldValue::String(_) => "string",
            FieldValue::Array(_) => "array",
            FieldValue::Entity(_) => "entity",
            FieldValue::Component(_) => "component",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldInfo {
    #[inline]
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Implemented by every type a `#[game_state]` field may have.
pub trait Persistable: Sized {
    fn field_type() -> FieldType;

    fn to_field_value(&self) -> FieldValue;

    /// Returns `None` if `value` can't be stored in this type. The field is then left as is.
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

/// A component whose `#[game_state]` fields are saved and loaded. Use `#[derive(GameState)]`.
pub trait GameState: Send + Sync {
    /// Name of the component type. Components are looked up on an entity by this name.
    fn type_name(&self) -> &'static str;

    /// The persistable fields, in declaration order.
    fn fields(&self) -> &'static [FieldInfo];

    fn get_field(&self, name: &str) -> Option<FieldValue>;

    /// Returns `false` if there is no persistable field called `name` or the value doesn't fit
    /// the field. The field is not modified in either case.
    fn set_field(&mut self, name: &str, value: FieldValue) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Static type name of a [`GameState`] type.
pub trait NamedState: GameState + 'static {
    const NAME: &'static str;
}

/// The persistable fields of `component` paired with their declared types.
#[inline]
pub fn persistable_fields(component: &dyn GameState) -> &'static [FieldInfo] {
    component.fields()
}

/// Name to declared type lookup over one component's persistable fields.
pub struct FieldTable {
    types: FxHashMap<&'static str, &'static FieldType>,
}

impl FieldTable {
    pub fn new(component: &dyn GameState) -> Self {
        let fields = persistable_fields(component);
        let mut types = FxHashMap::default();
        types.reserve(fields.len());
        for field in fields {
            types.insert(field.name, &field.ty);
        }
        Self { types }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&'static FieldType> {
        self.types.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A typed handle to the `T` component of an entity.
pub struct StateRef<T: NamedState> {
    entity: Entity,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: NamedState> StateRef<T> {
    #[inline]
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn null() -> Self {
        Self::new(Entity::NULL)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.entity.is_null()
    }

    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl<T: NamedState> Clone for StateRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: NamedState> Copy for StateRef<T> {}

impl<T: NamedState> PartialEq for StateRef<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl<T: NamedState> Eq for StateRef<T> {}

impl<T: NamedState> fmt::Debug for StateRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRef")
            .field("type", &T::NAME)
            .field("entity", &self.entity)
            .finish()
    }
}

impl Persistable for bool {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Bool
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }

    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! persistable_int_impl {
    ($ty:ty) => {
        impl Persistable for $ty {
            #[inline]
            fn field_type() -> FieldType {
                FieldType::Int
            }

            #[inline]
            fn to_field_value(&self) -> FieldValue {
                FieldValue::Int(*self as i64)
            }

            #[inline]
            fn from_field_value(value: FieldValue) -> Option<Self> {
                match value {
                    FieldValue::Int(i) => <$ty>::try_from(i).ok(),
                    _ => None,
                }
            }
        }
    };
}

persistable_int_impl!(i32);
persistable_int_impl!(i64);
persistable_int_impl!(u32);

impl Persistable for f32 {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Float
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }

    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl Persistable for f64 {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Double
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Double(*self)
    }

    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Double(d) => Some(d),
            _ => None,
        }
    }
}

impl Persistable for String {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::String
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }

    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Persistable for Vec3 {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Vector3
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Vector3(*self)
    }

    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Vector3(v) => Some(v),
            _ => None,
        }
    }
}

impl Persistable for Entity {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Entity
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        self.to_option().map_or(FieldValue::Null, FieldValue::Entity)
    }

    /// Absent loads as [`Entity::NULL`].
    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Entity(e) => Some(e),
            FieldValue::Null => Some(Entity::NULL),
            _ => None,
        }
    }
}

impl<T: NamedState> Persistable for StateRef<T> {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Component(T::NAME)
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        match self.entity.to_option() {
            Some(entity) => FieldValue::Component(ComponentHandle {
                entity,
                type_name: T::NAME,
            }),
            None => FieldValue::Null,
        }
    }

    /// Absent loads as a handle to [`Entity::NULL`].
    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Component(handle) if handle.type_name == T::NAME => {
                Some(StateRef::new(handle.entity))
            }
            FieldValue::Null => Some(StateRef::null()),
            _ => None,
        }
    }
}

/// `None` is how a field holds "absent".
impl<T: Persistable> Persistable for Option<T> {
    #[inline]
    fn field_type() -> FieldType {
        T::field_type()
    }

    #[inline]
    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(value) => value.to_field_value(),
            None => FieldValue::Null,
        }
    }

    #[inline]
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            value => T::from_field_value(value).map(Some),
        }
    }
}

/// A sequence only converts if every element does.
impl<T: Persistable> Persistable for Vec<T> {
    #[inline]
    fn field_type() -> FieldType {
        FieldType::Sequence(Box::new(T::field_type()))
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Array(self.iter().map(Persistable::to_field_value).collect())
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Array(items) => items.into_iter().map(T::from_field_value).collect(),
            _ => None,
        }
    }
}
