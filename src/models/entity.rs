use serde::{Deserialize, Serialize};

/// Stable identifier of an item type
pub type TypeId = u64;

/// Stable identifier of a property
pub type PropertyId = u64;

/// A classifiable item category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: TypeId,
    pub name: String,
}

/// An attribute that may apply to one or more item types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
}

/// A domain value a property may take, independent of any type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleValue {
    pub property_name: String,
    pub value: String,
}

/// Declares that a property is applicable to a type. Set semantics: at most
/// one assignment per (type_id, property_name) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePropertyAssignment {
    pub type_id: TypeId,
    pub property_name: String,
}

/// The subset of a property's possible values that holds for a given type.
/// Values are ordered and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValueAssignment {
    pub type_id: TypeId,
    pub property_name: String,
    pub values: Vec<String>,
}

/// The five entity collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Type,
    Property,
    PossibleValue,
    TypeProperty,
    PropertyValue,
}

/// Stable key addressing a single record within its collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Type(TypeId),
    Property(String),
    PossibleValue {
        property_name: String,
        value: String,
    },
    TypeProperty {
        type_id: TypeId,
        property_name: String,
    },
    PropertyValue {
        type_id: TypeId,
        property_name: String,
    },
}

impl EntityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Type(_) => EntityKind::Type,
            EntityKey::Property(_) => EntityKind::Property,
            EntityKey::PossibleValue { .. } => EntityKind::PossibleValue,
            EntityKey::TypeProperty { .. } => EntityKind::TypeProperty,
            EntityKey::PropertyValue { .. } => EntityKind::PropertyValue,
        }
    }
}

/// A record of any entity kind, as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRecord {
    Type(ItemType),
    Property(Property),
    PossibleValue(PossibleValue),
    TypeProperty(TypePropertyAssignment),
    PropertyValue(PropertyValueAssignment),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        self.key().kind()
    }

    /// The key this record is addressed by
    pub fn key(&self) -> EntityKey {
        match self {
            EntityRecord::Type(t) => EntityKey::Type(t.id),
            EntityRecord::Property(p) => EntityKey::Property(p.name.clone()),
            EntityRecord::PossibleValue(v) => EntityKey::PossibleValue {
                property_name: v.property_name.clone(),
                value: v.value.clone(),
            },
            EntityRecord::TypeProperty(a) => EntityKey::TypeProperty {
                type_id: a.type_id,
                property_name: a.property_name.clone(),
            },
            EntityRecord::PropertyValue(a) => EntityKey::PropertyValue {
                type_id: a.type_id,
                property_name: a.property_name.clone(),
            },
        }
    }
}

/// Mutation kinds reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Created,
    Updated,
    Removed,
}

/// Change notification emitted by the store on every mutation, consumed by
/// the selection graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityChange {
    pub kind: EntityKind,
    pub key: EntityKey,
    pub op: ChangeOp,
}
