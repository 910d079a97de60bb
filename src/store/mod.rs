use log::trace;

use crate::models::entity::{
    ChangeOp, EntityChange, EntityKey, EntityKind, EntityRecord, ItemType, PossibleValue, Property,
    PropertyId, PropertyValueAssignment, TypeId, TypePropertyAssignment,
};

/// Normalized, in-memory collections of the five schema entity kinds.
///
/// This is a dumb container: no cascading logic lives here. Each collection
/// preserves insertion order, so lists render entities in creation order just
/// as the service returns them. Every mutation records an [`EntityChange`];
/// callers drain the batch and feed it to the selection graph.
#[derive(Debug, Default)]
pub struct EntityStore {
    types: Vec<ItemType>,
    properties: Vec<Property>,
    possible_values: Vec<PossibleValue>,
    type_properties: Vec<TypePropertyAssignment>,
    property_values: Vec<PropertyValueAssignment>,
    changes: Vec<EntityChange>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a single record by key
    pub fn get(&self, key: &EntityKey) -> Option<EntityRecord> {
        match key {
            EntityKey::Type(id) => self.type_by_id(*id).cloned().map(EntityRecord::Type),
            EntityKey::Property(name) => {
                self.property_by_name(name).cloned().map(EntityRecord::Property)
            }
            EntityKey::PossibleValue {
                property_name,
                value,
            } => self
                .possible_values
                .iter()
                .find(|v| &v.property_name == property_name && &v.value == value)
                .cloned()
                .map(EntityRecord::PossibleValue),
            EntityKey::TypeProperty {
                type_id,
                property_name,
            } => self
                .type_properties
                .iter()
                .find(|a| a.type_id == *type_id && &a.property_name == property_name)
                .cloned()
                .map(EntityRecord::TypeProperty),
            EntityKey::PropertyValue {
                type_id,
                property_name,
            } => self
                .assignment(*type_id, property_name)
                .cloned()
                .map(EntityRecord::PropertyValue),
        }
    }

    /// List every record of one kind, in insertion order
    pub fn list(&self, kind: EntityKind) -> Vec<EntityRecord> {
        match kind {
            EntityKind::Type => self.types.iter().cloned().map(EntityRecord::Type).collect(),
            EntityKind::Property => self
                .properties
                .iter()
                .cloned()
                .map(EntityRecord::Property)
                .collect(),
            EntityKind::PossibleValue => self
                .possible_values
                .iter()
                .cloned()
                .map(EntityRecord::PossibleValue)
                .collect(),
            EntityKind::TypeProperty => self
                .type_properties
                .iter()
                .cloned()
                .map(EntityRecord::TypeProperty)
                .collect(),
            EntityKind::PropertyValue => self
                .property_values
                .iter()
                .cloned()
                .map(EntityRecord::PropertyValue)
                .collect(),
        }
    }

    /// Insert or replace a record. Replacement keeps the record's position.
    pub fn put(&mut self, record: EntityRecord) {
        let key = record.key();
        trace!("store put {:?}", key);
        let op = match &record {
            EntityRecord::Type(t) => Self::upsert(&mut self.types, t, |e| e.id == t.id),
            EntityRecord::Property(p) => Self::upsert(&mut self.properties, p, |e| e.id == p.id),
            EntityRecord::PossibleValue(v) => Self::upsert(&mut self.possible_values, v, |e| {
                e.property_name == v.property_name && e.value == v.value
            }),
            EntityRecord::TypeProperty(a) => Self::upsert(&mut self.type_properties, a, |e| {
                e.type_id == a.type_id && e.property_name == a.property_name
            }),
            EntityRecord::PropertyValue(a) => Self::upsert(&mut self.property_values, a, |e| {
                e.type_id == a.type_id && e.property_name == a.property_name
            }),
        };
        self.changes.push(EntityChange {
            kind: key.kind(),
            key,
            op,
        });
    }

    /// Remove a record by key. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &EntityKey) -> bool {
        let removed = match key {
            EntityKey::Type(id) => Self::take(&mut self.types, |e| e.id == *id),
            EntityKey::Property(name) => Self::take(&mut self.properties, |e| &e.name == name),
            EntityKey::PossibleValue {
                property_name,
                value,
            } => Self::take(&mut self.possible_values, |e| {
                &e.property_name == property_name && &e.value == value
            }),
            EntityKey::TypeProperty {
                type_id,
                property_name,
            } => Self::take(&mut self.type_properties, |e| {
                e.type_id == *type_id && &e.property_name == property_name
            }),
            EntityKey::PropertyValue {
                type_id,
                property_name,
            } => Self::take(&mut self.property_values, |e| {
                e.type_id == *type_id && &e.property_name == property_name
            }),
        };
        if removed {
            trace!("store remove {:?}", key);
            self.changes.push(EntityChange {
                kind: key.kind(),
                key: key.clone(),
                op: ChangeOp::Removed,
            });
        }
        removed
    }

    /// Hand the accumulated change batch to the caller
    pub fn drain_changes(&mut self) -> Vec<EntityChange> {
        std::mem::take(&mut self.changes)
    }

    /// Drop every record and pending change, ahead of a snapshot rebuild
    pub fn reset(&mut self) {
        self.types.clear();
        self.properties.clear();
        self.possible_values.clear();
        self.type_properties.clear();
        self.property_values.clear();
        self.changes.clear();
    }

    // Typed read accessors used by the engine and the selection graph.

    pub fn types(&self) -> &[ItemType] {
        &self.types
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn possible_values(&self) -> &[PossibleValue] {
        &self.possible_values
    }

    pub fn type_by_id(&self, id: TypeId) -> Option<&ItemType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn type_by_name(&self, name: &str) -> Option<&ItemType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn property_by_id(&self, id: PropertyId) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn property_by_name(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Ordered domain values of a property
    pub fn values_of_property(&self, property_name: &str) -> Vec<String> {
        self.possible_values
            .iter()
            .filter(|v| v.property_name == property_name)
            .map(|v| v.value.clone())
            .collect()
    }

    pub fn has_possible_value(&self, property_name: &str, value: &str) -> bool {
        self.possible_values
            .iter()
            .any(|v| v.property_name == property_name && v.value == value)
    }

    /// Ordered names of the properties applicable to a type
    pub fn properties_of_type(&self, type_id: TypeId) -> Vec<String> {
        self.type_properties
            .iter()
            .filter(|a| a.type_id == type_id)
            .map(|a| a.property_name.clone())
            .collect()
    }

    pub fn has_type_property(&self, type_id: TypeId, property_name: &str) -> bool {
        self.type_properties
            .iter()
            .any(|a| a.type_id == type_id && a.property_name == property_name)
    }

    /// Property names of every value assignment keyed by a type
    pub fn value_assignment_properties_of_type(&self, type_id: TypeId) -> Vec<String> {
        self.property_values
            .iter()
            .filter(|a| a.type_id == type_id)
            .map(|a| a.property_name.clone())
            .collect()
    }

    /// Type ids of every value assignment keyed by a property
    pub fn value_assignment_types_of_property(&self, property_name: &str) -> Vec<TypeId> {
        self.property_values
            .iter()
            .filter(|a| a.property_name == property_name)
            .map(|a| a.type_id)
            .collect()
    }

    /// Type ids of every applicability assignment naming a property
    pub fn assignment_types_of_property(&self, property_name: &str) -> Vec<TypeId> {
        self.type_properties
            .iter()
            .filter(|a| a.property_name == property_name)
            .map(|a| a.type_id)
            .collect()
    }

    pub fn assignment(
        &self,
        type_id: TypeId,
        property_name: &str,
    ) -> Option<&PropertyValueAssignment> {
        self.property_values
            .iter()
            .find(|a| a.type_id == type_id && a.property_name == property_name)
    }

    /// Values assigned for a (type, property) pair; empty when unassigned
    pub fn assigned_values(&self, type_id: TypeId, property_name: &str) -> Vec<String> {
        self.assignment(type_id, property_name)
            .map(|a| a.values.clone())
            .unwrap_or_default()
    }

    fn upsert<T: Clone>(table: &mut Vec<T>, record: &T, matches: impl Fn(&T) -> bool) -> ChangeOp {
        if let Some(index) = table.iter().position(|e| matches(e)) {
            table[index] = record.clone();
            ChangeOp::Updated
        } else {
            table.push(record.clone());
            ChangeOp::Created
        }
    }

    fn take<T>(table: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
        let before = table.len();
        table.retain(|e| !matches(e));
        table.len() < before
    }
}
