use log::debug;

use crate::errors::{TaxonError, TaxonResult};
use crate::models::entity::{
    EntityKey, EntityRecord, ItemType, PossibleValue, Property, PropertyValueAssignment, TypeId,
    TypePropertyAssignment,
};
use crate::store::EntityStore;

/// Enforces the referential-integrity invariants of the schema on every
/// mutation and computes the full cascade of a delete before control returns.
///
/// Every operation works purely on the local store; none of them invoke the
/// external service. The cascade of a single top-level mutation completes
/// within the call, so no partially-cascaded state is ever observable.
pub struct IntegrityEngine;

impl IntegrityEngine {
    /// Insert a confirmed type. Names must be unique and non-empty after
    /// trimming.
    pub fn insert_type(store: &mut EntityStore, item_type: ItemType) -> TaxonResult<()> {
        let name = Self::valid_name(&item_type.name, "type")?;
        if store.type_by_name(&name).is_some() {
            return Err(TaxonError::ValidationError(format!(
                "type '{}' already exists",
                name
            )));
        }
        store.put(EntityRecord::Type(ItemType {
            id: item_type.id,
            name,
        }));
        Ok(())
    }

    /// Insert a confirmed property
    pub fn insert_property(store: &mut EntityStore, property: Property) -> TaxonResult<()> {
        let name = Self::valid_name(&property.name, "property")?;
        if store.property_by_name(&name).is_some() {
            return Err(TaxonError::ValidationError(format!(
                "property '{}' already exists",
                name
            )));
        }
        store.put(EntityRecord::Property(Property {
            id: property.id,
            name,
        }));
        Ok(())
    }

    /// Insert a confirmed possible value into a property's domain
    pub fn insert_possible_value(
        store: &mut EntityStore,
        possible_value: PossibleValue,
    ) -> TaxonResult<()> {
        let value = Self::valid_name(&possible_value.value, "value")?;
        let property_name = possible_value.property_name;
        if store.property_by_name(&property_name).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown property '{}'",
                property_name
            )));
        }
        if store.has_possible_value(&property_name, &value) {
            return Err(TaxonError::ValidationError(format!(
                "value '{}' already exists for property '{}'",
                value, property_name
            )));
        }
        store.put(EntityRecord::PossibleValue(PossibleValue {
            property_name,
            value,
        }));
        Ok(())
    }

    /// Remove a type and cascade: every applicability assignment and every
    /// value assignment keyed by it go with it. Returns the number of
    /// assignments removed. Unknown ids cascade nothing.
    pub fn delete_type(store: &mut EntityStore, type_id: TypeId) -> usize {
        let mut removed = 0;
        for property_name in store.properties_of_type(type_id) {
            if store.remove(&EntityKey::TypeProperty {
                type_id,
                property_name,
            }) {
                removed += 1;
            }
        }
        for property_name in store.value_assignment_properties_of_type(type_id) {
            if store.remove(&EntityKey::PropertyValue {
                type_id,
                property_name,
            }) {
                removed += 1;
            }
        }
        store.remove(&EntityKey::Type(type_id));
        debug!(
            "deleted type {} and cascaded {} assignments",
            type_id, removed
        );
        removed
    }

    /// Remove a property and cascade: its possible values, its entry in every
    /// type's applicability list, and every value assignment keyed by it (the
    /// assignments are removed wholesale, not just emptied). Returns the
    /// number of assignments removed.
    pub fn delete_property(store: &mut EntityStore, property_name: &str) -> usize {
        for value in store.values_of_property(property_name) {
            store.remove(&EntityKey::PossibleValue {
                property_name: property_name.to_string(),
                value,
            });
        }
        let mut removed = 0;
        for type_id in store.assignment_types_of_property(property_name) {
            if store.remove(&EntityKey::TypeProperty {
                type_id,
                property_name: property_name.to_string(),
            }) {
                removed += 1;
            }
        }
        for type_id in store.value_assignment_types_of_property(property_name) {
            if store.remove(&EntityKey::PropertyValue {
                type_id,
                property_name: property_name.to_string(),
            }) {
                removed += 1;
            }
        }
        store.remove(&EntityKey::Property(property_name.to_string()));
        debug!(
            "deleted property '{}' and cascaded {} assignments",
            property_name, removed
        );
        removed
    }

    /// Remove a value from a property's domain and strip it from every value
    /// assignment that contains it, for every type. Absence anywhere is not
    /// an error. Returns the number of assignments the value was stripped
    /// from.
    pub fn delete_possible_value(
        store: &mut EntityStore,
        property_name: &str,
        value: &str,
    ) -> usize {
        store.remove(&EntityKey::PossibleValue {
            property_name: property_name.to_string(),
            value: value.to_string(),
        });
        let mut stripped = 0;
        for type_id in store.value_assignment_types_of_property(property_name) {
            let Some(assignment) = store.assignment(type_id, property_name) else {
                continue;
            };
            if !assignment.values.iter().any(|v| v == value) {
                continue;
            }
            let mut updated = assignment.clone();
            updated.values.retain(|v| v != value);
            store.put(EntityRecord::PropertyValue(updated));
            stripped += 1;
        }
        debug!(
            "deleted possible value '{}' of '{}', stripped from {} assignments",
            value, property_name, stripped
        );
        stripped
    }

    /// Declare a property applicable to a type. Set semantics: an existing
    /// pair is a no-op, not an error. A fresh pair also gets an empty value
    /// assignment. Returns whether anything was inserted.
    pub fn add_type_property(
        store: &mut EntityStore,
        type_id: TypeId,
        property_name: &str,
    ) -> TaxonResult<bool> {
        if store.type_by_id(type_id).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown type id {}",
                type_id
            )));
        }
        if store.property_by_name(property_name).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown property '{}'",
                property_name
            )));
        }
        if store.has_type_property(type_id, property_name) {
            return Ok(false);
        }
        store.put(EntityRecord::TypeProperty(TypePropertyAssignment {
            type_id,
            property_name: property_name.to_string(),
        }));
        store.put(EntityRecord::PropertyValue(PropertyValueAssignment {
            type_id,
            property_name: property_name.to_string(),
            values: Vec::new(),
        }));
        Ok(true)
    }

    /// Withdraw a property from a type, along with any value assignment for
    /// the pair. Removing an absent pair is a no-op.
    pub fn remove_type_property(
        store: &mut EntityStore,
        type_id: TypeId,
        property_name: &str,
    ) -> bool {
        let removed = store.remove(&EntityKey::TypeProperty {
            type_id,
            property_name: property_name.to_string(),
        });
        store.remove(&EntityKey::PropertyValue {
            type_id,
            property_name: property_name.to_string(),
        });
        removed
    }

    /// Append a value to the pair's assignment. The pair must already be
    /// established and the value must belong to the property's domain; a
    /// value already present is a silent no-op. Returns whether the value was
    /// appended.
    pub fn add_property_value(
        store: &mut EntityStore,
        type_id: TypeId,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<bool> {
        if !store.has_type_property(type_id, property_name) {
            return Err(TaxonError::InvalidReference(format!(
                "property '{}' is not assigned to type {}",
                property_name, type_id
            )));
        }
        if !store.has_possible_value(property_name, value) {
            return Err(TaxonError::InvalidReference(format!(
                "'{}' is not a possible value of property '{}'",
                value, property_name
            )));
        }
        let mut assignment = store
            .assignment(type_id, property_name)
            .cloned()
            .unwrap_or_else(|| PropertyValueAssignment {
                type_id,
                property_name: property_name.to_string(),
                values: Vec::new(),
            });
        if assignment.values.iter().any(|v| v == value) {
            return Ok(false);
        }
        assignment.values.push(value.to_string());
        store.put(EntityRecord::PropertyValue(assignment));
        Ok(true)
    }

    /// Remove a value from the pair's assignment; idempotent if absent.
    /// Returns whether the value was present.
    pub fn remove_property_value(
        store: &mut EntityStore,
        type_id: TypeId,
        property_name: &str,
        value: &str,
    ) -> bool {
        let Some(assignment) = store.assignment(type_id, property_name) else {
            return false;
        };
        if !assignment.values.iter().any(|v| v == value) {
            return false;
        }
        let mut updated = assignment.clone();
        updated.values.retain(|v| v != value);
        store.put(EntityRecord::PropertyValue(updated));
        true
    }

    fn valid_name(raw: &str, what: &str) -> TaxonResult<String> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(TaxonError::ValidationError(format!(
                "{} name must not be empty",
                what
            )));
        }
        Ok(name.to_string())
    }
}
