use std::collections::HashMap;

use log::{debug, info};

use crate::engine::IntegrityEngine;
use crate::errors::{TaxonError, TaxonResult};
use crate::models::entity::{
    EntityRecord, ItemType, PossibleValue, Property, PropertyId, PropertyValueAssignment, TypeId,
    TypePropertyAssignment,
};
use crate::models::report::{AiClassification, Classification, CompletenessReport};
use crate::selection::SelectionGraph;
use crate::store::EntityStore;
use crate::traits::gateway::KnowledgeGateway;

/// Orchestrates one editing session over the knowledge schema.
///
/// Every mutating intent is validated locally, sent through the gateway, and
/// only applied to the local store once the service confirms it
/// (request-then-apply, never optimistic). The integrity cascade then runs
/// and the selection graph resynchronizes before the method returns.
///
/// Methods take `&mut self` and are awaited to completion, so a second
/// operation cannot start while one is pending, and dropping the session
/// future mid-request abandons the response without mutating the store.
pub struct EditorSession {
    gateway: Box<dyn KnowledgeGateway>,
    store: EntityStore,
    selection: SelectionGraph,
}

impl EditorSession {
    pub fn new(gateway: Box<dyn KnowledgeGateway>) -> Self {
        Self {
            gateway,
            store: EntityStore::new(),
            selection: SelectionGraph::new(),
        }
    }

    /// The current entity snapshot
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The current dependent-selection state
    pub fn selection(&self) -> &SelectionGraph {
        &self.selection
    }

    /// Pull the full schema snapshot from the service and rebuild the local
    /// store, then resynchronize the selection chain. All requests complete
    /// before anything local is touched, so a failure leaves the previous
    /// snapshot intact.
    pub async fn refresh(&mut self) -> TaxonResult<()> {
        info!("Refreshing schema snapshot from the knowledge service");
        let types = self.gateway.list_types().await?;
        let properties = self.gateway.list_properties().await?;

        let mut possible_values = Vec::new();
        for property in &properties {
            possible_values.extend(self.gateway.list_possible_values(&property.name).await?);
        }

        let mut type_properties = Vec::new();
        let mut property_values = Vec::new();
        for item_type in &types {
            for property_name in self.gateway.list_type_properties(item_type.id).await? {
                type_properties.push(TypePropertyAssignment {
                    type_id: item_type.id,
                    property_name: property_name.clone(),
                });
                if let Some(property) = properties.iter().find(|p| p.name == property_name) {
                    let values = self
                        .gateway
                        .list_property_values(item_type.id, property.id)
                        .await?;
                    property_values.push(PropertyValueAssignment {
                        type_id: item_type.id,
                        property_name,
                        values,
                    });
                }
            }
        }

        self.store.reset();
        for item_type in types {
            self.store.put(EntityRecord::Type(item_type));
        }
        for property in properties {
            self.store.put(EntityRecord::Property(property));
        }
        for value in possible_values {
            self.store.put(EntityRecord::PossibleValue(value));
        }
        for assignment in type_properties {
            self.store.put(EntityRecord::TypeProperty(assignment));
        }
        for assignment in property_values {
            self.store.put(EntityRecord::PropertyValue(assignment));
        }
        self.store.drain_changes();
        self.selection.sync(&self.store);
        debug!(
            "Snapshot rebuilt: {} types, {} properties",
            self.store.types().len(),
            self.store.properties().len()
        );
        Ok(())
    }

    /// Create a type. Duplicate or empty names are rejected before any
    /// network call.
    pub async fn create_type(&mut self, name: &str) -> TaxonResult<ItemType> {
        let name = self.valid_new_name(name, "type")?;
        if self.store.type_by_name(&name).is_some() {
            return Err(TaxonError::ValidationError(format!(
                "type '{}' already exists",
                name
            )));
        }
        let created = self.gateway.create_type(&name).await?;
        IntegrityEngine::insert_type(&mut self.store, created.clone())?;
        self.resync_selection();
        Ok(created)
    }

    /// Delete a type and cascade its assignments. Returns the number of
    /// assignments removed locally.
    pub async fn delete_type(&mut self, type_id: TypeId) -> TaxonResult<usize> {
        if self.store.type_by_id(type_id).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown type id {}",
                type_id
            )));
        }
        self.gateway.delete_type(type_id).await?;
        let removed = IntegrityEngine::delete_type(&mut self.store, type_id);
        self.resync_selection();
        Ok(removed)
    }

    pub async fn create_property(&mut self, name: &str) -> TaxonResult<Property> {
        let name = self.valid_new_name(name, "property")?;
        if self.store.property_by_name(&name).is_some() {
            return Err(TaxonError::ValidationError(format!(
                "property '{}' already exists",
                name
            )));
        }
        let created = self.gateway.create_property(&name).await?;
        IntegrityEngine::insert_property(&mut self.store, created.clone())?;
        self.resync_selection();
        Ok(created)
    }

    /// Delete a property and cascade: its possible values, its entry in
    /// every type's applicability list, and every value assignment keyed by
    /// it. Returns the number of assignments removed locally.
    pub async fn delete_property(&mut self, property_id: PropertyId) -> TaxonResult<usize> {
        let Some(property) = self.store.property_by_id(property_id).cloned() else {
            return Err(TaxonError::InvalidReference(format!(
                "unknown property id {}",
                property_id
            )));
        };
        self.gateway.delete_property(property_id).await?;
        let removed = IntegrityEngine::delete_property(&mut self.store, &property.name);
        self.resync_selection();
        Ok(removed)
    }

    pub async fn add_possible_value(
        &mut self,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<PossibleValue> {
        let value = self.valid_new_name(value, "value")?;
        if self.store.property_by_name(property_name).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown property '{}'",
                property_name
            )));
        }
        if self.store.has_possible_value(property_name, &value) {
            return Err(TaxonError::ValidationError(format!(
                "value '{}' already exists for property '{}'",
                value, property_name
            )));
        }
        let created = self.gateway.create_possible_value(property_name, &value).await?;
        IntegrityEngine::insert_possible_value(&mut self.store, created.clone())?;
        self.resync_selection();
        Ok(created)
    }

    /// Delete a value from a property's domain and strip it from every
    /// assignment that used it. Deleting an absent value is a local no-op.
    /// Returns the number of assignments the value was stripped from.
    pub async fn delete_possible_value(
        &mut self,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<usize> {
        if !self.store.has_possible_value(property_name, value) {
            debug!(
                "possible value '{}' of '{}' already absent",
                value, property_name
            );
            return Ok(0);
        }
        self.gateway.delete_possible_value(property_name, value).await?;
        let stripped = IntegrityEngine::delete_possible_value(&mut self.store, property_name, value);
        self.resync_selection();
        Ok(stripped)
    }

    /// Declare a property applicable to a type. An already-established pair
    /// is a no-op that skips the network entirely. Returns whether a new
    /// assignment was made.
    pub async fn assign_property(
        &mut self,
        type_id: TypeId,
        property_name: &str,
    ) -> TaxonResult<bool> {
        if self.store.type_by_id(type_id).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown type id {}",
                type_id
            )));
        }
        if self.store.property_by_name(property_name).is_none() {
            return Err(TaxonError::InvalidReference(format!(
                "unknown property '{}'",
                property_name
            )));
        }
        if self.store.has_type_property(type_id, property_name) {
            return Ok(false);
        }
        self.gateway.assign_property(type_id, property_name).await?;
        IntegrityEngine::add_type_property(&mut self.store, type_id, property_name)?;
        self.resync_selection();
        Ok(true)
    }

    /// Withdraw a property from a type along with any values assigned for
    /// the pair. An absent pair is a no-op.
    pub async fn unassign_property(
        &mut self,
        type_id: TypeId,
        property_name: &str,
    ) -> TaxonResult<bool> {
        if !self.store.has_type_property(type_id, property_name) {
            return Ok(false);
        }
        self.gateway.unassign_property(type_id, property_name).await?;
        IntegrityEngine::remove_type_property(&mut self.store, type_id, property_name);
        self.resync_selection();
        Ok(true)
    }

    /// Assign a possible value to a (type, property) pair. The pair must be
    /// established and the value must belong to the property's domain; both
    /// are checked locally before any network call. A value already assigned
    /// is a silent no-op. Returns whether the value was appended.
    pub async fn assign_value(
        &mut self,
        type_id: TypeId,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<bool> {
        if !self.store.has_type_property(type_id, property_name) {
            return Err(TaxonError::InvalidReference(format!(
                "property '{}' is not assigned to type {}",
                property_name, type_id
            )));
        }
        if !self.store.has_possible_value(property_name, value) {
            return Err(TaxonError::InvalidReference(format!(
                "'{}' is not a possible value of property '{}'",
                value, property_name
            )));
        }
        if self
            .store
            .assigned_values(type_id, property_name)
            .iter()
            .any(|v| v == value)
        {
            return Ok(false);
        }
        let property_id = self.property_id(property_name)?;
        self.gateway
            .assign_values(type_id, property_id, &[value.to_string()])
            .await?;
        IntegrityEngine::add_property_value(&mut self.store, type_id, property_name, value)?;
        self.resync_selection();
        Ok(true)
    }

    /// Remove an assigned value from a (type, property) pair; removing an
    /// absent value is a no-op.
    pub async fn remove_value(
        &mut self,
        type_id: TypeId,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<bool> {
        if !self
            .store
            .assigned_values(type_id, property_name)
            .iter()
            .any(|v| v == value)
        {
            return Ok(false);
        }
        let property_id = self.property_id(property_name)?;
        self.gateway
            .remove_value(type_id, property_id, value)
            .await?;
        IntegrityEngine::remove_property_value(&mut self.store, type_id, property_name, value);
        self.resync_selection();
        Ok(true)
    }

    /// Change the selected type (local only)
    pub fn select_type(&mut self, type_id: Option<TypeId>) -> TaxonResult<()> {
        self.selection.select_type(&self.store, type_id)
    }

    /// Change the selected property (local only)
    pub fn select_property(&mut self, property_name: Option<&str>) -> TaxonResult<()> {
        self.selection.select_property(&self.store, property_name)
    }

    /// Run the external completeness audit
    pub async fn check_completeness(&self) -> TaxonResult<CompletenessReport> {
        self.gateway.check_completeness().await
    }

    /// Rule-based classification of the chosen property values
    pub async fn classify(
        &self,
        chosen: &HashMap<String, String>,
    ) -> TaxonResult<Classification> {
        let input = self.classification_input(chosen)?;
        self.gateway.classify(&input).await
    }

    /// Learned-model classification of the chosen property values
    pub async fn classify_ai(
        &self,
        chosen: &HashMap<String, String>,
    ) -> TaxonResult<AiClassification> {
        let input = self.classification_input(chosen)?;
        self.gateway.classify_ai(&input).await
    }

    /// Build the classifier input: one lowercased entry per known property,
    /// unset selections sent as empty strings. Chosen values must belong to
    /// the named property's domain.
    fn classification_input(
        &self,
        chosen: &HashMap<String, String>,
    ) -> TaxonResult<HashMap<String, String>> {
        let mut input: HashMap<String, String> = self
            .store
            .properties()
            .iter()
            .map(|p| (p.name.to_lowercase(), String::new()))
            .collect();
        for (name, value) in chosen {
            let key = name.to_lowercase();
            let Some(property) = self
                .store
                .properties()
                .iter()
                .find(|p| p.name.to_lowercase() == key)
            else {
                return Err(TaxonError::ValidationError(format!(
                    "unknown property '{}'",
                    name
                )));
            };
            if !value.is_empty() && !self.store.has_possible_value(&property.name, value) {
                return Err(TaxonError::ValidationError(format!(
                    "'{}' is not a possible value of property '{}'",
                    value, property.name
                )));
            }
            input.insert(key, value.clone());
        }
        Ok(input)
    }

    fn property_id(&self, property_name: &str) -> TaxonResult<PropertyId> {
        self.store
            .property_by_name(property_name)
            .map(|p| p.id)
            .ok_or_else(|| {
                TaxonError::InvalidReference(format!("unknown property '{}'", property_name))
            })
    }

    fn resync_selection(&mut self) {
        let changes = self.store.drain_changes();
        self.selection.apply(&self.store, &changes);
    }

    fn valid_new_name(&self, raw: &str, what: &str) -> TaxonResult<String> {
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
