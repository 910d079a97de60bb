use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::TaxonResult;
use crate::models::entity::{ItemType, PossibleValue, Property, PropertyId, TypeId};
use crate::models::report::{AiClassification, Classification, CompletenessReport};

/// Request/response boundary to the external persistence and reasoning
/// service.
///
/// Every mutating editor operation issues the matching request here first and
/// applies its local cascade only after the request reports success. Read
/// operations populate or refresh the entity store and never trigger
/// cascades themselves.
#[async_trait]
pub trait KnowledgeGateway: Send + Sync {
    async fn list_types(&self) -> TaxonResult<Vec<ItemType>>;

    async fn create_type(&self, name: &str) -> TaxonResult<ItemType>;

    async fn delete_type(&self, type_id: TypeId) -> TaxonResult<()>;

    async fn list_properties(&self) -> TaxonResult<Vec<Property>>;

    async fn create_property(&self, name: &str) -> TaxonResult<Property>;

    async fn delete_property(&self, property_id: PropertyId) -> TaxonResult<()>;

    async fn list_possible_values(&self, property_name: &str) -> TaxonResult<Vec<PossibleValue>>;

    async fn create_possible_value(
        &self,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<PossibleValue>;

    async fn delete_possible_value(&self, property_name: &str, value: &str) -> TaxonResult<()>;

    /// Names of the properties applicable to a type
    async fn list_type_properties(&self, type_id: TypeId) -> TaxonResult<Vec<String>>;

    async fn assign_property(&self, type_id: TypeId, property_name: &str) -> TaxonResult<()>;

    async fn unassign_property(&self, type_id: TypeId, property_name: &str) -> TaxonResult<()>;

    /// Values assigned for a (type, property) pair
    async fn list_property_values(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
    ) -> TaxonResult<Vec<String>>;

    async fn assign_values(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
        values: &[String],
    ) -> TaxonResult<()>;

    async fn remove_value(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
        value: &str,
    ) -> TaxonResult<()>;

    async fn check_completeness(&self) -> TaxonResult<CompletenessReport>;

    /// Rule-based classification of a property-value selection
    async fn classify(&self, properties: &HashMap<String, String>) -> TaxonResult<Classification>;

    /// Learned-model classification of a property-value selection
    async fn classify_ai(
        &self,
        properties: &HashMap<String, String>,
    ) -> TaxonResult<AiClassification>;
}
