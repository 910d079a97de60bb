use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::{TaxonError, TaxonResult};
use crate::models::entity::{
    EntityRecord, ItemType, PossibleValue, Property, PropertyId, TypeId, TypePropertyAssignment,
};
use crate::models::report::{AiClassification, Classification, CompletenessReport};
use crate::session::EditorSession;
use crate::store::EntityStore;
use crate::traits::gateway::KnowledgeGateway;

// Initialize logging once for test debugging; repeated init attempts are fine
pub fn setup() {
    let _ = env_logger::try_init();
    let _ = dotenv::dotenv();
}

/// Shared observable state of a [`StubGateway`], kept by the test while the
/// session owns the gateway itself
#[derive(Clone, Default)]
pub struct StubState {
    fail: Arc<AtomicBool>,
    next_id: Arc<AtomicU64>,
    calls: Arc<Mutex<Vec<String>>>,
    classify_input: Arc<Mutex<Option<HashMap<String, String>>>>,
}

impl StubState {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn classify_input(&self) -> Option<HashMap<String, String>> {
        self.classify_input.lock().unwrap().clone()
    }
}

/// In-memory gateway double: confirms every request, hands out incrementing
/// ids, and records the calls it saw
pub struct StubGateway {
    state: StubState,
}

impl StubGateway {
    pub fn new(state: StubState) -> Self {
        Self { state }
    }

    fn record(&self, call: impl Into<String>) -> TaxonResult<()> {
        self.state.calls.lock().unwrap().push(call.into());
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(TaxonError::RemoteRequestError(
                "service unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl KnowledgeGateway for StubGateway {
    async fn list_types(&self) -> TaxonResult<Vec<ItemType>> {
        self.record("GET types")?;
        Ok(Vec::new())
    }

    async fn create_type(&self, name: &str) -> TaxonResult<ItemType> {
        self.record(format!("POST types {}", name))?;
        Ok(ItemType {
            id: self.next_id(),
            name: name.to_string(),
        })
    }

    async fn delete_type(&self, type_id: TypeId) -> TaxonResult<()> {
        self.record(format!("DELETE types/{}", type_id))
    }

    async fn list_properties(&self) -> TaxonResult<Vec<Property>> {
        self.record("GET properties")?;
        Ok(Vec::new())
    }

    async fn create_property(&self, name: &str) -> TaxonResult<Property> {
        self.record(format!("POST properties {}", name))?;
        Ok(Property {
            id: self.next_id(),
            name: name.to_string(),
        })
    }

    async fn delete_property(&self, property_id: PropertyId) -> TaxonResult<()> {
        self.record(format!("DELETE properties/{}", property_id))
    }

    async fn list_possible_values(&self, property_name: &str) -> TaxonResult<Vec<PossibleValue>> {
        self.record(format!("GET possible-values/{}", property_name))?;
        Ok(Vec::new())
    }

    async fn create_possible_value(
        &self,
        property_name: &str,
        value: &str,
    ) -> TaxonResult<PossibleValue> {
        self.record(format!("POST possible-values/{} {}", property_name, value))?;
        Ok(PossibleValue {
            property_name: property_name.to_string(),
            value: value.to_string(),
        })
    }

    async fn delete_possible_value(&self, property_name: &str, value: &str) -> TaxonResult<()> {
        self.record(format!("DELETE possible-values/{}/{}", property_name, value))
    }

    async fn list_type_properties(&self, type_id: TypeId) -> TaxonResult<Vec<String>> {
        self.record(format!("GET type-properties/{}", type_id))?;
        Ok(Vec::new())
    }

    async fn assign_property(&self, type_id: TypeId, property_name: &str) -> TaxonResult<()> {
        self.record(format!("POST type-properties/{} {}", type_id, property_name))
    }

    async fn unassign_property(&self, type_id: TypeId, property_name: &str) -> TaxonResult<()> {
        self.record(format!(
            "DELETE type-properties/{}/{}",
            type_id, property_name
        ))
    }

    async fn list_property_values(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
    ) -> TaxonResult<Vec<String>> {
        self.record(format!("GET property-values/{}/{}", type_id, property_id))?;
        Ok(Vec::new())
    }

    async fn assign_values(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
        values: &[String],
    ) -> TaxonResult<()> {
        self.record(format!(
            "POST property-values/{}/{} {}",
            type_id,
            property_id,
            values.join(",")
        ))
    }

    async fn remove_value(
        &self,
        type_id: TypeId,
        property_id: PropertyId,
        value: &str,
    ) -> TaxonResult<()> {
        self.record(format!(
            "DELETE property-values/{}/{}/{}",
            type_id, property_id, value
        ))
    }

    async fn check_completeness(&self) -> TaxonResult<CompletenessReport> {
        self.record("GET completeness-check")?;
        Ok(CompletenessReport {
            incomplete_types: Vec::new(),
            properties_without_values: Vec::new(),
            received_at: Utc::now(),
        })
    }

    async fn classify(&self, properties: &HashMap<String, String>) -> TaxonResult<Classification> {
        self.record("POST classify")?;
        *self.state.classify_input.lock().unwrap() = Some(properties.clone());
        Ok(Classification {
            type_name: "Unknown".to_string(),
            explanation: Vec::new(),
        })
    }

    async fn classify_ai(
        &self,
        properties: &HashMap<String, String>,
    ) -> TaxonResult<AiClassification> {
        self.record("POST classify-ai")?;
        *self.state.classify_input.lock().unwrap() = Some(properties.clone());
        Ok(AiClassification {
            type_name: "Unknown".to_string(),
            explanation: Vec::new(),
            probabilities: HashMap::new(),
        })
    }
}

/// A session backed by a stub gateway, plus the handle observing it
pub fn stub_session() -> (StubState, EditorSession) {
    setup();
    let state = StubState::default();
    let session = EditorSession::new(Box::new(StubGateway::new(state.clone())));
    (state, session)
}

/// A store populated directly, bypassing the service flow: two types, two
/// properties with domains, and assignments for the first type
pub fn seeded_store() -> EntityStore {
    let mut store = EntityStore::new();
    store.put(EntityRecord::Type(ItemType {
        id: 1,
        name: "Lamp".to_string(),
    }));
    store.put(EntityRecord::Type(ItemType {
        id: 2,
        name: "Chair".to_string(),
    }));
    store.put(EntityRecord::Property(Property {
        id: 1,
        name: "Color".to_string(),
    }));
    store.put(EntityRecord::Property(Property {
        id: 2,
        name: "Material".to_string(),
    }));
    for value in ["red", "blue"] {
        store.put(EntityRecord::PossibleValue(PossibleValue {
            property_name: "Color".to_string(),
            value: value.to_string(),
        }));
    }
    store.put(EntityRecord::PossibleValue(PossibleValue {
        property_name: "Material".to_string(),
        value: "wood".to_string(),
    }));
    for property_name in ["Color", "Material"] {
        store.put(EntityRecord::TypeProperty(TypePropertyAssignment {
            type_id: 1,
            property_name: property_name.to_string(),
        }));
    }
    store.drain_changes();
    store
}
