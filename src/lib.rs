pub mod engine;
pub mod errors;
pub mod implementations;
pub mod models;
pub mod selection;
pub mod session;
pub mod store;
pub mod traits;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use engine::IntegrityEngine;
pub use errors::{TaxonError, TaxonResult};
pub use implementations::config::GatewayConfig;
pub use implementations::gateway::HttpKnowledgeGateway;
pub use models::{
    entity::{
        ChangeOp, EntityChange, EntityKey, EntityKind, EntityRecord, ItemType, PossibleValue,
        Property, PropertyId, PropertyValueAssignment, TypeId, TypePropertyAssignment,
    },
    report::{AiClassification, Classification, CompletenessReport, IncompleteType},
};
pub use selection::SelectionGraph;
pub use session::EditorSession;
pub use store::EntityStore;
pub use traits::KnowledgeGateway;
