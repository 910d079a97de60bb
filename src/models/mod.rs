pub mod entity;
pub mod report;

// Re-export common model types
pub use entity::{
    ChangeOp, EntityChange, EntityKey, EntityKind, EntityRecord, ItemType, PossibleValue, Property,
    PropertyId, PropertyValueAssignment, TypeId, TypePropertyAssignment,
};
pub use report::{AiClassification, Classification, CompletenessReport, IncompleteType};
