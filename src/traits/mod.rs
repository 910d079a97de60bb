pub mod gateway;

// Re-export traits
pub use gateway::KnowledgeGateway;
