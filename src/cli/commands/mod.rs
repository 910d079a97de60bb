pub mod assign;
pub mod audit;
pub mod schema;
