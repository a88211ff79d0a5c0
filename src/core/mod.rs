pub mod candidates;
pub mod context;
pub mod engine;
pub mod model;
pub mod scorer;
pub mod types;
pub mod vocabulary;
