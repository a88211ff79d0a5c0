// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod fuzzy;
pub mod learning;
pub mod overrides;
pub mod persistence;

pub use crate::config::{EngineConfig, Strategy};
pub use crate::core::engine::Autocorrector;
pub use crate::core::model::LanguageModel;
pub use crate::core::types::{EngineStats, Suggestion, SuggestionSource};
pub use crate::error::{Error, Result};
