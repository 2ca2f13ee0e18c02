//! Core functionality for path mapping, documents, and configuration

pub mod config;
pub mod document;
pub mod error;
pub mod file_system;
pub mod metadata;
pub mod render;
pub mod store;
