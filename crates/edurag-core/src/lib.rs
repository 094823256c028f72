//! EduRAG Core - Domain models, configuration, and text processing
//!
//! This crate contains the core domain logic for the EduRAG system: course
//! documents, chunking, result records, and citation verification.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod processing;
pub mod verify;

pub use error::{EduragError, Result};
