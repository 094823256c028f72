//! EduRAG Store - Storage ports and adapters
//!
//! This crate defines storage ports and provides adapter implementations
//! for chunk and bundle storage, plus on-disk bundle persistence.

pub mod memory;
pub mod persist;
pub mod ports;
