//! EduRAG API - HTTP adapter
//!
//! Exposes course bundle building, grading, and retrieval over HTTP.

pub mod error;
pub mod routes;
pub mod state;
