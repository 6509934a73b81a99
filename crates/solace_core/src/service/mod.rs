//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate stores and the breathing engine into use-case level APIs.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod companion_service;
