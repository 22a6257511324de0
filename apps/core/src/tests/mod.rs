//! Test Module
//!
//! Cross-module test suite for the Sintomas core.
//!
//! ## Test Categories
//! - `fixtures`: Shared three-class engine and on-disk artifacts
//! - `brain_tests`: Classification, fallback and teaching through the engine
//! - `actor_tests`: Chatbot actor sessions, surveys and shutdown
//! - `integration_tests`: Full startup from files, persistence across restarts

pub mod brain_tests;
pub mod integration_tests;
