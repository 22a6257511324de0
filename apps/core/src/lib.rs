// Sintomas Core Library
// Intent classification, teaching dialogue and the chatbot actor

pub mod actors;
pub mod audit_log;
pub mod brain;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod models;
pub mod preflight;
pub mod store;

#[cfg(test)]
mod tests;
