//! Actor front-end: all engine access goes through a single task, so the
//! intent store and the teaching sessions are never touched concurrently.

pub mod chatbot;
pub mod messages;

pub use chatbot::ChatbotHandle;
pub use messages::ChatbotMessage;
