use crate::brain::TeachingSession;
use crate::models::SurveyEntry;
use tokio::sync::oneshot;

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the chatbot actor.
#[derive(Debug)]
pub enum ChatbotMessage {
    /// A request to answer a user's message within a conversation.
    ProcessUserMessage {
        session_id: String,
        content: String,
        /// A channel to send the bot's reply back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
    /// A request for the current teaching state of a conversation.
    GetSessionState {
        session_id: String,
        responder: oneshot::Sender<TeachingSession>,
    },
    /// Abandons any teaching in progress for a conversation.
    ResetSession {
        session_id: String,
        responder: oneshot::Sender<()>,
    },
    /// A satisfaction survey to append to the survey log.
    SubmitSurvey {
        entry: SurveyEntry,
        responder: oneshot::Sender<Result<(), AppError>>,
    },
    /// A command to stop the actor loop.
    Shutdown,
}
