use crate::actors::messages::{AppError, ChatbotMessage};
use crate::brain::{ChatEngine, TeachingSession};
use crate::models::SurveyEntry;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument};

/// A handle to the chatbot actor.
///
/// This is the entry point for the transport layer. Every request is queued to
/// one task that owns the engine, the intent store and the per-conversation
/// teaching sessions, so teaching steps from different users never interleave.
#[derive(Clone)]
pub struct ChatbotHandle {
    sender: mpsc::Sender<ChatbotMessage>,
    request_timeout: Duration,
}

impl ChatbotHandle {
    /// Spawns the actor around `engine` and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(engine: ChatEngine, request_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = ChatbotRunner::new(receiver, engine);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            request_timeout,
        }
    }

    /// Answers a user message within the given conversation.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Identifies the conversation whose teaching state applies.
    /// * `content` - The raw user message.
    ///
    /// # Returns
    ///
    /// The bot's reply text.
    #[instrument(skip(self))]
    pub async fn process_message(
        &self,
        session_id: String,
        content: String,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = ChatbotMessage::ProcessUserMessage {
            session_id,
            content,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Returns the teaching state of a conversation (`Idle` if unknown).
    pub async fn session_state(&self, session_id: String) -> Result<TeachingSession, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(ChatbotMessage::GetSessionState {
                session_id,
                responder: send,
            })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Drops any teaching in progress for a conversation.
    pub async fn reset_session(&self, session_id: String) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(ChatbotMessage::ResetSession {
                session_id,
                responder: send,
            })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Records a satisfaction survey.
    #[instrument(skip(self, entry))]
    pub async fn submit_survey(&self, entry: SurveyEntry) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(ChatbotMessage::SubmitSurvey {
                entry,
                responder: send,
            })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Stops the actor. Later requests fail with `AppError::Actor`.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(ChatbotMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct ChatbotRunner {
    receiver: mpsc::Receiver<ChatbotMessage>,
    engine: ChatEngine,
    sessions: HashMap<String, TeachingSession>,
}

impl ChatbotRunner {
    fn new(receiver: mpsc::Receiver<ChatbotMessage>, engine: ChatEngine) -> Self {
        Self {
            receiver,
            engine,
            sessions: HashMap::new(),
        }
    }

    async fn run(mut self) {
        info!("Chatbot started");
        while let Some(msg) = self.receiver.recv().await {
            if let ChatbotMessage::Shutdown = msg {
                info!("Chatbot shutting down...");
                break;
            }
            self.handle_message(msg);
        }
        info!("Chatbot stopped");
    }

    fn handle_message(&mut self, msg: ChatbotMessage) {
        match msg {
            ChatbotMessage::ProcessUserMessage {
                session_id,
                content,
                responder,
            } => {
                let result = self.handle_user_message(&session_id, &content);
                if let Err(e) = &result {
                    error!("Error processing user message: {:?}", e);
                }
                let _ = responder.send(result);
            }
            ChatbotMessage::GetSessionState {
                session_id,
                responder,
            } => {
                let state = self.sessions.get(&session_id).cloned().unwrap_or_default();
                let _ = responder.send(state);
            }
            ChatbotMessage::ResetSession {
                session_id,
                responder,
            } => {
                self.sessions.remove(&session_id);
                let _ = responder.send(());
            }
            ChatbotMessage::SubmitSurvey { entry, responder } => {
                let result = match self.engine.audit_log() {
                    Some(audit) => audit.submit_survey(&entry),
                    None => Err(AppError::Config("survey log not configured".to_string())),
                };
                if let Err(e) = &result {
                    error!("Error recording survey: {:?}", e);
                }
                let _ = responder.send(result);
            }
            ChatbotMessage::Shutdown => {}
        }
    }

    fn handle_user_message(&mut self, session_id: &str, content: &str) -> Result<String, AppError> {
        info!("Chatbot received [{}]: {}", session_id, content);

        let session = self.sessions.entry(session_id.to_string()).or_default();
        let reply = self.engine.respond(session, content);

        // Idle sessions carry no state worth keeping
        if !session.is_active() {
            self.sessions.remove(session_id);
        }
        reply
    }
}
