//! External-service boundary and offline companion replies.
//!
//! # Responsibility
//! - Describe weather/chat/voice failures as `ExternalServiceError`.
//! - Convert those failures into user-visible messages at the boundary.
//! - Provide keyword and canned replies used when no chat credential is set.
//!
//! # Invariants
//! - External-service errors never reach the stores or the breathing engine.
//! - Replies are deterministic for a given input and turn number.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pass-through integrations that live outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalService {
    Weather,
    Chat,
    Voice,
}

impl ExternalService {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Chat => "chat",
            Self::Voice => "voice",
        }
    }
}

/// Failure of a network/API collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalServiceError {
    /// No credential configured for the service.
    Unconfigured(ExternalService),
    /// The request failed before a response arrived.
    Request {
        service: ExternalService,
        message: String,
    },
    /// The service answered with something unusable.
    InvalidResponse {
        service: ExternalService,
        message: String,
    },
}

impl ExternalServiceError {
    pub fn service(&self) -> ExternalService {
        match self {
            Self::Unconfigured(service) => *service,
            Self::Request { service, .. } | Self::InvalidResponse { service, .. } => *service,
        }
    }

    /// Message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unconfigured(ExternalService::Weather) => {
                "Please enter an OpenWeatherMap API key to get weather data.".to_string()
            }
            Self::Unconfigured(ExternalService::Chat) => {
                "For personalized responses, please add your OpenAI API key.".to_string()
            }
            Self::Unconfigured(ExternalService::Voice) => {
                "Voice input is not available on this device.".to_string()
            }
            Self::Request { service, .. } => format!(
                "Could not reach the {} service. Check your internet connection.",
                service.as_str()
            ),
            Self::InvalidResponse { service, message } => {
                format!("Error from the {} service: {message}", service.as_str())
            }
        }
    }
}

impl Display for ExternalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured(service) => write!(f, "{} service is not configured", service.as_str()),
            Self::Request { service, message } => {
                write!(f, "{} request failed: {message}", service.as_str())
            }
            Self::InvalidResponse { service, message } => {
                write!(f, "{} returned an invalid response: {message}", service.as_str())
            }
        }
    }
}

impl Error for ExternalServiceError {}

/// Runs an external call and turns any failure into a displayable message.
pub fn call_at_boundary<T>(
    call: impl FnOnce() -> Result<T, ExternalServiceError>,
) -> Result<T, String> {
    call().map_err(|err| {
        // A missing credential is a configuration choice, not a failure.
        if matches!(err, ExternalServiceError::Unconfigured(_)) {
            info!(
                "event=external_call module=support status=skipped service={}",
                err.service().as_str()
            );
        } else {
            warn!(
                "event=external_call module=support status=error service={} error={}",
                err.service().as_str(),
                err
            );
        }
        err.user_message()
    })
}

const KEYWORD_REPLIES: &[(&str, &str)] = &[
    ("hello", "Hello! How are you feeling today?"),
    ("how are you", "I'm here to help you. How are you doing?"),
    (
        "feeling sad",
        "I'm sorry to hear that. Remember that it's okay to feel sad sometimes. Would you like to try a breathing exercise?",
    ),
    (
        "feeling happy",
        "That's wonderful to hear! It's great that you're having a good day.",
    ),
    ("breathing", "Would you like to start a guided breathing exercise?"),
    ("journal", "Would you like to write in your journal today?"),
    ("mood", "Would you like to record your mood today?"),
    (
        "help",
        "I'm here to help with guided breathing, journaling, mood tracking, and more. What would you like assistance with?",
    ),
];

const FALLBACK_REPLIES: &[&str] = &[
    "I'm here to listen. What's been on your mind lately?",
    "It sounds like you're going through a lot. Remember to be kind to yourself.",
    "Have you tried any breathing exercises when you feel this way?",
    "Acknowledging your feelings is an important step. What support do you need right now?",
    "Remember that it's okay to ask for help when you need it.",
    "Self-care is important. What's one small thing you could do for yourself today?",
    "I'm here to support you. Would you like to talk more about what you're experiencing?",
];

/// Reply for a recognised keyword in `input`, first match wins.
pub fn keyword_reply(input: &str) -> Option<&'static str> {
    let lowered = input.to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, reply)| *reply)
}

/// Offline reply: keyword match first, otherwise a canned reply rotated by turn.
pub fn offline_reply(input: &str, turn: usize) -> &'static str {
    keyword_reply(input).unwrap_or(FALLBACK_REPLIES[turn % FALLBACK_REPLIES.len()])
}
