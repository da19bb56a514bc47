//! Defines the WebSocket message protocol between the browser client and the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tutor_core::event::SessionEvent;

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A chunk of user audio (base64 encoded), to be transcribed and routed
    /// to the active agent.
    Audio { data: String },
    /// A text message from the user to the active agent.
    Text { content: String },
    /// A control message steering the session itself.
    Control {
        action: ControlAction,
        #[serde(default)]
        data: Option<Value>,
    },
}

/// The control operations a client may request.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    SwitchAgent,
    Stop,
    Restart,
    /// Any unrecognized action; handled as a logged no-op.
    #[serde(other)]
    Unknown,
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A fragment of the agent's text response.
    TextDelta { content: String },
    /// A chunk of agent audio (base64 encoded).
    AudioDelta { data: String },
    /// The current response is complete.
    ResponseDone,
    /// An agent handoff occurred.
    AgentSwitched { agent: String },
    /// A tool/function call for visual feedback or step completion.
    ToolCall { function: String, arguments: Value },
    /// An error surfaced to the client.
    Error { message: String },
}

impl From<SessionEvent> for ServerMessage {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::TranscriptDelta { text } => ServerMessage::TextDelta { content: text },
            SessionEvent::AudioDelta { data } => ServerMessage::AudioDelta { data },
            SessionEvent::ResponseDone => ServerMessage::ResponseDone,
            SessionEvent::AgentSwitched { agent } => ServerMessage::AgentSwitched { agent },
            SessionEvent::ToolCall {
                function,
                arguments,
            } => ServerMessage::ToolCall {
                function,
                arguments,
            },
            SessionEvent::Error { message } => ServerMessage::Error { message },
        }
    }
}
