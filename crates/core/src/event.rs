//! Events produced by session logic for delivery to the transport layer.

use serde_json::Value;

/// One unit of outbound information from a session.
///
/// Events are immutable once constructed; they are enqueued by session
/// logic and consumed exactly once by the transport adapter.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A fragment of transcribed or generated text.
    TranscriptDelta { text: String },
    /// A chunk of generated audio (base64 encoded, passed through opaque).
    AudioDelta { data: String },
    /// The current logical response is complete.
    ResponseDone,
    /// The session's active agent changed.
    AgentSwitched { agent: String },
    /// A structured side-effect notification from the active agent.
    ToolCall { function: String, arguments: Value },
    /// A recoverable fault surfaced to the client.
    Error { message: String },
}
