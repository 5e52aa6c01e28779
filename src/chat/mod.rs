//! Guest chat: the remote handler seam and the client-side conversation.

pub mod endpoint;
pub mod session;

pub use endpoint::{ACKNOWLEDGEMENT, ChatEndpoint, ChatError, ChatRequest, HttpChatEndpoint};
pub use session::{APOLOGY, ChatSession, ChatSettings, PendingSend};
