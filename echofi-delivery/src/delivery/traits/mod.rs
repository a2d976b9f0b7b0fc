//! Trait boundaries for the external collaborators of the delivery core
//!
//! The encrypted transport and the fallback endpoint are foreign resources
//! injected in full at construction time. In production these wrap the
//! messaging SDK and an HTTP client; in tests they are scripted mocks.

mod conversation;
mod fallback;

pub use conversation::{ConversationHandle, ConversationInfo, ConversationMessage};
pub use fallback::{FallbackAck, FallbackPayload, FallbackTransport};
