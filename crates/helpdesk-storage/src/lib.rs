//! Helpdesk storage crate - conversation persistence with live/mock fallback.
//!
//! `ConversationStore` talks to an Appwrite document database when one is
//! configured and degrades, permanently, to an in-memory map on the first
//! remote failure.

pub mod appwrite;
pub mod error;
pub mod memory;
pub mod remote;
pub mod store;

pub use appwrite::AppwriteClient;
pub use error::{RemoteError, StorageError};
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use store::ConversationStore;
