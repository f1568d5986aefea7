//! gymlog - Workout session tracker bot
//!
//! Menu-driven dialogue that records muscle group, duration and weight per
//! training and reports totals back to the chat.

pub mod bot;
pub mod console;
pub mod engine;
pub mod error;
pub mod motivation;
pub mod report;
pub mod store;

pub use engine::{ConversationEngine, ConversationHandler};
pub use store::UserStore;
