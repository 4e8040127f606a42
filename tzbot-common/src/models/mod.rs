pub mod chat;
pub mod timezone;

pub use chat::{ChatMessage, ChatUser};
pub use timezone::{parse_timezone, TimezoneRecord};
