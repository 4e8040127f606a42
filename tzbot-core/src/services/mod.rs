// File: src/services/mod.rs

pub mod builtin_commands;
pub mod command_service;
pub mod message_service;

pub use command_service::{CommandContext, CommandResponse, CommandService};
pub use message_service::MessageService;
