// src/lib.rs

pub mod config;
pub mod eventbus;
pub mod platforms;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::BotConfig;
pub use tzbot_common::error::Error;
pub use tzbot_common::models;
