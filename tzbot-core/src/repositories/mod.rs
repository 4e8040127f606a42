// src/repositories/mod.rs

pub use tzbot_common::traits::repository_traits::TimezoneRepository;

pub use json::timezones::JsonTimezoneRepository;

pub mod json;
