use std::path::PathBuf;

/// Runtime settings shared by the services.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// JSON file holding every guild's timezone records.
    pub data_file: PathBuf,
    /// Leading marker for chat commands, `!` by default.
    pub command_prefix: String,
    pub default_list_count: usize,
    pub max_list_count: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/timezones.json"),
            command_prefix: "!".to_string(),
            default_list_count: 10,
            max_list_count: 50,
        }
    }
}
