pub mod json;
pub mod table;

use clap::ValueEnum;

/// How command results reach stdout.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables and key/value listings
    #[default]
    Text,
    /// Normalized payloads as pretty JSON, for scripting
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == OutputFormat::Json
    }
}
