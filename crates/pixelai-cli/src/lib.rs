// Library interface for pixelai-cli
// This allows integration tests to access internal modules

// NOTE: commands.rs and theme.rs are also declared in main.rs, so they are
// pulled in by path to avoid "file loaded multiple times" errors.

#[path = "commands.rs"]
pub mod commands;

#[path = "theme.rs"]
pub mod theme;

pub use commands::{handle_command, CommandResult};
pub use theme::{Theme, ViewState};
