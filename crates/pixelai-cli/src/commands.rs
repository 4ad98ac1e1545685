/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Start a fresh conversation.
    NewConversation,
    /// Make another conversation active.
    SwitchConversation(u64),
    /// Delete a conversation; `None` means the active one.
    DeleteConversation(Option<u64>),
    /// Show the conversation list.
    ListConversations,
    /// Attach a file from disk to the next message.
    Attach(String),
    /// Drop a pending attachment by its 1-based position.
    Detach(usize),
    /// Toggle dark/light theme.
    ToggleTheme,
    /// Toggle the conversation list shown before each prompt.
    ToggleSidebar,
    /// Show status (model, credential, pending attachments).
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return CommandResult::NotACommand;
    }

    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/new" => CommandResult::NewConversation,
        "/list" | "/conversations" => CommandResult::ListConversations,

        "/switch" => match arg.parse::<u64>() {
            Ok(id) => CommandResult::SwitchConversation(id),
            Err(_) => CommandResult::Message("Usage: /switch <conversation-id>".into()),
        },
        "/delete" => {
            if arg.is_empty() {
                CommandResult::DeleteConversation(None)
            } else {
                match arg.parse::<u64>() {
                    Ok(id) => CommandResult::DeleteConversation(Some(id)),
                    Err(_) => CommandResult::Message("Usage: /delete [conversation-id]".into()),
                }
            }
        }

        "/attach" | "/image" | "/file" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /attach <path>".into())
            } else {
                CommandResult::Attach(arg.to_string())
            }
        }
        "/detach" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => CommandResult::Detach(n),
            _ => CommandResult::Message("Usage: /detach <attachment-number>".into()),
        },

        "/theme" => CommandResult::ToggleTheme,
        "/sidebar" => CommandResult::ToggleSidebar,
        "/status" => CommandResult::ShowStatus,
        "/version" => CommandResult::Message(format!("PixelAI CLI v{}", env!("CARGO_PKG_VERSION"))),

        _ => CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands.")),
    }
}

fn show_help() -> CommandResult {
    CommandResult::Message(
        "PixelAI CLI Commands:\n\
         \n\
         Conversations:\n\
         \x20 /new              Start a new conversation\n\
         \x20 /list             List conversations\n\
         \x20 /switch <id>      Switch to a conversation\n\
         \x20 /delete [id]      Delete a conversation (default: active)\n\
         \n\
         Attachments:\n\
         \x20 /attach <path>    Attach a file to the next message\n\
         \x20 /detach <n>       Remove pending attachment number n\n\
         \n\
         Display:\n\
         \x20 /theme            Toggle dark/light theme\n\
         \x20 /sidebar          Toggle the conversation list\n\
         \x20 /status           Show model and session status\n\
         \n\
         General:\n\
         \x20 /help             Show this help\n\
         \x20 /version          Show version\n\
         \x20 /quit             Exit"
            .into(),
    )
}
