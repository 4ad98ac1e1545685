use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use pixelai_core::{
    Attachment, ChatSession, LlmClient, Message, PendingRequest, PixelError, SendStart, Settings,
    Speaker,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::{handle_command, CommandResult};
use crate::theme::{Theme, ViewState};

fn build_session(settings: &Settings) -> (ChatSession, Arc<dyn LlmClient>) {
    let api_key = settings.credential();
    let client: Arc<dyn LlmClient> =
        Arc::new(settings.build_client(api_key.clone().unwrap_or_default()));
    let session = ChatSession::new(api_key).with_api_key_env(settings.api.api_key_env.clone());
    (session, client)
}

async fn load_attachments(session: &mut ChatSession, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let attachment = Attachment::from_path(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        session.attach(attachment);
    }
    Ok(())
}

// ── Single prompt ───────────────────────────────────────────────────────

pub async fn run_single_prompt(settings: &Settings, prompt: &str, files: &[PathBuf]) -> Result<()> {
    let (mut session, client) = build_session(settings);
    load_attachments(&mut session, files).await?;

    session.send(prompt, client.as_ref()).await;

    match session.messages().last() {
        Some(m) if m.speaker == Speaker::Assistant => println!("{}", m.text),
        _ => eprintln!("Nothing to send: provide a prompt or an attachment."),
    }
    Ok(())
}

// ── Interactive REPL ────────────────────────────────────────────────────

type Completion = (PendingRequest, Result<Value, PixelError>);

struct Repl {
    session: ChatSession,
    client: Arc<dyn LlmClient>,
    view: ViewState,
    model: String,
    done_tx: mpsc::UnboundedSender<Completion>,
}

pub async fn run_repl(settings: Settings) -> Result<()> {
    let (session, client) = build_session(&settings);
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let mut repl = Repl {
        session,
        client,
        view: ViewState::new(settings.ui.dark_mode, settings.ui.sidebar_open),
        model: settings.api.model.clone(),
        done_tx,
    };

    repl.banner()?;
    if !repl.session.has_credential() {
        repl.notice(
            &format!(
                "No API key found in ${}; messages will not be sent.",
                settings.api.api_key_env
            ),
            repl.view.theme().warning,
        )?;
    }
    repl.sidebar()?;
    repl.prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !repl.handle_line(&line).await? {
                    break;
                }
                repl.prompt()?;
            }
            Some((pending, outcome)) = done_rx.recv() => {
                repl.finish(pending, outcome)?;
                repl.prompt()?;
            }
        }
    }

    Ok(())
}

impl Repl {
    /// Returns `false` when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> Result<bool> {
        let theme = self.view.theme();
        match handle_command(line) {
            CommandResult::Quit => return Ok(false),
            CommandResult::Message(msg) => self.notice(&msg, theme.fg)?,
            CommandResult::NewConversation => {
                let id = self.session.new_conversation();
                self.notice(&format!("Started conversation {id}."), theme.muted)?;
                self.sidebar()?;
            }
            CommandResult::SwitchConversation(id) => {
                if self.session.switch_conversation(id) {
                    self.transcript()?;
                } else {
                    self.notice(&format!("No conversation {id}."), theme.warning)?;
                }
            }
            CommandResult::DeleteConversation(id) => {
                let id = id.unwrap_or_else(|| self.session.store().active_id());
                if self.session.store().contains(id) {
                    self.session.delete_conversation(id);
                    self.notice(&format!("Deleted conversation {id}."), theme.muted)?;
                    self.sidebar()?;
                    self.transcript()?;
                } else {
                    self.notice(&format!("No conversation {id}."), theme.warning)?;
                }
            }
            CommandResult::ListConversations => self.conversation_list()?,
            CommandResult::Attach(path) => match Attachment::from_path(&path).await {
                Ok(attachment) => {
                    let line = format!(
                        "Attached {} ({}, {} bytes).",
                        attachment.display_name, attachment.mime_type, attachment.size_bytes
                    );
                    self.session.attach(attachment);
                    self.notice(&line, theme.muted)?;
                }
                Err(e) => self.notice(&format!("Could not attach {path}: {e}"), theme.error)?,
            },
            CommandResult::Detach(n) => match self.session.remove_attachment(n - 1) {
                Some(a) => self.notice(&format!("Removed {}.", a.display_name), theme.muted)?,
                None => self.notice(&format!("No attachment {n}."), theme.warning)?,
            },
            CommandResult::ToggleTheme => {
                let dark = self.view.toggle_theme();
                let name = if dark { "dark" } else { "light" };
                self.notice(&format!("Theme: {name}"), self.view.theme().accent)?;
            }
            CommandResult::ToggleSidebar => {
                self.view.toggle_sidebar();
                self.sidebar()?;
            }
            CommandResult::ShowStatus => self.status()?,
            CommandResult::NotACommand => self.dispatch(line)?,
        }
        Ok(true)
    }

    fn dispatch(&mut self, text: &str) -> Result<()> {
        let theme = self.view.theme();
        if self.session.is_busy() {
            return self.notice("Still waiting for the previous reply.", theme.muted);
        }

        match self.session.begin_send(text) {
            SendStart::Dispatched(pending) => {
                self.notice("Thinking...", theme.muted)?;
                let client = Arc::clone(&self.client);
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let outcome = client.generate_content(&pending.request).await;
                    let _ = done_tx.send((pending, outcome));
                });
            }
            SendStart::Refused => {
                if let Some(warning) = self.session.messages().last() {
                    self.render_message(warning)?;
                }
            }
            SendStart::Ignored => {}
        }
        Ok(())
    }

    fn finish(&mut self, pending: PendingRequest, outcome: Result<Value, PixelError>) -> Result<()> {
        let conversation_id = pending.conversation_id;
        let text = self.session.complete(pending, outcome);
        tracing::debug!(conversation_id, "reply filed");

        if conversation_id == self.session.store().active_id() {
            self.render_message(&Message::assistant(text))
        } else {
            self.notice(
                &format!("Reply received in conversation {conversation_id}."),
                self.view.theme().accent,
            )
        }
    }

    // ── Rendering ──

    fn banner(&self) -> Result<()> {
        let theme = self.view.theme();
        let mut out = std::io::stdout();
        queue!(
            out,
            SetForegroundColor(theme.accent),
            Print("PIXEL-AI"),
            SetForegroundColor(theme.muted),
            Print(format!("  AI Assistant ({}) - /help for commands\n", self.model)),
            ResetColor
        )?;
        out.flush()?;
        Ok(())
    }

    fn prompt(&self) -> Result<()> {
        let theme = self.view.theme();
        let drafts = self.session.pending_attachments().len();
        let mut label = format!("[{}", self.session.store().active_id());
        if drafts > 0 {
            label.push_str(&format!(" +{drafts}"));
        }
        label.push(']');

        let mut out = std::io::stdout();
        queue!(
            out,
            SetForegroundColor(theme.muted),
            Print(label),
            SetForegroundColor(theme.user_color),
            Print(" you> "),
            ResetColor
        )?;
        out.flush()?;
        Ok(())
    }

    fn notice(&self, text: &str, color: Color) -> Result<()> {
        let mut out = std::io::stdout();
        queue!(out, SetForegroundColor(color), Print(text), Print("\n"), ResetColor)?;
        out.flush()?;
        Ok(())
    }

    fn render_message(&self, message: &Message) -> Result<()> {
        let theme = self.view.theme();
        let (label, color) = match message.speaker {
            Speaker::User => ("you", theme.user_color),
            Speaker::Assistant => ("ai", theme.assistant_color),
        };

        let mut out = std::io::stdout();
        queue!(
            out,
            SetForegroundColor(color),
            Print(format!("{label}> ")),
            SetForegroundColor(theme.fg),
            Print(&message.text),
            Print("\n")
        )?;
        for a in &message.attachments {
            queue!(
                out,
                SetForegroundColor(theme.muted),
                Print(format!("  📎 {} ({} bytes)\n", a.display_name, a.size_bytes))
            )?;
        }
        queue!(out, ResetColor)?;
        out.flush()?;
        Ok(())
    }

    fn transcript(&self) -> Result<()> {
        let active = self.session.store().active();
        self.notice(&format!("── {} ──", active.title), self.view.theme().accent)?;
        for message in active.messages() {
            self.render_message(message)?;
        }
        Ok(())
    }

    fn sidebar(&self) -> Result<()> {
        if self.view.sidebar_open {
            self.conversation_list()?;
        }
        Ok(())
    }

    fn conversation_list(&self) -> Result<()> {
        let theme = self.view.theme();
        let active = self.session.store().active_id();
        for conv in self.session.store().iter() {
            let marker = if conv.id == active { "*" } else { " " };
            let color = if conv.id == active { theme.accent } else { theme.muted };
            self.notice(
                &format!("{marker} {:>3}  {} ({} messages)", conv.id, conv.title, conv.len()),
                color,
            )?;
        }
        Ok(())
    }

    fn status(&self) -> Result<()> {
        let theme: Theme = self.view.theme();
        let credential = if self.session.has_credential() {
            "configured"
        } else {
            "missing"
        };
        let mut lines = vec![
            format!("Model:         {}", self.model),
            format!("API key:       {credential}"),
            format!("Conversation:  {}", self.session.store().active_id()),
            format!("Busy:          {}", self.session.is_busy()),
            format!("Theme:         {}", theme.name),
        ];
        for (i, a) in self.session.pending_attachments().iter().enumerate() {
            lines.push(format!("Attachment {}:  {} ({})", i + 1, a.display_name, a.mime_type));
        }
        self.notice(&lines.join("\n"), theme.fg)
    }
}
