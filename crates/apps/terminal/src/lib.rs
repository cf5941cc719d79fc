//! Terminal session backed by the desktop runtime's command evaluator.
//!
//! A [`TerminalSession`] is the state behind one terminal window: the visible transcript, the
//! submitted-command history, and the history cursor used for recall. Each submitted line is
//! handed to [`DesktopRuntime::evaluate`] with the session's window as context.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use desktop_runtime::{DesktopRuntime, WindowId};
use platform_host::{
    load_app_state_with_migration, migrate_envelope_payload, save_app_state_with,
    AppStateEnvelope, AppStateStore, TERMINAL_STATE_NAMESPACE,
};
use serde::{Deserialize, Serialize};
use system_shell_contract::ShellExit;

const TERMINAL_STATE_SCHEMA_VERSION: u32 = 1;
/// Transcript entries kept before the oldest are dropped.
pub const MAX_TERMINAL_ENTRIES: usize = 200;
/// Submitted commands kept for recall.
pub const MAX_HISTORY_ENTRIES: usize = 100;
/// Lines shown when a session starts.
pub const BANNER: [&str; 2] = [
    "FluxoOS Terminal v1.0.0",
    "Type 'help' for available commands.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// One line group in the terminal transcript.
pub enum TerminalTranscriptEntry {
    /// Echo of a submitted command.
    Prompt {
        /// Command as typed.
        command: String,
    },
    /// Command output, possibly spanning several lines.
    Output {
        /// Output text.
        text: String,
    },
    /// Rendered command failure.
    Error {
        /// `Error: ...` line.
        text: String,
    },
    /// Session banner and notices.
    System {
        /// Notice text.
        text: String,
    },
}

impl TerminalTranscriptEntry {
    /// Text as displayed in the transcript.
    pub fn render(&self) -> String {
        match self {
            Self::Prompt { command } => format!("$ {command}"),
            Self::Output { text } | Self::Error { text } | Self::System { text } => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TerminalPersistedState {
    transcript: Vec<TerminalTranscriptEntry>,
    history: Vec<String>,
}

fn migrate_terminal_state(
    schema_version: u32,
    envelope: &AppStateEnvelope,
) -> Result<Option<TerminalPersistedState>, String> {
    match schema_version {
        0 => migrate_envelope_payload(envelope).map(Some),
        _ => Ok(None),
    }
}

fn default_terminal_transcript() -> Vec<TerminalTranscriptEntry> {
    BANNER
        .iter()
        .map(|text| TerminalTranscriptEntry::System {
            text: (*text).to_string(),
        })
        .collect()
}

fn truncate_front<T>(entries: &mut Vec<T>, max: usize) {
    if entries.len() > max {
        let overflow = entries.len() - max;
        entries.drain(0..overflow);
    }
}

#[derive(Debug, Clone, PartialEq)]
/// State of one terminal window.
pub struct TerminalSession {
    window_id: Option<WindowId>,
    transcript: Vec<TerminalTranscriptEntry>,
    history: Vec<String>,
    history_cursor: Option<usize>,
    last_exit: ShellExit,
}

impl TerminalSession {
    /// Starts a session showing the banner.
    pub fn new(window_id: Option<WindowId>) -> Self {
        Self {
            window_id,
            transcript: default_terminal_transcript(),
            history: Vec::new(),
            history_cursor: None,
            last_exit: ShellExit::success(),
        }
    }

    /// Exit status of the most recent command.
    pub fn last_exit(&self) -> &ShellExit {
        &self.last_exit
    }

    /// Window this session runs in.
    pub fn window_id(&self) -> Option<&WindowId> {
        self.window_id.as_ref()
    }

    /// Transcript entries, oldest first.
    pub fn transcript(&self) -> &[TerminalTranscriptEntry] {
        &self.transcript
    }

    /// Transcript rendered as display lines.
    pub fn rendered_lines(&self) -> Vec<String> {
        self.transcript
            .iter()
            .map(TerminalTranscriptEntry::render)
            .collect()
    }

    /// Submitted commands, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Runs one submitted line and returns the entries it appended.
    ///
    /// Blank lines do nothing. `clear` empties the transcript without echoing.
    pub fn submit(
        &mut self,
        runtime: &mut DesktopRuntime,
        line: &str,
    ) -> &[TerminalTranscriptEntry] {
        let command = line.trim();
        if command.is_empty() {
            return &[];
        }
        self.remember(command);

        if command == "clear" {
            self.last_exit = ShellExit::success();
            self.transcript.clear();
            return &[];
        }

        let start = self.transcript.len();
        self.transcript.push(TerminalTranscriptEntry::Prompt {
            command: line.to_string(),
        });
        let result = runtime.evaluate(line, self.window_id.as_ref());
        self.last_exit = match &result {
            Ok(_) => ShellExit::success(),
            Err(err) => ShellExit::from_error(err),
        };
        match result {
            Ok(text) if text.is_empty() => {}
            Ok(text) => self.transcript.push(TerminalTranscriptEntry::Output { text }),
            Err(err) => {
                tracing::debug!(code = ?err.code, message = %err.message, "terminal command failed");
                self.transcript.push(TerminalTranscriptEntry::Error {
                    text: err.display_line(),
                });
            }
        }

        let appended = self.transcript.len() - start;
        truncate_front(&mut self.transcript, MAX_TERMINAL_ENTRIES);
        let first_new = self.transcript.len().saturating_sub(appended);
        &self.transcript[first_new..]
    }

    fn remember(&mut self, command: &str) {
        if self.history.last().map(String::as_str) != Some(command) {
            self.history.push(command.to_string());
            truncate_front(&mut self.history, MAX_HISTORY_ENTRIES);
        }
        self.history_cursor = None;
    }

    /// Steps back through history, stopping at the oldest command.
    pub fn history_previous(&mut self) -> Option<&str> {
        if self.history.is_empty() {
            return None;
        }
        let cursor = match self.history_cursor {
            Some(cursor) => cursor.saturating_sub(1),
            None => self.history.len() - 1,
        };
        self.history_cursor = Some(cursor);
        self.history.get(cursor).map(String::as_str)
    }

    /// Steps forward through history. Returns `None` once past the newest command.
    pub fn history_next(&mut self) -> Option<&str> {
        let cursor = self.history_cursor? + 1;
        if cursor >= self.history.len() {
            self.history_cursor = None;
            return None;
        }
        self.history_cursor = Some(cursor);
        self.history.get(cursor).map(String::as_str)
    }

    /// Restores transcript and history saved by [`Self::save`].
    ///
    /// Returns `true` when saved state was found. Load failures are logged and ignored.
    pub async fn restore<S: AppStateStore + ?Sized>(&mut self, store: &S) -> bool {
        let restored = match load_app_state_with_migration(
            store,
            TERMINAL_STATE_NAMESPACE,
            TERMINAL_STATE_SCHEMA_VERSION,
            migrate_terminal_state,
        )
        .await
        {
            Ok(Some(restored)) => restored,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(error = %err, "terminal hydrate failed");
                return false;
            }
        };
        let TerminalPersistedState {
            mut transcript,
            mut history,
        } = restored;
        truncate_front(&mut transcript, MAX_TERMINAL_ENTRIES);
        truncate_front(&mut history, MAX_HISTORY_ENTRIES);
        self.transcript = transcript;
        self.history = history;
        self.history_cursor = None;
        true
    }

    /// Saves transcript and history.
    ///
    /// # Errors
    ///
    /// Returns the store error message when the save fails.
    pub async fn save<S: AppStateStore + ?Sized>(&self, store: &S) -> Result<(), String> {
        let state = TerminalPersistedState {
            transcript: self.transcript.clone(),
            history: self.history.clone(),
        };
        save_app_state_with(
            store,
            TERMINAL_STATE_NAMESPACE,
            TERMINAL_STATE_SCHEMA_VERSION,
            &state,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryAppStateStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn session() -> (DesktopRuntime, TerminalSession) {
        let mut runtime = DesktopRuntime::default();
        let window_id = runtime.open_window("terminal", None);
        (runtime, TerminalSession::new(window_id))
    }

    #[test]
    fn starts_with_banner() {
        let (_, session) = session();
        assert_eq!(
            session.rendered_lines(),
            vec![
                "FluxoOS Terminal v1.0.0".to_string(),
                "Type 'help' for available commands.".to_string()
            ]
        );
    }

    #[test]
    fn submit_echoes_prompt_and_output() {
        let (mut runtime, mut session) = session();
        let appended = session.submit(&mut runtime, "console.log:(\"hi\")").to_vec();
        assert_eq!(
            appended,
            vec![
                TerminalTranscriptEntry::Prompt {
                    command: "console.log:(\"hi\")".to_string()
                },
                TerminalTranscriptEntry::Output {
                    text: "hi".to_string()
                },
            ]
        );
    }

    #[test]
    fn scripts_can_drive_their_own_window() {
        let (mut runtime, mut session) = session();
        session.submit(
            &mut runtime,
            "local me = window(\"win-1\") me.resize:(640, 480)",
        );
        let record = runtime
            .state()
            .window(&WindowId::from("win-1"))
            .expect("window");
        assert_eq!((record.rect.width, record.rect.height), (640.0, 480.0));
        assert_eq!(
            session.rendered_lines().last().map(String::as_str),
            Some("Resized window win-1 to 640x480")
        );
    }

    #[test]
    fn blank_lines_are_ignored_and_clear_empties_transcript() {
        let (mut runtime, mut session) = session();
        assert!(session.submit(&mut runtime, "   ").is_empty());
        assert_eq!(session.transcript().len(), 2);
        session.submit(&mut runtime, "clear");
        assert!(session.transcript().is_empty());
        assert_eq!(session.history(), &["clear".to_string()]);
    }

    #[test]
    fn empty_output_adds_only_the_prompt() {
        let (mut runtime, mut session) = session();
        let appended = session.submit(&mut runtime, "console.log:('')").len();
        assert_eq!(appended, 1);
    }

    #[test]
    fn failures_render_as_error_lines() {
        let (mut runtime, mut session) = session();
        session.submit(&mut runtime, "touch a.txt");
        let appended = session.submit(&mut runtime, "touch a.txt").to_vec();
        assert_eq!(
            appended.last(),
            Some(&TerminalTranscriptEntry::Error {
                text: "Error: /a.txt: File exists".to_string()
            })
        );
        assert_eq!(session.last_exit().code, 4);
        session.submit(&mut runtime, "apps");
        assert_eq!(session.last_exit(), &ShellExit::success());
    }

    #[test]
    fn transcript_and_history_are_capped() {
        let (mut runtime, mut session) = session();
        for n in 0..150 {
            session.submit(&mut runtime, &format!("console.log:({n})"));
        }
        assert_eq!(session.transcript().len(), MAX_TERMINAL_ENTRIES);
        assert_eq!(session.history().len(), MAX_HISTORY_ENTRIES);
        assert_eq!(
            session.rendered_lines().last().map(String::as_str),
            Some("149")
        );
    }

    #[test]
    fn history_recall_walks_both_directions() {
        let (mut runtime, mut session) = session();
        session.submit(&mut runtime, "windows");
        session.submit(&mut runtime, "apps");
        session.submit(&mut runtime, "apps");
        assert_eq!(session.history().len(), 2);

        assert_eq!(session.history_previous(), Some("apps"));
        assert_eq!(session.history_previous(), Some("windows"));
        assert_eq!(session.history_previous(), Some("windows"));
        assert_eq!(session.history_next(), Some("apps"));
        assert_eq!(session.history_next(), None);
    }

    #[test]
    fn save_and_restore_round_trip() {
        let store = MemoryAppStateStore::default();
        let (mut runtime, mut session) = session();
        session.submit(&mut runtime, "apps");
        block_on(session.save(&store)).expect("save");

        let mut restored = TerminalSession::new(None);
        assert!(block_on(restored.restore(&store)));
        assert_eq!(restored.transcript(), session.transcript());
        assert_eq!(restored.history(), session.history());

        let mut fresh = TerminalSession::new(None);
        assert!(!block_on(fresh.restore(&MemoryAppStateStore::default())));
        assert_eq!(fresh.transcript().len(), 2);
    }
}
