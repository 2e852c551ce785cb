use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Toast replacement. Screens emit exactly one notification per outcome;
/// what happens to it (stdout, a real toast widget, a test recorder) is the
/// caller's business.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Confirmation/prompt seam replacing the browser-native dialogs, so the
/// destructive flows stay testable without a UI.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
    /// `None` means the user dismissed the prompt.
    fn prompt(&self, question: &str) -> Option<String>;
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("ok: {message}");
    }

    fn error(&self, message: &str) {
        println!("error: {message}");
    }
}

pub struct StdinConfirm;

impl StdinConfirm {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{question} [y/N] ");
        let _ = io::stdout().flush();
        matches!(
            self.read_line().as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        )
    }

    fn prompt(&self, question: &str) -> Option<String> {
        print!("{question} ");
        let _ = io::stdout().flush();
        self.read_line()
    }
}

/// Records every notification; tests assert on counts and texts.
#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }

    pub fn success_count(&self) -> usize {
        self.successes.lock().unwrap().len()
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.lock().unwrap().last().cloned()
    }

    pub fn last_success(&self) -> Option<String> {
        self.successes.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Plays back queued answers; an exhausted queue declines, which keeps an
/// under-scripted test on the safe (no-op) path.
#[derive(Default)]
pub struct ScriptedConfirm {
    confirms: Mutex<VecDeque<bool>>,
    prompts: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirms<I: IntoIterator<Item = bool>>(self, answers: I) -> Self {
        self.confirms.lock().unwrap().extend(answers);
        self
    }

    pub fn prompts<I: IntoIterator<Item = Option<String>>>(self, replies: I) -> Self {
        self.prompts.lock().unwrap().extend(replies);
        self
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, _question: &str) -> bool {
        self.confirms.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn prompt(&self, _question: &str) -> Option<String> {
        self.prompts.lock().unwrap().pop_front().unwrap_or(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_counts() {
        let n = RecordingNotifier::new();
        n.error("one");
        n.error("two");
        n.success("done");
        assert_eq!(n.error_count(), 2);
        assert_eq!(n.success_count(), 1);
        assert_eq!(n.last_error().as_deref(), Some("two"));
    }

    #[test]
    fn scripted_confirm_plays_back_and_then_declines() {
        let c = ScriptedConfirm::new()
            .confirms([true, false])
            .prompts([Some("DELETE".to_string())]);
        assert!(c.confirm("?"));
        assert!(!c.confirm("?"));
        assert!(!c.confirm("?"));
        assert_eq!(c.prompt("?").as_deref(), Some("DELETE"));
        assert_eq!(c.prompt("?"), None);
    }
}
