//! Destination pickers: the "save file" collaborator.
//!
//! The use-case layer never decides where a file goes. It describes the save
//! ([`SaveRequest`]) and asks a [`SaveTarget`], which answers with a path or
//! `None` when the user cancelled. Native dialogs that signal cancellation
//! with an empty string go through [`from_dialog_path`] so an empty answer
//! can never be mistaken for a path.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// What the caller is about to save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    /// Dialog title, e.g. "Save Edited Image".
    pub title: &'static str,
    /// Suggested file name (no directory).
    pub suggested_name: String,
    /// Directory the suggestion lives in.
    pub default_dir: PathBuf,
}

impl SaveRequest {
    pub fn suggested_path(&self) -> PathBuf {
        self.default_dir.join(&self.suggested_name)
    }
}

pub trait SaveTarget {
    /// Pick a destination. `None` means the user cancelled.
    fn choose(&mut self, request: &SaveRequest) -> Option<PathBuf>;
}

impl<F> SaveTarget for F
where
    F: FnMut(&SaveRequest) -> Option<PathBuf>,
{
    fn choose(&mut self, request: &SaveRequest) -> Option<PathBuf> {
        self(request)
    }
}

/// Interpret a dialog's string answer: empty (or whitespace) means cancelled.
///
/// Only the line ending is stripped; spaces inside a real path are kept.
pub fn from_dialog_path(answer: &str) -> Option<PathBuf> {
    let line = answer.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(line))
    }
}

/// Always saves to one path chosen up front (`--output`).
#[derive(Debug, Clone)]
pub struct FixedTarget(pub PathBuf);

impl SaveTarget for FixedTarget {
    fn choose(&mut self, _request: &SaveRequest) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Accepts the suggestion as-is, like confirming a pre-filled dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestedTarget;

impl SaveTarget for SuggestedTarget {
    fn choose(&mut self, request: &SaveRequest) -> Option<PathBuf> {
        Some(request.suggested_path())
    }
}

/// Asks on a text stream. Relative answers resolve against the default directory.
pub struct PromptTarget<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptTarget<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, request: &SaveRequest) -> std::io::Result<String> {
        write!(
            self.output,
            "{} (suggested: {}, empty to cancel): ",
            request.title,
            request.suggested_path().display()
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> SaveTarget for PromptTarget<R, W> {
    fn choose(&mut self, request: &SaveRequest) -> Option<PathBuf> {
        // The trait has no error channel, so a broken stream ends as a
        // cancel. It is logged so it cannot pass for a user decision.
        match self.ask(request) {
            Ok(answer) => {
                let chosen = from_dialog_path(&answer)?;
                Some(resolve_against(&request.default_dir, chosen))
            }
            Err(e) => {
                log::warn!("save prompt failed, treating as cancelled: {e}");
                None
            }
        }
    }
}

fn resolve_against(dir: &Path, chosen: PathBuf) -> PathBuf {
    if chosen.is_absolute() {
        chosen
    } else {
        dir.join(chosen)
    }
}
