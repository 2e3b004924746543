use base64::Engine as _;
use itertools::Itertools;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::session::{Outcome, Status};

pub const GAME_TITLE: &str = "My Next Guest";
pub const RESULT_TRAILER: &str = "#MyNextGuest";
pub const MISS_MARKER: &str = "🟥";
pub const HIT_MARKER: &str = "🟩";

pub fn marker(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => HIT_MARKER,
        Outcome::Incorrect => MISS_MARKER,
    }
}

/// Shareable summary of a finished session.
///
/// Depends only on its arguments, so identical sessions always produce
/// byte-identical output.
pub fn encode_result(show: &str, date: &str, misses: usize, status: Status) -> String {
    let hit = (status == Status::Won).then_some(Outcome::Correct);
    let markers = std::iter::repeat(Outcome::Incorrect)
        .take(misses)
        .chain(hit)
        .map(marker)
        .join("");

    format!("{GAME_TITLE}\n{show} ({date})\n{markers}\n{RESULT_TRAILER}")
}

pub fn tweet_url(result: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?text={}",
        urlencoding::encode(result)
    )
}

/// Opens share links outside the terminal
pub trait LinkOpener {
    fn is_available(&self) -> bool;
    fn open(&mut self, url: &str) -> io::Result<()>;
}

/// The system's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn is_available(&self) -> bool {
        webbrowser::Browser::is_available()
    }

    fn open(&mut self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }
}

/// Remembers opened links instead of launching anything
#[derive(Debug, Default, Clone)]
pub struct MemoryOpener {
    pub opened: Vec<String>,
}

impl LinkOpener for MemoryOpener {
    fn is_available(&self) -> bool {
        true
    }

    fn open(&mut self, url: &str) -> io::Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }
}

/// Destination for a shared result
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Terminal clipboard via the OSC 52 escape sequence
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let payload = base64::engine::general_purpose::STANDARD.encode(text);
        write!(self.out, "\x1b]52;c;{payload}\x07")?;
        self.out.flush()
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Fallback: writes the result to a file the player can open and select from
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clipboard for FileClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Copied,
    SavedTo(PathBuf),
    Failed(String),
}

/// Copy to the primary clipboard, falling back to the file copy on failure
pub fn share_result(
    text: &str,
    primary: &mut dyn Clipboard,
    fallback: &mut FileClipboard,
) -> ShareOutcome {
    match primary.copy(text) {
        Ok(()) => ShareOutcome::Copied,
        Err(err) => {
            tracing::warn!("clipboard copy failed, falling back to file: {err}");
            match fallback.copy(text) {
                Ok(()) => ShareOutcome::SavedTo(fallback.path().to_path_buf()),
                Err(err) => {
                    tracing::warn!("fallback copy to {} failed: {err}", fallback.path().display());
                    ShareOutcome::Failed(err.to_string())
                }
            }
        }
    }
}
