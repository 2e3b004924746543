use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipError {
    #[error("clip not found at {}", path.display())]
    Missing { path: PathBuf },
    #[error("could not start player `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Maps `(puzzle, clip)` to `{dir}/{puzzle}/{clip}.{format}`
#[derive(Debug, Clone)]
pub struct ClipLocator {
    dir: PathBuf,
    format: String,
}

impl ClipLocator {
    pub fn new<P: AsRef<Path>>(dir: P, format: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            format: format.trim_start_matches('.').to_string(),
        }
    }

    pub fn path(&self, puzzle_id: &str, clip: u32) -> PathBuf {
        self.dir
            .join(puzzle_id)
            .join(format!("{clip}.{}", self.format))
    }

    pub fn resolve(&self, puzzle_id: &str, clip: u32) -> Result<PathBuf, ClipError> {
        let path = self.path(puzzle_id, clip);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ClipError::Missing { path })
        }
    }
}

impl Default for ClipLocator {
    fn default() -> Self {
        Self::new("clips", "mp4")
    }
}

/// Something that can show a clip to the player
pub trait ClipPlayer {
    fn play(&mut self, path: &Path) -> Result<(), ClipError>;
    fn stop(&mut self) {}
    /// True once, when the clip started by the last `play` has ended
    fn poll_finished(&mut self) -> bool {
        false
    }
}

/// Plays clips through an external command, or the system opener when no
/// command is configured
#[derive(Debug, Default)]
pub struct ExternalPlayer {
    command: Option<String>,
    current: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            current: None,
        }
    }
}

impl ClipPlayer for ExternalPlayer {
    fn play(&mut self, path: &Path) -> Result<(), ClipError> {
        self.stop();

        match &self.command {
            Some(command) => {
                let mut parts = command.split_whitespace();
                let program = parts.next().unwrap_or_default();
                let child = Command::new(program)
                    .args(parts)
                    .arg(path)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .map_err(|source| ClipError::Launch {
                        command: command.clone(),
                        source,
                    })?;
                debug!("playing {} with `{command}`", path.display());
                self.current = Some(child);
            }
            None => {
                let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
                let url = format!("file://{}", absolute.display());
                webbrowser::open(&url).map_err(|source| ClipError::Launch {
                    command: "system opener".to_string(),
                    source,
                })?;
                debug!("opened {url}");
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Err(err) = child.kill() {
                warn!("failed to stop previous clip: {err}");
            }
            let _ = child.wait();
        }
    }

    fn poll_finished(&mut self) -> bool {
        let finished = match self.current.as_mut().map(Child::try_wait) {
            Some(Ok(Some(_))) => true,
            Some(Ok(None)) | None => false,
            Some(Err(err)) => {
                warn!("lost track of clip player: {err}");
                true
            }
        };
        if finished {
            self.current = None;
        }
        finished
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Remembers what it was asked to play
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub played: Vec<PathBuf>,
}

impl ClipPlayer for RecordingPlayer {
    fn play(&mut self, path: &Path) -> Result<(), ClipError> {
        self.played.push(path.to_path_buf());
        Ok(())
    }
}
