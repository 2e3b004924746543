use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::celebration::Celebration;
use crate::clips::{ClipLocator, ClipPlayer, RecordingPlayer};
use crate::engine::{Effect, SessionEngine};
use crate::prefs::{KeyValueStore, MemoryStore, ThemePreference};
use crate::session::Status;
use crate::share::{
    self, Clipboard, FileClipboard, LinkOpener, MemoryClipboard, MemoryOpener, ShareOutcome,
    SystemBrowser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// One-line message shown under the game until the next puzzle switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Everything the terminal front end needs: the engine plus the
/// collaborators that carry out its effects.
pub struct App {
    pub engine: SessionEngine,
    pub theme: ThemePreference,
    pub celebration: Celebration,
    pub notice: Option<Notice>,
    pub now_playing: Option<(String, u32)>,
    pub screen_size: (u16, u16),
    prefs: Box<dyn KeyValueStore>,
    locator: ClipLocator,
    player: Box<dyn ClipPlayer>,
    clipboard: Box<dyn Clipboard>,
    fallback: FileClipboard,
    opener: Box<dyn LinkOpener>,
}

impl App {
    pub fn new(
        engine: SessionEngine,
        prefs: Box<dyn KeyValueStore>,
        player: Box<dyn ClipPlayer>,
        clipboard: Box<dyn Clipboard>,
        fallback: FileClipboard,
    ) -> Self {
        let theme = ThemePreference::load(&*prefs);
        Self {
            engine,
            theme,
            celebration: Celebration::default(),
            notice: None,
            now_playing: None,
            screen_size: (80, 24),
            prefs,
            locator: ClipLocator::default(),
            player,
            clipboard,
            fallback,
            opener: Box::new(SystemBrowser),
        }
    }

    /// In-memory collaborators only, for tests and headless runs
    pub fn headless(engine: SessionEngine) -> Self {
        Self::new(
            engine,
            Box::new(MemoryStore::default()),
            Box::new(RecordingPlayer::default()),
            Box::new(MemoryClipboard::default()),
            FileClipboard::with_path(std::env::temp_dir().join("nextguest_last_result.txt")),
        )
        .with_opener(Box::new(MemoryOpener::default()))
    }

    pub fn with_locator(mut self, locator: ClipLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_opener(mut self, opener: Box<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn locator(&self) -> &ClipLocator {
        &self.locator
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('c') if ctrl => return AppAction::Quit,
            KeyCode::Char('t') if ctrl => self.toggle_theme(),
            KeyCode::Char('r') if ctrl => {
                let effects = self.engine.replay_clip();
                self.perform(effects);
            }
            KeyCode::Tab => self.switch(|e| e.next_puzzle()),
            KeyCode::BackTab => self.switch(|e| e.prev_puzzle()),
            KeyCode::Enter => self.on_enter(),
            KeyCode::Backspace => self.engine.pop_guess_char(),
            KeyCode::Char(c) if !ctrl => self.on_char(c),
            _ => {}
        }
        AppAction::Continue
    }

    fn on_enter(&mut self) {
        let effects = match self.engine.status() {
            Status::NotStarted => self.engine.start_game(),
            Status::InProgress => self.engine.submit_pending(),
            Status::Won | Status::Lost => Vec::new(),
        };
        self.perform(effects);
    }

    fn on_char(&mut self, c: char) {
        match self.engine.status() {
            Status::InProgress => self.engine.push_guess_char(c),
            Status::Won | Status::Lost => match c {
                'c' => self.copy_result(),
                't' => self.tweet_result(),
                'n' => self.switch(|e| e.next_puzzle()),
                _ => {}
            },
            Status::NotStarted => {}
        }
    }

    fn switch(&mut self, f: impl FnOnce(&mut SessionEngine) -> Result<(), crate::error::GameError>) {
        self.player.stop();
        match f(&mut self.engine) {
            Ok(()) => {
                self.notice = None;
                self.now_playing = None;
                self.celebration.stop();
            }
            Err(err) => self.notice = Some(Notice::warning(err.to_string())),
        }
    }

    pub fn switch_puzzle(&mut self, id: &str) {
        let id = id.to_string();
        self.switch(|e| e.switch_puzzle(&id));
    }

    pub fn toggle_theme(&mut self) {
        if let Err(err) = self.theme.toggle(&mut *self.prefs) {
            warn!("could not persist theme preference: {err}");
            self.notice = Some(Notice::warning("Theme preference could not be saved"));
        }
    }

    pub fn set_theme(&mut self, dark: bool) {
        if self.theme.dark != dark {
            self.toggle_theme();
        }
    }

    pub fn on_tick(&mut self) {
        self.celebration.update();
        if self.player.poll_finished() {
            self.on_clip_finished();
        }
    }

    pub fn on_clip_finished(&mut self) {
        let effects = self.engine.clip_finished();
        self.perform(effects);
    }

    /// Carries out engine effects in order
    pub fn perform(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PlayClip { puzzle_id, clip } => self.play_clip(puzzle_id, clip),
                Effect::GameEnded { status } => {
                    if status == Status::Won {
                        let (w, h) = self.screen_size;
                        self.celebration.start(w, h);
                    }
                }
            }
        }
    }

    fn play_clip(&mut self, puzzle_id: String, clip: u32) {
        let played = self
            .locator
            .resolve(&puzzle_id, clip)
            .and_then(|path| self.player.play(&path));
        if let Err(err) = played {
            warn!("clip {clip} of {puzzle_id} unavailable: {err}");
            self.notice = Some(Notice::warning(format!(
                "Clip {clip} can't be played here ({err})"
            )));
        }
        self.now_playing = Some((puzzle_id, clip));
    }

    pub fn copy_result(&mut self) {
        let Ok(text) = self.engine.encode_result() else {
            return;
        };
        let notice = match share::share_result(&text, &mut *self.clipboard, &mut self.fallback)
        {
            ShareOutcome::Copied => Notice::info("Result copied to clipboard"),
            ShareOutcome::SavedTo(path) => {
                Notice::info(format!("Clipboard unavailable, result saved to {}", path.display()))
            }
            ShareOutcome::Failed(err) => Notice::warning(format!("Could not copy result: {err}")),
        };
        info!("{}", notice.text);
        self.notice = Some(notice);
    }

    fn tweet_result(&mut self) {
        let Ok(text) = self.engine.encode_result() else {
            return;
        };
        if !self.opener.is_available() {
            self.notice = Some(Notice::warning("No browser available to share"));
            return;
        }
        if let Err(err) = self.opener.open(&share::tweet_url(&text)) {
            warn!("failed to open share link: {err}");
            self.notice = Some(Notice::warning("Could not open the share link"));
        }
    }
}
