//! The session engine: owns the active puzzle's state and turns player
//! intents into a new state plus the effects the front end has to perform.

use tracing::{debug, info};

use crate::catalog::{PuzzleCatalog, PuzzleDefinition};
use crate::error::GameError;
use crate::session::{Outcome, SessionState, Status, MAX_ATTEMPTS};
use crate::share;

/// Side effects produced by a transition, consumed once by the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PlayClip { puzzle_id: String, clip: u32 },
    GameEnded { status: Status },
}

#[derive(Debug, Clone)]
pub struct SessionEngine {
    catalog: PuzzleCatalog,
    puzzle: PuzzleDefinition,
    session: SessionState,
    max_attempts: usize,
}

impl SessionEngine {
    /// Starts on the first puzzle of the catalog
    pub fn new(catalog: PuzzleCatalog) -> Self {
        let puzzle = catalog.first().clone();
        let session = SessionState::new(&puzzle, MAX_ATTEMPTS);
        Self {
            catalog,
            puzzle,
            session,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Applies a different incorrect-guess budget, resetting the session
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.session = SessionState::new(&self.puzzle, self.max_attempts);
        self
    }

    pub fn with_puzzle(mut self, id: &str) -> Result<Self, GameError> {
        self.switch_puzzle(id)?;
        Ok(self)
    }

    pub fn catalog(&self) -> &PuzzleCatalog {
        &self.catalog
    }

    pub fn puzzle(&self) -> &PuzzleDefinition {
        &self.puzzle
    }

    pub fn state(&self) -> &SessionState {
        &self.session
    }

    pub fn status(&self) -> Status {
        self.session.status
    }

    pub fn is_terminal(&self) -> bool {
        self.session.is_terminal()
    }

    pub fn accepts_guesses(&self) -> bool {
        self.session.status == Status::InProgress
    }

    pub fn attempts_remaining(&self) -> usize {
        self.session.attempts_remaining()
    }

    pub fn markers(&self) -> Vec<Outcome> {
        self.session.markers()
    }

    pub fn try_start_game(&mut self) -> Result<Vec<Effect>, GameError> {
        self.session.start()?;
        info!(puzzle = %self.puzzle.id, "game started");
        Ok(vec![self.play_current_clip()])
    }

    /// Begins play; a no-op once the game has started
    pub fn start_game(&mut self) -> Vec<Effect> {
        self.try_start_game().unwrap_or_else(|err| {
            debug!("ignored start: {err}");
            Vec::new()
        })
    }

    pub fn try_submit_guess(&mut self, text: &str) -> Result<Vec<Effect>, GameError> {
        let result = self.session.apply_guess(&self.puzzle, text)?;
        debug!(
            puzzle = %self.puzzle.id,
            outcome = ?result.outcome,
            clip = self.session.current_clip,
            attempts = self.session.attempts_used(),
            "guess applied"
        );

        let mut effects = Vec::new();
        if result.clip_advanced {
            effects.push(self.play_current_clip());
        }
        if result.status.is_terminal() {
            info!(puzzle = %self.puzzle.id, status = %result.status, "game ended");
            effects.push(Effect::GameEnded {
                status: result.status,
            });
        }
        Ok(effects)
    }

    /// Evaluates a guess; ignored outside an active session
    pub fn submit_guess(&mut self, text: &str) -> Vec<Effect> {
        self.try_submit_guess(text).unwrap_or_else(|err| {
            debug!("ignored guess: {err}");
            Vec::new()
        })
    }

    /// Submits whatever is in the guess box
    pub fn submit_pending(&mut self) -> Vec<Effect> {
        let text = self.session.pending_guess.clone();
        self.submit_guess(&text)
    }

    pub fn set_pending_guess(&mut self, text: &str) {
        if self.accepts_guesses() {
            self.session.pending_guess = text.to_string();
        }
    }

    pub fn push_guess_char(&mut self, c: char) {
        if self.accepts_guesses() {
            self.session.pending_guess.push(c);
        }
    }

    pub fn pop_guess_char(&mut self) {
        if self.accepts_guesses() {
            self.session.pending_guess.pop();
        }
    }

    /// Replaces the whole session with a fresh one for `id`
    pub fn switch_puzzle(&mut self, id: &str) -> Result<(), GameError> {
        let puzzle = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownPuzzle { id: id.to_string() })?;

        info!(from = %self.puzzle.id, to = %puzzle.id, "switching puzzle");
        self.session = SessionState::new(&puzzle, self.max_attempts);
        self.puzzle = puzzle;
        Ok(())
    }

    pub fn next_puzzle(&mut self) -> Result<(), GameError> {
        let id = self.catalog.next_id(&self.puzzle.id).map(str::to_string);
        self.switch_puzzle(id.as_deref().unwrap_or_default())
    }

    pub fn prev_puzzle(&mut self) -> Result<(), GameError> {
        let id = self.catalog.prev_id(&self.puzzle.id).map(str::to_string);
        self.switch_puzzle(id.as_deref().unwrap_or_default())
    }

    /// The playing clip reached its end. After a win this rolls on to the
    /// next clip so the rest of the interview is revealed.
    pub fn clip_finished(&mut self) -> Vec<Effect> {
        match self.session.reveal_next_clip() {
            Ok(true) => vec![self.play_current_clip()],
            Ok(false) => Vec::new(),
            Err(err) => {
                debug!("clip finished without reveal: {err}");
                Vec::new()
            }
        }
    }

    pub fn replay_clip(&self) -> Vec<Effect> {
        if self.session.status == Status::NotStarted {
            return Vec::new();
        }
        vec![self.play_current_clip()]
    }

    pub fn encode_result(&self) -> Result<String, GameError> {
        if !self.session.is_terminal() {
            return Err(GameError::NotFinished {
                status: self.session.status,
            });
        }
        Ok(share::encode_result(
            &self.puzzle.show,
            &self.puzzle.date,
            self.session.incorrect_guesses.len(),
            self.session.status,
        ))
    }

    fn play_current_clip(&self) -> Effect {
        Effect::PlayClip {
            puzzle_id: self.puzzle.id.clone(),
            clip: self.session.current_clip,
        }
    }
}
