use crate::catalog::PuzzleDefinition;
use crate::error::GameError;

/// Incorrect guesses allowed before the session is lost
pub const MAX_ATTEMPTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    #[strum(serialize = "not started")]
    NotStarted,
    #[strum(serialize = "in progress")]
    InProgress,
    #[strum(serialize = "won")]
    Won,
    #[strum(serialize = "lost")]
    Lost,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Won | Status::Lost)
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// What a single accepted guess did to the session
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct GuessResult {
    pub outcome: Outcome,
    pub clip_advanced: bool,
    pub status: Status,
}

/// All mutable state for the puzzle currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub puzzle_id: String,
    pub clip_count: u32,
    pub current_clip: u32,
    pub pending_guess: String,
    pub incorrect_guesses: Vec<String>,
    pub winning_guess: Option<String>,
    pub status: Status,
    pub max_attempts: usize,
}

impl SessionState {
    pub fn new(puzzle: &PuzzleDefinition, max_attempts: usize) -> Self {
        Self {
            puzzle_id: puzzle.id.clone(),
            clip_count: puzzle.clip_count.max(1),
            current_clip: 1,
            pending_guess: String::new(),
            incorrect_guesses: Vec::new(),
            winning_guess: None,
            status: Status::NotStarted,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != Status::NotStarted {
            return Err(GameError::invalid("start the game", self.status));
        }
        self.status = Status::InProgress;
        Ok(())
    }

    /// The one transition that moves both the attempt count and the clip index.
    pub fn apply_guess(
        &mut self,
        puzzle: &PuzzleDefinition,
        text: &str,
    ) -> Result<GuessResult, GameError> {
        if self.status != Status::InProgress {
            return Err(GameError::invalid("submit a guess", self.status));
        }
        let guess = text.trim();
        if guess.is_empty() {
            return Err(GameError::EmptyGuess);
        }

        let result = if puzzle.is_answer(guess) {
            self.winning_guess = Some(guess.to_string());
            self.pending_guess = puzzle.answer.clone();
            let clip_advanced = self.advance_clip();
            self.status = Status::Won;
            GuessResult {
                outcome: Outcome::Correct,
                clip_advanced,
                status: self.status,
            }
        } else {
            self.incorrect_guesses.push(guess.to_string());
            self.pending_guess.clear();

            let mut clip_advanced = false;
            if self.attempts_used() >= self.max_attempts {
                self.status = Status::Lost;
            } else if self.current_clip < self.clip_count {
                clip_advanced = self.advance_clip();
            } else {
                // the final clip only grants one guess
                self.status = Status::Lost;
            }
            GuessResult {
                outcome: Outcome::Incorrect,
                clip_advanced,
                status: self.status,
            }
        };

        debug_assert!(self.invariants_hold(), "session invariants broken: {self:?}");
        Ok(result)
    }

    /// After a win the remaining clips can still be revealed one by one.
    pub fn reveal_next_clip(&mut self) -> Result<bool, GameError> {
        if self.status != Status::Won {
            return Err(GameError::invalid("reveal the next clip", self.status));
        }
        Ok(self.advance_clip())
    }

    fn advance_clip(&mut self) -> bool {
        if self.current_clip < self.clip_count {
            self.current_clip += 1;
            true
        } else {
            false
        }
    }

    pub fn attempts_used(&self) -> usize {
        self.incorrect_guesses.len()
    }

    pub fn attempts_remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts_used())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_final_clip(&self) -> bool {
        self.current_clip == self.clip_count
    }

    /// Guesses actually made, in submission order, as outcomes
    pub fn markers(&self) -> Vec<Outcome> {
        let mut markers = vec![Outcome::Incorrect; self.incorrect_guesses.len()];
        if self.status == Status::Won {
            markers.push(Outcome::Correct);
        }
        markers
    }

    pub fn invariants_hold(&self) -> bool {
        let clip_in_range = (1..=self.clip_count).contains(&self.current_clip);
        let within_budget = self.incorrect_guesses.len() <= self.max_attempts;
        let status_consistent = match self.status {
            Status::NotStarted => {
                self.current_clip == 1
                    && self.incorrect_guesses.is_empty()
                    && self.winning_guess.is_none()
            }
            Status::InProgress => {
                self.winning_guess.is_none() && self.incorrect_guesses.len() < self.max_attempts
            }
            Status::Won => {
                self.winning_guess.is_some()
                    && self.incorrect_guesses.len() < self.max_attempts
            }
            Status::Lost => {
                self.winning_guess.is_none()
                    && (self.incorrect_guesses.len() == self.max_attempts
                        || self.current_clip == self.clip_count)
            }
        };
        clip_in_range && within_budget && status_consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::puzzle;
    use assert_matches::assert_matches;

    fn started(answer: &str, clip_count: u32, max_attempts: usize) -> (PuzzleDefinition, SessionState) {
        let p = puzzle("g", answer, clip_count);
        let mut s = SessionState::new(&p, max_attempts);
        s.start().unwrap();
        (p, s)
    }

    #[test]
    fn test_new_session_is_fresh() {
        let p = puzzle("g", "Tom Hanks", 5);
        let s = SessionState::new(&p, MAX_ATTEMPTS);

        assert_eq!(s.status, Status::NotStarted);
        assert_eq!(s.current_clip, 1);
        assert!(s.incorrect_guesses.is_empty());
        assert!(s.pending_guess.is_empty());
        assert!(s.invariants_hold());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let (_, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);

        assert_matches!(
            s.start(),
            Err(GameError::InvalidTransition {
                status: Status::InProgress,
                ..
            })
        );
        assert_eq!(s.status, Status::InProgress);
    }

    #[test]
    fn test_guess_before_start_is_rejected() {
        let p = puzzle("g", "Tom Hanks", 5);
        let mut s = SessionState::new(&p, MAX_ATTEMPTS);
        let before = s.clone();

        assert!(s.apply_guess(&p, "tom hanks").is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn test_correct_guess_wins_and_advances() {
        let (p, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);

        let result = s.apply_guess(&p, "tom hanks").unwrap();

        assert_eq!(result.outcome, Outcome::Correct);
        assert!(result.clip_advanced);
        assert_eq!(s.status, Status::Won);
        assert_eq!(s.current_clip, 2);
        assert!(s.incorrect_guesses.is_empty());
        assert_eq!(s.winning_guess.as_deref(), Some("tom hanks"));
        assert_eq!(s.pending_guess, "Tom Hanks");
    }

    #[test]
    fn test_wrong_guess_advances_and_clears_pending() {
        let (p, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);
        s.pending_guess = "meg ryan".to_string();

        let result = s.apply_guess(&p, "meg ryan").unwrap();

        assert_eq!(result.outcome, Outcome::Incorrect);
        assert!(result.clip_advanced);
        assert_eq!(s.current_clip, 2);
        assert_eq!(s.incorrect_guesses, vec!["meg ryan"]);
        assert!(s.pending_guess.is_empty());
        assert_eq!(s.attempts_remaining(), MAX_ATTEMPTS - 1);
    }

    #[test]
    fn test_budget_exhaustion_loses_without_advancing() {
        let (p, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);

        for g in ["a", "b", "c"] {
            s.apply_guess(&p, g).unwrap();
        }
        assert_eq!(s.current_clip, 4);

        let result = s.apply_guess(&p, "d").unwrap();

        assert_eq!(result.status, Status::Lost);
        assert!(!result.clip_advanced);
        assert_eq!(s.current_clip, 4);
        assert_eq!(s.incorrect_guesses.len(), MAX_ATTEMPTS);
        assert!(s.invariants_hold());
    }

    #[test]
    fn test_miss_on_final_clip_loses() {
        let (p, mut s) = started("Tom Hanks", 2, MAX_ATTEMPTS);

        s.apply_guess(&p, "a").unwrap();
        assert_eq!(s.status, Status::InProgress);
        assert!(s.is_final_clip());

        s.apply_guess(&p, "b").unwrap();
        assert_eq!(s.status, Status::Lost);
        assert_eq!(s.current_clip, 2);
        assert_eq!(s.incorrect_guesses.len(), 2);
        assert!(s.invariants_hold());
    }

    #[test]
    fn test_single_clip_puzzle() {
        let (p, mut s) = started("Tom Hanks", 1, MAX_ATTEMPTS);

        let result = s.apply_guess(&p, "Tom Hanks").unwrap();

        assert_eq!(result.status, Status::Won);
        assert!(!result.clip_advanced);
        assert_eq!(s.current_clip, 1);
    }

    #[test]
    fn test_empty_guess_is_ignored() {
        let (p, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);
        let before = s.clone();

        assert_matches!(s.apply_guess(&p, "   "), Err(GameError::EmptyGuess));
        assert_eq!(s, before);
    }

    #[test]
    fn test_terminal_state_rejects_guesses() {
        let (p, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);
        s.apply_guess(&p, "Tom Hanks").unwrap();
        let before = s.clone();

        assert_matches!(
            s.apply_guess(&p, "anything"),
            Err(GameError::InvalidTransition {
                status: Status::Won,
                ..
            })
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_reveal_next_clip_only_after_win() {
        let (p, mut s) = started("Tom Hanks", 3, MAX_ATTEMPTS);
        assert!(s.reveal_next_clip().is_err());

        s.apply_guess(&p, "tom hanks").unwrap();
        assert_eq!(s.current_clip, 2);
        assert_eq!(s.reveal_next_clip(), Ok(true));
        assert_eq!(s.current_clip, 3);
        assert_eq!(s.reveal_next_clip(), Ok(false));
        assert_eq!(s.current_clip, 3);
    }

    #[test]
    fn test_markers_follow_guesses() {
        let (p, mut s) = started("Tom Hanks", 5, MAX_ATTEMPTS);
        s.apply_guess(&p, "a").unwrap();
        s.apply_guess(&p, "b").unwrap();
        s.apply_guess(&p, "TOM HANKS").unwrap();

        assert_eq!(
            s.markers(),
            vec![Outcome::Incorrect, Outcome::Incorrect, Outcome::Correct]
        );
    }

    #[test]
    fn test_zero_max_attempts_is_clamped() {
        let p = puzzle("g", "x", 5);
        let s = SessionState::new(&p, 0);

        assert_eq!(s.max_attempts, 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::NotStarted.to_string(), "not started");
        assert_eq!(Status::InProgress.to_string(), "in progress");
        assert_eq!(Status::Won.to_string(), "won");
        assert_eq!(Status::Lost.to_string(), "lost");
    }
}
