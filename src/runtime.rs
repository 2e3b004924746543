//! Event plumbing between the terminal and the game loop. The loop never
//! blocks longer than one tick, so clip playback and the celebration keep
//! moving while the player is idle.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Anything that can hand the loop its next input
pub trait GameEventSource: Send + 'static {
    /// Waits at most `timeout`. An error means nothing arrived in time or
    /// the producer has gone away.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Keeps the terminal input we care about: key presses and repeats, resizes
fn translate(ev: CtEvent) -> Option<GameEvent> {
    match ev {
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(GameEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(GameEvent::Resize),
        _ => None,
    }
}

/// Reads the real terminal on a background thread
pub struct TerminalEvents {
    rx: Receiver<GameEvent>,
}

impl TerminalEvents {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            while let Ok(ev) = event::read() {
                let Some(ev) = translate(ev) else { continue };
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for TerminalEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for TerminalEvents {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Scripted input, e.g. from a headless test
pub struct ChannelEvents {
    rx: Receiver<GameEvent>,
}

impl ChannelEvents {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for ChannelEvents {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub struct Runner<E: GameEventSource> {
    source: E,
    tick: Duration,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Next input, or `Tick` once the tick interval passes without one
    pub fn step(&self) -> GameEvent {
        self.source
            .recv_timeout(self.tick)
            .unwrap_or(GameEvent::Tick)
    }
}
