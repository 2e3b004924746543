use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nextguest::{
    app::{App, AppAction},
    catalog::PuzzleCatalog,
    runtime::{ChannelEvents, GameEvent, Runner},
    SessionEngine, Status,
};

const CATALOG: &str = r#"{
    "game1": { "show": "Late Night Talk", "date": "Jan 12, 2025", "answer": "Tom Hanks" },
    "game2": { "show": "Morning Couch", "date": "Feb 3, 2025", "answer": "Serena Williams", "clipCount": 3 }
}"#;

fn app() -> App {
    App::headless(SessionEngine::new(PuzzleCatalog::from_json(CATALOG).unwrap()))
}

fn send_text(tx: &mpsc::Sender<GameEvent>, text: &str) {
    for c in text.chars() {
        tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
            .unwrap();
    }
}

fn send_key(tx: &mpsc::Sender<GameEvent>, code: KeyCode) {
    tx.send(GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .unwrap();
}

/// Drives the app the way the binary does until it quits or runs out of steps
fn drive(app: &mut App, rx: mpsc::Receiver<GameEvent>) -> bool {
    let runner = Runner::new(ChannelEvents::new(rx), Duration::from_millis(5));
    for _ in 0..500u32 {
        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if app.handle_key(key) == AppAction::Quit {
                    return true;
                }
            }
        }
    }
    false
}

#[test]
fn headless_win_flow() {
    let mut app = app();
    let (tx, rx) = mpsc::channel();

    send_key(&tx, KeyCode::Enter);
    send_text(&tx, "brad pitt");
    send_key(&tx, KeyCode::Enter);
    send_text(&tx, "  TOM HANKS ");
    send_key(&tx, KeyCode::Enter);
    send_key(&tx, KeyCode::Esc);

    assert!(drive(&mut app, rx), "esc should quit");

    let state = app.engine.state();
    assert_eq!(state.status, Status::Won);
    assert_eq!(state.incorrect_guesses, vec!["brad pitt"]);
    assert_eq!(state.current_clip, 3);
    assert_eq!(
        app.engine.encode_result().unwrap(),
        "My Next Guest\nLate Night Talk (Jan 12, 2025)\n🟥🟩\n#MyNextGuest"
    );
}

#[test]
fn headless_loss_then_guesses_are_discarded() {
    let mut app = app();
    let (tx, rx) = mpsc::channel();

    send_key(&tx, KeyCode::Enter);
    for guess in ["a", "b", "c", "d"] {
        send_text(&tx, guess);
        send_key(&tx, KeyCode::Enter);
    }
    // keys after the loss are not a guess
    send_text(&tx, "zz");
    send_key(&tx, KeyCode::Enter);
    send_key(&tx, KeyCode::Esc);

    assert!(drive(&mut app, rx));
    assert!(app.engine.submit_guess("tom hanks").is_empty());

    let state = app.engine.state();
    assert_eq!(state.status, Status::Lost);
    assert_eq!(state.incorrect_guesses, vec!["a", "b", "c", "d"]);
    assert!(state.current_clip <= state.clip_count);
}

#[test]
fn headless_switch_abandons_attempt() {
    let mut app = app();
    let (tx, rx) = mpsc::channel();

    send_key(&tx, KeyCode::Enter);
    send_text(&tx, "wrong");
    send_key(&tx, KeyCode::Enter);
    send_key(&tx, KeyCode::Tab);
    send_key(&tx, KeyCode::Esc);

    assert!(drive(&mut app, rx));

    assert_eq!(app.engine.puzzle().id, "game2");
    let state = app.engine.state();
    assert_eq!(state.status, Status::NotStarted);
    assert_eq!(state.current_clip, 1);
    assert!(state.incorrect_guesses.is_empty());
}

#[test]
fn headless_short_puzzle_final_clip_miss_loses() {
    let mut app = app();
    app.switch_puzzle("game2");
    let (tx, rx) = mpsc::channel();

    send_key(&tx, KeyCode::Enter);
    for guess in ["x", "y", "z"] {
        send_text(&tx, guess);
        send_key(&tx, KeyCode::Enter);
    }
    send_key(&tx, KeyCode::Esc);

    assert!(drive(&mut app, rx));

    let state = app.engine.state();
    assert_eq!(state.status, Status::Lost);
    assert_eq!(state.current_clip, 3);
    assert_eq!(state.incorrect_guesses.len(), 3);
}
