pub mod dom;
pub mod runner;

pub use dom::DomSurface;
pub use runner::GameRunner;

use std::cell::RefCell;

use hangman_engine::{GameConfig, InputEvent, Locators};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls before `game_init` are dropped.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("game not initialized; call game_init() first");
                None
            }
        }
    })
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Build the first round inside the three containers. `config_json` may be
/// omitted or partial; missing fields take their defaults.
#[wasm_bindgen]
pub fn game_init(
    spaces: &str,
    buttons: &str,
    image: &str,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json {
        Some(json) => GameConfig::from_json(&json).map_err(js_error)?,
        None => GameConfig::default(),
    };
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    let mut runner =
        GameRunner::new(document, Locators::new(spaces, buttons, image), config).map_err(js_error)?;
    runner.init().map_err(js_error)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("hangman: initialized");
    Ok(())
}

/// Advance one frame. `now` is the requestAnimationFrame timestamp in ms.
#[wasm_bindgen]
pub fn game_tick(now: f64) {
    with_runner(|r| r.tick(now));
}

/// Guess a letter typed on the physical keyboard. Only the first character counts.
#[wasm_bindgen]
pub fn game_guess(letter: &str) {
    if let Some(letter) = letter.chars().next() {
        with_runner(|r| r.push_input(InputEvent::Guess { letter }));
    }
}

/// Restart the current word, or the whole list once it is exhausted.
#[wasm_bindgen]
pub fn game_restart() {
    with_runner(|r| r.push_input(InputEvent::Restart));
}

// ---- Status accessors ----

#[wasm_bindgen]
pub fn game_phase() -> String {
    with_runner(|r| r.phase().to_string()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn game_remaining_lives() -> u32 {
    with_runner(|r| r.remaining_lives()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn game_max_lives() -> u32 {
    with_runner(|r| r.max_lives()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn game_word_index() -> u32 {
    with_runner(|r| r.word_index()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn game_word_length() -> u32 {
    with_runner(|r| r.word_length()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn game_is_animating() -> bool {
    with_runner(|r| r.is_animating()).unwrap_or(false)
}

/// Events since the last call, as an array of JSON strings.
#[wasm_bindgen]
pub fn game_drain_events() -> js_sys::Array {
    let events = with_runner(|r| r.drain_events_json()).unwrap_or_default();
    events.into_iter().map(|json| JsValue::from_str(&json)).collect()
}
