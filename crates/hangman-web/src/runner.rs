use std::cell::RefCell;
use std::rc::Rc;

use hangman_engine::{
    EngineError, GameConfig, GameEvent, HangmanEngine, InputEvent, InputQueue, Locators, RoundPhase,
};

use crate::dom::DomSurface;

/// Wires the engine to the browser frame loop.
///
/// wasm-bindgen cannot export generic structs, so the crate root keeps one
/// runner in a `thread_local!` and exposes free functions around it.
pub struct GameRunner {
    engine: HangmanEngine<DomSurface>,
    /// Shared with the surface's click listeners.
    input: Rc<RefCell<InputQueue>>,
    /// Events accumulated since the host last asked for them.
    events: Vec<GameEvent>,
    initialized: bool,
}

impl GameRunner {
    pub fn new(
        document: web_sys::Document,
        locators: Locators,
        config: GameConfig,
    ) -> Result<Self, EngineError> {
        let input = Rc::new(RefCell::new(InputQueue::new()));
        let surface = DomSurface::new(document, Rc::clone(&input));
        Ok(Self {
            engine: HangmanEngine::new(surface, locators, config)?,
            input,
            events: Vec::new(),
            initialized: false,
        })
    }

    /// Build the first round. Call once after construction.
    pub fn init(&mut self) -> Result<(), EngineError> {
        self.engine.initialize_round()?;
        self.events.extend(self.engine.drain_events());
        self.initialized = true;
        Ok(())
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.borrow_mut().push(event);
    }

    /// Run one frame: apply queued input, advance clone flights.
    pub fn tick(&mut self, now: f64) {
        if !self.initialized {
            return;
        }

        // Take the queue so listeners firing later never see it borrowed.
        let mut pending = std::mem::take(&mut *self.input.borrow_mut());
        if let Err(e) = self.engine.update(now, &mut pending) {
            log::error!("frame at {:.1}ms failed: {}", now, e);
        }
        self.events.extend(self.engine.drain_events());
    }

    /// Events since the last call, one JSON object each.
    pub fn drain_events_json(&mut self) -> Vec<String> {
        self.events
            .drain(..)
            .filter_map(|event| match serde_json::to_string(&event) {
                Ok(json) => Some(json),
                Err(e) => {
                    log::warn!("dropping event {:?}: {}", event, e);
                    None
                }
            })
            .collect()
    }

    // ---- Status accessors ----

    pub fn phase(&self) -> &'static str {
        match self.engine.phase() {
            RoundPhase::Loading => "loading",
            RoundPhase::Playing => "playing",
            RoundPhase::WordComplete => "word_complete",
            RoundPhase::OutOfLives => "out_of_lives",
            RoundPhase::WordsExhausted => "words_exhausted",
        }
    }

    pub fn remaining_lives(&self) -> u32 {
        self.engine.remaining_lives()
    }

    pub fn max_lives(&self) -> u32 {
        self.engine.max_lives()
    }

    pub fn word_index(&self) -> u32 {
        self.engine.word_index() as u32
    }

    pub fn word_length(&self) -> u32 {
        self.engine.slots().len() as u32
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }
}
