use log::{debug, info, warn};

use crate::api::error::EngineError;
use crate::api::game::{GameConfig, Locators};
use crate::api::types::{GameEvent, NodeId};
use crate::components::letter::{keyboard, LetterToken};
use crate::components::slot::{blanks_for, BlankSlot};
use crate::extensions::movement::{MoveBatch, Movement};
use crate::input::queue::{InputEvent, InputQueue};
use crate::surface::Surface;

/// Round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Building the keyboard and the blank row. Also the phase before the first round.
    Loading,
    /// Accepting guesses.
    Playing,
    /// Every slot is solved; the next word loads once in-flight clones settle.
    WordComplete,
    /// The life pool is empty. Only a restart leaves this phase.
    OutOfLives,
    /// The last word was completed. Only `reset` leaves this phase.
    WordsExhausted,
}

/// What a guess did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not playing, unknown letter, or the letter's token is inactive.
    Ignored,
    /// The letter occurs at `indices`; one clone flight was started per index.
    Correct { indices: Vec<usize> },
    /// The letter does not occur; one life was lost.
    Incorrect { remaining: u32 },
    /// The letter does not occur and that was the last life.
    OutOfLives,
}

/// Positions of `word` holding exactly `letter` (case as stored).
pub fn matching_indices(word: &str, letter: char) -> Vec<usize> {
    word.chars()
        .enumerate()
        .filter(|&(_, c)| c == letter)
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Containers {
    spaces: NodeId,
    buttons: NodeId,
    image: NodeId,
}

/// A flying clone headed for a slot.
#[derive(Debug, Clone, Copy)]
struct Landing {
    token: usize,
    slot: usize,
    clone: NodeId,
}

/// A clone parked in front of its solved slot.
#[derive(Debug, Clone, Copy)]
struct RestingClone {
    node: NodeId,
    token: usize,
    slot: usize,
}

/// Resting clones of one letter on their way back to the keyboard.
/// Tagged by slot index so each slot is covered again as its clone leaves.
#[derive(Debug)]
struct Recall {
    token: usize,
    moves: MoveBatch<usize>,
}

/// The hangman game: round state, guess resolution and clone flights.
///
/// Owns its surface, its keyboard tokens and its blank slots. Time only
/// advances through [`tick`](Self::tick) / [`update`](Self::update), which the
/// host calls once per display refresh with a monotonic timestamp in ms.
pub struct HangmanEngine<S: Surface> {
    surface: S,
    config: GameConfig,
    locators: Locators,
    containers: Option<Containers>,
    tokens: Vec<LetterToken>,
    slots: Vec<BlankSlot>,
    word_index: usize,
    lives: u32,
    phase: RoundPhase,
    arrivals: Vec<MoveBatch<Landing>>,
    recalls: Vec<Recall>,
    resting: Vec<RestingClone>,
    events: Vec<GameEvent>,
    now: f64,
}

impl<S: Surface> HangmanEngine<S> {
    /// Construct an engine. Nothing is rendered until [`initialize_round`](Self::initialize_round).
    pub fn new(surface: S, locators: Locators, config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let lives = config.max_lives;
        Ok(Self {
            surface,
            config,
            locators,
            containers: None,
            tokens: Vec::new(),
            slots: Vec::new(),
            word_index: 0,
            lives,
            phase: RoundPhase::Loading,
            arrivals: Vec::new(),
            recalls: Vec::new(),
            resting: Vec::new(),
            events: Vec::new(),
            now: 0.0,
        })
    }

    /// Build a fresh keyboard and blank row for the current word and refill
    /// the life pool. Calling it again discards everything from before,
    /// including clones still in flight.
    ///
    /// All three locators are resolved before anything is touched, so a
    /// missing container leaves the surface as it was.
    pub fn initialize_round(&mut self) -> Result<(), EngineError> {
        self.phase = RoundPhase::Loading;
        let containers = self.resolve_containers()?;

        self.arrivals.clear();
        self.recalls.clear();
        self.resting.clear();
        self.surface.clear_children(containers.buttons);
        self.surface.clear_children(containers.spaces);
        self.containers = Some(containers);

        let Some(word) = self.config.words.get(self.word_index) else {
            self.tokens.clear();
            self.slots.clear();
            self.phase = RoundPhase::WordsExhausted;
            return Ok(());
        };
        self.slots = blanks_for(word);
        let word_len = self.slots.len();

        self.tokens = keyboard();
        for token in &mut self.tokens {
            token.build(&mut self.surface, containers.buttons)?;
        }
        for slot in &mut self.slots {
            slot.build(&mut self.surface, containers.spaces)?;
        }

        self.lives = self.config.max_lives;
        self.show_illustration();

        self.phase = RoundPhase::Playing;
        self.events.push(GameEvent::RoundStarted {
            word_index: self.word_index,
            length: word_len,
        });
        info!("round {} started ({} letters)", self.word_index, word_len);
        Ok(())
    }

    /// Rewind to the first word and start it.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.word_index = 0;
        self.initialize_round()
    }

    /// Resolve a guess of `letter` against the current word.
    pub fn handle_guess(&mut self, letter: char) -> Result<GuessOutcome, EngineError> {
        if self.phase != RoundPhase::Playing {
            debug!("guess {} ignored in {:?}", letter, self.phase);
            return Ok(GuessOutcome::Ignored);
        }
        let Some(token) = self.tokens.iter().position(|t| t.letter() == letter) else {
            debug!("guess {} ignored: not on the keyboard", letter);
            return Ok(GuessOutcome::Ignored);
        };
        if !self.tokens[token].is_active() {
            return Ok(GuessOutcome::Ignored);
        }
        let Some(word) = self.current_word() else {
            return Ok(GuessOutcome::Ignored);
        };

        let indices = matching_indices(word, letter);
        let outcome = if indices.is_empty() {
            self.miss(token)
        } else {
            self.hit(token, indices)?
        };
        debug!("guess {} -> {:?}", letter, outcome);
        Ok(outcome)
    }

    /// Route a click notification to the keyboard token or resting clone it hit.
    pub fn handle_click(&mut self, node: NodeId) -> Result<(), EngineError> {
        if let Some(token) = self.tokens.iter().find(|t| t.node() == Some(node)) {
            let letter = token.letter();
            self.handle_guess(letter)?;
            return Ok(());
        }
        if let Some(i) = self.resting.iter().position(|r| r.node == node) {
            self.recall(i);
            return self.poll_animations();
        }
        debug!("click on untracked node {:?}", node);
        Ok(())
    }

    /// Advance every movement to `now` and run whatever their arrival unlocks.
    pub fn tick(&mut self, now: f64) -> Result<(), EngineError> {
        self.advance_clock(now);
        self.poll_animations()
    }

    /// Per-frame entry point: drain queued input, then advance animations.
    pub fn update(&mut self, now: f64, input: &mut InputQueue) -> Result<(), EngineError> {
        self.advance_clock(now);
        for event in input.drain() {
            match event {
                InputEvent::Click { node } => self.handle_click(node)?,
                InputEvent::Guess { letter } => {
                    self.handle_guess(letter.to_ascii_uppercase())?;
                }
                InputEvent::Restart => {
                    if self.phase == RoundPhase::WordsExhausted {
                        self.reset()?;
                    } else {
                        self.initialize_round()?;
                    }
                }
            }
        }
        self.poll_animations()
    }

    // -- Accessors --

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// The word being played, or None once the list is exhausted.
    pub fn current_word(&self) -> Option<&str> {
        self.config.words.get(self.word_index).map(String::as_str)
    }

    pub fn remaining_lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.config.max_lives
    }

    pub fn tokens(&self) -> &[LetterToken] {
        &self.tokens
    }

    pub fn token(&self, letter: char) -> Option<&LetterToken> {
        self.tokens.iter().find(|t| t.letter() == letter)
    }

    pub fn slots(&self) -> &[BlankSlot] {
        &self.slots
    }

    /// Nodes of the clones currently parked in front of solved slots.
    pub fn resting_clones(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.resting.iter().map(|r| r.node)
    }

    /// Whether any clone is still moving.
    pub fn is_animating(&self) -> bool {
        !self.arrivals.is_empty() || !self.recalls.is_empty()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Drain events recorded since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    // -- Internals --

    fn resolve_containers(&mut self) -> Result<Containers, EngineError> {
        let locators = &self.locators;
        let surface = &mut self.surface;
        let mut find = |locator: &String| {
            surface.locate(locator).ok_or_else(|| {
                warn!("locator {} did not resolve", locator);
                EngineError::not_found(locator)
            })
        };
        Ok(Containers {
            spaces: find(&locators.spaces)?,
            buttons: find(&locators.buttons)?,
            image: find(&locators.image)?,
        })
    }

    fn advance_clock(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Failure illustration level: lives lost + 1.
    fn illustration_level(&self) -> u32 {
        self.config.max_lives - self.lives + 1
    }

    fn show_illustration(&mut self) {
        if let Some(c) = self.containers {
            let src = self.config.image_path(self.illustration_level());
            self.surface.set_image(c.image, &src);
        }
    }

    fn miss(&mut self, token: usize) -> GuessOutcome {
        let letter = self.tokens[token].letter();
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost { letter, remaining: self.lives });

        // The last miss freezes the round with the illustration it already shows.
        if self.lives > 0 {
            self.tokens[token].deactivate(&mut self.surface);
            self.show_illustration();
            GuessOutcome::Incorrect { remaining: self.lives }
        } else {
            self.phase = RoundPhase::OutOfLives;
            self.events.push(GameEvent::OutOfLives { word_index: self.word_index });
            info!("round {} lost", self.word_index);
            GuessOutcome::OutOfLives
        }
    }

    fn hit(&mut self, token: usize, indices: Vec<usize>) -> Result<GuessOutcome, EngineError> {
        let Some(containers) = self.containers else {
            return Ok(GuessOutcome::Ignored);
        };
        self.tokens[token].deactivate(&mut self.surface);
        let from = self.tokens[token].position(&self.surface);

        let mut batch = MoveBatch::new();
        for &slot in &indices {
            let clone = self.tokens[token].spawn_clone(&mut self.surface)?;
            self.surface.append_child(containers.spaces, clone);
            let to = self.slots[slot]
                .position(&self.surface)
                .offset(0.0, -self.config.landing_offset);
            let movement = Movement::arrive(
                &mut self.surface,
                clone,
                from,
                to,
                self.config.move_duration_ms,
                self.now,
            );
            batch.push(Landing { token, slot, clone }, movement);
        }
        self.arrivals.push(batch);
        self.events.push(GameEvent::LetterRevealed {
            letter: self.tokens[token].letter(),
            count: indices.len(),
        });

        self.poll_animations()?;
        Ok(GuessOutcome::Correct { indices })
    }

    /// Send every resting clone of the clicked clone's letter back to the keyboard.
    /// Their slots are shown for the duration of the trip.
    fn recall(&mut self, clicked: usize) {
        let token = self.resting[clicked].token;
        let to = self.tokens[token].position(&self.surface);

        let (leaving, staying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.resting)
            .into_iter()
            .partition(|r| r.token == token);
        self.resting = staying;

        let mut moves = MoveBatch::new();
        for clone in leaving {
            let from = self.surface.bounds(clone.node);
            self.slots[clone.slot].peek(&mut self.surface);
            let movement = Movement::returning(
                &mut self.surface,
                clone.node,
                from,
                to,
                self.config.move_duration_ms,
                self.now,
            );
            moves.push(clone.slot, movement);
        }
        debug!("recalling {} clone(s) of {}", moves.len(), self.tokens[token].letter());
        self.recalls.push(Recall { token, moves });
    }

    fn poll_animations(&mut self) -> Result<(), EngineError> {
        let now = self.now;

        let mut landed = Vec::new();
        let mut joined = 0;
        for batch in &mut self.arrivals {
            if batch.poll(now, &mut self.surface, &mut landed).is_ready() {
                joined += 1;
            }
        }
        for landing in landed {
            self.land(landing)?;
        }
        self.arrivals.retain(|b| !b.is_settled());

        let mut uncovered = Vec::new();
        let mut reactivate = Vec::new();
        for recall in &mut self.recalls {
            if recall.moves.poll(now, &mut self.surface, &mut uncovered).is_ready() {
                reactivate.push(recall.token);
            }
        }
        for slot in uncovered {
            self.slots[slot].cover(&mut self.surface);
        }
        self.recalls.retain(|r| !r.moves.is_settled());
        for token in reactivate {
            self.tokens[token].activate(&mut self.surface);
        }

        // Only a joined batch can complete the word; never mid-batch.
        if joined > 0
            && self.phase == RoundPhase::Playing
            && self.slots.iter().all(BlankSlot::is_solved)
        {
            self.phase = RoundPhase::WordComplete;
            self.events.push(GameEvent::WordComplete { word_index: self.word_index });
            info!("word {} complete", self.word_index);
        }
        if self.phase == RoundPhase::WordComplete && !self.is_animating() {
            self.next_word()?;
        }
        Ok(())
    }

    /// Swap a flying clone for a resting one in front of its slot, and hide the slot.
    fn land(&mut self, landing: Landing) -> Result<(), EngineError> {
        self.surface.remove_node(landing.clone);
        let Some(slot_node) = self.slots[landing.slot].node() else {
            return Ok(());
        };
        let resting = self.tokens[landing.token].spawn_clone(&mut self.surface)?;
        self.surface.insert_before(resting, slot_node);
        self.surface.listen_click(resting);
        self.slots[landing.slot].reveal(&mut self.surface);
        self.resting.push(RestingClone {
            node: resting,
            token: landing.token,
            slot: landing.slot,
        });
        Ok(())
    }

    fn next_word(&mut self) -> Result<(), EngineError> {
        self.word_index += 1;
        if self.word_index >= self.config.words.len() {
            self.phase = RoundPhase::WordsExhausted;
            self.events.push(GameEvent::WordsExhausted);
            info!("all {} words solved", self.config.words.len());
            return Ok(());
        }
        self.initialize_round()
    }
}
