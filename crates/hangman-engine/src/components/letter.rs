use crate::api::error::EngineError;
use crate::api::types::NodeId;
use crate::core::position::Position;
use crate::surface::{NodeSpec, Surface};

/// Class tag shared by keyboard letters and their clones.
pub const LETTER_BOX_CLASS: &str = "letter-box";
/// Class tag present while a letter is inactive.
pub const DISABLED_CLASS: &str = "disabled";

/// The on-screen keyboard, in display order.
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Whether a keyboard letter reacts to clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenState {
    #[default]
    Active,
    Inactive,
}

/// One keyboard letter.
///
/// The token owns its node handle once built and a per-token clone counter
/// that gives every clone a distinct identity.
#[derive(Debug, Clone)]
pub struct LetterToken {
    letter: char,
    state: TokenState,
    clones: u32,
    node: Option<NodeId>,
}

impl LetterToken {
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            state: TokenState::Active,
            clones: 0,
            node: None,
        }
    }

    /// Stable identity derived from the letter.
    pub fn identity(&self) -> String {
        format!("letter-button-{}", self.letter)
    }

    /// Create the token's node under `parent` and start listening for clicks.
    pub fn build<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        parent: NodeId,
    ) -> Result<NodeId, EngineError> {
        let node = surface.create_node(NodeSpec::button(
            self.identity(),
            LETTER_BOX_CLASS,
            self.letter.to_string(),
        ))?;
        surface.append_child(parent, node);
        surface.listen_click(node);
        self.node = Some(node);
        Ok(node)
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn state(&self) -> TokenState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TokenState::Active
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Number of clones spawned so far.
    pub fn clone_count(&self) -> u32 {
        self.clones
    }

    /// The single transition function. Keeps the `disabled` tag in step with the state.
    pub fn set_state<S: Surface + ?Sized>(&mut self, state: TokenState, surface: &mut S) {
        self.state = state;
        if let Some(node) = self.node {
            surface.toggle_class(node, DISABLED_CLASS, state == TokenState::Inactive);
        }
    }

    pub fn activate<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.set_state(TokenState::Active, surface);
    }

    pub fn deactivate<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.set_state(TokenState::Inactive, surface);
    }

    /// Create a detached clone node with a fresh numbered identity.
    /// The token's own state is not touched.
    pub fn spawn_clone<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<NodeId, EngineError> {
        self.clones += 1;
        surface.create_node(NodeSpec::button(
            format!("clone-letter-button-{}{}", self.letter, self.clones),
            LETTER_BOX_CLASS,
            self.letter.to_string(),
        ))
    }

    /// Where the token currently sits on screen.
    pub fn position<S: Surface + ?Sized>(&self, surface: &S) -> Position {
        self.node.map(|n| surface.bounds(n)).unwrap_or(Position::ORIGIN)
    }
}

/// A full keyboard of fresh, active tokens.
pub fn keyboard() -> Vec<LetterToken> {
    ALPHABET.iter().map(|&l| LetterToken::new(l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn keyboard_has_unique_letters() {
        let keys = keyboard();
        assert_eq!(keys.len(), 26);
        assert!(keys.iter().all(|k| k.is_active()));
        let mut ids: Vec<String> = keys.iter().map(|k| k.identity()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 26);
        assert_eq!(keys[0].identity(), "letter-button-A");
    }

    #[test]
    fn state_transition_toggles_disabled_tag() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#keys", Position::ORIGIN);
        let mut token = LetterToken::new('Q');
        let node = token.build(&mut surface, root).unwrap();
        assert!(surface.node(node).unwrap().clickable);

        token.deactivate(&mut surface);
        assert_eq!(token.state(), TokenState::Inactive);
        assert!(surface.node(node).unwrap().has_class(DISABLED_CLASS));

        token.activate(&mut surface);
        assert!(token.is_active());
        assert!(!surface.node(node).unwrap().has_class(DISABLED_CLASS));
    }

    #[test]
    fn clones_get_numbered_identities() {
        let mut surface = MemorySurface::new();
        let mut token = LetterToken::new('E');
        let a = token.spawn_clone(&mut surface).unwrap();
        let b = token.spawn_clone(&mut surface).unwrap();
        assert_eq!(token.clone_count(), 2);
        assert_eq!(surface.node(a).unwrap().identity, "clone-letter-button-E1");
        assert_eq!(surface.node(b).unwrap().identity, "clone-letter-button-E2");
        assert_eq!(surface.node(b).unwrap().label, "E");
        assert!(token.is_active());
    }

    #[test]
    fn position_follows_layout() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#keys", Position::new(0.0, 400.0));
        let mut a = LetterToken::new('A');
        let mut b = LetterToken::new('B');
        a.build(&mut surface, root).unwrap();
        b.build(&mut surface, root).unwrap();
        assert_eq!(a.position(&surface), Position::new(0.0, 400.0));
        assert!(b.position(&surface).x() > a.position(&surface).x());
    }
}
