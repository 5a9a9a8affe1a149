use crate::api::error::EngineError;
use crate::api::types::NodeId;
use crate::core::position::Position;
use crate::surface::{NodeSpec, Surface};

/// Class tag for blank slots.
pub const SPACE_ITEM_CLASS: &str = "space-item";

/// One letter position of the secret word.
///
/// Two flags are tracked separately: `solved` is the engine's record that the
/// letter was guessed (monotonic within a round); `hidden` is what the player
/// sees and may be flipped back for a peek.
#[derive(Debug, Clone)]
pub struct BlankSlot {
    index: usize,
    solved: bool,
    hidden: bool,
    node: Option<NodeId>,
}

impl BlankSlot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            solved: false,
            hidden: false,
            node: None,
        }
    }

    pub fn identity(&self) -> String {
        format!("space-item-{}", self.index)
    }

    pub fn build<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        parent: NodeId,
    ) -> Result<NodeId, EngineError> {
        let node = surface.create_node(NodeSpec::block(self.identity(), SPACE_ITEM_CLASS))?;
        surface.append_child(parent, node);
        self.node = Some(node);
        Ok(node)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Mark the slot solved and hide its placeholder.
    pub fn reveal<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.solved = true;
        self.set_hidden(true, surface);
    }

    /// Show the placeholder again without touching `solved`.
    pub fn peek<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.set_hidden(false, surface);
    }

    /// Hide the placeholder again after a peek. Unsolved slots stay visible.
    pub fn cover<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if self.solved {
            self.set_hidden(true, surface);
        }
    }

    fn set_hidden<S: Surface + ?Sized>(&mut self, hidden: bool, surface: &mut S) {
        self.hidden = hidden;
        if let Some(node) = self.node {
            surface.set_visible(node, !hidden);
        }
    }

    pub fn position<S: Surface + ?Sized>(&self, surface: &S) -> Position {
        self.node.map(|n| surface.bounds(n)).unwrap_or(Position::ORIGIN)
    }
}

/// One fresh slot per character of `word`, in word order.
pub fn blanks_for(word: &str) -> Vec<BlankSlot> {
    (0..word.chars().count()).map(BlankSlot::new).collect()
}
