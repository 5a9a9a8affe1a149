use crate::api::types::NodeId;

/// Input the host forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A node received a primary-activation click.
    Click { node: NodeId },
    /// A letter was typed or picked by other means than the on-screen keyboard.
    Guess { letter: char },
    /// The restart control was used.
    Restart,
}

/// A queue of input events.
/// The host pushes events as they happen; the engine drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_keeps_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Click { node: NodeId(4) });
        q.push(InputEvent::Guess { letter: 'K' });
        q.push(InputEvent::Restart);
        assert_eq!(q.len(), 3);
        let events = q.drain();
        assert_eq!(
            events,
            vec![
                InputEvent::Click { node: NodeId(4) },
                InputEvent::Guess { letter: 'K' },
                InputEvent::Restart,
            ]
        );
        assert!(q.is_empty());
    }
}
