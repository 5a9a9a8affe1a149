// extensions/movement.rs
//
// Clone flights: time-based linear movement of a node between two positions.
// Each Movement owns its own progress; a MoveBatch joins several of them.
//
// Usage:
//   let m = Movement::arrive(&mut surface, node, from, to, 500.0, now);
//   batch.push(tag, m);
//   // every frame:
//   if batch.poll(now, &mut surface, &mut settled).is_ready() { /* join point */ }

use std::task::Poll;

use crate::api::types::NodeId;
use crate::core::position::{interpolate, Position};
use crate::surface::Surface;

/// Flight duration used when the caller does not pick one.
pub const DEFAULT_MOVE_DURATION_MS: f64 = 500.0;

/// What happens to the node once the movement arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The node stays where it landed.
    Arrive,
    /// The node is a spent clone and is detached on arrival.
    Return,
}

/// One in-flight movement of one node.
///
/// Progress is `clamp(now - started_at, 0, duration) / duration`, sampled each
/// time the movement is polled. A non-positive duration settles immediately
/// with the node already at `to`.
#[derive(Debug, Clone)]
pub struct Movement {
    node: NodeId,
    from: Position,
    to: Position,
    duration: f64,
    started_at: f64,
    kind: MoveKind,
    settled: bool,
}

impl Movement {
    /// Start moving `node` from `from` to `to` (moveTo).
    pub fn arrive<S: Surface + ?Sized>(
        surface: &mut S,
        node: NodeId,
        from: Position,
        to: Position,
        duration: f64,
        now: f64,
    ) -> Self {
        Self::begin(surface, node, from, to, duration, now, MoveKind::Arrive)
    }

    /// Start returning a clone from `from` to `to`, detaching it on arrival (returnTo).
    pub fn returning<S: Surface + ?Sized>(
        surface: &mut S,
        node: NodeId,
        from: Position,
        to: Position,
        duration: f64,
        now: f64,
    ) -> Self {
        Self::begin(surface, node, from, to, duration, now, MoveKind::Return)
    }

    fn begin<S: Surface + ?Sized>(
        surface: &mut S,
        node: NodeId,
        from: Position,
        to: Position,
        duration: f64,
        now: f64,
        kind: MoveKind,
    ) -> Self {
        let mut movement = Self {
            node,
            from,
            to,
            duration,
            started_at: now,
            kind,
            settled: false,
        };
        surface.place(node, from);
        if duration <= 0.0 {
            movement.finish(surface);
        }
        movement
    }

    /// Normalized progress at `now`, in [0, 1].
    pub fn progress(&self, now: f64) -> f32 {
        if self.settled || self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.started_at).clamp(0.0, self.duration);
        (elapsed / self.duration) as f32
    }

    /// Advance to `now`, writing the interpolated position to the node.
    /// Ready once the node has reached `to`; polling again stays Ready.
    pub fn poll<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> Poll<()> {
        if self.settled {
            return Poll::Ready(());
        }
        let progress = self.progress(now);
        if progress >= 1.0 {
            self.finish(surface);
            return Poll::Ready(());
        }
        surface.place(self.node, interpolate(self.from, self.to, progress));
        Poll::Pending
    }

    fn finish<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.place(self.node, self.to);
        if self.kind == MoveKind::Return {
            surface.remove_node(self.node);
        }
        self.settled = true;
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn origin(&self) -> Position {
        self.from
    }

    pub fn destination(&self) -> Position {
        self.to
    }

    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

#[derive(Debug, Clone)]
struct Flight<T> {
    tag: T,
    movement: Movement,
    reported: bool,
}

/// A set of movements started together and awaited together.
/// Movements progress independently; the batch is Ready only when all have settled.
#[derive(Debug, Clone)]
pub struct MoveBatch<T> {
    flights: Vec<Flight<T>>,
}

impl<T: Copy> MoveBatch<T> {
    pub fn new() -> Self {
        Self { flights: Vec::new() }
    }

    /// Add a movement, identified by `tag` when it settles.
    pub fn push(&mut self, tag: T, movement: Movement) {
        self.flights.push(Flight { tag, movement, reported: false });
    }

    /// Poll every unsettled movement. Tags of movements that settled during
    /// this call are appended to `settled`, each exactly once over the
    /// lifetime of the batch.
    pub fn poll<S: Surface + ?Sized>(
        &mut self,
        now: f64,
        surface: &mut S,
        settled: &mut Vec<T>,
    ) -> Poll<()> {
        for flight in self.flights.iter_mut().filter(|f| !f.reported) {
            if flight.movement.poll(now, surface).is_ready() {
                flight.reported = true;
                settled.push(flight.tag);
            }
        }
        if self.is_settled() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }

    /// Whether every movement has settled and been reported.
    pub fn is_settled(&self) -> bool {
        self.flights.iter().all(|f| f.reported)
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Tags of all movements in the batch, settled or not.
    pub fn tags(&self) -> impl Iterator<Item = T> + '_ {
        self.flights.iter().map(|f| f.tag)
    }
}

impl<T: Copy> Default for MoveBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemorySurface, NodeSpec};

    fn surface_with_clone() -> (MemorySurface, NodeId) {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#spaces", Position::ORIGIN);
        let node = surface
            .create_node(NodeSpec::button("clone-letter-button-A1", "letter-box", "A"))
            .unwrap();
        surface.append_child(root, node);
        (surface, node)
    }

    #[test]
    fn arrive_interpolates_linearly() {
        let (mut surface, node) = surface_with_clone();
        let from = Position::new(0.0, 200.0);
        let to = Position::new(100.0, 0.0);
        let mut m = Movement::arrive(&mut surface, node, from, to, 500.0, 1000.0);
        assert_eq!(surface.bounds(node), from);

        assert!(m.poll(1250.0, &mut surface).is_pending());
        let mid = surface.bounds(node);
        assert!((mid.x() - 50.0).abs() < 0.01);
        assert!((mid.y() - 100.0).abs() < 0.01);

        assert!(m.poll(1500.0, &mut surface).is_ready());
        assert_eq!(surface.bounds(node), to);
        assert!(m.is_settled());
    }

    #[test]
    fn overshooting_frame_lands_exactly() {
        let (mut surface, node) = surface_with_clone();
        let to = Position::new(33.0, 77.0);
        let mut m = Movement::arrive(&mut surface, node, Position::ORIGIN, to, 500.0, 0.0);
        assert!(m.poll(9000.0, &mut surface).is_ready());
        assert_eq!(surface.bounds(node), to);
        assert_eq!(m.progress(9000.0), 1.0);
    }

    #[test]
    fn frame_before_start_clamps_to_zero() {
        let (mut surface, node) = surface_with_clone();
        let from = Position::new(10.0, 10.0);
        let mut m = Movement::arrive(&mut surface, node, from, Position::new(90.0, 90.0), 500.0, 100.0);
        assert_eq!(m.progress(50.0), 0.0);
        assert!(m.poll(50.0, &mut surface).is_pending());
        assert_eq!(surface.bounds(node), from);
    }

    #[test]
    fn same_endpoints_still_run_to_schedule() {
        let (mut surface, node) = surface_with_clone();
        let p = Position::new(5.0, 5.0);
        let mut m = Movement::arrive(&mut surface, node, p, p, 500.0, 0.0);
        assert!(m.poll(250.0, &mut surface).is_pending());
        assert_eq!(surface.bounds(node), p);
        assert!(m.poll(500.0, &mut surface).is_ready());
    }

    #[test]
    fn non_positive_duration_settles_at_destination() {
        let (mut surface, node) = surface_with_clone();
        let to = Position::new(40.0, 40.0);
        for duration in [0.0, -10.0] {
            let mut m = Movement::arrive(&mut surface, node, Position::ORIGIN, to, duration, 0.0);
            assert!(m.is_settled());
            assert_eq!(surface.bounds(node), to);
            assert!(m.poll(0.0, &mut surface).is_ready());
        }
    }

    #[test]
    fn zero_duration_return_detaches_immediately() {
        let (mut surface, node) = surface_with_clone();
        let mut m = Movement::returning(&mut surface, node, Position::new(60.0, 60.0), Position::ORIGIN, 0.0, 0.0);
        assert!(m.is_settled());
        assert!(surface.node(node).is_none());
        assert!(m.poll(0.0, &mut surface).is_ready());
    }

    #[test]
    fn returning_detaches_clone_on_arrival() {
        let (mut surface, node) = surface_with_clone();
        let mut m = Movement::returning(
            &mut surface,
            node,
            Position::new(100.0, 100.0),
            Position::ORIGIN,
            200.0,
            0.0,
        );
        assert!(m.poll(100.0, &mut surface).is_pending());
        assert!(surface.node(node).is_some());
        assert!(m.poll(200.0, &mut surface).is_ready());
        assert!(surface.node(node).is_none());
    }

    #[test]
    fn batch_joins_after_slowest() {
        let mut surface = MemorySurface::new();
        let root = surface.mount("#spaces", Position::ORIGIN);
        let mut batch = MoveBatch::new();
        for (i, duration) in [100.0, 300.0].into_iter().enumerate() {
            let node = surface
                .create_node(NodeSpec::button(format!("clone-{}", i), "letter-box", "A"))
                .unwrap();
            surface.append_child(root, node);
            let m = Movement::arrive(&mut surface, node, Position::ORIGIN, Position::new(10.0, 0.0), duration, 0.0);
            batch.push(i, m);
        }

        let mut settled = Vec::new();
        assert!(batch.poll(150.0, &mut surface, &mut settled).is_pending());
        assert_eq!(settled, vec![0]);

        settled.clear();
        assert!(batch.poll(300.0, &mut surface, &mut settled).is_ready());
        assert_eq!(settled, vec![1]);

        settled.clear();
        assert!(batch.poll(400.0, &mut surface, &mut settled).is_ready());
        assert!(settled.is_empty(), "tags are reported only once");
    }

    #[test]
    fn zero_duration_batch_reports_on_first_poll() {
        let (mut surface, node) = surface_with_clone();
        let mut batch = MoveBatch::new();
        batch.push('A', Movement::arrive(&mut surface, node, Position::ORIGIN, Position::ORIGIN, 0.0, 0.0));
        assert!(!batch.is_settled());
        let mut settled = Vec::new();
        assert!(batch.poll(0.0, &mut surface, &mut settled).is_ready());
        assert_eq!(settled, vec!['A']);
    }
}
