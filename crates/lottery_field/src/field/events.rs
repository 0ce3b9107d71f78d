//! Event types and sinks for observing a lottery field.
//!
//! The controller reports what happened through [`FieldEvent`]s so presentation
//! layers (spawning sprites, playing sounds, updating counters) can react without
//! the core knowing about them. Sinks may opt out of event kinds via
//! [`EventSink::wants`] to avoid building events nobody reads.
use crate::field::{PlacedObject, UniqueId};
use crate::prize::PrizeId;

/// Describes events emitted while populating and mutating a field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Emitted after an initial population finished.
    Populated {
        /// Number of objects requested.
        requested: usize,
        /// Number of objects actually placed.
        placed: usize,
    },

    /// Emitted when an object was added to the field.
    ObjectPlaced { object: PlacedObject },

    /// Emitted when an object was removed after being selected.
    ObjectRemoved { object: PlacedObject },

    /// Emitted when no free position was found for a drawn prize.
    PlacementFailed {
        /// The prize that could not be placed.
        prize_id: PrizeId,
        /// Number of candidate positions that were rejected.
        attempts: usize,
    },

    /// Emitted when the field was cleared.
    Cleared {
        /// Number of objects removed.
        removed: usize,
    },

    /// Emitted when the auto-add task was (re)started.
    AutoAddStarted,

    /// Emitted when the auto-add task was cancelled.
    AutoAddStopped,

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. operation name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`FieldEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEventKind {
    Populated,
    ObjectPlaced,
    ObjectRemoved,
    PlacementFailed,
    Cleared,
    AutoAddStarted,
    AutoAddStopped,
    Warning,
}

impl FieldEvent {
    pub fn kind(&self) -> FieldEventKind {
        match self {
            FieldEvent::Populated { .. } => FieldEventKind::Populated,
            FieldEvent::ObjectPlaced { .. } => FieldEventKind::ObjectPlaced,
            FieldEvent::ObjectRemoved { .. } => FieldEventKind::ObjectRemoved,
            FieldEvent::PlacementFailed { .. } => FieldEventKind::PlacementFailed,
            FieldEvent::Cleared { .. } => FieldEventKind::Cleared,
            FieldEvent::AutoAddStarted => FieldEventKind::AutoAddStarted,
            FieldEvent::AutoAddStopped => FieldEventKind::AutoAddStopped,
            FieldEvent::Warning { .. } => FieldEventKind::Warning,
        }
    }

    /// Unique id of the object this event is about, if any.
    pub fn unique_id(&self) -> Option<UniqueId> {
        match self {
            FieldEvent::ObjectPlaced { object } | FieldEvent::ObjectRemoved { object } => {
                Some(object.unique_id)
            }
            _ => None,
        }
    }
}

/// A generic event sink that accepts [`FieldEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: FieldEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: FieldEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = FieldEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: FieldEvent) {}

    #[inline]
    fn wants(&self, _kind: FieldEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(FieldEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FieldEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(FieldEvent),
{
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<FieldEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<FieldEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[FieldEvent] {
        &self.events
    }

    /// Number of collected events of the given kind.
    pub fn count(&self, kind: FieldEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks that want it.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: FieldEvent) {
        let kind = event.kind();
        for sink in self.sinks.iter_mut().filter(|s| s.wants(kind)) {
            sink.send(event.clone());
        }
    }

    fn wants(&self, kind: FieldEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::prize::Prize;

    fn warning(ctx: &str) -> FieldEvent {
        FieldEvent::Warning {
            context: ctx.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn kind_and_unique_id_follow_variant() {
        let object = PlacedObject {
            unique_id: 4,
            position: Vec2::ZERO,
            rotation_degrees: 0.0,
            prize: Prize::new(1, "Candy", 1.0),
        };
        let placed = FieldEvent::ObjectPlaced { object };
        assert_eq!(placed.kind(), FieldEventKind::ObjectPlaced);
        assert_eq!(placed.unique_id(), Some(4));
        assert_eq!(warning("a").unique_id(), None);
    }

    #[test]
    fn vec_sink_collects_and_counts() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(FieldEvent::AutoAddStarted);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(FieldEventKind::Warning), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink: &dyn EventSink = &();
        assert!(!sink.wants(FieldEventKind::Warning));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks()[0].len(), 1);
        assert_eq!(multi.sinks()[1].len(), 1);
        assert!(multi.wants(FieldEventKind::Cleared));
        assert!(!MultiSink::<VecSink>::new().wants(FieldEventKind::Cleared));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send_many([warning("a"), warning("b")]);
        drop(sink);
        assert_eq!(count, 2);
    }
}
