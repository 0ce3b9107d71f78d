use std::collections::HashSet;

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use lottery_field::prelude::{EventSink, FieldEvent, FieldEventKind};

/// Bevy message carrying the field entity and the underlying [`FieldEvent`].
#[derive(Message, Debug, Clone)]
pub struct LotteryFieldMessage {
    pub field_entity: Entity,
    pub event: FieldEvent,
}

/// Which event kinds are forwarded to the bus. An empty filter forwards everything.
#[derive(Debug, Clone, Default)]
pub struct FieldEventFilter {
    kinds: HashSet<FieldEventKind>,
}

impl FieldEventFilter {
    pub fn only(kinds: impl IntoIterator<Item = FieldEventKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn allows(&self, kind: FieldEventKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

/// Configuration for the [`LotteryFieldBus`].
#[derive(Resource, Debug, Clone, Default)]
pub struct LotteryFieldBusConfig {
    pub filter: FieldEventFilter,
}

/// Bus collecting field events from observers and systems; drained into
/// [`LotteryFieldMessage`]s once per frame.
#[derive(Resource)]
pub struct LotteryFieldBus {
    tx: Sender<LotteryFieldMessage>,
    rx: Receiver<LotteryFieldMessage>,
    filter: FieldEventFilter,
}

impl LotteryFieldBus {
    pub fn with_filter(filter: FieldEventFilter) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx, filter }
    }

    pub fn sender(&self) -> &Sender<LotteryFieldMessage> {
        &self.tx
    }

    pub fn receiver(&self) -> &Receiver<LotteryFieldMessage> {
        &self.rx
    }

    pub fn filter(&self) -> &FieldEventFilter {
        &self.filter
    }

    /// A sink tagging every event with `field_entity`.
    pub fn sink(&self, field_entity: Entity) -> ChannelSink {
        ChannelSink {
            field_entity,
            tx: self.tx.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl FromWorld for LotteryFieldBus {
    fn from_world(world: &mut World) -> Self {
        let filter = world
            .get_resource::<LotteryFieldBusConfig>()
            .map(|c| c.filter.clone())
            .unwrap_or_default();
        Self::with_filter(filter)
    }
}

/// Event sink that forwards events to the [`LotteryFieldBus`], tagging each with the field entity.
pub struct ChannelSink {
    pub field_entity: Entity,
    pub tx: Sender<LotteryFieldMessage>,
    pub filter: FieldEventFilter,
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: FieldEvent) {
        let _ = self.tx.send(LotteryFieldMessage {
            field_entity: self.field_entity,
            event,
        });
    }

    #[inline]
    fn wants(&self, kind: FieldEventKind) -> bool {
        self.filter.allows(kind)
    }
}
