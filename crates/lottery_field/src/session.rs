//! The selection/result loop: one pick at a time, with a result screen for new prizes.
use std::mem;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::field::controller::FieldPopulationController;
use crate::field::events::EventSink;
use crate::field::UniqueId;
use crate::persistence::{AcquisitionLog, KeyValueStore};
use crate::prize::Prize;

/// Where the session is in its loop.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    AwaitingSelection,
    /// A first-time prize is on screen until [`LotterySession::acknowledge_result`].
    ShowingResult {
        prize: Prize,
    },
    #[default]
    Stopped,
}

/// What happened to a pick.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    FirstAcquisition(Prize),
    Repeat { prize: Prize, count: u32 },
    /// The session was not awaiting a selection; the field is untouched.
    Ignored,
    /// No object with that id is on the field.
    Missing,
}

#[derive(Debug)]
pub struct LotterySession<S: KeyValueStore> {
    controller: FieldPopulationController,
    acquisitions: AcquisitionLog<S>,
    phase: SessionPhase,
}

impl<S: KeyValueStore> LotterySession<S> {
    pub fn new(controller: FieldPopulationController, acquisitions: AcquisitionLog<S>) -> Self {
        Self {
            controller,
            acquisitions,
            phase: SessionPhase::Stopped,
        }
    }

    /// Populates the field and starts accepting picks. Returns the number of objects placed.
    pub fn start(&mut self, rng: &mut dyn Rng, sink: &mut dyn EventSink) -> usize {
        let placed = self.controller.initialize(rng, sink);
        self.phase = SessionPhase::AwaitingSelection;
        info!("Lottery session started with {} object(s).", placed);
        placed
    }

    pub fn pick(&mut self, unique_id: UniqueId, sink: &mut dyn EventSink) -> PickOutcome {
        if self.phase != SessionPhase::AwaitingSelection {
            debug!("Ignoring pick of {} while {:?}.", unique_id, self.phase);
            return PickOutcome::Ignored;
        }

        let Some(object) = self.controller.on_object_selected(unique_id, sink) else {
            return PickOutcome::Missing;
        };
        let prize = object.prize;

        if self.acquisitions.record(prize.id) {
            info!("New prize acquired: '{}' ({}).", prize.name, prize.id);
            self.phase = SessionPhase::ShowingResult {
                prize: prize.clone(),
            };
            PickOutcome::FirstAcquisition(prize)
        } else {
            let count = self.acquisitions.count_of(prize.id);
            info!("Prize '{}' acquired again ({} total).", prize.name, count);
            PickOutcome::Repeat { prize, count }
        }
    }

    /// Leaves the result screen. Returns the prize that was shown, if any.
    pub fn acknowledge_result(&mut self) -> Option<Prize> {
        if !matches!(self.phase, SessionPhase::ShowingResult { .. }) {
            return None;
        }
        match mem::replace(&mut self.phase, SessionPhase::AwaitingSelection) {
            SessionPhase::ShowingResult { prize } => Some(prize),
            _ => None,
        }
    }

    /// Drives auto-add. Does nothing once stopped.
    pub fn tick(
        &mut self,
        dt: Duration,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> Option<UniqueId> {
        if self.phase == SessionPhase::Stopped {
            return None;
        }
        self.controller.tick(dt, rng, sink)
    }

    /// Stops auto-add and further picks. The field keeps its objects.
    pub fn shutdown(&mut self, sink: &mut dyn EventSink) {
        self.controller.stop_auto_add(sink);
        self.phase = SessionPhase::Stopped;
        info!("Lottery session stopped.");
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn controller(&self) -> &FieldPopulationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FieldPopulationController {
        &mut self.controller
    }

    pub fn acquisitions(&self) -> &AcquisitionLog<S> {
        &self.acquisitions
    }

    pub fn into_parts(self) -> (FieldPopulationController, AcquisitionLog<S>) {
        (self.controller, self.acquisitions)
    }
}
