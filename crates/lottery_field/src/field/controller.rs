//! Field population controller: initial population, periodic auto-add and removal.
use std::collections::HashMap;
use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::field::config::FieldConfig;
use crate::field::events::{EventSink, FieldEvent, FieldEventKind};
use crate::field::{FieldState, PlacedObject, UniqueId};
use crate::prize::{Prize, PrizeCatalog, PrizeSelector};
use crate::sampling::{rand_range, SpatialPlacer};
use crate::schedule::{CancellationToken, PeriodicTask};

/// Owns the objects on a lottery field and the process that keeps it stocked.
///
/// All mutation goes through `&mut self`, so selection removal and auto-add
/// insertion cannot interleave mid-operation. Hosts sharing a controller between
/// threads must wrap it in a lock.
///
/// Dropping the controller cancels its auto-add task, which also stops anyone
/// holding a clone of its [`CancellationToken`].
#[derive(Debug)]
pub struct FieldPopulationController {
    config: FieldConfig,
    selector: PrizeSelector,
    placer: SpatialPlacer,
    objects: HashMap<UniqueId, PlacedObject>,
    next_unique_id: UniqueId,
    state: FieldState,
    auto_add: Option<PeriodicTask>,
}

impl FieldPopulationController {
    pub fn try_new(config: FieldConfig, catalog: PrizeCatalog) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config, catalog))
    }

    pub fn new(config: FieldConfig, catalog: PrizeCatalog) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid field configuration");

        let placer = SpatialPlacer::new(config.min_distance, config.max_placement_attempts);
        Self {
            config,
            selector: PrizeSelector::new(catalog),
            placer,
            objects: HashMap::new(),
            next_unique_id: 1,
            state: FieldState::Empty,
            auto_add: None,
        }
    }

    /// Populates the field with `object_count` objects and starts auto-add if enabled.
    pub fn initialize(&mut self, rng: &mut dyn Rng, sink: &mut dyn EventSink) -> usize {
        let placed = self.populate_initial(self.config.object_count, rng, sink);
        if self.config.auto_add_enabled {
            self.start_auto_add(sink);
        }
        placed
    }

    /// Clears the field, resets unique ids to 1 and places up to `count` drawn prizes.
    ///
    /// Prizes that cannot be placed are dropped. Returns the number of objects placed.
    pub fn populate_initial(
        &mut self,
        count: usize,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> usize {
        let removed = self.remove_all();
        if removed > 0 && sink.wants(FieldEventKind::Cleared) {
            sink.send(FieldEvent::Cleared { removed });
        }
        self.next_unique_id = 1;

        let capacity = self.config.max_capacity;
        let count = if count > capacity {
            warn!(
                "Requested {} object(s) but capacity is {}; clamping.",
                count, capacity
            );
            capacity
        } else {
            count
        };

        let prizes = self.selector.draw(count, rng);
        self.state = FieldState::Populated;

        if prizes.is_empty() && count > 0 {
            warn!("No prizes drawn; field stays empty.");
            if sink.wants(FieldEventKind::Warning) {
                sink.send(FieldEvent::Warning {
                    context: "populate".into(),
                    message: "No prizes available; field stays empty".into(),
                });
            }
        }

        let mut placed = 0;
        for prize in prizes {
            if self.place_prize(prize, rng, sink).is_some() {
                placed += 1;
            }
        }

        info!("Populated field with {}/{} object(s).", placed, count);
        if sink.wants(FieldEventKind::Populated) {
            sink.send(FieldEvent::Populated {
                requested: count,
                placed,
            });
        }

        placed
    }

    /// Draws one prize and places it, unless the field is at capacity.
    pub fn add_one(&mut self, rng: &mut dyn Rng, sink: &mut dyn EventSink) -> Option<UniqueId> {
        if self.is_full() {
            debug!(
                "Field is full ({}/{}); not adding.",
                self.objects.len(),
                self.config.max_capacity
            );
            return None;
        }

        let Some(prize) = self.selector.draw_one(rng) else {
            warn!("No prize available to add.");
            return None;
        };

        let prize_id = prize.id;
        let unique_id = self.place_prize(prize, rng, sink)?;
        debug!("Added object {} with prize {}.", unique_id, prize_id);
        Some(unique_id)
    }

    /// Advances the auto-add task by `dt`. Each completed wait makes one add attempt,
    /// then a fresh wait starts, so a long frame never adds a burst of objects.
    ///
    /// Returns the id of the added object. Does nothing when auto-add is not running;
    /// a task cancelled through its token is dropped here without a final attempt.
    pub fn tick(
        &mut self,
        dt: Duration,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> Option<UniqueId> {
        let cancelled = self.auto_add.as_ref().is_some_and(|t| t.is_cancelled());
        if cancelled {
            self.auto_add = None;
            debug!("Auto-add task was cancelled; dropping it.");
            if sink.wants(FieldEventKind::AutoAddStopped) {
                sink.send(FieldEvent::AutoAddStopped);
            }
            return None;
        }

        let task = self.auto_add.as_mut()?;
        if !task.advance(dt) {
            return None;
        }

        let unique_id = self.add_one(rng, sink)?;
        info!(
            "Auto-added object ({}/{}).",
            self.objects.len(),
            self.config.max_capacity
        );
        Some(unique_id)
    }

    /// (Re)starts the auto-add task; a previously running task is cancelled first.
    pub fn start_auto_add(&mut self, sink: &mut dyn EventSink) -> CancellationToken {
        if let Some(previous) = self.auto_add.take() {
            previous.cancel();
        }

        let task = PeriodicTask::new(self.config.auto_add_interval);
        let token = task.token().clone();
        self.auto_add = Some(task);

        debug!(
            "Auto-add started (every {:?}, capacity {}).",
            self.config.auto_add_interval, self.config.max_capacity
        );
        if sink.wants(FieldEventKind::AutoAddStarted) {
            sink.send(FieldEvent::AutoAddStarted);
        }
        token
    }

    /// Cancels the auto-add task. Returns whether one was running.
    pub fn stop_auto_add(&mut self, sink: &mut dyn EventSink) -> bool {
        let Some(task) = self.auto_add.take() else {
            return false;
        };
        task.cancel();

        debug!("Auto-add stopped.");
        if sink.wants(FieldEventKind::AutoAddStopped) {
            sink.send(FieldEvent::AutoAddStopped);
        }
        true
    }

    /// Removes a selected object. Unknown or already removed ids are ignored.
    pub fn on_object_selected(
        &mut self,
        unique_id: UniqueId,
        sink: &mut dyn EventSink,
    ) -> Option<PlacedObject> {
        let Some(object) = self.objects.remove(&unique_id) else {
            debug!(
                "Object {} is not on the field; ignoring selection.",
                unique_id
            );
            return None;
        };

        debug!(
            "Removed object {} ('{}'), {} remaining.",
            unique_id,
            object.prize.name,
            self.objects.len()
        );
        if sink.wants(FieldEventKind::ObjectRemoved) {
            sink.send(FieldEvent::ObjectRemoved {
                object: object.clone(),
            });
        }
        Some(object)
    }

    /// Removes every object and cancels auto-add.
    pub fn clear(&mut self, sink: &mut dyn EventSink) {
        self.stop_auto_add(sink);
        let removed = self.remove_all();
        self.state = FieldState::Empty;

        info!("Cleared field ({} object(s) removed).", removed);
        if sink.wants(FieldEventKind::Cleared) {
            sink.send(FieldEvent::Cleared { removed });
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn selector(&self) -> &PrizeSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut PrizeSelector {
        &mut self.selector
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.objects.len() >= self.config.max_capacity
    }

    pub fn get(&self, unique_id: UniqueId) -> Option<&PlacedObject> {
        self.objects.get(&unique_id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.values()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.objects.values().map(|o| o.position).collect()
    }

    /// Id the next placed object will receive.
    pub fn next_unique_id(&self) -> UniqueId {
        self.next_unique_id
    }

    pub fn is_auto_add_running(&self) -> bool {
        self.auto_add.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Token of the running auto-add task; cancelling it stops the task before its next tick.
    pub fn cancellation_token(&self) -> Option<CancellationToken> {
        self.auto_add.as_ref().map(|t| t.token().clone())
    }

    /// Time until the next auto-add attempt, if auto-add is running.
    pub fn time_until_next_add(&self) -> Option<Duration> {
        self.auto_add
            .as_ref()
            .filter(|t| !t.is_cancelled())
            .map(PeriodicTask::remaining)
    }

    fn place_prize(
        &mut self,
        prize: Prize,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> Option<UniqueId> {
        let existing = self.positions();
        let area = self.config.spawn_area();

        let Some(position) = self.placer.find_position(&existing, &area, rng) else {
            warn!(
                "Could not place prize {} after {} attempt(s); skipping.",
                prize.id, self.placer.max_attempts
            );
            if sink.wants(FieldEventKind::PlacementFailed) {
                sink.send(FieldEvent::PlacementFailed {
                    prize_id: prize.id,
                    attempts: self.placer.max_attempts,
                });
            }
            return None;
        };

        let rotation_degrees = rand_range(rng, 0.0, 360.0);
        let unique_id = self.next_unique_id;
        self.next_unique_id += 1;

        let object = PlacedObject {
            unique_id,
            position,
            rotation_degrees,
            prize,
        };
        if sink.wants(FieldEventKind::ObjectPlaced) {
            sink.send(FieldEvent::ObjectPlaced {
                object: object.clone(),
            });
        }
        self.objects.insert(unique_id, object);
        Some(unique_id)
    }

    fn remove_all(&mut self) -> usize {
        let removed = self.objects.len();
        self.objects.clear();
        removed
    }
}

impl Drop for FieldPopulationController {
    fn drop(&mut self) {
        if let Some(task) = &self.auto_add {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::field::events::VecSink;

    fn catalog() -> PrizeCatalog {
        PrizeCatalog::new(vec![
            Prize::new(1, "Candy", 70.0),
            Prize::new(2, "Plush", 25.0),
            Prize::new(3, "Golden Ticket", 5.0),
        ])
    }

    fn roomy_config() -> FieldConfig {
        FieldConfig::new(Vec2::new(100.0, 100.0))
            .with_object_count(10)
            .with_max_capacity(15)
            .with_auto_add_interval(Duration::from_secs(1))
    }

    fn controller(config: FieldConfig) -> FieldPopulationController {
        FieldPopulationController::try_new(config, catalog()).unwrap()
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = FieldConfig::default().with_max_capacity(0);
        assert!(FieldPopulationController::try_new(config, catalog()).is_err());
    }

    #[test]
    fn populate_initial_assigns_sequential_ids_from_one() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(1);
        let mut sink = VecSink::new();

        let placed = field.populate_initial(10, &mut rng, &mut sink);
        assert_eq!(placed, 10);
        assert_eq!(field.len(), 10);
        assert_eq!(field.state(), FieldState::Populated);

        let mut ids: Vec<UniqueId> = field.objects().map(|o| o.unique_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(sink.count(FieldEventKind::ObjectPlaced), 10);
        assert!(sink.as_slice().contains(&FieldEvent::Populated {
            requested: 10,
            placed: 10
        }));
    }

    #[test]
    fn repopulating_resets_ids_and_replaces_objects() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(2);
        field.populate_initial(10, &mut rng, &mut ());
        field.on_object_selected(3, &mut ());

        let mut sink = VecSink::new();
        field.populate_initial(4, &mut rng, &mut sink);
        assert_eq!(field.len(), 4);
        assert!(field.get(1).is_some());
        assert_eq!(field.next_unique_id(), 5);
        assert!(sink
            .as_slice()
            .contains(&FieldEvent::Cleared { removed: 9 }));
    }

    #[test]
    fn placed_objects_respect_min_distance_and_area() {
        let config = FieldConfig::default()
            .with_object_count(20)
            .with_max_capacity(20);
        let mut field = controller(config.clone());
        let mut rng = StdRng::seed_from_u64(3);
        field.populate_initial(20, &mut rng, &mut ());

        let objects: Vec<&PlacedObject> = field.objects().collect();
        assert!(objects.len() <= 20);
        for (i, a) in objects.iter().enumerate() {
            assert!(config.spawn_area().contains(a.position));
            assert!((0.0..360.0).contains(&a.rotation_degrees));
            for b in &objects[i + 1..] {
                assert!(a.position.distance_squared(b.position) >= 0.8 * 0.8);
            }
        }
    }

    #[test]
    fn placement_failures_are_skipped() {
        let config = FieldConfig::new(Vec2::new(1.0, 1.0))
            .with_object_count(5)
            .with_min_distance(10.0)
            .with_max_placement_attempts(5);
        let mut field = controller(config);
        let mut rng = StdRng::seed_from_u64(4);
        let mut sink = VecSink::new();

        let placed = field.populate_initial(5, &mut rng, &mut sink);
        assert_eq!(placed, 1);
        assert_eq!(field.len(), 1);
        assert_eq!(sink.count(FieldEventKind::PlacementFailed), 4);
        assert_eq!(field.next_unique_id(), 2);
    }

    #[test]
    fn empty_catalog_leaves_field_empty_with_warning() {
        let mut field =
            FieldPopulationController::try_new(roomy_config(), PrizeCatalog::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut sink = VecSink::new();

        assert_eq!(field.populate_initial(10, &mut rng, &mut sink), 0);
        assert!(field.is_empty());
        assert_eq!(sink.count(FieldEventKind::Warning), 1);
        assert_eq!(field.add_one(&mut rng, &mut sink), None);
    }

    #[test]
    fn requests_above_capacity_are_clamped() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(6);
        field.populate_initial(40, &mut rng, &mut ());
        assert!(field.len() <= 15);
    }

    #[test]
    fn selection_removes_exactly_once() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(7);
        field.populate_initial(10, &mut rng, &mut ());

        let mut sink = VecSink::new();
        let removed = field.on_object_selected(4, &mut sink).unwrap();
        assert_eq!(removed.unique_id, 4);
        assert_eq!(field.len(), 9);
        assert!(field.get(4).is_none());

        assert!(field.on_object_selected(4, &mut sink).is_none());
        assert_eq!(field.len(), 9);
        assert_eq!(sink.count(FieldEventKind::ObjectRemoved), 1);

        assert!(field.on_object_selected(999, &mut sink).is_none());
        assert_eq!(field.len(), 9);
    }

    #[test]
    fn auto_add_never_exceeds_capacity() {
        let mut field = controller(roomy_config().with_max_capacity(12));
        let mut rng = StdRng::seed_from_u64(8);
        let mut sink = VecSink::new();
        field.initialize(&mut rng, &mut sink);
        assert!(field.is_auto_add_running());

        for _ in 0..100 {
            field.tick(Duration::from_secs(1), &mut rng, &mut sink);
            assert!(field.len() <= 12);
        }
        assert_eq!(field.len(), 12);
        assert!(field.is_full());

        // Freed slots are refilled on later ticks.
        field.on_object_selected(1, &mut sink);
        assert!(field.tick(Duration::from_secs(1), &mut rng, &mut sink).is_some());
        assert_eq!(field.len(), 12);
        let ids: HashSet<UniqueId> = field.objects().map(|o| o.unique_id).collect();
        assert_eq!(ids.len(), 12);
        assert!(!ids.contains(&1));
    }

    #[test]
    fn auto_add_waits_for_full_interval() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(9);
        field.initialize(&mut rng, &mut ());
        assert_eq!(field.len(), 10);

        assert!(field.tick(Duration::from_millis(999), &mut rng, &mut ()).is_none());
        assert_eq!(
            field.time_until_next_add(),
            Some(Duration::from_millis(1))
        );
        assert!(field.tick(Duration::from_millis(1), &mut rng, &mut ()).is_some());
        assert_eq!(field.len(), 11);
    }

    #[test]
    fn long_frame_adds_a_single_object() {
        let mut field = controller(roomy_config().with_auto_add_interval(Duration::from_secs(5)));
        let mut rng = StdRng::seed_from_u64(14);
        field.initialize(&mut rng, &mut ());
        assert_eq!(field.len(), 10);

        assert!(field.tick(Duration::from_secs(60), &mut rng, &mut ()).is_some());
        assert_eq!(field.len(), 11);
        assert_eq!(field.time_until_next_add(), Some(Duration::from_secs(5)));
        assert!(field.tick(Duration::from_secs(4), &mut rng, &mut ()).is_none());
        assert_eq!(field.len(), 11);
    }

    #[test]
    fn full_field_makes_one_attempt_per_wait() {
        let mut field = controller(roomy_config().with_max_capacity(10));
        let mut rng = StdRng::seed_from_u64(15);
        field.initialize(&mut rng, &mut ());
        assert!(field.is_full());

        let mut sink = VecSink::new();
        assert!(field.tick(Duration::from_secs(120), &mut rng, &mut sink).is_none());
        assert_eq!(field.len(), 10);
        assert_eq!(sink.count(FieldEventKind::ObjectPlaced), 0);
        assert!(field.is_auto_add_running());
    }

    #[test]
    fn auto_add_is_off_when_disabled() {
        let mut field = controller(roomy_config().with_auto_add_enabled(false));
        let mut rng = StdRng::seed_from_u64(10);
        field.initialize(&mut rng, &mut ());
        assert!(!field.is_auto_add_running());
        assert!(field.tick(Duration::from_secs(30), &mut rng, &mut ()).is_none());
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn stopped_auto_add_performs_no_final_tick() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(11);
        field.initialize(&mut rng, &mut ());
        field.tick(Duration::from_millis(900), &mut rng, &mut ());

        let mut sink = VecSink::new();
        assert!(field.stop_auto_add(&mut sink));
        assert!(!field.stop_auto_add(&mut sink));
        assert!(field.tick(Duration::from_secs(5), &mut rng, &mut sink).is_none());
        assert_eq!(field.len(), 10);
        assert_eq!(sink.count(FieldEventKind::AutoAddStopped), 1);
    }

    #[test]
    fn external_token_cancellation_stops_task() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(12);
        field.initialize(&mut rng, &mut ());

        let token = field.cancellation_token().unwrap();
        token.cancel();
        assert!(!field.is_auto_add_running());

        let mut sink = VecSink::new();
        assert!(field.tick(Duration::from_secs(3), &mut rng, &mut sink).is_none());
        assert_eq!(sink.count(FieldEventKind::AutoAddStopped), 1);
        assert!(field.cancellation_token().is_none());
    }

    #[test]
    fn restarting_auto_add_cancels_previous_task() {
        let mut field = controller(roomy_config());
        let first = field.start_auto_add(&mut ());
        let second = field.start_auto_add(&mut ());
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn clear_empties_field_and_cancels_auto_add() {
        let mut field = controller(roomy_config());
        let mut rng = StdRng::seed_from_u64(13);
        field.initialize(&mut rng, &mut ());
        let token = field.cancellation_token().unwrap();

        let mut sink = VecSink::new();
        field.clear(&mut sink);
        assert!(field.is_empty());
        assert_eq!(field.state(), FieldState::Empty);
        assert!(token.is_cancelled());
        assert!(sink
            .as_slice()
            .contains(&FieldEvent::Cleared { removed: 10 }));
        assert!(field.tick(Duration::from_secs(5), &mut rng, &mut ()).is_none());
    }

    #[test]
    fn dropping_controller_cancels_auto_add() {
        let mut field = controller(roomy_config());
        let token = field.start_auto_add(&mut ());
        drop(field);
        assert!(token.is_cancelled());
    }
}
