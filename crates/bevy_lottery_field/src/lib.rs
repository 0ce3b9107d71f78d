//! Bevy plugin for lottery_field providing catalog assets, field components, entity events and systems.
#![forbid(unsafe_code)]

pub use assets::{PrizeCatalogAsset, PrizeCatalogAssetLoader};
use bevy::prelude::*;
pub use events::{
    ChannelSink, FieldEventFilter, LotteryFieldBus, LotteryFieldBusConfig, LotteryFieldMessage,
};
use lottery_field::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod assets;
mod events;

/// Convenient re-exports for common types. Import with `use bevy_lottery_field::prelude::*;`.
pub mod prelude {
    pub use lottery_field::prelude::*;

    pub use crate::assets::{PrizeCatalogAsset, PrizeCatalogAssetLoader};
    pub use crate::events::{
        ChannelSink, FieldEventFilter, LotteryFieldBus, LotteryFieldBusConfig,
        LotteryFieldMessage,
    };
    pub use crate::{
        LotteryField, LotteryFieldPlugin, LotteryFieldReady, PickLotteryObject, PrizeAcquired,
        PrizeCollection, StartLotteryField, StopLotteryField,
    };
}

/// Bevy plugin providing the catalog asset, message types, observers and the auto-add system.
///
/// Auto-add is driven by `Res<Time>`, so add `TimePlugin` (part of `MinimalPlugins` and
/// `DefaultPlugins`) as well.
pub struct LotteryFieldPlugin;

/// A running lottery field: the population controller and its RNG.
///
/// Removing the component (or despawning its entity) cancels the field's auto-add task.
#[derive(Component)]
pub struct LotteryField {
    controller: FieldPopulationController,
    rng: StdRng,
}

impl LotteryField {
    pub fn new(controller: FieldPopulationController, seed: u64) -> Self {
        Self {
            controller,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn controller(&self) -> &FieldPopulationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FieldPopulationController {
        &mut self.controller
    }

    /// Places one more object using the field's RNG.
    pub fn add_one(&mut self, sink: &mut dyn EventSink) -> Option<UniqueId> {
        self.controller.add_one(&mut self.rng, sink)
    }

    fn initialize(&mut self, sink: &mut dyn EventSink) -> usize {
        self.controller.initialize(&mut self.rng, sink)
    }

    fn tick(&mut self, dt: std::time::Duration, sink: &mut dyn EventSink) -> Option<UniqueId> {
        self.controller.tick(dt, &mut self.rng, sink)
    }
}

/// Prizes the player has collected, shared by every field.
///
/// Backed by an in-memory store unless the app inserts its own before adding the plugin.
#[derive(Resource)]
pub struct PrizeCollection(pub AcquisitionLog<Box<dyn KeyValueStore + Send + Sync>>);

impl PrizeCollection {
    pub fn from_store(store: impl KeyValueStore + Send + Sync + 'static) -> Self {
        Self(AcquisitionLog::load(Box::new(store)))
    }
}

impl Default for PrizeCollection {
    fn default() -> Self {
        Self::from_store(MemoryStore::new())
    }
}

/// A request to populate a field on `entity` from a catalog asset.
#[non_exhaustive]
#[derive(EntityEvent)]
pub struct StartLotteryField {
    /// Entity that receives the [`LotteryField`] component.
    pub entity: Entity,
    /// Handle to the prize catalog asset.
    pub catalog: Handle<PrizeCatalogAsset>,
    /// Field configuration; falls back to the asset's `field` section, then the defaults.
    pub config: Option<FieldConfig>,
    /// RNG seed for deterministic draws and placement.
    pub seed: u64,
}

impl StartLotteryField {
    pub fn new(entity: Entity, catalog: Handle<PrizeCatalogAsset>, seed: u64) -> Self {
        Self {
            entity,
            catalog,
            config: None,
            seed,
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// [`EntityEvent`] triggered once a field has been populated.
#[derive(EntityEvent, Debug, Clone)]
pub struct LotteryFieldReady {
    pub entity: Entity,
    /// Number of objects placed by the initial population.
    pub placed: usize,
}

/// The player picked the object `unique_id` on the field `entity`.
#[non_exhaustive]
#[derive(EntityEvent, Debug, Clone)]
pub struct PickLotteryObject {
    pub entity: Entity,
    pub unique_id: UniqueId,
}

impl PickLotteryObject {
    pub fn new(entity: Entity, unique_id: UniqueId) -> Self {
        Self { entity, unique_id }
    }
}

/// [`EntityEvent`] triggered when a pick removed an object and its prize was collected.
#[derive(EntityEvent, Debug, Clone)]
pub struct PrizeAcquired {
    /// Field entity the object was picked from.
    pub entity: Entity,
    pub object: PlacedObject,
    /// Whether this was the first time the prize was won.
    pub first_time: bool,
    /// Total wins of this prize, including this one.
    pub count: u32,
}

/// Stops auto-add on a field, optionally removing all of its objects.
#[non_exhaustive]
#[derive(EntityEvent, Debug, Clone)]
pub struct StopLotteryField {
    pub entity: Entity,
    pub clear: bool,
}

impl StopLotteryField {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            clear: false,
        }
    }

    pub fn clearing(entity: Entity) -> Self {
        Self {
            entity,
            clear: true,
        }
    }
}

impl Plugin for LotteryFieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<LotteryFieldMessage>()
            .init_asset::<PrizeCatalogAsset>()
            .init_asset_loader::<PrizeCatalogAssetLoader>()
            .init_resource::<LotteryFieldBusConfig>()
            .init_resource::<LotteryFieldBus>()
            .init_resource::<PrizeCollection>()
            .add_systems(
                Update,
                (tick_lottery_fields, drain_lottery_messages).chain(),
            )
            .add_observer(start_lottery_field)
            .add_observer(pick_lottery_object)
            .add_observer(stop_lottery_field);
    }
}

fn start_lottery_field(
    request: On<StartLotteryField>,
    mut commands: Commands,
    bus: Res<LotteryFieldBus>,
    assets: Res<Assets<PrizeCatalogAsset>>,
) {
    let entity = request.entity;

    let Some(asset) = assets.get(&request.catalog) else {
        error!("PrizeCatalogAsset not loaded yet: {:?}", request.catalog);
        return;
    };

    let config = request
        .config
        .clone()
        .unwrap_or_else(|| asset.field_config());
    let controller = match FieldPopulationController::try_new(config, asset.into()) {
        Ok(controller) => controller,
        Err(err) => {
            warn!("StartLotteryField config invalid for {:?}: {}", entity, err);
            return;
        }
    };

    let mut field = LotteryField::new(controller, request.seed);
    let mut sink = bus.sink(entity);
    let placed = field.initialize(&mut sink);

    // Replacing an existing field drops it, which cancels its auto-add task.
    commands.entity(entity).insert(field);
    commands.trigger(LotteryFieldReady { entity, placed });
}

fn pick_lottery_object(
    pick: On<PickLotteryObject>,
    mut commands: Commands,
    bus: Res<LotteryFieldBus>,
    mut collection: ResMut<PrizeCollection>,
    mut fields: Query<&mut LotteryField>,
) {
    let entity = pick.entity;
    let Ok(mut field) = fields.get_mut(entity) else {
        warn!("PickLotteryObject for {:?} without a LotteryField.", entity);
        return;
    };

    let mut sink = bus.sink(entity);
    let Some(object) = field.controller.on_object_selected(pick.unique_id, &mut sink) else {
        return;
    };

    let first_time = collection.0.record(object.prize.id);
    let count = collection.0.count_of(object.prize.id);
    commands.trigger(PrizeAcquired {
        entity,
        object,
        first_time,
        count,
    });
}

fn stop_lottery_field(
    stop: On<StopLotteryField>,
    bus: Res<LotteryFieldBus>,
    mut fields: Query<&mut LotteryField>,
) {
    let Ok(mut field) = fields.get_mut(stop.entity) else {
        return;
    };

    let mut sink = bus.sink(stop.entity);
    if stop.clear {
        field.controller.clear(&mut sink);
    } else {
        field.controller.stop_auto_add(&mut sink);
    }
}

fn tick_lottery_fields(
    time: Res<Time>,
    bus: Res<LotteryFieldBus>,
    mut fields: Query<(Entity, &mut LotteryField)>,
) {
    let dt = time.delta();
    if dt.is_zero() {
        return;
    }

    for (entity, mut field) in fields.iter_mut() {
        let mut sink = bus.sink(entity);
        field.tick(dt, &mut sink);
    }
}

fn drain_lottery_messages(
    bus: Res<LotteryFieldBus>,
    mut messages: ResMut<Messages<LotteryFieldMessage>>,
) {
    while let Ok(message) = bus.receiver().try_recv() {
        messages.write(message);
    }
}
