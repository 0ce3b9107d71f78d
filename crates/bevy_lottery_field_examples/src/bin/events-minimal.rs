use bevy::prelude::*;
use bevy_lottery_field::prelude::*;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

#[derive(Default, Resource)]
struct CatalogHandle(Handle<PrizeCatalogAsset>);

/// Entity carrying the running field, once started.
#[derive(Default, Resource)]
struct ActiveField(Option<Entity>);

#[derive(Resource)]
struct PickTimer {
    timer: Timer,
    rng: StdRng,
}

impl Default for PickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(3.0, TimerMode::Repeating),
            rng: StdRng::seed_from_u64(5),
        }
    }
}

fn main() {
    App::new()
        .init_resource::<CatalogHandle>()
        .init_resource::<ActiveField>()
        .init_resource::<PickTimer>()
        .add_plugins(DefaultPlugins)
        .add_plugins(LotteryFieldPlugin)
        .add_systems(Startup, load_assets)
        .add_systems(Update, start_field)
        .add_systems(Update, pick_periodically)
        .add_systems(Update, on_field_message)
        .add_observer(on_ready)
        .add_observer(on_prize_acquired)
        .run();
}

/// Loads the prize catalog on startup.
fn load_assets(mut handle: ResMut<CatalogHandle>, asset_server: Res<AssetServer>) {
    handle.0 = asset_server.load("demo.prizes");
}

/// Starts the field once the catalog is loaded.
fn start_field(
    mut commands: Commands,
    mut active: ResMut<ActiveField>,
    handle: Res<CatalogHandle>,
    assets: Res<Assets<PrizeCatalogAsset>>,
) {
    if active.0.is_some() || assets.get(&handle.0).is_none() {
        return;
    }

    // The field configuration comes from the asset's `field` section.
    let entity = commands.spawn_empty().id();
    commands.trigger(StartLotteryField::new(entity, handle.0.clone(), 42));
    active.0 = Some(entity);
}

/// Simulates a player picking a random object every few seconds.
fn pick_periodically(
    mut commands: Commands,
    time: Res<Time>,
    mut picker: ResMut<PickTimer>,
    active: Res<ActiveField>,
    fields: Query<&LotteryField>,
) {
    let Some(entity) = active.0 else {
        return;
    };
    if !picker.timer.tick(time.delta()).just_finished() {
        return;
    }
    let Ok(field) = fields.get(entity) else {
        return;
    };

    let ids: Vec<UniqueId> = field.controller().objects().map(|o| o.unique_id).collect();
    if ids.is_empty() {
        return;
    }
    let pick = ids[picker.rng.random_range(0..ids.len())];
    commands.trigger(PickLotteryObject::new(entity, pick));
}

fn on_field_message(mut reader: MessageReader<LotteryFieldMessage>) {
    for msg in reader.read() {
        let entity = msg.field_entity;

        match &msg.event {
            FieldEvent::ObjectPlaced { object } => {
                info!(
                    "Field {:?}: placed #{} '{}' at ({:.2},{:.2})",
                    entity,
                    object.unique_id,
                    object.prize.name,
                    object.position.x,
                    object.position.y
                );
            }
            FieldEvent::ObjectRemoved { object } => {
                info!("Field {:?}: removed #{}", entity, object.unique_id);
            }
            FieldEvent::PlacementFailed { prize_id, attempts } => {
                warn!(
                    "Field {:?}: no room for prize {} after {} attempts",
                    entity, prize_id, attempts
                );
            }
            FieldEvent::Warning { context, message } => {
                warn!("Warning '{}': {}", context, message);
            }
            _ => {}
        }
    }
}

/// Observes the `EntityEvent` fired after the initial population.
fn on_ready(ready: On<LotteryFieldReady>) {
    info!("Field {} ready with {} object(s)", ready.entity, ready.placed);
}

fn on_prize_acquired(acquired: On<PrizeAcquired>, collection: Res<PrizeCollection>) {
    let prize = &acquired.object.prize;
    if acquired.first_time {
        info!("NEW prize: {} ({:?})", prize.name, prize.rarity);
    } else {
        info!("{} again (x{})", prize.name, acquired.count);
    }
    info!(
        "Collection: {} unique, {} total",
        collection.0.unique_count(),
        collection.0.total_count()
    );
}
