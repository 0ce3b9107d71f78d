use std::time::Duration;

use glam::Vec2;
use lottery_field::prelude::*;
use lottery_field_examples::{demo_catalog, init_tracing};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = FieldConfig::new(Vec2::new(8.0, 4.0))
        .with_object_count(10)
        .with_max_capacity(14)
        .with_min_distance(0.8)
        .with_auto_add_interval(Duration::from_secs(5));
    let mut field = FieldPopulationController::try_new(config, demo_catalog()?)?;

    let mut rng = StdRng::seed_from_u64(7);
    let mut sink = FnSink::new(|event: FieldEvent| match &event {
        FieldEvent::ObjectPlaced { object } => info!(
            "placed #{} '{}' at ({:.2}, {:.2}) rot {:.0}",
            object.unique_id,
            object.prize.name,
            object.position.x,
            object.position.y,
            object.rotation_degrees
        ),
        FieldEvent::ObjectRemoved { object } => {
            info!("removed #{} '{}'", object.unique_id, object.prize.name)
        }
        FieldEvent::PlacementFailed { prize_id, attempts } => {
            info!("no room for prize {} after {} attempts", prize_id, attempts)
        }
        other => info!("{:?}", other.kind()),
    });

    field.initialize(&mut rng, &mut sink);

    // One minute at 60 fps, with a pick every 8 seconds.
    let frame = Duration::from_micros(16_667);
    for frame_index in 0..3600u32 {
        field.tick(frame, &mut rng, &mut sink);

        if frame_index % 480 == 479 {
            let ids: Vec<UniqueId> = field.objects().map(|o| o.unique_id).collect();
            if !ids.is_empty() {
                let pick = ids[rng.random_range(0..ids.len())];
                field.on_object_selected(pick, &mut sink);
            }
        }
    }

    info!(
        "after one minute: {} object(s) on the field (capacity {})",
        field.len(),
        field.config().max_capacity
    );
    field.clear(&mut sink);

    Ok(())
}
