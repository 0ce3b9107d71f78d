use std::time::Duration;

use glam::Vec2;
use lottery_field::prelude::*;
use lottery_field_examples::{demo_catalog, init_tracing};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let save_dir = std::env::temp_dir().join("lottery_field_session_play");
    let mut audio = AudioSettings::load(FileStore::open(&save_dir)?);
    info!(
        "audio: bgm {}, se {}",
        audio.bgm_volume(),
        audio.se_volume()
    );
    audio.set_se_volume(0.8)?;

    let config = FieldConfig::new(Vec2::new(8.0, 4.0)).with_object_count(8);
    let controller = FieldPopulationController::try_new(config, demo_catalog()?)?;
    let log = AcquisitionLog::load(FileStore::open(&save_dir)?);
    info!("{} prize(s) collected in earlier runs", log.unique_count());

    let mut session = LotterySession::new(controller, log);
    let mut rng = StdRng::seed_from_u64(99);
    let mut events = VecSink::new();
    session.start(&mut rng, &mut events);

    for round in 1..=12 {
        session.tick(Duration::from_secs(2), &mut rng, &mut events);

        let ids: Vec<UniqueId> = session.controller().objects().map(|o| o.unique_id).collect();
        if ids.is_empty() {
            info!("round {}: field is empty", round);
            continue;
        }

        let pick = ids[rng.random_range(0..ids.len())];
        match session.pick(pick, &mut events) {
            PickOutcome::FirstAcquisition(prize) => {
                info!("round {}: NEW {} ({:?})", round, prize.name, prize.rarity);
                session.acknowledge_result();
            }
            PickOutcome::Repeat { prize, count } => {
                info!("round {}: {} again (x{})", round, prize.name, count);
            }
            outcome => info!("round {}: {:?}", round, outcome),
        }
    }

    session.shutdown(&mut events);
    info!(
        "{} event(s), {} placed, {} removed",
        events.len(),
        events.count(FieldEventKind::ObjectPlaced),
        events.count(FieldEventKind::ObjectRemoved)
    );

    let catalog = demo_catalog()?;
    for prize in catalog.display_sorted() {
        let count = session.acquisitions().count_of(prize.id);
        let mark = if count > 0 { "x" } else { " " };
        println!("[{mark}] {:<14} {:>3}", prize.name, count);
    }

    Ok(())
}
