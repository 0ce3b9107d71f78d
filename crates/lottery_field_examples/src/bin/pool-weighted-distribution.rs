use lottery_field::prelude::*;
use lottery_field_examples::{bar, demo_catalog, init_tracing};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = demo_catalog()?;
    let mut pool = WeightedPool::with_capacity(catalog.len());
    for prize in catalog.prizes() {
        pool.try_add(prize.id, prize.probability)?;
    }

    // Draw many times and compare the observed shares with the weights.
    let draws = 100_000usize;
    let mut rng = StdRng::seed_from_u64(2025);
    let mut counts = vec![0usize; catalog.len()];
    for id in pool.select_multiple(draws, &mut rng) {
        if let Some(index) = catalog.prizes().iter().position(|p| p.id == id) {
            counts[index] += 1;
        }
    }

    let expected: Vec<(PrizeId, f32)> = pool.probabilities();
    info!("{} draws over total weight {:.1}", draws, pool.total_weight());
    for ((prize, count), (_, percent)) in catalog.prizes().iter().zip(&counts).zip(&expected) {
        let observed = *count as f32 / draws as f32;
        println!(
            "{:<14} expected {:>6.2}%  observed {:>6.2}%  {}",
            prize.name,
            percent,
            observed * 100.0,
            bar(observed, 40)
        );
    }

    Ok(())
}
