use lottery_field::prelude::*;
use lottery_field_examples::{demo_catalog, init_tracing};

fn print_report(title: &str, report: &ValidationReport) {
    println!(
        "== {title}: valid={} prizes={} total={:.2}",
        report.is_valid, report.prize_count, report.total_probability
    );
    for info in &report.rarity_info {
        println!(
            "   {:<10} n={} avg={:.2}%",
            format!("{:?}", info.rarity),
            info.item_count,
            info.average_probability
        );
    }
    for error in &report.errors {
        println!("   error: {error}");
    }
    for warning in &report.warnings {
        println!("   warning: {warning}");
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = demo_catalog()?;
    print_report("demo catalog", &validate_catalog(catalog.prizes()));

    let mut skewed = vec![
        Prize::new(1, "Candy", 900.0),
        Prize::new(2, "Figure", 0.5).with_rarity(PrizeRarity::Rare),
        Prize::new(3, "Broken", 0.0).with_rarity(PrizeRarity::Epic),
    ];
    print_report("skewed catalog", &validate_catalog(&skewed));

    normalize_probabilities(&mut skewed, 100.0);
    print_report("skewed catalog, normalized", &validate_catalog(&skewed));

    Ok(())
}
