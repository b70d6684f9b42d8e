use anyhow::{Context, Result};
use log::info;
use set_cv::{CardDetector, DetectionConfig};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let image_path = args
        .next()
        .context("usage: set-computer <image> [template-dir]")?;

    let mut config = DetectionConfig::default();
    if let Some(dir) = args.next() {
        config.template_dirs = vec![dir.into()];
    }

    let detector = CardDetector::new(config)?;

    let raw = image::open(&image_path)
        .with_context(|| format!("Failed to load image: {image_path}"))?
        .to_rgb8();
    info!("loaded frame {}x{}", raw.width(), raw.height());

    let analysis = detector.analyze(&raw);

    println!("{}", serde_json::to_string_pretty(&analysis.report())?);

    match analysis.set_cards() {
        Some(cards) => {
            eprintln!("SET found:");
            for card in cards {
                match card.attributes.complete() {
                    Some(attrs) => eprintln!("  {} at {:?}", attrs, card.center),
                    None => eprintln!("  card at {:?}", card.center),
                }
            }
        }
        None => eprintln!(
            "No SET among {} detected cards",
            analysis.stats.total_cards
        ),
    }

    Ok(())
}
