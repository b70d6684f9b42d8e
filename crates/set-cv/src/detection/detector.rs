//! Frame-level orchestration: localize, classify, search.

use log::{debug, info};
use serde::Serialize;
use std::time::Instant;

use super::config::DetectionConfig;
use super::localizer::CardLocalizer;
use crate::Result;
use crate::card::DetectedCard;
use crate::classify::CardClassifier;
use crate::template::{SymbolTemplates, TemplateLoader};
use image::RgbImage;
use set_core::{CardAttributes, PartialAttributes, find_set};

/// Everything the pipeline derived from one frame.
#[derive(Debug)]
pub struct FrameAnalysis {
    /// All located cards, classified in place; rejected cards keep their
    /// partially filled attributes for diagnostic display.
    pub cards: Vec<DetectedCard>,
    /// Indices into `cards` of the first SET found, if any.
    pub set_indices: Option<[usize; 3]>,
    pub stats: DetectionStats,
}

/// Detection statistics
#[derive(Debug, Clone, Serialize)]
pub struct DetectionStats {
    pub total_cards: usize,
    pub classified_cards: usize,
    pub processing_time_ms: u64,
}

/// Per-card summary without the image buffers, for logging and JSON
/// reports.
#[derive(Debug, Clone, Serialize)]
pub struct CardReport {
    pub center: (i32, i32),
    pub area: f64,
    pub attributes: PartialAttributes,
}

/// Serializable frame summary.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub cards: Vec<CardReport>,
    pub set_indices: Option<[usize; 3]>,
    pub stats: DetectionStats,
}

impl FrameAnalysis {
    /// Whether the frame contains a SET; the caller owns any
    /// multi-frame certainty counting on top of this.
    pub fn has_set(&self) -> bool {
        self.set_indices.is_some()
    }

    /// The three cards of the found SET.
    pub fn set_cards(&self) -> Option<[&DetectedCard; 3]> {
        self.set_indices
            .map(|[i, j, k]| [&self.cards[i], &self.cards[j], &self.cards[k]])
    }

    pub fn report(&self) -> FrameReport {
        FrameReport {
            cards: self
                .cards
                .iter()
                .map(|card| CardReport {
                    center: card.center,
                    area: card.area,
                    attributes: card.attributes,
                })
                .collect(),
            set_indices: self.set_indices,
            stats: self.stats.clone(),
        }
    }
}

/// The whole recognition pipeline behind one entry point: raw frame in,
/// classified cards and SET search result out.
pub struct CardDetector {
    localizer: CardLocalizer,
    classifier: CardClassifier,
}

impl CardDetector {
    /// Build a detector, loading the reference templates from the
    /// configured directories.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        let mut loader = TemplateLoader::new();
        for dir in &config.template_dirs {
            loader = loader.add_template_dir(dir);
        }
        let templates = loader.load_symbol_templates()?;
        Ok(Self::with_templates(config, templates))
    }

    /// Build a detector around an already-loaded template set.
    pub fn with_templates(config: DetectionConfig, templates: SymbolTemplates) -> Self {
        Self {
            localizer: CardLocalizer::new(config.localizer),
            classifier: CardClassifier::new(config.classifier, templates),
        }
    }

    /// Process one frame: localize card candidates, classify each in
    /// place, then search the completely classified cards for a SET.
    ///
    /// Cards with any unset attribute are excluded from the search input;
    /// two unclassified cards would otherwise spuriously compare as
    /// equal on every attribute.
    pub fn analyze(&self, raw: &RgbImage) -> FrameAnalysis {
        let start = Instant::now();

        let mut cards = self.localizer.locate(raw);
        self.classifier.classify_all(&mut cards);

        let complete: Vec<(usize, CardAttributes)> = cards
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| card.attributes.complete().map(|attrs| (idx, attrs)))
            .collect();
        debug!(
            "{} of {} cards fully classified",
            complete.len(),
            cards.len()
        );

        let field: Vec<CardAttributes> = complete.iter().map(|(_, attrs)| *attrs).collect();
        let set_indices =
            find_set(&field).map(|[i, j, k]| [complete[i].0, complete[j].0, complete[k].0]);

        let stats = DetectionStats {
            total_cards: cards.len(),
            classified_cards: complete.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "frame: {} cards, {} classified, set: {}, {}ms",
            stats.total_cards,
            stats.classified_cards,
            set_indices.is_some(),
            stats.processing_time_ms
        );

        FrameAnalysis {
            cards,
            set_indices,
            stats,
        }
    }
}
