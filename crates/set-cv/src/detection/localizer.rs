//! Contour-based card localization in the raw frame.

use image::{RgbImage, imageops};
use imageproc::contours::{Contour, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use log::debug;

use super::config::LocalizerConfig;
use crate::card::DetectedCard;
use crate::flatten::flatten;
use crate::utils::contour::{bounding_rect, center_of, contour_area};
use set_core::PartialAttributes;

/// Finds all card-sized quadrilateral regions in a raw color frame.
pub struct CardLocalizer {
    config: LocalizerConfig,
}

impl CardLocalizer {
    pub fn new(config: LocalizerConfig) -> Self {
        Self { config }
    }

    /// Locate every plausible card in `raw`.
    ///
    /// The frame is grayscaled, blurred and Otsu-binarized (plain
    /// polarity: cards are bright against the table), then all contours
    /// are extracted with hierarchy information and walked in descending
    /// area order. A contour becomes a card iff its area lies inside the
    /// configured band, it has no parent contour (rejects printed
    /// symbols nested inside a card) and its Douglas-Peucker
    /// approximation has exactly four vertices. Candidates whose
    /// flattening degenerates are dropped silently.
    pub fn locate(&self, raw: &RgbImage) -> Vec<DetectedCard> {
        let grey = imageops::grayscale(raw);
        let thresh = crate::utils::image::blur_and_otsu(&grey, self.config.blur_sigma, false);

        let contours: Vec<Contour<i32>> = find_contours(&thresh);
        debug!("frame yielded {} raw contours", contours.len());

        // Walk contours largest-first; ties keep discovery order.
        let mut order: Vec<usize> = (0..contours.len()).collect();
        order.sort_by(|&a, &b| {
            contour_area(&contours[b].points).total_cmp(&contour_area(&contours[a].points))
        });

        let mut cards = Vec::new();
        for idx in order {
            let contour = &contours[idx];
            let area = contour_area(&contour.points);
            if area < self.config.card_min_area || area > self.config.card_max_area {
                continue;
            }
            if contour.parent.is_some() {
                continue;
            }
            let perimeter = arc_length(&contour.points, true);
            let approx = approximate_polygon_dp(
                &contour.points,
                self.config.approx_eps_factor * perimeter,
                true,
            );
            if approx.len() != 4 {
                continue;
            }
            if let Some(card) = self.build_card(raw, &contour.points, area, &approx) {
                cards.push(card);
            }
        }
        debug!("accepted {} card candidates", cards.len());
        cards
    }

    fn build_card(
        &self,
        raw: &RgbImage,
        contour: &[Point<i32>],
        area: f64,
        approx: &[Point<i32>],
    ) -> Option<DetectedCard> {
        let bbox = bounding_rect(contour)?;
        let corner_points = [
            (approx[0].x as f32, approx[0].y as f32),
            (approx[1].x as f32, approx[1].y as f32),
            (approx[2].x as f32, approx[2].y as f32),
            (approx[3].x as f32, approx[3].y as f32),
        ];
        let center = center_of(&corner_points);

        // A degenerate flatten rejects the whole candidate.
        let warp = flatten(raw, &corner_points, bbox.width(), bbox.height())?;

        Some(DetectedCard {
            contour: contour.to_vec(),
            area,
            corner_points,
            bounding_width: bbox.width(),
            bounding_height: bbox.height(),
            center,
            warp: Some(warp),
            symbol_mask: None,
            symbol_contours: Vec::new(),
            attributes: PartialAttributes::default(),
        })
    }
}
