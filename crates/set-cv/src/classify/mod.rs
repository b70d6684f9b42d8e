//! Attribute classification on the flattened card face.
//!
//! Stages run in a fixed order, each feeding the next: symbol
//! segmentation, white-balance correction, count, symbol shape, shading,
//! color. A stage that cannot decide confidently leaves its attribute
//! unset; the frame detector filters incomplete cards before the SET
//! search.

use image::{GrayImage, Luma, Rgb32FImage, RgbImage, imageops};
use image::imageops::FilterType;
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use imageproc::rect::Rect;
use log::debug;
use palette::{FromColor, Hsv, Srgb};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::card::DetectedCard;
use crate::detection::config::ClassifierConfig;
use crate::template::SymbolTemplates;
use crate::utils::contour::{bounding_rect, contour_area};
use crate::utils::image::white_balance;
use set_core::{Color, Number, Shading, Symbol};

/// Classifies the four game attributes of a flattened card.
pub struct CardClassifier {
    config: ClassifierConfig,
    templates: SymbolTemplates,
}

impl CardClassifier {
    pub fn new(config: ClassifierConfig, templates: SymbolTemplates) -> Self {
        Self { config, templates }
    }

    /// Classify every card of the frame in place.
    ///
    /// Cards are independent, so the map parallelizes under the
    /// `parallel` feature; `par_iter_mut` keeps slice order, which the
    /// SET search relies on for reproducible first-match selection.
    pub fn classify_all(&self, cards: &mut [DetectedCard]) {
        #[cfg(feature = "parallel")]
        cards.par_iter_mut().for_each(|card| self.classify(card));

        #[cfg(not(feature = "parallel"))]
        for card in cards.iter_mut() {
            self.classify(card);
        }
    }

    /// Populate `card.attributes` from its warp.
    ///
    /// A card without a warp is left untouched. Zero surviving symbol
    /// contours end classification with every attribute unset; a
    /// crop-size guard failure in the shape stage abandons the shading
    /// and color stages as well.
    pub fn classify(&self, card: &mut DetectedCard) {
        let Some(warp) = card.warp.as_ref() else {
            return;
        };

        let (mask, contours) = self.segment_symbols(warp);
        if contours.is_empty() {
            debug!("no symbol contours survived, leaving card unclassified");
            card.symbol_mask = Some(mask);
            card.symbol_contours = contours;
            return;
        }

        let balanced = white_balance(warp, &mask);

        // Count: only 1..=3 is a legal game value; anything else is
        // evidence of a misdetection and stays unset.
        if (1..=3).contains(&contours.len()) {
            card.attributes.number = Number::try_from(contours.len() as u8).ok();
        } else {
            debug!("implausible symbol count {}", contours.len());
        }

        // All per-symbol stages sample the leftmost contour; contour
        // enumeration order is not a stable contract, the sort in
        // segment_symbols makes the choice deterministic.
        if let Some(bbox) = bounding_rect(&contours[0]) {
            card.attributes.symbol = self.classify_symbol(&mask, bbox);
            if card.attributes.symbol.is_some() {
                card.attributes.shading = Some(self.classify_shading(&balanced, bbox));
                card.attributes.color = Some(self.classify_color(&balanced, &mask));
            }
        }

        card.symbol_mask = Some(mask);
        card.symbol_contours = contours;
    }

    /// Isolate the printed symbols: blur, Otsu with inverted polarity
    /// (ink becomes white), keep external contours above the minimum
    /// symbol area, sort them leftmost-first and paint them filled onto
    /// a black mask sized like the warp.
    fn segment_symbols(&self, warp: &RgbImage) -> (GrayImage, Vec<Vec<Point<i32>>>) {
        let grey = imageops::grayscale(warp);
        let thresh = crate::utils::image::blur_and_otsu(&grey, self.config.blur_sigma, true);

        let mut symbols: Vec<Vec<Point<i32>>> = find_contours(&thresh)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| c.points)
            .filter(|points| contour_area(points) > self.config.symbol_min_area)
            .collect();

        symbols.sort_by_key(|points| bounding_rect(points).map_or(i32::MAX, |r| r.left()));

        let mut mask = GrayImage::new(warp.width(), warp.height());
        for points in &symbols {
            let poly = match points.split_last() {
                Some((last, rest)) if Some(last) == rest.first() => rest,
                _ => &points[..],
            };
            if poly.len() >= 3 {
                draw_polygon_mut(&mut mask, poly, Luma([255u8]));
            }
        }
        (mask, symbols)
    }

    /// Nearest-template shape classification on the first symbol's mask
    /// crop. The crop-size guard catches degenerate crops from spurious
    /// contours before any comparison happens.
    fn classify_symbol(&self, mask: &GrayImage, bbox: Rect) -> Option<Symbol> {
        let (min_h, max_h) = self.config.crop_height_range;
        let (min_w, max_w) = self.config.crop_width_range;
        if !(min_h..=max_h).contains(&bbox.height()) || !(min_w..=max_w).contains(&bbox.width()) {
            debug!(
                "symbol crop {}x{} outside expected band, abandoning classification",
                bbox.width(),
                bbox.height()
            );
            return None;
        }

        let crop = imageops::crop_imm(
            mask,
            bbox.left().max(0) as u32,
            bbox.top().max(0) as u32,
            bbox.width(),
            bbox.height(),
        )
        .to_image();

        let mut best: Option<(Symbol, f32)> = None;
        for (symbol, template) in self.templates.iter() {
            let resized = imageops::resize(
                &crop,
                template.mask.width(),
                template.mask.height(),
                FilterType::Triangle,
            );
            let score = template.similarity(&resized);
            debug!("template '{}' similarity {score:.4}", template.name);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((symbol, score));
            }
        }
        best.map(|(symbol, _)| symbol)
    }

    /// Mean saturation of the central 20%×20% of the symbol's bounding
    /// box, sampled on the white-balanced image. The center deliberately
    /// avoids the symbol outline, where anti-aliasing and ink density
    /// vary.
    fn classify_shading(&self, balanced: &Rgb32FImage, bbox: Rect) -> Shading {
        let x0 = bbox.left() as f32 + bbox.width() as f32 * 0.4;
        let y0 = bbox.top() as f32 + bbox.height() as f32 * 0.4;
        let x1 = bbox.left() as f32 + bbox.width() as f32 * 0.6;
        let y1 = bbox.top() as f32 + bbox.height() as f32 * 0.6;

        let mut saturation_sum = 0.0f32;
        let mut count = 0u32;
        for y in (y0 as u32)..(y1 as u32).min(balanced.height()) {
            for x in (x0 as u32)..(x1 as u32).min(balanced.width()) {
                saturation_sum += hsv_of(balanced.get_pixel(x, y).0).saturation;
                count += 1;
            }
        }
        let mean = if count > 0 {
            saturation_sum / count as f32
        } else {
            0.0
        };
        debug!("center mean saturation {mean:.3}");

        if mean > self.config.solid_min_saturation {
            Shading::Solid
        } else if mean < self.config.empty_max_saturation {
            Shading::Empty
        } else {
            Shading::Hatched
        }
    }

    /// Per-channel means of the white-balanced image inside the symbol
    /// mask, mapped red→red, green→green, blue→purple; the largest mean
    /// wins. Very dark ink is forced to purple: almost-black purple
    /// reads as neutral rather than blue-dominant.
    fn classify_color(&self, balanced: &Rgb32FImage, mask: &GrayImage) -> Color {
        let mut sums = [0.0f64; 3];
        let mut count = 0usize;
        let mut min_value = f32::MAX;

        for (pixel, m) in balanced.pixels().zip(mask.pixels()) {
            min_value = min_value.min(hsv_of(pixel.0).value);
            if m.0[0] > 0 {
                for ch in 0..3 {
                    sums[ch] += pixel.0[ch] as f64;
                }
                count += 1;
            }
        }

        if min_value < self.config.dark_ink_value {
            debug!("dark ink override (min value {min_value:.3}), classifying purple");
            return Color::Purple;
        }
        if count == 0 {
            return Color::Purple;
        }

        let [r, g, b] = sums;
        if r >= g && r >= b {
            Color::Red
        } else if g >= b {
            Color::Green
        } else {
            Color::Purple
        }
    }
}

fn hsv_of(rgb: [f32; 3]) -> Hsv {
    Hsv::from_color(Srgb::new(
        rgb[0].clamp(0.0, 1.0),
        rgb[1].clamp(0.0, 1.0),
        rgb[2].clamp(0.0, 1.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{FLATTEN_HEIGHT, FLATTEN_WIDTH};
    use crate::template::Template;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use set_core::PartialAttributes;

    /// Templates sized to the synthetic symbol below: a filled block for
    /// "oval", a half block for "diamond", an empty one for "wave".
    fn test_templates() -> SymbolTemplates {
        let full = GrayImage::from_pixel(140, 64, Luma([255u8]));
        let mut half = GrayImage::new(140, 64);
        for y in 0..32 {
            for x in 0..140 {
                half.put_pixel(x, y, Luma([255u8]));
            }
        }
        SymbolTemplates::new(
            Template::new("oval".into(), full),
            Template::new("diamond".into(), half),
            Template::new("wave".into(), GrayImage::new(140, 64)),
        )
    }

    fn classifier() -> CardClassifier {
        CardClassifier::new(ClassifierConfig::default(), test_templates())
    }

    fn white_card() -> RgbImage {
        RgbImage::from_pixel(FLATTEN_WIDTH, FLATTEN_HEIGHT, Rgb([250u8, 250, 250]))
    }

    /// One solid 140×64 symbol centered on the card face.
    fn card_with_symbol(color: Rgb<u8>) -> DetectedCard {
        let mut warp = white_card();
        draw_filled_rect_mut(&mut warp, Rect::at(30, 118).of_size(140, 64), color);
        detected(warp)
    }

    fn detected(warp: RgbImage) -> DetectedCard {
        DetectedCard {
            contour: Vec::new(),
            area: 0.0,
            corner_points: [(0.0, 0.0); 4],
            bounding_width: FLATTEN_WIDTH,
            bounding_height: FLATTEN_HEIGHT,
            center: (0, 0),
            warp: Some(warp),
            symbol_mask: None,
            symbol_contours: Vec::new(),
            attributes: PartialAttributes::default(),
        }
    }

    #[test]
    fn card_without_warp_stays_untouched() {
        let mut card = detected(white_card());
        card.warp = None;
        classifier().classify(&mut card);
        assert_eq!(card.attributes, PartialAttributes::default());
        assert!(card.symbol_mask.is_none());
        assert!(card.symbol_contours.is_empty());
    }

    #[test]
    fn card_with_only_noise_is_rejected_with_all_attributes_unset() {
        // A misdetected card face: nothing but specks far below the
        // minimum symbol area. Zero contours survive, classification
        // stops on the rejection path.
        let mut warp = white_card();
        draw_filled_rect_mut(&mut warp, Rect::at(20, 30).of_size(10, 10), Rgb([20u8, 20, 20]));
        draw_filled_rect_mut(&mut warp, Rect::at(150, 240).of_size(8, 12), Rgb([20u8, 20, 20]));
        let mut card = detected(warp);
        classifier().classify(&mut card);
        assert!(card.symbol_contours.is_empty());
        assert_eq!(card.attributes, PartialAttributes::default());
        assert!(card.symbol_mask.is_some());
    }

    #[test]
    fn single_solid_red_symbol_classifies_fully() {
        let mut card = card_with_symbol(Rgb([200u8, 20, 20]));
        classifier().classify(&mut card);
        assert_eq!(card.attributes.number, Some(Number::One));
        assert_eq!(card.attributes.symbol, Some(Symbol::Oval));
        assert_eq!(card.attributes.shading, Some(Shading::Solid));
        assert_eq!(card.attributes.color, Some(Color::Red));
        assert!(card.is_classified());
    }

    #[test]
    fn green_and_blue_ink_map_to_game_colors() {
        let mut green = card_with_symbol(Rgb([30u8, 180, 40]));
        classifier().classify(&mut green);
        assert_eq!(green.attributes.color, Some(Color::Green));

        let mut purple = card_with_symbol(Rgb([60u8, 40, 190]));
        classifier().classify(&mut purple);
        assert_eq!(purple.attributes.color, Some(Color::Purple));
    }

    #[test]
    fn near_black_ink_is_forced_to_purple() {
        let mut card = card_with_symbol(Rgb([18u8, 15, 25]));
        classifier().classify(&mut card);
        assert_eq!(card.attributes.color, Some(Color::Purple));
    }

    #[test]
    fn outlined_symbol_reads_as_empty() {
        let mut warp = white_card();
        // 8px outline, white interior: the external contour still spans
        // the full block, the sampled center stays unsaturated.
        draw_filled_rect_mut(&mut warp, Rect::at(30, 118).of_size(140, 64), Rgb([200u8, 20, 20]));
        draw_filled_rect_mut(
            &mut warp,
            Rect::at(38, 126).of_size(124, 48),
            Rgb([250u8, 250, 250]),
        );
        let mut card = detected(warp);
        classifier().classify(&mut card);
        assert_eq!(card.attributes.number, Some(Number::One));
        assert_eq!(card.attributes.shading, Some(Shading::Empty));
    }

    #[test]
    fn striped_center_reads_as_hatched() {
        let mut warp = white_card();
        draw_filled_rect_mut(&mut warp, Rect::at(30, 118).of_size(140, 64), Rgb([200u8, 20, 20]));
        // Repaint every other row of the interior white: center
        // saturation lands midway between solid and empty.
        for y in (126..174).step_by(2) {
            draw_filled_rect_mut(
                &mut warp,
                Rect::at(38, y).of_size(124, 1),
                Rgb([250u8, 250, 250]),
            );
        }
        let mut card = detected(warp);
        classifier().classify(&mut card);
        assert_eq!(card.attributes.shading, Some(Shading::Hatched));
    }

    #[test]
    fn three_symbols_count_as_three() {
        let mut warp = white_card();
        for top in [20, 118, 216] {
            draw_filled_rect_mut(
                &mut warp,
                Rect::at(30, top).of_size(140, 64),
                Rgb([200u8, 20, 20]),
            );
        }
        let mut card = detected(warp);
        classifier().classify(&mut card);
        assert_eq!(card.symbol_contours.len(), 3);
        assert_eq!(card.attributes.number, Some(Number::Three));
    }

    #[test]
    fn tiny_specks_do_not_count_as_symbols() {
        let mut warp = white_card();
        draw_filled_rect_mut(&mut warp, Rect::at(30, 118).of_size(140, 64), Rgb([200u8, 20, 20]));
        // Noise far below symbol_min_area.
        draw_filled_rect_mut(&mut warp, Rect::at(10, 10).of_size(12, 12), Rgb([20u8, 20, 20]));
        let mut card = detected(warp);
        classifier().classify(&mut card);
        assert_eq!(card.symbol_contours.len(), 1);
        assert_eq!(card.attributes.number, Some(Number::One));
    }

    #[test]
    fn oversized_crop_abandons_shape_and_later_stages() {
        let mut warp = white_card();
        // 180 wide: outside the 120..=160 width band.
        draw_filled_rect_mut(&mut warp, Rect::at(10, 118).of_size(180, 64), Rgb([200u8, 20, 20]));
        let mut card = detected(warp);
        classifier().classify(&mut card);
        assert_eq!(card.attributes.number, Some(Number::One));
        assert_eq!(card.attributes.symbol, None);
        assert_eq!(card.attributes.shading, None);
        assert_eq!(card.attributes.color, None);
        assert!(!card.is_classified());
    }

    #[test]
    fn classification_is_idempotent() {
        let mut card = card_with_symbol(Rgb([200u8, 20, 20]));
        let c = classifier();
        c.classify(&mut card);
        let first = card.attributes;
        c.classify(&mut card);
        assert_eq!(card.attributes, first);
    }

    #[test]
    fn classify_all_preserves_card_order() {
        let mut cards = vec![
            card_with_symbol(Rgb([200u8, 20, 20])),
            card_with_symbol(Rgb([30u8, 180, 40])),
        ];
        classifier().classify_all(&mut cards);
        assert_eq!(cards[0].attributes.color, Some(Color::Red));
        assert_eq!(cards[1].attributes.color, Some(Color::Green));
    }
}
