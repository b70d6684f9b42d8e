//! Reference symbol templates for shape classification.

pub mod loader;

pub use loader::TemplateLoader;

use image::GrayImage;
use set_core::Symbol;

/// A pre-rendered reference mask of one symbol shape, binarized at load
/// time. All templates must share one reference resolution for the L2
/// comparison to be meaningful.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub mask: GrayImage,
}

impl Template {
    pub fn new(name: String, mask: GrayImage) -> Self {
        Self { name, mask }
    }

    /// Similarity between this template and a candidate mask of the same
    /// dimensions: `1 − l2 / (h·w)` where `l2` is the Euclidean norm of
    /// the pixelwise difference of the binary (0/1) masks. Higher is
    /// closer; the score is only used for argmax ranking.
    pub fn similarity(&self, candidate: &GrayImage) -> f32 {
        debug_assert_eq!(self.mask.dimensions(), candidate.dimensions());
        let mut sq_sum = 0.0f64;
        for (a, b) in self.mask.pixels().zip(candidate.pixels()) {
            let av = if a.0[0] >= 128 { 1.0 } else { 0.0 };
            let bv = if b.0[0] >= 128 { 1.0 } else { 0.0 };
            let d: f64 = av - bv;
            sq_sum += d * d;
        }
        let l2 = sq_sum.sqrt();
        let denom = (self.mask.width() * self.mask.height()) as f64;
        (1.0 - l2 / denom) as f32
    }
}

/// The read-only reference set, one template per symbol vocabulary
/// entry, loaded once at classifier construction.
#[derive(Debug, Clone)]
pub struct SymbolTemplates {
    oval: Template,
    diamond: Template,
    wave: Template,
}

impl SymbolTemplates {
    pub fn new(oval: Template, diamond: Template, wave: Template) -> Self {
        Self {
            oval,
            diamond,
            wave,
        }
    }

    pub fn get(&self, symbol: Symbol) -> &Template {
        match symbol {
            Symbol::Oval => &self.oval,
            Symbol::Diamond => &self.diamond,
            Symbol::Wave => &self.wave,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Template)> {
        Symbol::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn half_filled(w: u32, h: u32) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h / 2 {
            for x in 0..w {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img
    }

    #[test]
    fn identical_masks_score_highest() {
        let mask = half_filled(40, 20);
        let template = Template::new("oval".into(), mask.clone());
        let perfect = template.similarity(&mask);
        let mismatch = template.similarity(&GrayImage::new(40, 20));
        assert!(perfect > mismatch);
        assert!((perfect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn templates_are_keyed_by_symbol() {
        let set = SymbolTemplates::new(
            Template::new("oval".into(), half_filled(10, 10)),
            Template::new("diamond".into(), half_filled(10, 10)),
            Template::new("wave".into(), half_filled(10, 10)),
        );
        assert_eq!(set.get(Symbol::Diamond).name, "diamond");
        assert_eq!(set.iter().count(), 3);
    }
}
