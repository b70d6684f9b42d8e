//! Image helpers: Otsu binarization and background white balance.

use image::{GrayImage, Rgb, Rgb32FImage, RgbImage};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::filter::gaussian_blur_f32;

/// Blur and binarize a grayscale image with an automatic Otsu level.
///
/// `inverted` selects the polarity: plain binary for table-level card
/// localization (white cards on a dark table), inverted for symbol
/// segmentation (dark ink on a white card face).
pub fn blur_and_otsu(grey: &GrayImage, sigma: f32, inverted: bool) -> GrayImage {
    let blurred = gaussian_blur_f32(grey, sigma);
    let level = otsu_level(&blurred);
    let polarity = if inverted {
        ThresholdType::BinaryInverted
    } else {
        ThresholdType::Binary
    };
    threshold(&blurred, level, polarity)
}

/// Mean color of `warp` over the pixels where `mask` is zero, i.e. the
/// card's printed-white background.
pub fn mean_background(warp: &RgbImage, mask: &GrayImage) -> [f32; 3] {
    let mut sums = [0.0f64; 3];
    let mut count = 0usize;
    for (pixel, m) in warp.pixels().zip(mask.pixels()) {
        if m.0[0] == 0 {
            for ch in 0..3 {
                sums[ch] += pixel.0[ch] as f64;
            }
            count += 1;
        }
    }
    if count == 0 {
        return [1.0, 1.0, 1.0];
    }
    [
        (sums[0] / count as f64) as f32,
        (sums[1] / count as f64) as f32,
        (sums[2] / count as f64) as f32,
    ]
}

/// Divide each channel of `warp` by its background mean, so the true
/// white background lands near 1.0 per channel and symbol ink is
/// corrected for ambient lighting tint. Absolute channel comparison in
/// the color classifier is unreliable without this.
pub fn white_balance(warp: &RgbImage, mask: &GrayImage) -> Rgb32FImage {
    let bg = mean_background(warp, mask);
    let mut balanced = Rgb32FImage::new(warp.width(), warp.height());
    for (out, pixel) in balanced.pixels_mut().zip(warp.pixels()) {
        *out = Rgb([
            pixel.0[0] as f32 / bg[0].max(1.0),
            pixel.0[1] as f32 / bg[1].max(1.0),
            pixel.0[2] as f32 / bg[2].max(1.0),
        ]);
    }
    balanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn otsu_separates_bimodal_image() {
        let mut grey = GrayImage::from_pixel(64, 64, Luma([230u8]));
        for y in 20..40 {
            for x in 20..40 {
                grey.put_pixel(x, y, Luma([20u8]));
            }
        }
        let plain = blur_and_otsu(&grey, 1.0, false);
        let inverted = blur_and_otsu(&grey, 1.0, true);
        assert_eq!(plain.get_pixel(5, 5).0[0], 255);
        assert_eq!(plain.get_pixel(30, 30).0[0], 0);
        assert_eq!(inverted.get_pixel(5, 5).0[0], 0);
        assert_eq!(inverted.get_pixel(30, 30).0[0], 255);
    }

    #[test]
    fn white_balance_normalizes_background_to_unity() {
        // Warm-tinted background: balanced background must land at ~1.0
        // per channel regardless of the tint.
        let warp = RgbImage::from_pixel(32, 32, Rgb([200u8, 180, 160]));
        let mask = GrayImage::new(32, 32);
        let balanced = white_balance(&warp, &mask);
        let p = balanced.get_pixel(10, 10);
        for ch in 0..3 {
            assert!((p.0[ch] - 1.0).abs() < 0.02, "channel {ch}: {}", p.0[ch]);
        }
    }

    #[test]
    fn background_mean_ignores_masked_pixels() {
        let mut warp = RgbImage::from_pixel(10, 10, Rgb([200u8, 200, 200]));
        let mut mask = GrayImage::new(10, 10);
        // Dark symbol pixels, all masked out.
        for x in 0..5 {
            warp.put_pixel(x, 0, Rgb([0u8, 0, 0]));
            mask.put_pixel(x, 0, Luma([255u8]));
        }
        let bg = mean_background(&warp, &mask);
        for ch in 0..3 {
            assert!((bg[ch] - 200.0).abs() < 1e-3);
        }
    }
}
