//! Contrast and sharpness enhancement.
//!
//! Both follow the blend-against-a-degenerate model: the output is
//! `degenerate + factor * (image - degenerate)`. A factor of 1.0 returns the
//! image unchanged, 0.0 returns the degenerate. Alpha is never touched.

use image::DynamicImage;

/// Number of color channels affected; alpha (if any) comes after them.
const COLOR_CHANNELS: usize = 3;

/// Smoothing kernel weights: 1 for each neighbor, 5 for the center.
const SMOOTH_CENTER_WEIGHT: u32 = 5;
const SMOOTH_TOTAL_WEIGHT: f32 = 13.0;

/// Adjust contrast against the mean luma of the image.
pub fn contrast(image: DynamicImage, factor: f32) -> DynamicImage {
    if factor == 1.0 {
        return image;
    }
    match image {
        DynamicImage::ImageRgba8(mut buf) => {
            contrast_in_place(&mut buf, 4, factor);
            DynamicImage::ImageRgba8(buf)
        }
        other => {
            let mut buf = other.to_rgb8();
            contrast_in_place(&mut buf, 3, factor);
            DynamicImage::ImageRgb8(buf)
        }
    }
}

/// Adjust sharpness against a 3x3 smoothed copy of the image.
pub fn sharpness(image: DynamicImage, factor: f32) -> DynamicImage {
    if factor == 1.0 {
        return image;
    }
    match image {
        DynamicImage::ImageRgba8(mut buf) => {
            let (w, h) = buf.dimensions();
            sharpness_in_place(&mut buf, w as usize, h as usize, 4, factor);
            DynamicImage::ImageRgba8(buf)
        }
        other => {
            let mut buf = other.to_rgb8();
            let (w, h) = buf.dimensions();
            sharpness_in_place(&mut buf, w as usize, h as usize, 3, factor);
            DynamicImage::ImageRgb8(buf)
        }
    }
}

fn contrast_in_place(raw: &mut [u8], channels: usize, factor: f32) {
    let pixels = raw.len() / channels;
    if pixels == 0 {
        return;
    }
    let total: u64 = raw
        .chunks_exact(channels)
        .map(|p| u64::from(luma(p[0], p[1], p[2])))
        .sum();
    let mean = (total as f64 / pixels as f64 + 0.5).floor() as f32;

    for pixel in raw.chunks_exact_mut(channels) {
        for value in &mut pixel[..COLOR_CHANNELS] {
            *value = blend(mean, *value, factor);
        }
    }
}

fn sharpness_in_place(raw: &mut [u8], width: usize, height: usize, channels: usize, factor: f32) {
    // Edge pixels keep their value in the smoothed copy, so they never change.
    if width < 3 || height < 3 {
        return;
    }
    let original = raw.to_vec();
    let at = |x: usize, y: usize, c: usize| (y * width + x) * channels + c;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            for c in 0..COLOR_CHANNELS {
                let mut sum = 0u32;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        sum += u32::from(original[at(nx, ny, c)]);
                    }
                }
                let center = original[at(x, y, c)];
                sum += (SMOOTH_CENTER_WEIGHT - 1) * u32::from(center);
                let smoothed = (sum as f32 / SMOOTH_TOTAL_WEIGHT).round();
                raw[at(x, y, c)] = blend(smoothed, center, factor);
            }
        }
    }
}

/// ITU-R 601-2 luma with the same fixed-point rounding used for grey conversion.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// Clamp, then truncate toward zero, as the classic blend does.
fn blend(degenerate: f32, value: u8, factor: f32) -> u8 {
    (degenerate + factor * (f32::from(value) - degenerate)).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn stripes() -> RgbImage {
        RgbImage::from_fn(9, 9, |x, _| {
            if x % 2 == 0 {
                Rgb([60, 60, 60])
            } else {
                Rgb([180, 180, 180])
            }
        })
    }

    #[test]
    fn test_factor_one_is_identity() {
        let img = DynamicImage::ImageRgb8(stripes());
        assert_eq!(contrast(img.clone(), 1.0), img);
        assert_eq!(sharpness(img.clone(), 1.0), img);
    }

    #[test]
    fn test_contrast_spreads_values_around_mean() {
        let img = DynamicImage::ImageRgb8(stripes());
        let out = contrast(img, 1.5).to_rgb8();
        // Mean luma is 113 (5 dark columns, 4 light); dark drifts down, light up.
        assert!(out.get_pixel(0, 0)[0] < 60);
        assert!(out.get_pixel(1, 0)[0] > 180);
    }

    #[test]
    fn test_contrast_zero_flattens_to_mean() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([200, 200, 200])
            }
        }));
        let out = contrast(img, 0.0).to_rgb8();
        assert_eq!(out.get_pixel(0, 0), out.get_pixel(1, 0));
        assert_eq!(out.get_pixel(0, 0)[0], 100);
    }

    #[test]
    fn test_blend_truncates_fractional_results() {
        // Mean luma of 0 and 101 is 50.5, rounded to 51.
        // 51 + 1.25 * (101 - 51) = 113.5, which lands on 113.
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([101, 101, 101])
            }
        }));
        let out = contrast(img, 1.25).to_rgb8();
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 113);
        assert_eq!(blend(10.0, 12, 1.9), 13); // 13.8
    }

    #[test]
    fn test_contrast_clamps() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }));
        let out = contrast(img, 3.0).to_rgb8();
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_flat_image_unchanged_by_sharpness() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([90, 120, 150])));
        assert_eq!(sharpness(img.clone(), 1.2), img);
    }

    #[test]
    fn test_sharpness_boosts_interior_edges_only() {
        let img = DynamicImage::ImageRgb8(stripes());
        let out = sharpness(img, 2.0).to_rgb8();
        // Border row untouched
        assert_eq!(out.get_pixel(0, 0)[0], 60);
        assert_eq!(out.get_pixel(4, 0)[0], 60);
        // Interior dark column gets darker, light column lighter
        assert!(out.get_pixel(4, 4)[0] < 60);
        assert!(out.get_pixel(3, 4)[0] > 180);
    }

    #[test]
    fn test_alpha_is_preserved() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(5, 5, |x, y| {
            Rgba([(x * 40) as u8, (y * 40) as u8, 100, (x * 50) as u8])
        }));
        let out = sharpness(contrast(img.clone(), 1.08), 1.2);
        assert!(matches!(out, DynamicImage::ImageRgba8(_)));
        let before = img.to_rgba8();
        let after = out.to_rgba8();
        for (a, b) in before.pixels().zip(after.pixels()) {
            assert_eq!(a[3], b[3]);
        }
    }
}
