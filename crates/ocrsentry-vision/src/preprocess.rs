// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing pipeline — grayscale conversion, median denoising, global
// Otsu binarization, and expansion back to three channels for OCR engines
// that expect colour input.

use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::filter::median_filter;
use ocrsentry_core::config::PreprocessOptions;
use tracing::{debug, info, instrument};

/// Prepares a screenshot or photo for OCR.
///
/// Every step consumes `self` and returns the transformed preprocessor, so the
/// stages can be chained or run one at a time:
///
/// ```ignore
/// let rgb = Preprocessor::new(&image)
///     .denoise(1)
///     .binarize_otsu()
///     .into_rgb();
/// ```
pub struct Preprocessor {
    /// The working image, always single-channel.
    gray: GrayImage,
}

impl Preprocessor {
    // -- Construction ---------------------------------------------------------

    /// Start from any decoded image. The grayscale conversion happens here.
    pub fn new(image: &DynamicImage) -> Self {
        Self {
            gray: image.to_luma8(),
        }
    }

    /// Wrap an image that is already single-channel.
    pub fn from_gray(gray: GrayImage) -> Self {
        Self { gray }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn into_gray(self) -> GrayImage {
        self.gray
    }

    /// Otsu threshold of the current working image.
    pub fn otsu_level(&self) -> u8 {
        otsu_threshold(&self.gray)
    }

    /// True when every pixel is pure black or pure white.
    pub fn is_two_level(&self) -> bool {
        self.gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
    }

    // -- Stages ---------------------------------------------------------------

    /// Median filter with a `(2r+1) x (2r+1)` kernel. Pixels beyond the border
    /// are clamped to the nearest edge. A radius of 0 is a no-op.
    #[instrument(skip(self))]
    pub fn denoise(self, radius: u32) -> Self {
        if radius == 0 || self.gray.width() == 0 || self.gray.height() == 0 {
            return self;
        }
        debug!(radius, "Applying median filter");
        Self {
            gray: median_filter(&self.gray, radius, radius),
        }
    }

    /// Global binarization with an automatically chosen (Otsu) threshold.
    ///
    /// Pixels strictly above the threshold become white (255), the rest black
    /// (0).
    #[instrument(skip(self))]
    pub fn binarize_otsu(self) -> Self {
        let threshold = otsu_threshold(&self.gray);
        debug!(threshold, "Otsu threshold computed");

        let (width, height) = self.gray.dimensions();
        let mut output = GrayImage::new(width, height);
        for (x, y, pixel) in self.gray.enumerate_pixels() {
            let binary = if pixel.0[0] > threshold { 255u8 } else { 0u8 };
            output.put_pixel(x, y, Luma([binary]));
        }

        Self { gray: output }
    }

    /// Expand the single channel back to RGB.
    pub fn into_rgb(self) -> RgbImage {
        DynamicImage::ImageLuma8(self.gray).to_rgb8()
    }

    // -- Full pipeline --------------------------------------------------------

    /// Run every stage selected by `options` and return the 3-channel result.
    ///
    /// An input that is already two-level skips the median filter, so running
    /// the binarizing pipeline on its own output changes nothing.
    #[instrument(skip(self))]
    pub fn run(self, options: &PreprocessOptions) -> RgbImage {
        info!(
            width = self.gray.width(),
            height = self.gray.height(),
            "Preprocessing image"
        );
        let denoised = if self.is_two_level() {
            debug!("Input already two-level; skipping median filter");
            self
        } else {
            self.denoise(options.median_radius)
        };
        let processed = if options.binarize {
            denoised.binarize_otsu()
        } else {
            denoised
        };
        processed.into_rgb()
    }
}

/// Grayscale, denoise and binarize `image` according to `options`.
pub fn preprocess(image: &DynamicImage, options: &PreprocessOptions) -> RgbImage {
    Preprocessor::new(image).run(options)
}

/// Compute the Otsu threshold for a grayscale image.
///
/// Returns the level `t` that maximises the between-class variance when the
/// background class is `0..=t`. Flat or empty images return 0.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 0;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
