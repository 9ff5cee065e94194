//! Image enhancement before OCR.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::PreprocessConfig;

/// Deterministic scan cleanup: upscale, local contrast, denoise, binarize.
#[derive(Debug, Clone, Default)]
pub struct ImageEnhancer {
    config: PreprocessConfig,
}

impl ImageEnhancer {
    /// Create an enhancer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Produce the binarized image handed to OCR.
    pub fn enhance(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "empty image ({}x{})",
                width, height
            )));
        }

        let scaled = self.upscale(image);
        let gray = scaled.to_luma8();
        let equalized = self.clahe(&gray);
        let denoised = self.denoise(&equalized);
        let binary = self.adaptive_threshold(&denoised)?;

        debug!(
            "Enhanced {}x{} image to {}x{}",
            width,
            height,
            binary.width(),
            binary.height()
        );

        Ok(DynamicImage::ImageLuma8(binary))
    }

    fn upscale(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        if width.max(height) >= self.config.upscale_below {
            return image.clone();
        }

        let factor = self.config.upscale_factor;
        let new_width = ((width as f32 * factor).round() as u32).max(1);
        let new_height = ((height as f32 * factor).round() as u32).max(1);
        image.resize_exact(new_width, new_height, FilterType::CatmullRom)
    }

    /// Contrast-limited adaptive histogram equalization.
    fn clahe(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let grid = self.config.clahe_grid.max(1);
        let tile_w = width.div_ceil(grid).max(1);
        let tile_h = height.div_ceil(grid).max(1);
        let tiles_x = width.div_ceil(tile_w);
        let tiles_y = height.div_ceil(tile_h);

        let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let x0 = tx * tile_w;
                let y0 = ty * tile_h;
                let x1 = (x0 + tile_w).min(width);
                let y1 = (y0 + tile_h).min(height);
                luts.push(self.tile_lut(image, x0, y0, x1, y1));
            }
        }

        let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];
        let mut result = GrayImage::new(width, height);

        for y in 0..height {
            // Position relative to tile centres
            let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
            let ty0 = fy.floor().max(0.0) as u32;
            let ty1 = (ty0 + 1).min(tiles_y - 1);
            let wy = (fy - ty0 as f32).clamp(0.0, 1.0);

            for x in 0..width {
                let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
                let tx0 = fx.floor().max(0.0) as u32;
                let tx1 = (tx0 + 1).min(tiles_x - 1);
                let wx = (fx - tx0 as f32).clamp(0.0, 1.0);

                let v = image.get_pixel(x, y)[0] as usize;
                let top = lut_at(tx0, ty0)[v] * (1.0 - wx) + lut_at(tx1, ty0)[v] * wx;
                let bottom = lut_at(tx0, ty1)[v] * (1.0 - wx) + lut_at(tx1, ty1)[v] * wx;
                let value = top * (1.0 - wy) + bottom * wy;

                result.put_pixel(x, y, Luma([value.round().clamp(0.0, 255.0) as u8]));
            }
        }

        result
    }

    fn tile_lut(&self, image: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> [f32; 256] {
        let mut hist = [0u32; 256];
        for y in y0..y1 {
            for x in x0..x1 {
                hist[image.get_pixel(x, y)[0] as usize] += 1;
            }
        }

        let area = ((x1 - x0) * (y1 - y0)).max(1);
        let clip = ((self.config.clahe_clip_limit * area as f32 / 256.0) as u32).max(1);

        let mut excess = 0u32;
        for bin in hist.iter_mut() {
            if *bin > clip {
                excess += *bin - clip;
                *bin = clip;
            }
        }

        let bonus = excess / 256;
        let residual = (excess % 256) as usize;
        for (i, bin) in hist.iter_mut().enumerate() {
            *bin += bonus;
            if i < residual {
                *bin += 1;
            }
        }

        let mut lut = [0f32; 256];
        let scale = 255.0 / area as f32;
        let mut cumulative = 0u32;
        for (i, count) in hist.iter().enumerate() {
            cumulative += count;
            lut[i] = (cumulative as f32 * scale).min(255.0);
        }
        lut
    }

    /// Square median window of `median_radius`; radius 0 leaves the image as is.
    fn denoise(&self, image: &GrayImage) -> GrayImage {
        match self.config.median_radius {
            0 => image.clone(),
            radius => median_filter(image, radius, radius),
        }
    }

    /// Binarize against a Gaussian-weighted local mean.
    fn adaptive_threshold(&self, image: &GrayImage) -> Result<GrayImage, OcrError> {
        let block = self.config.threshold_block_size;
        if block < 3 || block % 2 == 0 {
            return Err(OcrError::Preprocessing(format!(
                "threshold block size must be odd and >= 3, got {}",
                block
            )));
        }

        // Same sigma a Gaussian kernel of this size gets by default
        let sigma = 0.3 * ((block as f32 - 1.0) * 0.5 - 1.0) + 0.8;
        let local_mean = gaussian_blur_f32(image, sigma);
        let offset = self.config.threshold_offset;

        let mut result = GrayImage::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            let threshold = local_mean.get_pixel(x, y)[0] as i32 - offset;
            let value = if pixel[0] as i32 > threshold { 255 } else { 0 };
            result.put_pixel(x, y, Luma([value]));
        }
        Ok(result)
    }
}
