//! Image preprocessing for CLIP embedding generation.
//!
//! CLIP ViT-B/32 expects:
//! - Shorter side resized to 224 (bicubic, aspect preserved), then a
//!   224×224 center crop
//! - Pixels scaled to [0,1], then normalized per channel with the CLIP
//!   training mean/std
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]
//!
//! Each step must match the model's training distribution exactly.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP normalization mean (per-channel, RGB).
const NORM_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];

/// CLIP normalization std (per-channel, RGB).
const NORM_STD: [f32; 3] = [0.26862954, 0.26130258, 0.27577711];

/// Preprocess an image for CLIP inference.
///
/// Resizes so the shorter side equals `image_size`, center-crops to
/// `image_size × image_size`, converts to RGB, normalizes, and returns an
/// NCHW tensor with a leading batch dimension of 1.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Array4<f32> {
    let (width, height) = image.dimensions();

    // Scale the shorter side to image_size, rounding the other side.
    // CatmullRom is the image crate's bicubic filter.
    let (new_width, new_height) = if width <= height {
        let scaled = (height as f64 * image_size as f64 / width as f64).round() as u32;
        (image_size, scaled.max(image_size))
    } else {
        let scaled = (width as f64 * image_size as f64 / height as f64).round() as u32;
        (scaled.max(image_size), image_size)
    };
    let resized = image.resize_exact(new_width, new_height, FilterType::CatmullRom);

    // Center crop to image_size × image_size.
    let crop_x = (new_width - image_size) / 2;
    let crop_y = (new_height - image_size) / 2;
    let cropped = resized.crop_imm(crop_x, crop_y, image_size, image_size);

    // to_rgb8 drops alpha and expands grayscale.
    let rgb = cropped.to_rgb8();

    let size = image_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, size, size));

    // Access raw RGB bytes and the tensor slice directly to avoid per-pixel
    // bounds-checking overhead from get_pixel() and 4D ndarray indexing.
    let raw = rgb.as_raw();
    let tensor_data = tensor.as_slice_mut().unwrap();
    for (i, pixel) in raw.chunks_exact(3).enumerate() {
        let y = i / size;
        let x = i % size;
        for (c, &val) in pixel.iter().enumerate() {
            // NCHW layout: offset = c * size * size + y * size + x
            let idx = c * size * size + y * size + x;
            tensor_data[idx] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    tensor
}
