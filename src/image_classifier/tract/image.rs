use crate::image_classifier::interface::CropAndScale;
use crate::photo::Orientation;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

pub fn fit_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == image.height() && width == height {
        return image.resize_exact(width, height, imageops::FilterType::Triangle);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale) as u32).clamp(1, width);
    let new_h = ((h * scale) as u32).clamp(1, height);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();

    let mut padded = image::RgbImage::new(width, height);
    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;
    imageops::replace(&mut padded, &scaled, x_offset as i64, y_offset as i64);

    DynamicImage::from(padded)
}

/// Crops the largest centered region with the target aspect ratio, then
/// resizes only that region.
pub fn center_crop_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (w, h) = (image.width() as u64, image.height() as u64);
    if w == 0 || h == 0 {
        return DynamicImage::new_rgb8(width, height);
    }

    let crop_w = (h * width as u64 / height.max(1) as u64).clamp(1, w);
    let crop_h = (w * height as u64 / width.max(1) as u64).clamp(1, h);
    let x_offset = (w - crop_w) / 2;
    let y_offset = (h - crop_h) / 2;

    image
        .crop_imm(
            x_offset as u32,
            y_offset as u32,
            crop_w as u32,
            crop_h as u32,
        )
        .resize_exact(width, height, imageops::FilterType::Triangle)
}

pub fn fill_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_exact(width, height, imageops::FilterType::Triangle)
}

fn image_to_tensor(image: &DynamicImage) -> Tensor {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
    .into_tensor()
}

/// Turns a photo into a `[1, 3, height, width]` tensor with values in [0, 1].
pub fn prepare_tensor(
    image: &DynamicImage,
    orientation: Orientation,
    crop_and_scale: CropAndScale,
    width: u32,
    height: u32,
) -> Tensor {
    let upright = orientation.apply(image);

    let sized = match crop_and_scale {
        CropAndScale::CenterCrop => center_crop_image(&upright, width, height),
        CropAndScale::ScaleFit => fit_image(&upright, width, height),
        CropAndScale::ScaleFill => fill_image(&upright, width, height),
    };

    image_to_tensor(&sized)
}
