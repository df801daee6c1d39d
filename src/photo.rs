use image::DynamicImage;
use std::path::Path;

/// Orientation tags as stored in EXIF metadata (values 1 through 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    LeftMirrored,
    Right,
    RightMirrored,
    Left,
}

impl Orientation {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Orientation::Up),
            2 => Some(Orientation::UpMirrored),
            3 => Some(Orientation::Down),
            4 => Some(Orientation::DownMirrored),
            5 => Some(Orientation::LeftMirrored),
            6 => Some(Orientation::Right),
            7 => Some(Orientation::RightMirrored),
            8 => Some(Orientation::Left),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn to_raw(self) -> u32 {
        match self {
            Orientation::Up => 1,
            Orientation::UpMirrored => 2,
            Orientation::Down => 3,
            Orientation::DownMirrored => 4,
            Orientation::LeftMirrored => 5,
            Orientation::Right => 6,
            Orientation::RightMirrored => 7,
            Orientation::Left => 8,
        }
    }

    /// Rotates and flips `pixels` so the stored content is displayed upright.
    pub fn apply(self, pixels: &DynamicImage) -> DynamicImage {
        match self {
            Orientation::Up => pixels.clone(),
            Orientation::UpMirrored => pixels.fliph(),
            Orientation::Down => pixels.rotate180(),
            Orientation::DownMirrored => pixels.flipv(),
            Orientation::LeftMirrored => pixels.rotate90().fliph(),
            Orientation::Right => pixels.rotate90(),
            Orientation::RightMirrored => pixels.rotate270().fliph(),
            Orientation::Left => pixels.rotate270(),
        }
    }
}

/// A decoded photo together with the orientation tag it arrived with.
///
/// The tag is kept raw so an unknown value can reach the predictor, which
/// refuses it.
#[derive(Debug, Clone)]
pub struct Image {
    pixels: DynamicImage,
    orientation_tag: u32,
}

impl Image {
    pub fn new(pixels: DynamicImage, orientation_tag: u32) -> Self {
        Self {
            pixels,
            orientation_tag,
        }
    }

    #[allow(dead_code)]
    pub fn upright(pixels: DynamicImage) -> Self {
        Self::new(pixels, Orientation::Up.to_raw())
    }

    pub fn open(
        path: impl AsRef<Path>,
        orientation_tag: u32,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let pixels = image::open(path)?;
        Ok(Self::new(pixels, orientation_tag))
    }

    pub fn into_pixels(self) -> DynamicImage {
        self.pixels
    }

    pub fn orientation_tag(&self) -> u32 {
        self.orientation_tag
    }

    pub fn orientation(&self) -> Option<Orientation> {
        Orientation::from_raw(self.orientation_tag)
    }
}
