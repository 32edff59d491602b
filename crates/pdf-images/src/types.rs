use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("PDF read error: {0}")]
    Document(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Unsupported rotation: {0} degrees (must be a multiple of 90)")]
    InvalidRotation(u32),
}

pub type Result<T> = std::result::Result<T, ImageError>;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one entry in an [`ImageCollection`](crate::ImageCollection).
///
/// Ids come from a process-wide counter, so they are never reused, even
/// after the entry carrying one has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageId(pub u64);

impl ImageId {
    pub fn fresh() -> Self {
        Self(NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// Clockwise rotation applied to an image before it is placed on its page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Parse a clockwise angle. Any multiple of 90 is accepted and wrapped
    /// into `[0, 360)`.
    pub fn from_degrees(degrees: u32) -> Result<Self> {
        match degrees % 360 {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            _ => Err(ImageError::InvalidRotation(degrees)),
        }
    }

    /// The next quarter turn clockwise, wrapping 270 back to 0
    pub fn next(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    /// True for 90 and 270, where width and height trade places
    pub fn swaps_dimensions(self) -> bool {
        self.degrees() % 180 != 0
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height >= width (square pages count as portrait)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

impl Orientation {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Size of one output page, in pixel units.
///
/// Every page is exactly as large as the image placed on it, so there is
/// never a margin to account for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
}

impl PageGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            orientation: Orientation::for_dimensions(width, height),
        }
    }

    /// Page geometry for an image of natural size `width × height` once
    /// `rotation` has been applied.
    pub fn for_image(width: u32, height: u32, rotation: Rotation) -> Self {
        if rotation.swaps_dimensions() {
            Self::new(height, width)
        } else {
            Self::new(width, height)
        }
    }
}

/// Encoded image bytes together with their decoded dimensions.
///
/// The bytes are shared, so cloning an entry for export does not copy the
/// file contents.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Arc<[u8]>,
    pub format: image::ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>, format: image::ImageFormat, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            format,
            width,
            height,
        }
    }
}
