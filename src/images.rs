// ABOUTME: Image dimension cache for markdeck
// ABOUTME: Memoizes width/height probes per image path, including failed probes

use crate::errors::Result;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;

/// Width and height in pixels
pub type Dimensions = (u32, u32);

/// Reads the pixel dimensions of an image file.
pub trait DimensionProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Result<Dimensions>;
}

/// Probe backed by the `image` crate; only reads the header.
#[cfg(feature = "image-size")]
pub struct ImageCrateProbe;

#[cfg(feature = "image-size")]
impl DimensionProbe for ImageCrateProbe {
    fn probe(&self, path: &Path) -> Result<Dimensions> {
        image::image_dimensions(path)
            .map_err(|e| crate::errors::DeckError::ValidationError(format!("{:?}: {}", path, e)))
    }
}

/// Whether image sizing is available, decided once at construction.
pub enum ImageSizing {
    Disabled,
    Enabled(Box<dyn DimensionProbe>),
}

impl ImageSizing {
    /// Pick the built-in probe when it was compiled in and `wanted` is set.
    pub fn detect(wanted: bool) -> Self {
        if !wanted {
            info!("Image sizing disabled by configuration");
            return ImageSizing::Disabled;
        }
        Self::builtin()
    }

    #[cfg(feature = "image-size")]
    fn builtin() -> Self {
        ImageSizing::Enabled(Box::new(ImageCrateProbe))
    }

    #[cfg(not(feature = "image-size"))]
    fn builtin() -> Self {
        info!("Image sizing disabled: built without the `image-size` feature");
        ImageSizing::Disabled
    }
}

/// Process-lifetime memo of image path to dimensions.
///
/// Failed probes are stored as `None` so a missing or corrupt image is only
/// touched once per cache lifetime.
pub struct ImageSizeCache {
    sizing: ImageSizing,
    entries: Mutex<HashMap<String, Option<Dimensions>>>,
}

impl ImageSizeCache {
    pub fn new(sizing: ImageSizing) -> Self {
        Self {
            sizing,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(ImageSizing::Disabled)
    }

    /// Dimensions of the image at `path`, if they can be known.
    pub fn get(&self, path: &Path) -> Option<Dimensions> {
        let probe = match &self.sizing {
            ImageSizing::Disabled => return None,
            ImageSizing::Enabled(probe) => probe,
        };

        let key = path.to_string_lossy().into_owned();
        if let Some(cached) = self.entries.lock().get(&key) {
            return *cached;
        }

        // Probe outside the lock; a racing writer stores the same value.
        let dims = match probe.probe(path) {
            Ok(dims) => {
                debug!("Image {} is {}x{}", key, dims.0, dims.1);
                Some(dims)
            }
            Err(e) => {
                warn!("Could not read image size for {}: {}", key, e);
                None
            }
        };
        self.entries.lock().insert(key, dims);
        dims
    }

    /// Number of paths recorded, including failed probes
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ImageSizeCache {
    fn default() -> Self {
        Self::new(ImageSizing::detect(true))
    }
}
