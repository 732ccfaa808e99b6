use std::fmt;

use bytes::Bytes;

use crate::error::CoreError;

/// A decoded poster, ready for a view to draw.
#[derive(Clone, PartialEq, Eq)]
pub struct Poster {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
    /// The bytes as downloaded.
    pub raw: Bytes,
}

impl Poster {
    /// Decode downloaded image bytes. The format is sniffed from the data.
    pub fn decode(raw: Bytes) -> Result<Self, CoreError> {
        let rgba = image::load_from_memory(&raw)?.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
            raw,
        })
    }
}

impl fmt::Debug for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.raw.len())
            .finish()
    }
}
