use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("failed to read icon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode icon {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA8 pixels shared by the window and the tray icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl IconImage {
    /// Pixels in the BGRA order GDI icons use, plus a per-pixel AND mask
    /// derived from alpha.
    pub fn to_bgra_with_mask(&self) -> (Vec<u8>, Vec<u8>) {
        let mut bgra = self.rgba.clone();
        let mut mask = Vec::with_capacity(bgra.len() / 4);
        for pixel in bgra.chunks_exact_mut(4) {
            mask.push(pixel[3].wrapping_sub(u8::MAX));
            pixel.swap(0, 2);
        }
        (mask, bgra)
    }
}

pub fn load_icon(path: &Path) -> Result<IconImage, IconError> {
    let bytes = std::fs::read(path).map_err(|source| IconError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_icon(&bytes).map_err(|source| IconError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn decode_icon(bytes: &[u8]) -> Result<IconImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(IconImage {
        rgba: decoded.into_raw(),
        width,
        height,
    })
}
