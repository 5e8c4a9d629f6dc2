use anyhow::Error;

/// An owned RGBA frame handed to the core by the image surface.
/// The core never decodes images; it only reads pixel data.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageFrame {
    /// from_rgba wraps a raw RGBA buffer, validating that its length matches
    /// the stated dimensions (4 bytes per pixel).
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, Error> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::msg(format!(
                "rgba buffer length {} does not match {}x{} frame",
                data.len(),
                width,
                height
            )));
        }
        Ok(ImageFrame {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// rgba_at returns the `[r, g, b, a]` bytes at the given coordinate, or
    /// `None` when the coordinate falls outside the frame.
    pub fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
