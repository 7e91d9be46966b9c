use image::{ImageBuffer, Rgba, RgbaImage};

/// Represents a single rendered frame
///
/// This is a simple wrapper around an RGBA image buffer that provides
/// convenient methods for the pixel manipulation used by the effect stages.
/// Dimensions are fixed for the lifetime of the buffer; the pipeline never
/// resizes a frame mid-session.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbaImage,
}

impl Frame {
    /// Create a new frame from an RGBA image buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with opaque black
    pub fn new_black(width: u32, height: u32) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba(color));
        Self { buffer }
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Get a mutable reference to a pixel at the given coordinates
    pub fn get_pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8; 4] {
        &mut self.buffer.get_pixel_mut(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.buffer.put_pixel(x, y, Rgba(color));
    }

    /// Fill a rectangle with a solid color, clipped to the frame bounds
    ///
    /// Coordinates outside the frame are silently clipped, matching the
    /// forgiving semantics of a canvas `fillRect`.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());

        for py in y.min(self.height())..y_end {
            for px in x.min(self.width())..x_end {
                self.buffer.put_pixel(px, py, Rgba(color));
            }
        }
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }

    /// Raw interleaved RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Mutable raw interleaved RGBA bytes, row-major
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut *self.buffer
    }

    /// Convert the frame to raw RGBA bytes
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.buffer.as_raw().clone()
    }

    /// Create a frame from raw RGBA bytes
    pub fn from_rgba_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, data).map(|buffer| Self { buffer })
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_black_is_opaque() {
        let frame = Frame::new_black(4, 3);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.get_pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(frame.get_pixel(3, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut frame = Frame::new_filled(8, 8, [10, 20, 30, 255]);
        // Rectangle extends past the right and bottom edges
        frame.fill_rect(6, 6, 10, 10, [255, 0, 0, 255]);

        assert_eq!(frame.get_pixel(7, 7), [255, 0, 0, 255]);
        assert_eq!(frame.get_pixel(5, 5), [10, 20, 30, 255]);
    }

    #[test]
    fn test_fill_rect_outside_frame_is_noop() {
        let mut frame = Frame::new_black(4, 4);
        let before = frame.clone();
        frame.fill_rect(100, 100, 5, 5, [255, 255, 255, 255]);
        assert_eq!(frame, before);
    }

    #[test]
    fn test_raw_bytes_roundtrip() {
        let frame = Frame::new_filled(2, 2, [1, 2, 3, 4]);
        let bytes = frame.to_rgba_bytes();
        assert_eq!(bytes.len(), 2 * 2 * 4);

        let rebuilt = Frame::from_rgba_bytes(2, 2, bytes).unwrap();
        assert_eq!(rebuilt, frame);
    }
}
