//! CPU-side texture resources
//!
//! Provides the float data texture used for terrain height fields and a
//! lightweight reference to an image texture (diffuse maps). Uploading to the
//! GPU is the host renderer's job; these types only track the data and
//! whether it changed since the last upload.

/// Texture filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Sharp, pixelated sampling
    #[default]
    Nearest,
    /// Smooth sampling
    Linear,
}

/// Reference to an image texture owned by the host renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTexture {
    pub name: String,
    /// Number of repeats across the surface in (u, v)
    pub wrap: [f32; 2],
}

impl ImageTexture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wrap: [1.0, 1.0],
        }
    }

    pub fn with_wrap(mut self, wrap_x: f32, wrap_y: f32) -> Self {
        self.wrap = [wrap_x, wrap_y];
        self
    }
}

/// Single-channel float texture stored row-major on the CPU
///
/// Pixel `(x, y)` lives at `data[y * width + x]`. Writes do not flag the
/// texture for upload on their own; callers batch their writes and then call
/// [`DataTextureFloat1D::set_texture_needs_update`] once.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTextureFloat1D {
    width: u32,
    height: u32,
    data: Vec<f32>,
    min_filter: FilterMode,
    mag_filter: FilterMode,
    needs_update: bool,
}

impl DataTextureFloat1D {
    /// Creates a texture with every pixel set to `value`
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `value` - Initial value of every pixel
    pub fn create_solid(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            needs_update: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }

    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }

    pub fn set_min_filter(&mut self, filter: FilterMode) {
        self.min_filter = filter;
    }

    pub fn set_mag_filter(&mut self, filter: FilterMode) {
        self.mag_filter = filter;
    }

    /// Maps a continuous coordinate to the nearest pixel index, clamped to the grid
    fn nearest_index(&self, x: f32, y: f32) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let clamp_axis = |v: f32, size: u32| -> usize {
            // max() drops NaN to 0
            let rounded = v.round().max(0.0) as usize;
            rounded.min(size as usize - 1)
        };

        let px = clamp_axis(x, self.width);
        let py = clamp_axis(y, self.height);
        Some(py * self.width as usize + px)
    }

    /// Reads the pixel nearest to `(x, y)`
    ///
    /// Coordinates are rounded to the nearest pixel and clamped to the grid.
    /// An empty texture reads as `0.0`.
    pub fn get_pixel_nn(&self, x: f32, y: f32) -> f32 {
        self.nearest_index(x, y).map_or(0.0, |i| self.data[i])
    }

    /// Writes the pixel nearest to `(x, y)`
    pub fn set_pixel_nn(&mut self, x: f32, y: f32, value: f32) {
        if let Some(i) = self.nearest_index(x, y) {
            self.data[i] = value;
        }
    }

    /// Flags the texture for re-upload
    pub fn set_texture_needs_update(&mut self) {
        self.needs_update = true;
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Clears and returns the upload flag
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }

    /// Raw pixel values, row-major
    pub fn pixels(&self) -> &[f32] {
        &self.data
    }

    /// Pixel data as bytes, ready for a `R32Float` texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_solid() {
        let tex = DataTextureFloat1D::create_solid(4, 3, 0.5);
        assert_eq!(tex.pixels().len(), 12);
        assert!(tex.pixels().iter().all(|&v| v == 0.5));
        assert_eq!(tex.as_bytes().len(), 12 * 4);
    }

    #[test]
    fn test_exact_coordinate_reads_last_write() {
        let mut tex = DataTextureFloat1D::create_solid(8, 8, 0.0);
        tex.set_pixel_nn(3.0, 5.0, 1.25);
        tex.set_pixel_nn(3.0, 5.0, -0.75);
        assert_eq!(tex.get_pixel_nn(3.0, 5.0), -0.75);
        assert_eq!(tex.pixels()[5 * 8 + 3], -0.75);
    }

    #[test]
    fn test_nearest_neighbor_rounding_and_clamping() {
        let mut tex = DataTextureFloat1D::create_solid(4, 4, 0.0);
        tex.set_pixel_nn(2.0, 1.0, 7.0);
        tex.set_pixel_nn(3.0, 3.0, 9.0);

        assert_eq!(tex.get_pixel_nn(1.6, 0.7), 7.0);
        assert_eq!(tex.get_pixel_nn(2.4, 1.2), 7.0);
        assert_eq!(tex.get_pixel_nn(100.0, 50.0), 9.0);
        assert_eq!(tex.get_pixel_nn(-3.0, -3.0), 0.0);
        assert_eq!(tex.get_pixel_nn(f32::NAN, f32::NAN), 0.0);
    }

    #[test]
    fn test_empty_texture() {
        let mut tex = DataTextureFloat1D::create_solid(0, 0, 0.5);
        tex.set_pixel_nn(0.0, 0.0, 1.0);
        assert_eq!(tex.get_pixel_nn(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_needs_update_flag() {
        let mut tex = DataTextureFloat1D::create_solid(2, 2, 0.0);
        assert!(tex.take_needs_update());
        assert!(!tex.needs_update());

        tex.set_pixel_nn(0.0, 0.0, 1.0);
        assert!(!tex.needs_update());

        tex.set_texture_needs_update();
        assert!(tex.take_needs_update());
    }

    #[test]
    fn test_image_texture_wrap() {
        let tex = ImageTexture::new("grass").with_wrap(5.0, 5.0);
        assert_eq!(tex.wrap, [5.0, 5.0]);
        assert_eq!(tex.name, "grass");
    }
}
