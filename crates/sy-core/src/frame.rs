/// Buffer de pixels d'une frame décodée.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use sy_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir opaque aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use sy_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Expected byte length for the current dimensions.
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// `true` if the buffer holds no pixels or is shorter than its dimensions say.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.len() < self.byte_len()
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Écrit un pixel opaque en (x, y).
    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(px) = self.data.get_mut(idx..idx + 4) {
            px.copy_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
    }

    /// Luminance ITU-R BT.601, arrondie (0.299 R + 0.587 G + 0.114 B).
    ///
    /// # Example
    /// ```
    /// use sy_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(1, 1);
    /// fb.set_rgb(0, 0, (255, 255, 255));
    /// assert_eq!(fb.luma(0, 0), 255);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        let (r, g, b, _) = self.pixel(x, y);
        ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114 + 500) / 1000) as u8
    }
}

/// A decoded frame and its 0-based position in the stream.
///
/// Timestamp implicite : `index / nominal_fps`.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Sequential index, 0-based.
    pub index: u64,
    /// Raw pixels.
    pub buffer: FrameBuffer,
}

/// Grille de luminance à la résolution de rendu, une valeur par cellule.
///
/// # Example
/// ```
/// use sy_core::frame::LumaGrid;
/// let mut grid = LumaGrid::new(80, 30);
/// grid.set(3, 2, 200);
/// assert_eq!(grid.get(3, 2), 200);
/// assert_eq!(grid.row(2)[3], 200);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaGrid {
    /// Samples, row-major.
    pub cells: Vec<u8>,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl LumaGrid {
    /// Default render grid width.
    pub const DEFAULT_WIDTH: u16 = 80;
    /// Default render grid height.
    pub const DEFAULT_HEIGHT: u16 = 30;

    /// Crée une grille noire.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![0; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Set the sample at column `x`, row `y`.
    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, value: u8) {
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] = value;
    }

    /// Sample at column `x`, row `y`.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> u8 {
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// One row of samples.
    #[must_use]
    pub fn row(&self, y: u16) -> &[u8] {
        let w = usize::from(self.width);
        let start = usize::from(y) * w;
        &self.cells[start..start + w]
    }
}
