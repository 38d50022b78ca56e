//! Normalisation d'une frame avant quantification.
//!
//! Ordre fixe : resize → luminance → flou gaussien 3×3 → gain/offset.
//! Inverser deux étapes change la sortie.

use anyhow::Result;
use sy_core::frame::{FrameBuffer, LumaGrid};

use crate::resize::Resizer;

/// Multiplicative contrast gain.
pub const CONTRAST_GAIN: f64 = 1.4;

/// Additive brightness offset, applied after the gain.
pub const BRIGHTNESS_OFFSET: f64 = 10.0;

/// Noyau gaussien 3 taps pour sigma dérivé de la taille (1, 2, 1) / 4.
const KERNEL: [u32; 3] = [1, 2, 1];

/// Reduces a raw frame to one luminance sample per grid cell.
///
/// Buffers intermédiaires réutilisés d'une frame à l'autre.
///
/// # Example
/// ```
/// use sy_ascii::preprocess::Preprocessor;
/// use sy_core::frame::{FrameBuffer, LumaGrid};
///
/// let mut pre = Preprocessor::new();
/// let frame = FrameBuffer::new(320, 240);
/// let mut grid = LumaGrid::new(80, 30);
/// pre.process(&frame, &mut grid).unwrap();
/// // Noir : 0 * 1.4 + 10
/// assert!(grid.cells.iter().all(|&v| v == 10));
/// ```
pub struct Preprocessor {
    resizer: Resizer,
    resized: FrameBuffer,
    gray: Vec<u8>,
}

impl Preprocessor {
    /// Create a preprocessor; buffers are sized on first use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            resized: FrameBuffer::new(0, 0),
            gray: Vec::new(),
        }
    }

    /// Run the four stages, writing into `grid` (its dimensions are the target).
    ///
    /// # Errors
    /// Returns an error if the frame is empty or cannot be resized.
    pub fn process(&mut self, frame: &FrameBuffer, grid: &mut LumaGrid) -> Result<()> {
        let (w, h) = (u32::from(grid.width), u32::from(grid.height));
        if self.resized.width != w || self.resized.height != h {
            log::debug!("Preprocessor: grille {w}x{h}");
            self.resized = FrameBuffer::new(w, h);
        }

        // 1. Resize
        self.resizer.resize_into(frame, &mut self.resized)?;
        // 2. Luminance
        to_luma(&self.resized, &mut self.gray);
        // 3. Flou
        gaussian_blur_3x3(&self.gray, w as usize, h as usize, &mut grid.cells);
        // 4. Contraste
        for v in &mut grid.cells {
            *v = apply_gain(*v);
        }
        Ok(())
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Luminance BT.601 de chaque pixel, row-major.
pub fn to_luma(frame: &FrameBuffer, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(frame.width as usize * frame.height as usize);
    for y in 0..frame.height {
        for x in 0..frame.width {
            out.push(frame.luma(x, y));
        }
    }
}

/// Bordure reflect-101 : `-1 → 1`, `n → n - 2`.
#[inline]
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    if i < 0 {
        i.unsigned_abs()
    } else if i as usize >= n {
        2 * n - 2 - i as usize
    } else {
        i as usize
    }
}

/// 3×3 Gaussian blur, kernel (1, 2, 1) ⊗ (1, 2, 1) / 16, rounded to nearest.
///
/// # Example
/// ```
/// use sy_ascii::preprocess::gaussian_blur_3x3;
/// let src = [0, 0, 0, 0, 160, 0, 0, 0, 0];
/// let mut dst = vec![0; 9];
/// gaussian_blur_3x3(&src, 3, 3, &mut dst);
/// assert_eq!(dst[4], 40);
/// ```
pub fn gaussian_blur_3x3(src: &[u8], width: usize, height: usize, dst: &mut Vec<u8>) {
    dst.clear();
    dst.resize(width * height, 0);
    if width == 0 || height == 0 {
        return;
    }
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (ky, wy) in KERNEL.iter().enumerate() {
                let sy = reflect101(y as isize + ky as isize - 1, height);
                for (kx, wx) in KERNEL.iter().enumerate() {
                    let sx = reflect101(x as isize + kx as isize - 1, width);
                    acc += wy * wx * u32::from(src[sy * width + sx]);
                }
            }
            dst[y * width + x] = ((acc + 8) / 16) as u8;
        }
    }
}

/// `v * 1.4 + 10`, arrondi au pair le plus proche, saturé dans [0, 255].
///
/// # Example
/// ```
/// use sy_ascii::preprocess::apply_gain;
/// assert_eq!(apply_gain(0), 10);
/// assert_eq!(apply_gain(100), 150);
/// assert_eq!(apply_gain(200), 255);
/// ```
#[inline]
#[must_use]
pub fn apply_gain(v: u8) -> u8 {
    (f64::from(v) * CONTRAST_GAIN + BRIGHTNESS_OFFSET)
        .round_ties_even()
        .clamp(0.0, 255.0) as u8
}
