use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use sy_core::frame::FrameBuffer;

/// Resizer réutilisable wrappant fast_image_resize.
///
/// Convolution bilinéaire : en réduction le support du filtre s'élargit,
/// chaque cellule moyenne donc toute la zone source qu'elle couvre (pas
/// d'échantillonnage au plus proche voisin, pas d'aliasing).
///
/// # Example
/// ```
/// use sy_ascii::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch image for source (owned buffer to avoid the mut borrow issue).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if either buffer does not match its dimensions.
    ///
    /// # Example
    /// ```
    /// use sy_ascii::resize::Resizer;
    /// use sy_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let src = FrameBuffer::new(100, 100);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        if src.is_empty() {
            anyhow::bail!("Frame source vide ({}x{})", src.width, src.height);
        }
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data[..src.byte_len()]);
            return Ok(());
        }

        // Copie forcée : l'API fast_image_resize exige &mut sur la source.
        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data[..src.byte_len()]);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("Invalid source dimensions")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_frame_stays_uniform() {
        let mut src = FrameBuffer::new(64, 48);
        for y in 0..48 {
            for x in 0..64 {
                src.set_rgb(x, y, (120, 120, 120));
            }
        }
        let mut dst = FrameBuffer::new(8, 6);
        Resizer::new().resize_into(&src, &mut dst).unwrap();
        for px in dst.data.chunks_exact(4) {
            assert!((i16::from(px[0]) - 120).abs() <= 1, "got {}", px[0]);
        }
    }

    #[test]
    fn checkerboard_is_averaged_not_sampled() {
        // Damier 1px : un échantillonnage au plus proche voisin donnerait 0 ou 255.
        let mut src = FrameBuffer::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                src.set_rgb(x, y, (v, v, v));
            }
        }
        let mut dst = FrameBuffer::new(4, 4);
        Resizer::new().resize_into(&src, &mut dst).unwrap();
        for px in dst.data.chunks_exact(4) {
            assert!((90..=165).contains(&px[0]), "cell not averaged: {}", px[0]);
        }
    }

    #[test]
    fn same_size_is_a_copy() {
        let mut src = FrameBuffer::new(3, 2);
        src.set_rgb(2, 1, (9, 8, 7));
        let mut dst = FrameBuffer::new(3, 2);
        Resizer::new().resize_into(&src, &mut dst).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn empty_source_is_rejected() {
        let src = FrameBuffer::new(0, 0);
        let mut dst = FrameBuffer::new(4, 4);
        assert!(Resizer::new().resize_into(&src, &mut dst).is_err());
    }
}
