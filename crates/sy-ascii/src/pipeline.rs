use anyhow::Result;
use sy_core::frame::{FrameBuffer, LumaGrid};

use crate::preprocess::Preprocessor;
use crate::render::AsciiRenderer;

/// Preprocessor + renderer pour une grille de taille fixe.
///
/// # Example
/// ```
/// use sy_ascii::AsciiPipeline;
/// use sy_core::frame::FrameBuffer;
///
/// let mut pipeline = AsciiPipeline::new(80, 30);
/// let text = pipeline.frame_to_text(&FrameBuffer::new(640, 360)).unwrap();
/// assert_eq!(text.lines().count(), 30);
/// assert!(text.lines().all(|l| l.chars().count() == 80));
/// ```
pub struct AsciiPipeline {
    preprocessor: Preprocessor,
    renderer: AsciiRenderer,
    grid: LumaGrid,
}

impl AsciiPipeline {
    /// Pipeline targeting a `width × height` character grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            preprocessor: Preprocessor::new(),
            renderer: AsciiRenderer::new(),
            grid: LumaGrid::new(width, height),
        }
    }

    /// Grid dimensions `(width, height)`.
    #[must_use]
    pub fn grid_size(&self) -> (u16, u16) {
        (self.grid.width, self.grid.height)
    }

    /// Convert one frame to its text block.
    ///
    /// # Errors
    /// Returns an error if the frame is empty or cannot be resized.
    pub fn frame_to_text(&mut self, frame: &FrameBuffer) -> Result<String> {
        self.preprocessor.process(frame, &mut self.grid)?;
        Ok(self.renderer.render(&self.grid))
    }
}
