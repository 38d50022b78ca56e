use rayon::prelude::*;
use sy_core::charset::GlyphRamp;
use sy_core::frame::LumaGrid;

/// Applique le quantizer à chaque cellule, row-major, un `'\n'` après chaque ligne.
///
/// Fonction pure de la grille : aucun état caché, sortie déterministe.
///
/// # Example
/// ```
/// use sy_ascii::render::AsciiRenderer;
/// use sy_core::frame::LumaGrid;
///
/// let mut grid = LumaGrid::new(3, 2);
/// grid.set(1, 0, 100);
/// grid.set(2, 1, 255);
/// assert_eq!(AsciiRenderer::new().render(&grid), " = \n  @\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct AsciiRenderer {
    ramp: GlyphRamp,
}

impl AsciiRenderer {
    /// Renderer over the fixed glyph ramp.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ramp: GlyphRamp::new(),
        }
    }

    /// Render the grid to a text block.
    #[must_use]
    pub fn render(&self, grid: &LumaGrid) -> String {
        let mut out = String::new();
        self.render_into(grid, &mut out);
        out
    }

    /// Render the grid into `out`, replacing its contents.
    pub fn render_into(&self, grid: &LumaGrid, out: &mut String) {
        out.clear();
        let width = usize::from(grid.width);
        if width == 0 {
            return;
        }
        // Lignes quantifiées en parallèle, réassemblées dans l'ordre.
        let rows: Vec<String> = grid
            .cells
            .par_chunks(width)
            .map(|row| row.iter().map(|&v| self.ramp.glyph(v)).collect())
            .collect();
        out.reserve((width + 1) * rows.len());
        for row in &rows {
            out.push_str(row);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_ends_with_newline() {
        let grid = LumaGrid::new(5, 4);
        let text = AsciiRenderer::new().render(&grid);
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with('\n'));
        assert!(text.lines().all(|l| l == "     "));
    }

    #[test]
    fn row_major_order() {
        let mut grid = LumaGrid::new(2, 2);
        grid.cells = vec![0, 40, 90, 230];
        assert_eq!(AsciiRenderer::new().render(&grid), " :\n=@\n");
    }

    #[test]
    fn zero_width_grid_renders_nothing() {
        let grid = LumaGrid::new(0, 3);
        assert_eq!(AsciiRenderer::new().render(&grid), "");
    }
}
