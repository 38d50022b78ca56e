use sy_core::frame::LumaGrid;

/// Largeur du motif de test affiché par l'écran "Test display".
pub const PATTERN_WIDTH: u16 = 60;

/// Hauteur du motif de test.
pub const PATTERN_HEIGHT: u16 = 15;

/// Horizontal brightness ramp: column `x` holds `trunc(x / width * 255)`.
///
/// Toutes les lignes sont identiques. Pas de prétraitement : le motif
/// est quantifié directement.
///
/// # Example
/// ```
/// use sy_ascii::pattern::gradient;
/// let grid = gradient(60, 15);
/// assert_eq!(grid.get(0, 0), 0);
/// assert_eq!(grid.get(59, 14), 250);
/// ```
#[must_use]
pub fn gradient(width: u16, height: u16) -> LumaGrid {
    let mut grid = LumaGrid::new(width, height);
    for x in 0..width {
        let level = (f64::from(x) / f64::from(width) * 255.0) as u8;
        for y in 0..height {
            grid.set(x, y, level);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::AsciiRenderer;

    const EXPECTED_ROW: &str = "    .....::::::-----======++++++******######%%%%%%@@@@@@@@@@";

    #[test]
    fn test_pattern_matches_glyph_boundaries() {
        let text = AsciiRenderer::new().render(&gradient(PATTERN_WIDTH, PATTERN_HEIGHT));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), usize::from(PATTERN_HEIGHT));
        for row in rows {
            assert_eq!(row, EXPECTED_ROW);
        }
    }

    #[test]
    fn gradient_is_monotonic_per_row() {
        let grid = gradient(37, 3);
        for y in 0..3 {
            assert!(grid.row(y).windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
