/// 10 caractères, du plus sombre au plus clair.
pub const GLYPHS: &str = " .:-=+*#%@";

/// Seuils inférieurs des intervalles 1..=9 (l'intervalle 0 est `[.., 15)`).
///
/// Fixed constants: output compatibility depends on these exact values.
pub const BOUNDARIES: [i32; 9] = [15, 35, 60, 85, 110, 135, 160, 185, 210];

/// Number of glyphs in the ramp.
pub const GLYPH_COUNT: usize = BOUNDARIES.len() + 1;

/// Brightness quantizer: luminance → glyph via fixed half-open intervals.
///
/// Lookup table pré-calculée pour un coût O(1) par pixel `u8`.
///
/// # Example
/// ```
/// use sy_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::new();
/// assert_eq!(ramp.glyph(0), ' ');
/// assert_eq!(ramp.glyph(14), ' ');
/// assert_eq!(ramp.glyph(15), '.');
/// assert_eq!(ramp.glyph(255), '@');
/// ```
#[derive(Clone, Debug)]
pub struct GlyphRamp {
    glyphs: [char; GLYPH_COUNT],
    lut: [u8; 256],
}

impl GlyphRamp {
    /// Build the ramp and its 256-entry lookup table.
    #[must_use]
    pub fn new() -> Self {
        let mut glyphs = [' '; GLYPH_COUNT];
        for (slot, ch) in glyphs.iter_mut().zip(GLYPHS.chars()) {
            *slot = ch;
        }
        let mut lut = [0u8; 256];
        for (b, slot) in lut.iter_mut().enumerate() {
            *slot = index_of(b as i32) as u8;
        }
        Self { glyphs, lut }
    }

    /// Glyph index [0, 9] for an 8-bit luminance sample.
    #[inline(always)]
    #[must_use]
    pub fn index(&self, luminance: u8) -> usize {
        usize::from(self.lut[usize::from(luminance)])
    }

    /// Glyph for an 8-bit luminance sample.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, luminance: u8) -> char {
        self.glyphs[self.index(luminance)]
    }

    /// Glyph for a real-valued luminance. Out-of-range values fall into the
    /// first or last interval; NaN maps to the darkest glyph.
    ///
    /// # Example
    /// ```
    /// use sy_core::charset::GlyphRamp;
    /// let ramp = GlyphRamp::new();
    /// assert_eq!(ramp.glyph_f64(-40.0), ' ');
    /// assert_eq!(ramp.glyph_f64(34.9), '.');
    /// assert_eq!(ramp.glyph_f64(35.0), ':');
    /// assert_eq!(ramp.glyph_f64(1e9), '@');
    /// ```
    #[must_use]
    pub fn glyph_f64(&self, luminance: f64) -> char {
        let idx = BOUNDARIES
            .iter()
            .take_while(|&&t| luminance >= f64::from(t))
            .count();
        self.glyphs[idx]
    }

    /// The glyphs, darkest first.
    #[must_use]
    pub fn glyphs(&self) -> &[char; GLYPH_COUNT] {
        &self.glyphs
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Index de l'intervalle contenant `b` (entrées hors bornes incluses).
///
/// # Example
/// ```
/// use sy_core::charset::index_of;
/// assert_eq!(index_of(-5), 0);
/// assert_eq!(index_of(209), 8);
/// assert_eq!(index_of(210), 9);
/// assert_eq!(index_of(4000), 9);
/// ```
#[inline]
#[must_use]
pub fn index_of(b: i32) -> usize {
    BOUNDARIES.partition_point(|&t| t <= b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_has_ten_glyphs() {
        let ramp = GlyphRamp::new();
        let s: String = ramp.glyphs().iter().collect();
        assert_eq!(s, GLYPHS);
    }

    #[test]
    fn quantizer_monotonic() {
        let ramp = GlyphRamp::new();
        let mut prev = 0usize;
        for b in 0..=255u8 {
            let idx = ramp.index(b);
            assert!(idx >= prev, "quantizer non monotone à luminance {b}");
            prev = idx;
        }
        assert_eq!(prev, GLYPH_COUNT - 1);
    }

    #[test]
    fn each_boundary_steps_exactly_once() {
        let ramp = GlyphRamp::new();
        for (i, &t) in BOUNDARIES.iter().enumerate() {
            let below = ramp.index((t - 1) as u8);
            let at = ramp.index(t as u8);
            assert_eq!(below, i, "below boundary {t}");
            assert_eq!(at, i + 1, "at boundary {t}");
        }
    }

    #[test]
    fn lut_agrees_with_real_path() {
        let ramp = GlyphRamp::new();
        for b in 0..=255u8 {
            assert_eq!(ramp.glyph(b), ramp.glyph_f64(f64::from(b)));
        }
    }

    #[test]
    fn out_of_range_is_clamped_into_end_intervals() {
        let ramp = GlyphRamp::new();
        assert_eq!(index_of(i32::MIN), 0);
        assert_eq!(index_of(i32::MAX), 9);
        assert_eq!(ramp.glyph_f64(f64::NAN), ' ');
        assert_eq!(ramp.glyph_f64(f64::INFINITY), '@');
        assert_eq!(ramp.glyph_f64(f64::NEG_INFINITY), ' ');
    }
}
