use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Écrit un bloc texte ligne par ligne dans un `ratatui::Buffer`.
///
/// Pas de widget Paragraph : écriture directe, sans wrapping. Ce qui dépasse
/// de `area` est coupé.
///
/// # Example
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use sy_render::canvas::render_text;
///
/// let area = Rect::new(0, 0, 4, 2);
/// let mut buf = Buffer::empty(area);
/// render_text(&mut buf, area, "ab\n@@@@@\n");
/// assert_eq!(buf[(1, 0)].symbol(), "b");
/// assert_eq!(buf[(3, 1)].symbol(), "@");
/// ```
pub fn render_text(buf: &mut Buffer, area: Rect, text: &str) {
    for (cy, line) in (0..area.height).zip(text.lines()) {
        for (cx, ch) in (0..area.width).zip(line.chars()) {
            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char(ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_offset_by_area_origin() {
        let full = Rect::new(0, 0, 6, 4);
        let mut buf = Buffer::empty(full);
        render_text(&mut buf, Rect::new(2, 1, 3, 2), "#%\n:.\n=");
        assert_eq!(buf[(2, 1)].symbol(), "#");
        assert_eq!(buf[(3, 2)].symbol(), ".");
        // Troisième ligne hors zone
        assert_eq!(buf[(2, 3)].symbol(), " ");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
