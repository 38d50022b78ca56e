use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use sy_core::traits::StatusLine;

use crate::canvas;
use crate::fps::FpsCounter;

/// Draw the full UI: bordered canvas + status line below.
pub fn draw(frame: &mut Frame, text: &str, status: &StatusLine, fps_counter: &FpsCounter) {
    let area = frame.area();

    // Vertical split: [canvas | status(1)]
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    // === Canvas ===
    let block = Block::default().borders(Borders::ALL).title(" syncscii ");
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);
    canvas::render_text(frame.buffer_mut(), inner, text);

    // === Status ===
    let audio_color = if status.audio_on {
        Color::Green
    } else {
        Color::DarkGray
    };
    let line = Line::from(vec![
        Span::styled(status.to_string(), Style::default().fg(audio_color)),
        Span::styled(
            format!(" | {:.0} FPS", fps_counter.fps()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("  [q] quit", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn canvas_and_status_are_drawn() {
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        let status = StatusLine {
            frame: 3,
            total: 10,
            elapsed_secs: 0.12,
            audio_on: false,
        };
        let fps = FpsCounter::new(10);
        terminal
            .draw(|f| draw(f, "@@@\n...\n", &status, &fps))
            .unwrap();

        assert!(row(&terminal, 0).contains("syncscii"));
        assert!(row(&terminal, 1).starts_with("│@@@ "));
        assert!(row(&terminal, 2).starts_with("│... "));
        assert!(row(&terminal, 5).starts_with("Frame: 3/10 | Time: 0.1s | 0 FPS"));
    }
}
