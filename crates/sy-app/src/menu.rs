use std::io::{BufRead, Write};

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use sy_ascii::pattern::{self, PATTERN_HEIGHT, PATTERN_WIDTH};
use sy_ascii::render::AsciiRenderer;
use sy_core::charset::GLYPHS;

/// Entrée du menu principal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    TestDisplay,
    Exit,
    Invalid,
}

impl MenuChoice {
    /// Interprète une ligne saisie (espaces et fin de ligne ignorés).
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "1" => Self::Play,
            "2" => Self::TestDisplay,
            "3" => Self::Exit,
            _ => Self::Invalid,
        }
    }
}

/// Écran "Test display" : la rampe de glyphes, le dégradé 60×15 et la
/// taille de la grille de rendu.
///
/// # Errors
/// Returns the write error.
pub fn write_display_test<W: Write>(
    out: &mut W,
    grid_width: u16,
    grid_height: u16,
) -> Result<()> {
    let text = AsciiRenderer::new().render(&pattern::gradient(PATTERN_WIDTH, PATTERN_HEIGHT));
    writeln!(out, "Display test")?;
    writeln!(out, "Characters: {GLYPHS}")?;
    writeln!(out, "{text}")?;
    writeln!(out, "Screen size: {grid_width}x{grid_height}")?;
    out.flush()?;
    Ok(())
}

fn show_menu<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    writeln!(out, "1. Play video")?;
    writeln!(out, "2. Test display")?;
    writeln!(out, "3. Exit")?;
    write!(out, "Choose an option: ")?;
    out.flush()?;
    Ok(())
}

/// Lit une ligne ; `None` en fin d'entrée.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Boucle du menu interactif, jusqu'à "3" ou la fin de l'entrée.
///
/// Les erreurs de `play` sont affichées puis oubliées : une session ratée
/// ne ferme pas le menu.
///
/// # Errors
/// Returns I/O errors on `input` or `out`.
pub fn run_menu<R, W, F>(mut input: R, mut out: W, grid: (u16, u16), mut play: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&mut W) -> Result<()>,
{
    loop {
        show_menu(&mut out)?;
        let Some(line) = read_line(&mut input)? else {
            writeln!(out)?;
            return Ok(());
        };

        match MenuChoice::parse(&line) {
            MenuChoice::Play => {
                if let Err(e) = play(&mut out) {
                    log::warn!("Lecture impossible : {e:#}");
                    writeln!(out, "Error: {e:#}")?;
                }
            }
            MenuChoice::TestDisplay => write_display_test(&mut out, grid.0, grid.1)?,
            MenuChoice::Exit => return Ok(()),
            MenuChoice::Invalid => writeln!(out, "Invalid choice!")?,
        }

        write!(out, "\nPress Enter to continue...")?;
        out.flush()?;
        if read_line(&mut input)?.is_none() {
            writeln!(out)?;
            return Ok(());
        }
    }
}
