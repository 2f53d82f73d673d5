mod renderer;

pub use renderer::{Renderer, Tile};

use std::io::{Stdout, Write};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::carvers::{Texture, carve_texture};
use crate::error::MazeError;
use crate::grid::Grid;

/// What to do after a maze has been drawn.
enum PostDrawAction {
    /// Carve and draw a fresh maze with the same settings
    Regenerate,
    /// Leave the session
    Exit,
}

#[derive(Default)]
pub struct App;

impl App {
    /// Available maze textures
    const TEXTURES: [Texture; 4] = [
        Texture::Backtracker,
        Texture::SpanningTree,
        Texture::Hybrid,
        Texture::Hallways,
    ];

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()
    }

    /// Interactive session: pick dimensions and a texture, then carve and
    /// draw mazes until the user leaves.
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let (rows, cols) = match App::ask_grid_dimensions(stdout)? {
            Some(dims) => dims,
            None => return Ok(()),
        };

        let texture = match App::select_from_menu(
            stdout,
            "Select maze texture (use arrow keys and Enter, or Esc to exit):",
            &App::TEXTURES,
        )? {
            Some(texture) => {
                stdout.execute(style::PrintStyledContent(
                    format!("Selected texture: {}\r\n", texture)
                        .with(Color::Green)
                        .attribute(Attribute::Bold),
                ))?;
                texture
            }
            None => return Ok(()),
        };

        tracing::info!(rows, cols, %texture, "starting generation session");

        let mut renderer = Renderer::new();
        loop {
            let mut grid = Grid::new(rows, cols).map_err(into_io_error)?;
            carve_texture(&mut grid, texture, None).map_err(into_io_error)?;

            // Dimensions were validated against the terminal, but it may
            // have shrunk since
            if !Renderer::fits(&grid)? {
                queue!(
                    stdout,
                    terminal::Clear(ClearType::All),
                    cursor::MoveTo(0, 0),
                    style::PrintStyledContent(
                        "Terminal is now too small for the maze. Press Esc to exit...\r\n"
                            .with(Color::Yellow)
                            .attribute(Attribute::Bold)
                    )
                )?;
                stdout.flush()?;
                App::wait_for_esc()?;
                return Ok(());
            }

            renderer.draw(&grid)?;
            renderer.status(
                &grid,
                &format!(
                    "{}x{} {} | Enter: new maze | Esc: exit",
                    rows, cols, texture
                ),
            )?;
            tracing::info!(passages = grid.open_passages(), "maze drawn");

            match App::wait_for_action()? {
                PostDrawAction::Regenerate => continue,
                PostDrawAction::Exit => break,
            }
        }
        Ok(())
    }

    /// Wait for the user to press Enter (new maze) or Esc (exit)
    fn wait_for_action() -> std::io::Result<PostDrawAction> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Esc => return Ok(PostDrawAction::Exit),
                    KeyCode::Enter => return Ok(PostDrawAction::Regenerate),
                    _ => {}
                }
            }
        }
    }

    /// Wait for the user to press the Esc key
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    /// Largest cell count along one axis that fits a terminal span:
    /// `n` cells need `2n + 1` tiles plus any reserved rows.
    fn get_max_grid_size(term_size: u16, tile_width: u16, reserved: u16) -> u16 {
        let tiles = term_size.saturating_sub(reserved) / tile_width;
        (tiles.saturating_sub(1) / 2).max(1)
    }

    /// Ask user for grid dimensions (rows and columns), capped by what the
    /// current terminal can display.
    /// Returns None if user cancels input with Esc
    fn ask_grid_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<(u16, u16)>> {
        stdout.execute(style::PrintStyledContent(
            "Enter maze dimensions (empty input uses the largest size the terminal fits), \
or press Esc to exit.\r\n"
                .with(Color::Blue),
        ))?;

        let validate = |s: &str, is_rows| {
            let max_size = if let Ok((term_width, term_height)) = terminal::size() {
                if is_rows {
                    App::get_max_grid_size(term_height, 1, Renderer::NUM_LOG_ROWS)
                } else {
                    App::get_max_grid_size(term_width, Tile::TILE_WIDTH, 0)
                }
            } else {
                // Fallback when the terminal size cannot be determined
                u8::MAX as u16
            };

            if s.trim().is_empty() {
                return Ok(max_size);
            }

            let error_msg = format!("Please enter a valid number between 1 and {}.", max_size);
            s.parse::<u16>()
                .map_err(|_| error_msg.clone())
                .and_then(|n| match n {
                    1.. if n <= max_size => Ok(n),
                    _ => Err(error_msg),
                })
        };

        let rows = match App::prompt_with_validation(stdout, "Rows: ", |s| validate(s, true))? {
            Some(rows) => rows,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Rows set to {}\r\n", rows)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let cols = match App::prompt_with_validation(stdout, "Columns: ", |s| validate(s, false))? {
            Some(cols) => cols,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Columns set to {}\r\n", cols)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        Ok(Some((rows, cols)))
    }

    /// Get user input with real-time validation and feedback
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) on Enter once the input validates
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();

        let accepted = loop {
            // Re-render the prompt line, coloring the input by validity
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            let validation_result = validate(input.trim());
            let input_color = match validation_result {
                Ok(_) => Color::Green,
                Err(_) => Color::Red,
            };
            queue!(
                stdout,
                style::SetForegroundColor(input_color),
                style::Print(&input),
                style::ResetColor,
                style::Print(" \r\n")
            )?;
            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                match code {
                    KeyCode::Enter => {
                        if let Ok(value) = validate(input.trim()) {
                            break Some(value);
                        }
                        // invalid, stay in the loop and re-render
                    }
                    KeyCode::Char(c) if kind == event::KeyEventKind::Press => {
                        if !c.is_whitespace() && !c.is_control() {
                            input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };

        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(accepted)
    }

    /// Present a menu of options and let the user pick one with arrow keys
    /// Returns None if user cancels input with Esc
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let choice = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;
            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = if selected + 1 >= options.len() {
                            0
                        } else {
                            selected + 1
                        };
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };

        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(choice)
    }
}

fn into_io_error(error: MazeError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_max_grid_size() {
        // 80 columns hold 40 two-wide tiles, enough for 19 cells (39 tiles)
        assert_eq!(App::get_max_grid_size(80, Tile::TILE_WIDTH, 0), 19);
        // 24 rows minus 2 reserved leave 22 tiles: 10 cells
        assert_eq!(App::get_max_grid_size(24, 1, Renderer::NUM_LOG_ROWS), 10);
        // Never below one cell, however cramped the terminal
        assert_eq!(App::get_max_grid_size(0, 1, 0), 1);
        assert_eq!(App::get_max_grid_size(3, 2, 2), 1);
    }
}
