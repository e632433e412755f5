mod renderer;
mod session;

use std::io::{Stdout, Write};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind},
    queue, terminal,
};

pub use renderer::TerminalRenderer;
pub use session::{Session, SessionReport};

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in the render thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Whether a key press should close the finished maze view.
fn is_exit_key(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
}

/// Keeps the last frame on screen until the user presses `q` or Esc.
pub fn wait_for_exit_key() -> std::io::Result<()> {
    loop {
        if let event::Event::Key(key) = event::read()? {
            if is_exit_key(&key) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_exit_keys() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert!(is_exit_key(&press(KeyCode::Esc)));
        assert!(is_exit_key(&press(KeyCode::Char('q'))));
        assert!(!is_exit_key(&press(KeyCode::Char('x'))));
        assert!(!is_exit_key(&press(KeyCode::Enter)));

        let release =
            KeyEvent::new_with_kind(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release);
        assert!(!is_exit_key(&release));
    }
}
