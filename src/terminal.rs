//! Plays a [`Session`] in the terminal.
//!
//! The terminal cannot show the picture, so tiles are drawn as their home
//! numbers and images are only checked for a usable URL.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use url::Url;

use crate::puzzle::{Direction, MoveSource};
use crate::session::{ImageLoadError, ImageLoader, Session};

const CONTROLS: &str = "arrows: slide   r: reshuffle   q: quit";

/// Accepts any absolute URL a browser could load an image from.
pub struct SyntaxImageLoader;

impl ImageLoader for SyntaxImageLoader {
    fn load(&mut self, url: &str) -> Result<(), ImageLoadError> {
        let parsed =
            Url::parse(url.trim()).map_err(|err| ImageLoadError::new(url, err.to_string()))?;
        match parsed.scheme() {
            "http" | "https" | "data" | "file" => Ok(()),
            other => Err(ImageLoadError::new(
                url,
                format!("unsupported scheme `{other}`"),
            )),
        }
    }
}

pub fn render_lines(session: &Session) -> Vec<String> {
    let mut lines = Vec::new();
    match session {
        Session::Creating { notice } => {
            if let Some(notice) = notice {
                lines.push(notice.message.clone());
            }
            lines.push("No puzzle in this link. Use `sliding-secret create` to make one.".into());
        }
        Session::LoadingImage { .. } => lines.push("Loading puzzle image...".into()),
        Session::ImageFailed { error, .. } => {
            lines.push("Image Error".into());
            lines.push(
                "Could not load the image for this puzzle. It might be broken or private.".into(),
            );
            lines.push(error.to_string());
        }
        Session::Playing { config, board } => {
            lines.push(format!("Moves: {}", board.move_count()));
            lines.push(String::new());
            lines.extend(board.to_string().lines().map(str::to_string));
            lines.push(String::new());
            match session.secret_message() {
                Some(secret) => {
                    lines.push("Congratulations!".into());
                    lines.push(format!("You solved it in {} moves.", board.move_count()));
                    lines.push("Secret Message Unlocked:".into());
                    lines.push(secret.to_string());
                    lines.push(String::new());
                    lines.push("q: quit".into());
                }
                None => {
                    lines.push(format!("Picture: {}", config.image_url()));
                    lines.push(CONTROLS.into());
                }
            }
        }
    }
    lines
}

/// Restores the terminal when play ends, including on error.
struct RawScreen;

impl RawScreen {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for RawScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn draw(out: &mut impl Write, session: &Session) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in render_lines(session).iter().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    out.flush()
}

/// Some terminals report releases and repeats too; only presses count.
fn pressed_key(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) => Some(*code),
        _ => None,
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Reads keys until the player quits.
pub fn run<S: MoveSource + ?Sized>(session: &mut Session, source: &mut S) -> io::Result<()> {
    let _screen = RawScreen::enter()?;
    let mut out = io::stdout();

    loop {
        draw(&mut out, session)?;
        let Some(code) = pressed_key(&event::read()?) else {
            continue;
        };
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Char('r') => session.restart(source),
            code => {
                if let Some(direction) = direction_for(code) {
                    session.slide(direction);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::config::Configuration;
    use crate::grid::GridSize;
    use crate::test_support::ScriptedMoves;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn session() -> Session {
        let config = Configuration::new("https://a.test/cat.png", "meow", GridSize::Three).unwrap();
        Session::on_fragment_change(&encode(&config))
    }

    #[test]
    fn loader_accepts_browser_urls() {
        let mut loader = SyntaxImageLoader;
        assert!(loader.load("https://picsum.photos/400").is_ok());
        assert!(loader.load("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(loader.load("picsum.photos/400").is_err());
        let err = loader.load("ftp://files.example/cat.png").unwrap_err();
        assert_eq!(err.reason, "unsupported scheme `ftp`");
    }

    #[test]
    fn renders_board_and_hides_the_secret() {
        let mut session = session();
        session.load_image(&mut SyntaxImageLoader, &mut ScriptedMoves::new(Vec::new()));
        let lines = render_lines(&session);
        assert_eq!(lines[0], "Moves: 0");
        assert_eq!(lines[2], " 1  2    ");
        assert!(lines.iter().all(|line| !line.contains("meow")));
        assert_eq!(lines.last().map(String::as_str), Some(CONTROLS));
    }

    #[test]
    fn renders_the_secret_after_solving() {
        let mut session = session();
        session.load_image(&mut SyntaxImageLoader, &mut ScriptedMoves::new(Vec::new()));
        session.slide(Direction::Up);
        session.slide(Direction::Up);
        let lines = render_lines(&session);
        assert!(lines.contains(&"You solved it in 2 moves.".to_string()));
        assert!(lines.contains(&"meow".to_string()));
    }

    #[test]
    fn renders_image_failures() {
        let config = Configuration::new("cat.png", "meow", GridSize::Three).unwrap();
        let mut session = Session::on_fragment_change(&encode(&config));
        session.load_image(&mut SyntaxImageLoader, &mut ScriptedMoves::new(Vec::new()));
        assert_eq!(render_lines(&session)[0], "Image Error");
    }

    #[test]
    fn only_key_presses_are_read() {
        let key = |kind| {
            Event::Key(KeyEvent {
                code: KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                kind,
                state: KeyEventState::NONE,
            })
        };
        assert_eq!(pressed_key(&key(KeyEventKind::Press)), Some(KeyCode::Up));
        assert_eq!(pressed_key(&key(KeyEventKind::Release)), None);
        assert_eq!(pressed_key(&key(KeyEventKind::Repeat)), None);
        assert_eq!(pressed_key(&Event::Resize(80, 24)), None);
    }

    #[test]
    fn arrow_keys_map_to_slides() {
        assert_eq!(direction_for(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Char('x')), None);
    }
}
