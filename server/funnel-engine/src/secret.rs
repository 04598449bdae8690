//! Reading secrets from the terminal without echoing them.

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// What a key press did to the secret being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
  Pending,
  Done,
  Cancelled,
}

/// Apply one key press to `secret`.
pub fn apply_key(secret: &mut String, key: KeyEvent) -> KeyOutcome {
  match key.code {
    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyOutcome::Cancelled,
    KeyCode::Esc => KeyOutcome::Cancelled,
    KeyCode::Enter => KeyOutcome::Done,
    KeyCode::Backspace => {
      secret.pop();
      KeyOutcome::Pending
    }
    KeyCode::Char(ch) => {
      secret.push(ch);
      KeyOutcome::Pending
    }
    _ => KeyOutcome::Pending,
  }
}

/// Print `prompt` on stderr and read one line from the terminal with echo off.
/// Cancelling yields an empty string.
pub fn read_hidden(prompt: &str) -> io::Result<String> {
  let mut stderr = io::stderr();
  write!(stderr, "{}", prompt)?;
  stderr.flush()?;

  enable_raw_mode()?;
  let result = read_keys();
  disable_raw_mode()?;
  writeln!(stderr)?;
  result
}

fn read_keys() -> io::Result<String> {
  let mut secret = String::new();
  loop {
    let Event::Key(key) = event::read()? else {
      continue;
    };
    if key.kind != KeyEventKind::Press {
      continue;
    }
    match apply_key(&mut secret, key) {
      KeyOutcome::Pending => {}
      KeyOutcome::Done => return Ok(secret),
      KeyOutcome::Cancelled => return Ok(String::new()),
    }
  }
}
