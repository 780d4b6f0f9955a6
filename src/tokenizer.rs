//! Splits `d` attribute text into command tokens.
//!
//! Every command letter opens a new token; the numbers that follow it, up to
//! the next letter, become that token's arguments. Numbers may be separated by
//! whitespace or commas, or packed together the way SVG allows (`10-5`,
//! `.5.5`, `1e-3`).

use crate::error::PathCommandError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicTo,
    SmoothCubicTo,
    QuadraticTo,
    SmoothQuadraticTo,
    ArcTo,
    ClosePath,
}

impl CommandKind {
    pub fn from_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::HorizontalLineTo,
            'V' => CommandKind::VerticalLineTo,
            'C' => CommandKind::CubicTo,
            'S' => CommandKind::SmoothCubicTo,
            'Q' => CommandKind::QuadraticTo,
            'T' => CommandKind::SmoothQuadraticTo,
            'A' => CommandKind::ArcTo,
            'Z' => CommandKind::ClosePath,
            _ => return None,
        };
        Some(kind)
    }

    /// Number of arguments consumed per coordinate group.
    pub fn group_size(&self) -> usize {
        match self {
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadraticTo => 2,
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => 1,
            CommandKind::CubicTo => 6,
            CommandKind::SmoothCubicTo | CommandKind::QuadraticTo => 4,
            CommandKind::ArcTo => 7,
            CommandKind::ClosePath => 0,
        }
    }

    pub fn is_cubic(&self) -> bool {
        matches!(self, CommandKind::CubicTo | CommandKind::SmoothCubicTo)
    }

    pub fn is_quadratic(&self) -> bool {
        matches!(self, CommandKind::QuadraticTo | CommandKind::SmoothQuadraticTo)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub kind: CommandKind,
    pub relative: bool,
    pub args: Vec<f32>,
}

impl PathCommand {
    /// Check that the arguments split evenly into coordinate groups.
    pub fn check_arity(&self) -> Result<(), PathCommandError> {
        let size = self.kind.group_size();
        let ok = if size == 0 {
            self.args.is_empty()
        } else {
            !self.args.is_empty() && self.args.len() % size == 0
        };
        if ok {
            Ok(())
        } else {
            Err(PathCommandError::BadArity {
                command: self.kind,
                expected: size,
                found: self.args.len(),
            })
        }
    }

    /// Argument groups in order. Empty for `ClosePath`.
    pub fn groups(&self) -> impl Iterator<Item = &[f32]> {
        self.args.chunks_exact(self.kind.group_size().max(1))
    }
}

pub fn tokenize(data: &str) -> Result<Vec<PathCommand>, PathCommandError> {
    let bytes = data.as_bytes();
    let mut commands = Vec::new();
    let mut current: Option<PathCommand> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0c | b',' => i += 1,
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                let end = if expects_arc_flag(current.as_ref()) && (b == b'0' || b == b'1') {
                    i + 1
                } else {
                    scan_number(bytes, i)
                };
                let text = &data[i..end];
                let value = text
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| PathCommandError::InvalidNumber {
                        text: text.to_string(),
                        offset: i,
                    })?;
                match current.as_mut() {
                    Some(cmd) => cmd.args.push(value),
                    None => return Err(PathCommandError::DataBeforeCommand { offset: i }),
                }
                i = end;
            }
            _ if b.is_ascii_alphabetic() => {
                let letter = b as char;
                let kind = CommandKind::from_letter(letter)
                    .ok_or(PathCommandError::UnknownCommand { letter, offset: i })?;
                if let Some(cmd) = current.take() {
                    commands.push(cmd);
                }
                current = Some(PathCommand {
                    kind,
                    relative: letter.is_ascii_lowercase(),
                    args: Vec::new(),
                });
                i += 1;
            }
            _ => {
                let text = data[i..].chars().next().map(String::from).unwrap_or_default();
                return Err(PathCommandError::InvalidNumber { text, offset: i });
            }
        }
    }

    if let Some(cmd) = current {
        commands.push(cmd);
    }
    Ok(commands)
}

/// Arc flags are single `0`/`1` characters and may be packed against the
/// next number (`a5 5 0 0110 0`).
fn expects_arc_flag(current: Option<&PathCommand>) -> bool {
    current.is_some_and(|cmd| {
        cmd.kind == CommandKind::ArcTo && matches!(cmd.args.len() % 7, 3 | 4)
    })
}

/// Returns the end of the number starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();
    let mut i = start;
    if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut seen_dot = false;
    while i < len {
        match bytes[i] {
            b'0'..=b'9' => i += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
            }
            _ => break,
        }
    }
    // Exponent only counts when digits follow it.
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < len && bytes[j].is_ascii_digit() {
            while j < len && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}
