use std::fmt;

use services::SessionIntent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    UnknownCommand(String),
    MissingIndex,
    InvalidIndex(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "empty command"),
            InputError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            InputError::MissingIndex => write!(f, "jump requires a question number"),
            InputError::InvalidIndex(raw) => write!(f, "invalid question number: {raw}"),
        }
    }
}

impl std::error::Error for InputError {}

/// Map one line of terminal input to an intent.
///
/// `jump` takes a 1-based question number, as shown on screen.
pub fn parse_intent(line: &str) -> Result<SessionIntent, InputError> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd.to_ascii_lowercase().as_str() {
        "" => Err(InputError::Empty),
        "start" | "s" => Ok(SessionIntent::Start),
        "pause" => Ok(SessionIntent::Pause),
        "resume" => Ok(SessionIntent::Resume),
        "p" => Ok(SessionIntent::TogglePause),
        "next" | "n" => Ok(SessionIntent::Next),
        "prev" | "previous" | "b" => Ok(SessionIntent::Previous),
        "end" | "quit" | "q" => Ok(SessionIntent::End),
        "jump" | "j" => {
            if rest.is_empty() {
                return Err(InputError::MissingIndex);
            }
            let number: usize = rest
                .parse()
                .map_err(|_| InputError::InvalidIndex(rest.to_string()))?;
            number
                .checked_sub(1)
                .map(SessionIntent::JumpTo)
                .ok_or_else(|| InputError::InvalidIndex(rest.to_string()))
        }
        "answer" | "a" => Ok(SessionIntent::RecordAnswer(rest.to_string())),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
