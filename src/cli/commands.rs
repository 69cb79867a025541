//! Interactive session commands
//!
//! One command per stdin line. Recording numbers are 1-based on the command
//! line and converted to 0-based indices here.

use thiserror::Error;

use crate::domain::recording::Duration;

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record,
    Pause,
    Stop,
    Discard,
    List,
    Play(usize),
    /// Seek the playing item, or start `index` first when given
    Seek {
        index: Option<usize>,
        position: Duration,
    },
    /// Stop playback
    Halt,
    Rename {
        index: usize,
        name: String,
    },
    Delete(usize),
    Clear,
    Search(String),
    Status,
    Help,
    Quit,
    /// Blank line
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid recording number '{0}': numbers start at 1")]
    InvalidNumber(String),

    #[error("Invalid position '{0}': use m:ss, seconds, or a duration like 1m5s")]
    InvalidPosition(String),
}

pub const HELP: &str = "\
Commands:
  record | start        start recording
  pause                 pause the recording
  stop                  stop and save the recording
  discard               drop the recording
  list                  show saved recordings
  play N                play recording N
  seek [N] TIME         jump within the playing recording (m:ss or 42s)
  halt                  stop playback
  rename N NAME         rename recording N
  delete N              delete recording N
  clear                 delete all recordings
  search [QUERY]        list recordings whose name contains QUERY
  status                show recorder and playback state
  help                  show this help
  quit | exit           leave";

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "record" | "start" => Ok(Self::Record),
            "pause" => Ok(Self::Pause),
            "stop" => Ok(Self::Stop),
            "discard" => Ok(Self::Discard),
            "list" | "ls" => Ok(Self::List),
            "play" => Ok(Self::Play(parse_number(rest, "play N")?)),
            "seek" => parse_seek(rest),
            "halt" => Ok(Self::Halt),
            "rename" => {
                let (number, name) = match rest.split_once(char::is_whitespace) {
                    Some((number, name)) => (number, name.trim()),
                    None => (rest, ""),
                };
                Ok(Self::Rename {
                    index: parse_number(number, "rename N NAME")?,
                    name: name.to_string(),
                })
            }
            "delete" | "rm" => Ok(Self::Delete(parse_number(rest, "delete N")?)),
            "clear" => Ok(Self::Clear),
            "search" | "find" => Ok(Self::Search(rest.to_string())),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// 1-based recording number to 0-based index
fn parse_number(arg: &str, usage: &'static str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber(arg.to_string())),
    }
}

fn parse_position(arg: &str) -> Result<Duration, CommandError> {
    Duration::parse_position(arg).map_err(|_| CommandError::InvalidPosition(arg.to_string()))
}

fn parse_seek(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "seek [N] TIME";
    let args: Vec<&str> = rest.split_whitespace().collect();
    match args.as_slice() {
        [position] => Ok(Command::Seek {
            index: None,
            position: parse_position(position)?,
        }),
        [number, position] => Ok(Command::Seek {
            index: Some(parse_number(number, USAGE)?),
            position: parse_position(position)?,
        }),
        _ => Err(CommandError::Usage(USAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_commands() {
        assert_eq!(Command::parse("record"), Ok(Command::Record));
        assert_eq!(Command::parse("  START "), Ok(Command::Record));
        assert_eq!(Command::parse("pause"), Ok(Command::Pause));
        assert_eq!(Command::parse("stop"), Ok(Command::Stop));
        assert_eq!(Command::parse("discard"), Ok(Command::Discard));
        assert_eq!(Command::parse("halt"), Ok(Command::Halt));
        assert_eq!(Command::parse(""), Ok(Command::Empty));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(Command::parse("play 1"), Ok(Command::Play(0)));
        assert_eq!(Command::parse("delete 3"), Ok(Command::Delete(2)));
        assert_eq!(
            Command::parse("play 0"),
            Err(CommandError::InvalidNumber("0".to_string()))
        );
        assert_eq!(
            Command::parse("play x"),
            Err(CommandError::InvalidNumber("x".to_string()))
        );
        assert_eq!(Command::parse("play"), Err(CommandError::Usage("play N")));
    }

    #[test]
    fn rename_keeps_spaces_and_allows_empty_name() {
        assert_eq!(
            Command::parse("rename 2 Guitar riff  take 2"),
            Ok(Command::Rename {
                index: 1,
                name: "Guitar riff  take 2".to_string()
            })
        );
        assert_eq!(
            Command::parse("rename 1"),
            Ok(Command::Rename {
                index: 0,
                name: String::new()
            })
        );
    }

    #[test]
    fn seek_with_and_without_number() {
        assert_eq!(
            Command::parse("seek 1:05"),
            Ok(Command::Seek {
                index: None,
                position: Duration::from_secs(65)
            })
        );
        assert_eq!(
            Command::parse("seek 2 30s"),
            Ok(Command::Seek {
                index: Some(1),
                position: Duration::from_secs(30)
            })
        );
        assert!(matches!(
            Command::parse("seek soon"),
            Err(CommandError::InvalidPosition(_))
        ));
        assert_eq!(Command::parse("seek"), Err(CommandError::Usage("seek [N] TIME")));
    }

    #[test]
    fn search_query_is_optional() {
        assert_eq!(Command::parse("search"), Ok(Command::Search(String::new())));
        assert_eq!(
            Command::parse("search Riff"),
            Ok(Command::Search("Riff".to_string()))
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
