use crate::events::AppEvent;
use async_channel::Sender;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use strum::EnumString;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/radial.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Set,
    Animate,
    #[strum(serialize = "min", serialize = "minimum")]
    Min,
    #[strum(serialize = "max", serialize = "maximum")]
    Max,
    Continuous,
    Reload,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Missing argument for '{0}'")]
    MissingArgument(String),
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
    #[error("Invalid switch '{0}', expected on or off")]
    InvalidSwitch(String),
    #[error("Unexpected trailing input '{0}'")]
    Trailing(String),
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("{0} exists and is not a socket")]
    NotASocket(PathBuf),
    #[error("Failed to remove stale socket: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses one control line, e.g. `set 0.5`, `animate 40`, `max 360`,
/// `continuous off` or `reload`.
pub fn parse_command(line: &str) -> Result<AppEvent, CommandError> {
    let mut words = line.split_whitespace();
    let verb_word = words.next().ok_or(CommandError::Empty)?;
    let verb: Verb = verb_word
        .parse()
        .map_err(|_| CommandError::Unknown(verb_word.to_string()))?;

    let event = match verb {
        Verb::Reload => AppEvent::ConfigReload,
        Verb::Set => AppEvent::SetValue {
            value: number(verb_word, words.next())?,
            animated: false,
        },
        Verb::Animate => AppEvent::SetValue {
            value: number(verb_word, words.next())?,
            animated: true,
        },
        Verb::Min => AppEvent::SetMinimum(number(verb_word, words.next())?),
        Verb::Max => AppEvent::SetMaximum(number(verb_word, words.next())?),
        Verb::Continuous => AppEvent::SetContinuous(switch(verb_word, words.next())?),
    };

    match words.next() {
        Some(extra) => Err(CommandError::Trailing(extra.to_string())),
        None => Ok(event),
    }
}

fn number(verb: &str, arg: Option<&str>) -> Result<f64, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::MissingArgument(verb.to_string()))?;
    arg.parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| CommandError::InvalidNumber(arg.to_string()))
}

fn switch(verb: &str, arg: Option<&str>) -> Result<bool, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::MissingArgument(verb.to_string()))?;
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(CommandError::InvalidSwitch(arg.to_string())),
    }
}

/// Removes a socket left behind by an earlier run. Anything else at `path`
/// is left alone.
pub fn remove_stale_socket(path: &Path) -> Result<(), SocketError> {
    let metadata = match fs_err::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if !metadata.file_type().is_socket() {
        return Err(SocketError::NotASocket(path.to_path_buf()));
    }
    fs_err::remove_file(path)?;
    Ok(())
}

pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>) {
    if let Err(e) = remove_stale_socket(&socket_path) {
        log::error!("Not starting command server: {}", e);
        return;
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening for commands on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match parse_command(&line) {
                            Ok(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => log::warn!("Ignoring command '{}': {}", line.trim(), e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("radial-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            (
                "set 0.5",
                AppEvent::SetValue {
                    value: 0.5,
                    animated: false,
                },
            ),
            (
                "  ANIMATE   -3 ",
                AppEvent::SetValue {
                    value: -3.0,
                    animated: true,
                },
            ),
            ("min 10", AppEvent::SetMinimum(10.0)),
            ("maximum 360", AppEvent::SetMaximum(360.0)),
            ("continuous off", AppEvent::SetContinuous(false)),
            ("Continuous ON", AppEvent::SetContinuous(true)),
            ("reload", AppEvent::ConfigReload),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_command(line), Ok(expected), "{}", line);
        }
    }

    #[test]
    fn test_parse_command_errors() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(
            parse_command("spin 3"),
            Err(CommandError::Unknown("spin".to_string()))
        );
        assert_eq!(
            parse_command("set"),
            Err(CommandError::MissingArgument("set".to_string()))
        );
        assert_eq!(
            parse_command("set half"),
            Err(CommandError::InvalidNumber("half".to_string()))
        );
        assert_eq!(
            parse_command("set NaN"),
            Err(CommandError::InvalidNumber("NaN".to_string()))
        );
        assert_eq!(
            parse_command("continuous maybe"),
            Err(CommandError::InvalidSwitch("maybe".to_string()))
        );
        assert_eq!(
            parse_command("set 1 2"),
            Err(CommandError::Trailing("2".to_string()))
        );
    }

    #[test]
    fn test_regular_file_at_socket_path_survives() {
        let path = scratch_path("notes.txt");
        fs_err::write(&path, "important").unwrap();

        let result = remove_stale_socket(&path);

        assert!(matches!(result, Err(SocketError::NotASocket(_))));
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "important");
        fs_err::remove_file(&path).unwrap();
    }

    #[test]
    fn test_stale_socket_is_removed() {
        let path = scratch_path("stale.sock");
        let _ = fs_err::remove_file(&path);
        let listener = std::os::unix::net::UnixListener::bind(&path).unwrap();
        drop(listener);

        remove_stale_socket(&path).unwrap();

        assert!(!path.exists());
        remove_stale_socket(&path).unwrap();
    }
}
