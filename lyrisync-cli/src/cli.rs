//! Command-line argument parsing.

use crate::error::CliError;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: lyrisync <command> [args]

Commands:
  split   <lyrics.txt>                         Print the numbered lyric lines
  inspect <file.lrc>                           Print the parsed document as JSON
  shift   <file.lrc> <seconds>                 Apply a global delay and print the result
  nudge   <file.lrc> <forward|backward> [n]    Nudge every marker n times (default 1)
  at      <file.lrc> <time>...                 Print the active line at each playback time
  tap     <lyrics.txt> <time>...               Mark lines in order at the given times
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Split { path: PathBuf },
    Inspect { path: PathBuf },
    Shift { path: PathBuf, seconds: f64 },
    Nudge {
        path: PathBuf,
        direction: NudgeDirection,
        count: u32,
    },
    At { path: PathBuf, times: Vec<f64> },
    Tap { path: PathBuf, times: Vec<f64> },
}

/// Parse arguments (without the program name) into a command
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let name = args
        .next()
        .ok_or_else(|| CliError::Usage("Missing command".to_string()))?;
    let path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| CliError::Usage(format!("Missing file for `{name}`")))?;
    let rest: Vec<String> = args.collect();

    let command = match name.as_str() {
        "split" => Command::Split { path },
        "inspect" => Command::Inspect { path },
        "shift" => {
            let [seconds] = rest.as_slice() else {
                return Err(CliError::Usage("`shift` takes exactly one offset".to_string()));
            };
            Command::Shift {
                path,
                seconds: parse_seconds("seconds", seconds)?,
            }
        }
        "nudge" => {
            let (direction, count) = match rest.as_slice() {
                [direction] => (direction, None),
                [direction, count] => (direction, Some(count)),
                _ => {
                    return Err(CliError::Usage(
                        "`nudge` takes a direction and an optional count".to_string(),
                    ))
                }
            };
            let direction = match direction.as_str() {
                "forward" => NudgeDirection::Forward,
                "backward" => NudgeDirection::Backward,
                other => {
                    return Err(CliError::Usage(format!("Unknown nudge direction `{other}`")))
                }
            };
            let count = match count {
                Some(count) => count.parse().map_err(|_| CliError::InvalidNumber {
                    arg: "count",
                    value: count.clone(),
                })?,
                None => 1,
            };
            Command::Nudge {
                path,
                direction,
                count,
            }
        }
        "at" | "tap" => {
            if rest.is_empty() {
                return Err(CliError::Usage(format!("`{name}` needs at least one time")));
            }
            let times = rest
                .iter()
                .map(|value| parse_seconds("time", value))
                .collect::<Result<Vec<_>, _>>()?;
            if name == "at" {
                Command::At { path, times }
            } else {
                Command::Tap { path, times }
            }
        }
        other => return Err(CliError::Usage(format!("Unknown command `{other}`"))),
    };

    Ok(command)
}

fn parse_seconds(arg: &'static str, value: &str) -> Result<f64, CliError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite())
        .ok_or_else(|| CliError::InvalidNumber {
            arg,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, CliError> {
        parse_args(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn test_parse_shift() {
        let command = parse(&["shift", "song.lrc", "-1.5"]).unwrap();
        assert_eq!(
            command,
            Command::Shift {
                path: PathBuf::from("song.lrc"),
                seconds: -1.5
            }
        );
    }

    #[test]
    fn test_parse_nudge_default_count() {
        let command = parse(&["nudge", "song.lrc", "backward"]).unwrap();
        assert_eq!(
            command,
            Command::Nudge {
                path: PathBuf::from("song.lrc"),
                direction: NudgeDirection::Backward,
                count: 1
            }
        );
    }

    #[test]
    fn test_parse_nudge_count() {
        let command = parse(&["nudge", "song.lrc", "forward", "3"]).unwrap();
        assert!(matches!(command, Command::Nudge { count: 3, .. }));
    }

    #[test]
    fn test_parse_times() {
        let command = parse(&["at", "song.lrc", "0.5", "1", "2.75"]).unwrap();
        assert_eq!(
            command,
            Command::At {
                path: PathBuf::from("song.lrc"),
                times: vec![0.5, 1.0, 2.75]
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(&[]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["split"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["bogus", "x"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["tap", "a.txt"]), Err(CliError::Usage(_))));
        assert!(matches!(
            parse(&["nudge", "a.lrc", "sideways"]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse(&["shift", "a.lrc", "soon"]),
            Err(CliError::InvalidNumber { arg: "seconds", .. })
        ));
        assert!(matches!(
            parse(&["at", "a.lrc", "NaN"]),
            Err(CliError::InvalidNumber { arg: "time", .. })
        ));
    }
}
