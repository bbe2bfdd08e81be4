//! Trace Replay
//!
//! Line-oriented command format used by the `cache_replay` binary:
//!
//! ```text
//! # comment
//! put <key> <value...>
//! get <key>
//! stats
//! ```
//!
//! A value runs to the end of the line and may contain spaces.

use std::io::{BufRead, Write};

use anyhow::Context;
use thiserror::Error;
use tracing::debug;

use crate::cache::Cache;

// == Replay Errors ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} is missing its {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command} takes no argument after {expected}")]
    TrailingInput {
        command: &'static str,
        expected: &'static str,
    },
}

// == Command ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    Stats,
}

impl Command {
    /// Parses one trace line. Blank lines and comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ReplayError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        match verb.to_ascii_lowercase().as_str() {
            "put" => {
                let (key, value) = split_word(rest);
                if key.is_empty() {
                    return Err(ReplayError::MissingArgument {
                        command: "put",
                        argument: "key",
                    });
                }
                if value.is_empty() {
                    return Err(ReplayError::MissingArgument {
                        command: "put",
                        argument: "value",
                    });
                }
                Ok(Some(Command::Put {
                    key: key.to_string(),
                    value: value.to_string(),
                }))
            }
            "get" => {
                let (key, extra) = split_word(rest);
                if key.is_empty() {
                    return Err(ReplayError::MissingArgument {
                        command: "get",
                        argument: "key",
                    });
                }
                if !extra.is_empty() {
                    return Err(ReplayError::TrailingInput {
                        command: "get",
                        expected: "the key",
                    });
                }
                Ok(Some(Command::Get {
                    key: key.to_string(),
                }))
            }
            "stats" if rest.is_empty() => Ok(Some(Command::Stats)),
            "stats" => Err(ReplayError::TrailingInput {
                command: "stats",
                expected: "the command",
            }),
            _ => Err(ReplayError::UnknownCommand(verb.to_string())),
        }
    }

    /// Applies the command to `cache` and writes its one-line result to `out`.
    ///
    /// - `put` prints `OK`
    /// - `get` prints the value or `(miss)`
    /// - `stats` prints the statistics as JSON
    pub fn apply<W: Write>(
        self,
        cache: &mut Cache<String, String>,
        out: &mut W,
    ) -> anyhow::Result<()> {
        match self {
            Command::Put { key, value } => {
                cache.put(key, value);
                writeln!(out, "OK")?;
            }
            Command::Get { key } => match cache.get(&key) {
                Some(value) => writeln!(out, "{}", value)?,
                None => writeln!(out, "(miss)")?,
            },
            Command::Stats => {
                writeln!(out, "{}", serde_json::to_string(&cache.stats())?)?;
            }
        }
        Ok(())
    }
}

// == Replay Loop ==
/// Replays every line of `input` against `cache`, then writes the final
/// statistics as one JSON line.
///
/// Stops at the first malformed line with an error naming its line number.
/// Returns the number of commands applied.
pub fn run<R: BufRead, W: Write>(
    cache: &mut Cache<String, String>,
    input: R,
    out: &mut W,
) -> anyhow::Result<usize> {
    let mut applied = 0usize;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.context("failed to read trace")?;
        let Some(command) =
            Command::parse(&line).with_context(|| format!("line {}: invalid command", line_no))?
        else {
            continue;
        };
        debug!(line = line_no, ?command, "applying");
        command
            .apply(cache, out)
            .with_context(|| format!("line {}: failed to write result", line_no))?;
        applied += 1;
    }

    writeln!(out, "{}", serde_json::to_string(&cache.stats())?)?;
    out.flush()?;
    Ok(applied)
}

/// Splits off the first whitespace-delimited word; the remainder is trimmed.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Policy;

    fn apply_lines(cache: &mut Cache<String, String>, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            if let Some(command) = Command::parse(line).unwrap() {
                command.apply(cache, &mut out).unwrap();
            }
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_put_keeps_spaces_in_value() {
        let command = Command::parse("put greeting hello there  world").unwrap();
        assert_eq!(
            command,
            Some(Command::Put {
                key: "greeting".to_string(),
                value: "hello there  world".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_get_and_stats() {
        assert_eq!(
            Command::parse("  GET k ").unwrap(),
            Some(Command::Get {
                key: "k".to_string()
            })
        );
        assert_eq!(Command::parse("stats").unwrap(), Some(Command::Stats));
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# put a b").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("del k"),
            Err(ReplayError::UnknownCommand("del".to_string()))
        );
        assert_eq!(
            Command::parse("put"),
            Err(ReplayError::MissingArgument {
                command: "put",
                argument: "key"
            })
        );
        assert_eq!(
            Command::parse("put k"),
            Err(ReplayError::MissingArgument {
                command: "put",
                argument: "value"
            })
        );
        assert!(matches!(
            Command::parse("get a b"),
            Err(ReplayError::TrailingInput { command: "get", .. })
        ));
        assert!(matches!(
            Command::parse("stats now"),
            Err(ReplayError::TrailingInput { command: "stats", .. })
        ));
    }

    #[test]
    fn test_apply_lfu_trace() {
        let mut cache = Cache::new(2, Policy::Lfu);
        let output = apply_lines(
            &mut cache,
            &["put 1 a", "put 2 b", "get 1", "put 3 c", "get 2", "get 3"],
        );

        assert_eq!(output, "OK\nOK\na\nOK\n(miss)\nc\n");
    }

    #[test]
    fn test_apply_stats_is_json() {
        let mut cache = Cache::new(2, Policy::Lru);
        let output = apply_lines(&mut cache, &["put k v", "get k", "get x", "stats"]);

        let last = output.lines().last().unwrap();
        let json: serde_json::Value = serde_json::from_str(last).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["misses"], 1);
        assert_eq!(json["total_entries"], 1);
    }

    #[test]
    fn test_run_prints_results_then_final_stats() {
        let mut cache = Cache::new(2, Policy::Lru);
        let trace = "# warm up\nput a 1\n\nget a\nget b\n";
        let mut out = Vec::new();

        let applied = run(&mut cache, trace.as_bytes(), &mut out).unwrap();

        assert_eq!(applied, 3);
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(&lines[..3], &["OK", "1", "(miss)"]);
        assert_eq!(lines.len(), 4);

        let json: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["misses"], 1);
        assert_eq!(json["insertions"], 1);
    }

    #[test]
    fn test_run_empty_input_still_prints_stats() {
        let mut cache = Cache::new(2, Policy::Lfu);
        let mut out = Vec::new();

        let applied = run(&mut cache, "".as_bytes(), &mut out).unwrap();

        assert_eq!(applied, 0);
        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(json["total_entries"], 0);
    }

    #[test]
    fn test_run_aborts_on_malformed_line_with_line_number() {
        let mut cache = Cache::new(2, Policy::Lru);
        let trace = "put a 1\n# comment\ndel a\nput b 2\n";
        let mut out = Vec::new();

        let err = run(&mut cache, trace.as_bytes(), &mut out).unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("line 3"), "got: {}", message);
        assert!(message.contains("unknown command: del"), "got: {}", message);
        // Nothing after the bad line is applied and no final stats are written
        assert!(!cache.contains(&"b".to_string()));
        assert_eq!(String::from_utf8(out).unwrap(), "OK\n");
    }
}
