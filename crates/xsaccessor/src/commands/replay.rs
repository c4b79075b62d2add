//! Replay command
//!
//! Replays a script of interning requests against one context. Each line is
//! `key <text>` or `index <position>`; blank lines and `#` comments are
//! skipped. Everything after `key ` is the key, spaces included.

use super::resolve;
use crate::error::CliError;
use crate::output::{KeyAssignment, Report};
use std::path::Path;
use tracing::{debug, info};
use xsaccessor_intern::InternContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Key(String),
    Index(i64),
}

pub fn parse_script(path: &Path, content: &str) -> Result<Vec<ReplayStep>, CliError> {
    let mut steps = Vec::new();
    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |message: String| CliError::Replay {
            path: path.to_path_buf(),
            line: number + 1,
            message,
        };

        let (verb, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
        let step = match verb {
            "key" => ReplayStep::Key(rest.to_string()),
            "index" => {
                let value = rest.trim();
                let position = value
                    .parse::<i64>()
                    .map_err(|e| fail(format!("invalid position {value:?}: {e}")))?;
                ReplayStep::Index(position)
            }
            other => return Err(fail(format!("unknown step {other:?}"))),
        };
        steps.push(step);
    }
    Ok(steps)
}

pub fn run_replay(ctx: &InternContext, path: &Path) -> Result<Report, CliError> {
    let content = std::fs::read_to_string(path)?;
    let steps = parse_script(path, &content)?;
    info!(path = %path.display(), steps = steps.len(), "replaying script");

    let mut report = Report::default();
    for step in steps {
        debug!(?step, "replay step");
        match step {
            ReplayStep::Key(key) => {
                let id = ctx.intern_key(&key);
                report.keys.push(KeyAssignment { key, id });
            }
            ReplayStep::Index(position) => {
                report.positions.push(resolve(ctx, position)?);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Vec<ReplayStep>, CliError> {
        parse_script(Path::new("script.txt"), content)
    }

    #[test]
    fn test_parse_script() {
        let steps = parse(
            "# accessor keys\n\
             key name\n\
             key full name\n\
             \n\
             index 5\n\
             index   2 \n",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                ReplayStep::Key("name".to_string()),
                ReplayStep::Key("full name".to_string()),
                ReplayStep::Index(5),
                ReplayStep::Index(2),
            ]
        );
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(parse("key\n").unwrap(), vec![ReplayStep::Key(String::new())]);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse("key a\nindex five\n").unwrap_err();
        match err {
            CliError::Replay { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("five"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_step() {
        let err = parse("drop name\n").unwrap_err();
        assert!(err.to_string().contains("unknown step \"drop\""));
    }

    #[test]
    fn test_run_replay() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("script.txt");
        std::fs::write(&path, "key name\nkey age\nkey name\nindex 5\nindex 2\nindex 5\n")?;

        let ctx = InternContext::new();
        let report = run_replay(&ctx, &path)?;
        let ids: Vec<u32> = report.keys.iter().map(|k| k.id.as_u32()).collect();
        let indices: Vec<u32> = report.positions.iter().map(|p| p.index.as_u32()).collect();
        assert_eq!(ids, vec![0, 1, 0]);
        assert_eq!(indices, vec![0, 1, 0]);
        assert_eq!(ctx.stats().position_slots, 6);
        Ok(())
    }
}
