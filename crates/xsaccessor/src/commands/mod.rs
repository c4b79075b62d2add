pub mod replay;

use crate::error::CliError;
use crate::output::{KeyAssignment, PositionAssignment, Report};
use xsaccessor_intern::InternContext;

pub use replay::{ReplayStep, parse_script, run_replay};

/// Intern each key in order.
pub fn run_keys(ctx: &InternContext, keys: &[String]) -> Report {
    Report {
        keys: keys
            .iter()
            .map(|key| KeyAssignment {
                key: key.clone(),
                id: ctx.intern_key(key),
            })
            .collect(),
        ..Report::default()
    }
}

/// Resolve each position in order. Stops at the first negative position.
pub fn run_positions(ctx: &InternContext, positions: &[i64]) -> Result<Report, CliError> {
    let mut report = Report::default();
    for &position in positions {
        report.positions.push(resolve(ctx, position)?);
    }
    Ok(report)
}

pub fn run_stats(ctx: &InternContext) -> Report {
    Report {
        stats: Some(ctx.stats()),
        ..Report::default()
    }
}

fn resolve(ctx: &InternContext, position: i64) -> Result<PositionAssignment, CliError> {
    let index = ctx.try_resolve_array_index(position)?;
    // Non-negative once resolved.
    let position = position as usize;
    Ok(PositionAssignment { position, index })
}
