//! Runs Gherkin feature files with `cucumber`, one [`FeatureContext`] per
//! scenario.
//!
//! Every step phrase is registered for `Given`, `When` and `Then` alike, so
//! any keyword may introduce any phrase. Backgrounds, rules and scenario
//! outlines are expanded by `cucumber` before a step reaches the context.
//! Undefined steps fail the run.

use crate::{
    datatable::DataTable,
    error::Error,
    report::RunSummary,
    steps::{StepArgument, StepKind},
    FeatureContext,
};
use cucumber::{gherkin::Step, step, writer::Stats as _, World as _};
use futures::future::LocalBoxFuture;
use regex::Regex;
use std::path::Path;

/// Runs the scenarios of `path`, which may be a `.feature` file or a
/// directory of them, one after another. `new_context` builds the context
/// for every scenario.
pub fn run_feature_file<P, F>(path: P, new_context: F) -> Result<RunSummary, Error>
where
    P: AsRef<Path>,
    F: Fn() -> FeatureContext + 'static,
{
    let path = path.as_ref();
    std::fs::metadata(path)?;

    let mut cucumber = FeatureContext::cucumber();
    for kind in StepKind::ALL.iter() {
        cucumber = cucumber
            .given(Regex::new(kind.pattern())?, run_step)
            .when(Regex::new(kind.pattern())?, run_step)
            .then(Regex::new(kind.pattern())?, run_step);
    }

    let writer = futures::executor::block_on(
        cucumber
            .max_concurrent_scenarios(1)
            .before(move |feature, _rule, scenario, context| {
                tracing::info!(
                    feature = %feature.name,
                    scenario = %scenario.name,
                    "scenario started"
                );
                *context = new_context();
                Box::pin(async {})
            })
            .fail_on_skipped()
            .with_default_cli()
            .run(path.to_path_buf()),
    );

    let summary = RunSummary {
        passed_steps: writer.passed_steps(),
        skipped_steps: writer.skipped_steps(),
        failed_steps: writer.failed_steps(),
        parsing_errors: writer.parsing_errors(),
        hook_errors: writer.hook_errors(),
    };
    tracing::info!(path = %path.display(), %summary, "feature finished");

    Ok(summary)
}

fn run_step(context: &mut FeatureContext, step: step::Context) -> LocalBoxFuture<'_, ()> {
    Box::pin(async move {
        let argument = step_argument(&step.step);

        if let Err(error) = context.run_step(&step.step.value, argument) {
            tracing::debug!(%error, line = step.step.position.line, "step failed");
            // cucumber reports a panicking step as failed
            panic!("{}", error);
        }
    })
}

fn step_argument(step: &Step) -> StepArgument {
    if let Some(table) = &step.table {
        StepArgument::Table(DataTable::new(table.rows.clone()))
    } else if let Some(docstring) = &step.docstring {
        StepArgument::DocString(normalize_docstring(docstring))
    } else {
        StepArgument::None
    }
}

/// Strips the delimiter lines of a doc string, along with a content type
/// written after the opening delimiter, and removes the indentation common to
/// all non-blank lines.
fn normalize_docstring(raw: &str) -> String {
    let raw = raw.replace("\r\n", "\n");
    let content = match raw.split_once('\n') {
        Some((first, rest)) if first.trim().is_empty() || is_content_type(first.trim()) => rest,
        _ => raw.as_str(),
    };

    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.len() > 1 && lines.last().map_or(false, |line| line.trim().is_empty()) {
        lines.pop();
    }

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_content_type(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '-' | '.'))
}
