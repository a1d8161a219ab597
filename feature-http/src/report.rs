use std::fmt::{self, Display};

/// Step counts of a finished run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub passed_steps: usize,
    pub skipped_steps: usize,
    pub failed_steps: usize,
    pub parsing_errors: usize,
    pub hook_errors: usize,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.failed_steps == 0
            && self.skipped_steps == 0
            && self.parsing_errors == 0
            && self.hook_errors == 0
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps ({} passed, {} skipped, {} failed)",
            self.passed_steps + self.skipped_steps + self.failed_steps,
            self.passed_steps,
            self.skipped_steps,
            self.failed_steps
        )?;

        if self.parsing_errors > 0 {
            write!(f, ", {} parsing errors", self.parsing_errors)?;
        }
        if self.hook_errors > 0 {
            write!(f, ", {} hook errors", self.hook_errors)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RunSummary { passed_steps: 7, ..RunSummary::default() }, true)]
    #[case(RunSummary { passed_steps: 3, failed_steps: 1, ..RunSummary::default() }, false)]
    #[case(RunSummary { skipped_steps: 1, ..RunSummary::default() }, false)]
    #[case(RunSummary { parsing_errors: 1, ..RunSummary::default() }, false)]
    fn any_problem_fails_the_run(#[case] summary: RunSummary, #[case] passed: bool) {
        assert_eq!(summary.passed(), passed);
    }

    #[test]
    fn summarises_step_counts() {
        let summary = RunSummary {
            passed_steps: 5,
            skipped_steps: 1,
            failed_steps: 2,
            parsing_errors: 1,
            hook_errors: 0,
        };

        assert_eq!(
            summary.to_string(),
            "8 steps (5 passed, 1 skipped, 2 failed), 1 parsing errors"
        );
    }
}
