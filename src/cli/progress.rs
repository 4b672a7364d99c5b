use std::fmt::Display;

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Failed,
    Skipped,
}

/// Numbered one-line reports for each view the run produces.
pub struct StepContext {
    step_num: usize,
    num_steps: usize,
}

impl StepContext {
    pub fn new(num_steps: usize) -> Self {
        println!("Tasks:");
        Self {
            step_num: 0,
            num_steps,
        }
    }

    pub fn report(&mut self, status: StepStatus, desc: impl Display) {
        self.step_num += 1;
        let width = format!("{}", self.num_steps).len();
        let status = match status {
            StepStatus::Done => "Done".green().bold(),
            StepStatus::Failed => "Failed".bright_white().on_red().bold(),
            StepStatus::Skipped => "Skipped".yellow().bold(),
        };
        println!(
            "  {:16} [{:width$}/{:width$}] {}",
            status, self.step_num, self.num_steps, desc
        );
    }

    /// Reports the outcome of a step and passes its result through.
    pub fn check<T, E>(&mut self, desc: impl Display, res: Result<T, E>) -> Result<T, E> {
        let status = if res.is_ok() {
            StepStatus::Done
        } else {
            StepStatus::Failed
        };
        self.report(status, desc);
        res
    }

    /// Marks every step not yet reported as skipped.
    pub fn skip_remaining(&mut self, desc: impl Display) {
        while self.step_num < self.num_steps {
            self.report(StepStatus::Skipped, &desc);
        }
    }

    pub fn done(&self) {
        println!("\nCompleted all tasks");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_counting() {
        let mut ctx = StepContext::new(3);
        let res: Result<u8, ()> = ctx.check("first", Ok(1));
        assert_eq!(res, Ok(1));
        let res: Result<u8, ()> = ctx.check("second", Err(()));
        assert!(res.is_err());
        ctx.skip_remaining("remaining views");
        assert_eq!(ctx.step_num, 3);
    }
}
