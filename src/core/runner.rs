use std::future::Future;

use log::{debug, warn};
use tokio::process::Command;

use crate::types::{AppError, AppResult};

/// What a single invocation of the mutation tool should cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunScope {
    /// Every class in the project, producing the top-level report
    Project,
    /// One test class, producing the report under its own directory
    TestClass(String),
}

impl RunScope {
    pub fn args(&self) -> Vec<String> {
        match self {
            RunScope::Project => vec![],
            RunScope::TestClass(name) => vec![name.clone()],
        }
    }
}

/// Something that can (re)generate mutation reports on disk
pub trait MutationRunner {
    /// Run the tool for `scope` and wait for it to finish.
    ///
    /// A failing tool is not an error here: whether a usable report exists is
    /// decided when the report is read.
    fn run(&self, scope: &RunScope) -> impl Future<Output = AppResult<()>>;

    /// Shell command that reproduces `run(scope)`, shown to the user on failure
    fn command_line(&self, scope: &RunScope) -> String;
}

/// Runs the PIT command line (`pitest` by default) as a child process
#[derive(Debug, Clone)]
pub struct PitestRunner {
    program: String,
    base_args: Vec<String>,
}

impl PitestRunner {
    /// Build a runner from a command line such as `pitest` or `mvn -q pitest`
    pub fn new(cmd: &str) -> AppResult<Self> {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| AppError::Custom("Mutation tool command is empty".to_string()))?;
        Ok(Self {
            program,
            base_args: parts.collect(),
        })
    }
}

impl MutationRunner for PitestRunner {
    async fn run(&self, scope: &RunScope) -> AppResult<()> {
        let command_line = self.command_line(scope);
        debug!("Running: {command_line}");

        let output = match Command::new(&self.program)
            .args(&self.base_args)
            .args(scope.args())
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to start '{command_line}': {e}");
                return Ok(());
            }
        };

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("  {line}");
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!("  {line}");
        }

        if !output.status.success() {
            warn!("'{command_line}' exited with {}", output.status);
        }
        Ok(())
    }

    fn command_line(&self, scope: &RunScope) -> String {
        std::iter::once(self.program.clone())
            .chain(self.base_args.iter().cloned())
            .chain(scope.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_appends_the_test_class() {
        let runner = PitestRunner::new("mvn -q pitest").unwrap();
        assert_eq!(runner.command_line(&RunScope::Project), "mvn -q pitest");
        assert_eq!(
            runner.command_line(&RunScope::TestClass("FooTest".to_string())),
            "mvn -q pitest FooTest"
        );
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(PitestRunner::new("  ").is_err());
    }

    #[tokio::test]
    async fn missing_program_is_not_fatal() {
        let runner = PitestRunner::new("sharpen-no-such-program-xyz").unwrap();
        assert!(runner.run(&RunScope::Project).await.is_ok());
    }
}
