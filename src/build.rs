//! Thin build-system wrapper sketch.
//!
//! The engine this crate is drawn from shells out to platform compilers
//! directly rather than depending on a build-orchestration crate; this
//! module documents that one vocabulary type (a compile command) without
//! reimplementing the process-spawning and project-file generation the full
//! wrapper covers.

use std::path::PathBuf;

/// A single invocation of an external compiler/linker step.
#[derive(Debug, Clone)]
pub struct CompileStep {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl CompileStep {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Builds the `std::process::Command` this step describes, without
    /// running it. Spawning is left to the caller so tests can inspect the
    /// command instead of actually invoking a compiler.
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.working_dir);
        cmd
    }
}
