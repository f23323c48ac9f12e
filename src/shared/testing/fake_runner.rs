use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use crate::shared::command::{CommandOutput, CommandRunner};

/// Successful output with the given stdout.
pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Failed output with the given exit code and stderr.
pub fn fail(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Scripted [`CommandRunner`].
///
/// Responses are keyed by the full command line (`"git status --porcelain=v1 -z"`).
/// Several responses for the same line are returned in order; the last one
/// is repeated for any further call. Unscripted commands succeed with empty
/// output.
#[derive(Default)]
pub struct FakeRunner {
    responses: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    calls: RefCell<Vec<String>>,
    invocations: RefCell<Vec<(String, Vec<String>)>>,
    available: HashSet<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline for a repository checked out on `branch` with a single
    /// `origin` remote, a clean tree and no upstream.
    pub fn on_branch(branch: &str) -> Self {
        Self::new()
            .on("git rev-parse --is-inside-work-tree", ok("true\n"))
            .on("git symbolic-ref --quiet --short HEAD", ok(&format!("{branch}\n")))
            .on("git remote", ok("origin\n"))
            .on(
                "git rev-parse --abbrev-ref --symbolic-full-name @{u}",
                fail(128, "fatal: no upstream configured"),
            )
    }

    /// Queue a response for a command line.
    pub fn on(self, command_line: &str, output: CommandOutput) -> Self {
        self.responses
            .borrow_mut()
            .entry(command_line.to_string())
            .or_default()
            .push_back(output);
        self
    }

    /// Replace any queued responses for a command line.
    pub fn set(self, command_line: &str, output: CommandOutput) -> Self {
        self.responses
            .borrow_mut()
            .insert(command_line.to_string(), VecDeque::from([output]));
        self
    }

    /// Mark a program as present on PATH.
    pub fn with_tool(mut self, program: &str) -> Self {
        self.available.insert(program.to_string());
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Program and arguments of the latest call, as passed to the runner.
    pub fn last_invocation(&self) -> Option<(String, Vec<String>)> {
        self.invocations.borrow().last().cloned()
    }

    pub fn was_called(&self, command_line: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command_line)
    }

    /// Whether any call starts with `prefix`.
    pub fn was_called_with_prefix(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    /// Position of the first call equal to `command_line`.
    pub fn position(&self, command_line: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == command_line)
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str], _cwd: &Path) -> std::io::Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());
        self.invocations.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));

        let mut responses = self.responses.borrow_mut();
        let output = match responses.get_mut(&line) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => ok(""),
        };
        Ok(output)
    }

    fn is_available(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_responses_are_returned_in_order_and_last_repeats() {
        let runner = FakeRunner::new()
            .on("git status", ok("first"))
            .on("git status", ok("second"));
        let cwd = Path::new("/");

        assert_eq!(runner.run("git", &["status"], cwd).unwrap().stdout, "first");
        assert_eq!(runner.run("git", &["status"], cwd).unwrap().stdout, "second");
        assert_eq!(runner.run("git", &["status"], cwd).unwrap().stdout, "second");
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn unscripted_commands_succeed_empty() {
        let runner = FakeRunner::new();
        let output = runner.run("git", &["push"], Path::new("/")).unwrap();
        assert!(output.success());
        assert!(output.stdout.is_empty());
        assert!(runner.was_called("git push"));
    }
}
