use crate::error::{ReleaseError, Result};
use crate::process::{display_command, CommandOutput, ProcessRunner};
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

type Hook = Box<dyn Fn(&Path)>;

enum Reply {
    Output(CommandOutput),
    NotFound,
}

struct Rule {
    prefix: Vec<String>,
    reply: Reply,
    hook: Option<Hook>,
}

/// One invocation seen by a [ScriptedRunner]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
}

/// Process runner for tests: records every invocation and replays scripted
/// outputs without spawning anything.
///
/// Rules match on an argument-vector prefix; the most recently added matching
/// rule wins. Commands with no matching rule succeed with empty output.
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        ScriptedRunner {
            rules: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Reply with `stdout` and exit code 0
    pub fn respond(self, prefix: &[&str], stdout: &str) -> Self {
        self.with_rule(prefix, Reply::Output(CommandOutput::ok(stdout)), None)
    }

    /// Reply with a non-zero exit code and `stderr`
    pub fn fail(self, prefix: &[&str], exit_code: i32, stderr: &str) -> Self {
        self.with_rule(
            prefix,
            Reply::Output(CommandOutput::failed(exit_code, stderr)),
            None,
        )
    }

    /// Behave as if the program is not installed
    pub fn missing(self, prefix: &[&str]) -> Self {
        self.with_rule(prefix, Reply::NotFound, None)
    }

    /// Succeed and run `hook` with the working directory, e.g. to simulate a
    /// build tool writing artifacts
    pub fn on_run(self, prefix: &[&str], hook: impl Fn(&Path) + 'static) -> Self {
        self.with_rule(
            prefix,
            Reply::Output(CommandOutput::ok("")),
            Some(Box::new(hook)),
        )
    }

    fn with_rule(mut self, prefix: &[&str], reply: Reply, hook: Option<Hook>) -> Self {
        self.rules.push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            reply,
            hook,
        });
        self
    }

    /// All recorded invocations, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Recorded argument vectors, oldest first
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.calls.borrow().iter().map(|c| c.argv.clone()).collect()
    }

    /// Whether any invocation started with `prefix`
    pub fn was_called(&self, prefix: &[&str]) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| starts_with(&c.argv, prefix))
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn starts_with<S: AsRef<str>>(argv: &[String], prefix: &[S]) -> bool {
    argv.len() >= prefix.len()
        && argv
            .iter()
            .zip(prefix)
            .all(|(arg, expected)| arg == expected.as_ref())
}

impl ProcessRunner for ScriptedRunner {
    fn execute(&self, argv: &[String], cwd: &Path) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(RecordedCall {
            argv: argv.to_vec(),
            cwd: cwd.to_path_buf(),
        });

        let rule = self
            .rules
            .iter()
            .rev()
            .find(|rule| starts_with(argv, &rule.prefix));

        let Some(rule) = rule else {
            return Ok(CommandOutput::ok(""));
        };

        if let Some(hook) = &rule.hook {
            hook(cwd);
        }

        match &rule.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::NotFound => Err(ReleaseError::CommandNotRunnable {
                command: display_command(argv),
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
        }
    }
}
