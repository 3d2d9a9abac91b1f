// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! The command execution capability: the `CommandRunner` trait the lifecycle logic is
//! written against, and `SystemRunner` spawning real processes.

use crate::error::*;
use std::io::{Read, Seek, SeekFrom};
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};

const LOCALE_VARIABLES: [&str; 4] = ["LANG", "LC_ALL", "LC_MESSAGES", "LANGUAGE"];

const SHELL: &str = "/bin/sh";

/// How a command is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// a non-zero exit status is an `Error::Execution`
    pub fail_on_fail: bool,
    /// run the command in the C locale
    pub override_locale: bool,
    /// discard the output
    pub squelch: bool,
    /// interleave stderr with stdout
    pub combine: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        ExecOptions {
            fail_on_fail: true,
            override_locale: true,
            squelch: false,
            combine: false,
        }
    }
}

/// The argument vector and options of one command, built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// program and arguments, argv[0] is looked up in PATH
    pub argv: Vec<String>,
    pub options: ExecOptions,
}

impl CommandInvocation {
    /// the command line, for messages
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    /// captured output
    pub output: String,
    /// exit status, the negated signal number when the child was killed
    pub status: i32,
}

impl ExecOutput {
    pub fn new(output: &str, status: i32) -> Self {
        ExecOutput {
            output: output.to_string(),
            status,
        }
    }

    /// exit status 0
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs host commands. The lifecycle logic only talks to processes and the filesystem
/// through this trait.
pub trait CommandRunner {
    /// Run the argument vector and capture its output.
    ///
    /// With `fail_on_fail`, a non-zero exit status is returned as `Error::Execution`.
    fn run(&self, argv: &[String], options: &ExecOptions) -> Result<ExecOutput>;

    /// Run a shell command line and return its combined output whatever its exit status.
    fn run_shell(&self, command: &str) -> Result<String>;

    /// List the paths matching the glob pattern.
    fn glob(&self, pattern: &str) -> Result<Vec<String>>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, argv: &[String], options: &ExecOptions) -> Result<ExecOutput> {
        (**self).run(argv, options)
    }

    fn run_shell(&self, command: &str) -> Result<String> {
        (**self).run_shell(command)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        (**self).glob(pattern)
    }
}

/// Turn an exit status into a number, a signal becomes its negated number.
pub fn exit_status_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => -status.signal().unwrap_or(0),
    }
}

/// Check the output against `fail_on_fail`.
pub fn check_status(command: &str, output: ExecOutput, options: &ExecOptions) -> Result<ExecOutput> {
    if options.fail_on_fail && !output.success() {
        return Err(Error::Execution {
            command: command.to_string(),
            status: output.status,
            output: output.output.trim().to_string(),
        });
    }
    Ok(output)
}

/// Runner spawning real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }

    /// The output goes to an anonymous file that is read once the child exits. A daemon
    /// left behind holding stdout or stderr does not hold up the caller.
    ///
    /// With `combine`, stderr shares the file with stdout so the messages keep their order,
    /// otherwise it is discarded.
    fn run_captured(
        mut command: Command,
        command_line: &str,
        combine: bool,
    ) -> Result<(String, ExitStatus)> {
        let mut capture = tempfile::tempfile().context(IoSnafu)?;
        command.stdout(Stdio::from(capture.try_clone().context(IoSnafu)?));
        if combine {
            command.stderr(Stdio::from(capture.try_clone().context(IoSnafu)?));
        } else {
            command.stderr(Stdio::null());
        }

        let spawned = command.spawn();
        /* Our copies of the descriptors are not needed past the spawn. */
        drop(command);
        let mut child = spawned.context(SpawnSnafu {
            command: command_line,
        })?;
        let status = child.wait().context(IoSnafu)?;

        let mut buf = Vec::new();
        capture.seek(SeekFrom::Start(0)).context(IoSnafu)?;
        capture.read_to_end(&mut buf).context(IoSnafu)?;

        Ok((String::from_utf8_lossy(&buf).to_string(), status))
    }

    fn run_squelched(mut command: Command, command_line: &str) -> Result<(String, ExitStatus)> {
        command.stdout(Stdio::null()).stderr(Stdio::null());
        let status = command.status().context(SpawnSnafu {
            command: command_line,
        })?;
        Ok((String::new(), status))
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], options: &ExecOptions) -> Result<ExecOutput> {
        let (program, args) = argv.split_first().ok_or(Error::EmptyCommand)?;
        let command_line = argv.join(" ");
        log::debug!("Executing '{}'", command_line);

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null());
        if options.override_locale {
            for var in LOCALE_VARIABLES {
                command.env(var, "C");
            }
        }

        let (output, status) = if options.squelch {
            Self::run_squelched(command, &command_line)?
        } else {
            Self::run_captured(command, &command_line, options.combine)?
        };

        let output = ExecOutput {
            output,
            status: exit_status_code(status),
        };
        log::debug!("'{}' returned {}", command_line, output.status);
        check_status(&command_line, output, options)
    }

    fn run_shell(&self, command: &str) -> Result<String> {
        if command.trim().is_empty() {
            return Err(Error::EmptyCommand);
        }
        log::debug!("Executing shell command '{}'", command);

        let mut cmd = Command::new(SHELL);
        cmd.arg("-c").arg(command).stdin(Stdio::null());
        let (output, status) = Self::run_captured(cmd, command, true)?;
        log::debug!("'{}' returned {}", command, exit_status_code(status));
        Ok(output)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        basic::glob::glob_all(pattern).context(UtilSnafu)
    }
}
