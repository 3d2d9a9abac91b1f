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

//! Failure diagnostics: when start, stop or restart fails, the recent journal of the unit
//! is fetched and folded into the raised error.
//!
//! Fetching the journal is best effort. A failed retrieval leaves the excerpt empty but
//! never hides the failure of the operation itself.

use crate::error::*;
use crate::exec::CommandRunner;
use std::borrow::Cow;
use crate::unit::{OperationKind, ServiceUnit};
use constants::{JOURNALCTL, JOURNAL_LINES, JOURNAL_SINCE};

/// The journal query attached to failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalQuery {
    binary: String,
    lines: u32,
    since: String,
}

impl Default for JournalQuery {
    fn default() -> Self {
        JournalQuery::new(JOURNALCTL, JOURNAL_LINES, JOURNAL_SINCE)
    }
}

impl JournalQuery {
    pub fn new(binary: &str, lines: u32, since: &str) -> Self {
        JournalQuery {
            binary: binary.to_string(),
            lines,
            since: since.to_string(),
        }
    }

    /// e.g. `journalctl -n 50 --since '5 minutes ago' -u sshd.service --no-pager`
    pub fn command_line(&self, unit: &ServiceUnit) -> String {
        format!(
            "{} -n {} --since '{}' -u {} --no-pager",
            self.binary,
            self.lines,
            self.since,
            shell_quote(unit.name())
        )
    }
}

/// Quote the word for `/bin/sh` unless it is made of unit name characters only.
fn shell_quote(word: &str) -> Cow<'_, str> {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@._:-".contains(c));
    if plain {
        return Cow::Borrowed(word);
    }
    Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")))
}

/// Everything the composite error is made of, alive only while composing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticBundle {
    pub operation: OperationKind,
    pub unit_name: String,
    /// display of the failure of the operation
    pub original_failure: String,
    /// empty when the journal could not be read
    pub log_excerpt: String,
}

impl DiagnosticBundle {
    /// The message downstream tooling matches on.
    pub fn message(&self) -> String {
        format!(
            "Systemd {} for {} failed:journalctl log for {}: {}",
            self.operation, self.unit_name, self.unit_name, self.log_excerpt
        )
    }
}

/// A failed operation together with what was learnt about it.
#[derive(Debug)]
pub struct Diagnosed {
    /// the failure of the operation
    pub primary: Error,
    /// the journal excerpt, None when it could not be retrieved
    pub diagnostic: Option<String>,
}

impl Diagnosed {
    /// The bundle of the composite error.
    pub fn bundle(&self, operation: OperationKind, unit: &ServiceUnit) -> DiagnosticBundle {
        DiagnosticBundle {
            operation,
            unit_name: unit.name().to_string(),
            original_failure: self.primary.to_string(),
            log_excerpt: self.diagnostic.clone().unwrap_or_default(),
        }
    }

    /// The composite error, the failure of the operation stays reachable as its source.
    pub fn into_error(self, operation: OperationKind, unit: &ServiceUnit) -> Error {
        let bundle = self.bundle(operation, unit);
        log::debug!(
            "{} {} failed: {}",
            bundle.operation,
            bundle.unit_name,
            bundle.original_failure
        );
        Error::Diagnostic {
            operation: bundle.operation.to_string(),
            unit: bundle.unit_name,
            excerpt: bundle.log_excerpt,
            source: Box::new(self.primary),
        }
    }
}

/// Attaches the journal to failures of start, stop and restart.
pub struct FailureDiagnostics<'a> {
    runner: &'a dyn CommandRunner,
    journal: &'a JournalQuery,
}

impl<'a> FailureDiagnostics<'a> {
    pub fn new(runner: &'a dyn CommandRunner, journal: &'a JournalQuery) -> Self {
        FailureDiagnostics { runner, journal }
    }

    /// Fetch the recent journal of the unit, None when that fails.
    pub fn retrieve(&self, unit: &ServiceUnit) -> Option<String> {
        let command = self.journal.command_line(unit);
        log::info!("Retrieving the journal of {}: {}", unit.name(), command);
        match self.runner.run_shell(&command) {
            Ok(output) => Some(output.trim_end().to_string()),
            Err(e) => {
                log::warn!("Failed to retrieve the journal of {}: {}", unit.name(), e);
                None
            }
        }
    }

    /// Attach the journal to the failure.
    pub fn diagnose(&self, unit: &ServiceUnit, primary: Error) -> Diagnosed {
        Diagnosed {
            diagnostic: self.retrieve(unit),
            primary,
        }
    }

    /// Pass successes through, turn execution failures into the composite error.
    ///
    /// Only start, stop and restart are wrapped, other operations surface their failures as is.
    pub fn wrap<T>(
        &self,
        operation: OperationKind,
        unit: &ServiceUnit,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Ok(v) => Ok(v),
            Err(e) if is_diagnosed(operation) && e.is_execution_failure() => {
                Err(self.diagnose(unit, e).into_error(operation, unit))
            }
            Err(e) => Err(e),
        }
    }
}

fn is_diagnosed(operation: OperationKind) -> bool {
    matches!(
        operation,
        OperationKind::Start | OperationKind::Stop | OperationKind::Restart
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExecOptions, ExecOutput};
    use std::cell::RefCell;
    use std::error::Error as _;

    struct Journal {
        output: Option<String>,
        calls: RefCell<Vec<String>>,
    }

    impl CommandRunner for Journal {
        fn run(&self, _argv: &[String], _options: &ExecOptions) -> Result<ExecOutput> {
            Ok(ExecOutput::default())
        }

        fn run_shell(&self, command: &str) -> Result<String> {
            self.calls.borrow_mut().push(command.to_string());
            match &self.output {
                Some(v) => Ok(v.clone()),
                None => Err(Error::Spawn {
                    command: command.to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }

        fn glob(&self, _pattern: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn failure() -> Error {
        Error::Execution {
            command: "/bin/systemctl start sshd.service".to_string(),
            status: 1,
            output: "Failed to start sshd.service".to_string(),
        }
    }

    #[test]
    fn test_command_line() {
        let unit = ServiceUnit::new("sshd.service");
        assert_eq!(
            JournalQuery::default().command_line(&unit),
            "journalctl -n 50 --since '5 minutes ago' -u sshd.service --no-pager"
        );
    }

    #[test]
    fn test_command_line_quotes_unit() {
        let journal = JournalQuery::default();
        let unit = ServiceUnit::new(r"foo@a\x2db.service");
        assert_eq!(
            journal.command_line(&unit),
            r"journalctl -n 50 --since '5 minutes ago' -u 'foo@a\x2db.service' --no-pager"
        );
        let unit = ServiceUnit::new("it's; rm -rf x");
        assert_eq!(
            journal.command_line(&unit),
            r"journalctl -n 50 --since '5 minutes ago' -u 'it'\''s; rm -rf x' --no-pager"
        );
        assert_eq!(shell_quote("getty@tty1.service"), "getty@tty1.service");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_command_line_through_shell() {
        let journal = JournalQuery::new("/bin/echo", 50, "5 minutes ago");
        let runner = crate::exec::SystemRunner::new();
        for name in [r"foo@a\x2db.service", "$(echo hi).service", "a b'c.service"] {
            let out = runner
                .run_shell(&journal.command_line(&ServiceUnit::new(name)))
                .unwrap();
            assert_eq!(
                out,
                format!("-n 50 --since 5 minutes ago -u {} --no-pager\n", name)
            );
        }
    }

    #[test]
    fn test_wrap_failure() {
        let runner = Journal {
            output: Some("-- Logs begin at Tue 2016-06-14 11:59:21 UTC. --\nline\n".to_string()),
            calls: RefCell::new(Vec::new()),
        };
        let journal = JournalQuery::default();
        let diag = FailureDiagnostics::new(&runner, &journal);
        let unit = ServiceUnit::new("sshd.service");

        let err = diag
            .wrap::<()>(OperationKind::Start, &unit, Err(failure()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Systemd start for sshd.service failed:journalctl log for sshd.service: -- Logs begin at Tue 2016-06-14 11:59:21 UTC. --\nline"
        );
        assert!(err
            .source()
            .unwrap()
            .to_string()
            .contains("Failed to start sshd.service"));
        assert_eq!(runner.calls.borrow().len(), 1);
    }

    #[test]
    fn test_wrap_retrieval_failure() {
        let runner = Journal {
            output: None,
            calls: RefCell::new(Vec::new()),
        };
        let journal = JournalQuery::default();
        let diag = FailureDiagnostics::new(&runner, &journal);
        let unit = ServiceUnit::new("foo");

        let err = diag
            .wrap::<()>(OperationKind::Restart, &unit, Err(failure()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Systemd restart for foo failed:journalctl log for foo: "
        );
    }

    #[test]
    fn test_wrap_pass_through() {
        let runner = Journal {
            output: Some(String::new()),
            calls: RefCell::new(Vec::new()),
        };
        let journal = JournalQuery::default();
        let diag = FailureDiagnostics::new(&runner, &journal);
        let unit = ServiceUnit::new("foo");

        assert_eq!(diag.wrap(OperationKind::Stop, &unit, Ok(7)).unwrap(), 7);

        /* not an execution failure */
        let err = diag
            .wrap::<()>(OperationKind::Stop, &unit, Err(Error::EmptyCommand))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCommand));

        /* not a diagnosed operation */
        let err = diag
            .wrap::<()>(OperationKind::Status, &unit, Err(failure()))
            .unwrap_err();
        assert!(matches!(err, Error::Execution { .. }));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_bundle() {
        let unit = ServiceUnit::new("sshd.service");
        let diagnosed = Diagnosed {
            primary: failure(),
            diagnostic: None,
        };
        let bundle = diagnosed.bundle(OperationKind::Stop, &unit);
        assert_eq!(bundle.log_excerpt, "");
        assert!(bundle.original_failure.starts_with("Execution of '/bin/systemctl start"));
        assert_eq!(
            bundle.message(),
            "Systemd stop for sshd.service failed:journalctl log for sshd.service: "
        );
    }
}
