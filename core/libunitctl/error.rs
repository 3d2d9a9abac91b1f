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

//! Error define, the library uses this single Error, the command runner, the lifecycle
//! executor and the failure diagnostics all return it.

pub use nix::errno::Errno;
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;

/// unitctl Error:
/// failures of the controlled commands, plus the errors inherited from the underlying
/// crates (basic, io, confique).
#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    /// The command exited with a non-zero status while failing on failure was requested.
    #[snafu(display("Execution of '{}' returned {}: {}", command, status, output))]
    Execution {
        command: String,
        status: i32,
        output: String,
    },

    /// start/stop/restart failed, the recent journal of the unit is attached.
    #[snafu(display(
        "Systemd {} for {} failed:journalctl log for {}: {}",
        operation,
        unit,
        unit,
        excerpt
    ))]
    Diagnostic {
        operation: String,
        unit: String,
        excerpt: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to spawn '{}': {}", command, source))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("Empty command line"))]
    EmptyCommand,

    #[snafu(display("IoError(unitctl): {}", source))]
    Io { source: std::io::Error },

    #[snafu(display("UtilError(unitctl): {}", source))]
    Util { source: basic::Error },

    #[snafu(display("Confique error: {}", source))]
    Confique { source: confique::Error },

    #[snafu(display("Invalid configuration: '{}'.", what))]
    InvalidConfig { what: String },
}

impl Error {
    /// Whether the error means the command itself failed, which is what the failure
    /// diagnostics attach the journal to.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Error::Execution { .. } | Error::Spawn { .. })
    }

    /// Translate the error to error number.
    pub fn get_errno(&self) -> i32 {
        match self {
            Error::Execution { .. } => Errno::EIO as i32,
            Error::Diagnostic { .. } => Errno::EIO as i32,
            Error::Spawn { source, .. } => source.raw_os_error().unwrap_or(Errno::ENOENT as i32),
            Error::EmptyCommand => Errno::EINVAL as i32,
            Error::Io { source } => source.raw_os_error().unwrap_or_default(),
            Error::Util { source } => source.get_errno(),
            Error::Confique { .. } => Errno::EINVAL as i32,
            Error::InvalidConfig { .. } => Errno::EINVAL as i32,
        }
    }
}

impl From<basic::Error> for Error {
    fn from(source: basic::Error) -> Self {
        Error::Util { source }
    }
}

/// Result of unitctl
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_execution_display() {
        let e = Error::Execution {
            command: "/bin/systemctl start sshd.service".to_string(),
            status: 1,
            output: "Failed to start sshd.service".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Execution of '/bin/systemctl start sshd.service' returned 1: Failed to start sshd.service"
        );
        assert!(e.is_execution_failure());
        assert_eq!(e.get_errno(), Errno::EIO as i32);
    }

    #[test]
    fn test_diagnostic_keeps_source() {
        let e = Error::Diagnostic {
            operation: "stop".to_string(),
            unit: "foo".to_string(),
            excerpt: String::new(),
            source: Box::new(Error::EmptyCommand),
        };
        assert_eq!(
            e.to_string(),
            "Systemd stop for foo failed:journalctl log for foo: "
        );
        assert_eq!(e.source().unwrap().to_string(), "Empty command line");
        assert!(!e.is_execution_failure());
    }

    #[test]
    fn test_util_errno() {
        let e: Error = basic::Error::NotExisted {
            what: "systemctl".to_string(),
        }
        .into();
        assert_eq!(e.get_errno(), Errno::ENOENT as i32);
    }
}
