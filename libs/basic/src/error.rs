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

//! error definitions
use nix::errno::Errno;
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;

#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("NulError: '{}'", source))]
    NulError { source: std::ffi::NulError },

    #[snafu(display("Glob '{}' failed: {}", pattern, what))]
    Glob { pattern: String, what: String },

    #[snafu(display("Not exist: '{}'.", what))]
    NotExisted { what: String },

    #[snafu(display("Invalid: '{}'.", what))]
    Invalid { what: String },
}

impl Error {
    /// Translate the basic error to error number.
    pub fn get_errno(&self) -> i32 {
        match self {
            Error::NulError { source: _ } => Errno::EINVAL as i32,
            Error::Glob { .. } => Errno::EIO as i32,
            Error::NotExisted { what: _ } => Errno::ENOENT as i32,
            Error::Invalid { what: _ } => Errno::EINVAL as i32,
        }
    }
}

/// Result of the basic helpers
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn nul_error() -> Error {
        std::ffi::CString::new("/etc/\0rc")
            .context(NulSnafu)
            .unwrap_err()
    }

    #[test]
    fn test_get_errno() {
        let e = Error::NotExisted {
            what: "systemctl".to_string(),
        };
        assert_eq!(e.get_errno(), Errno::ENOENT as i32);

        let e = nul_error();
        assert_eq!(e.get_errno(), Errno::EINVAL as i32);
    }

    #[test]
    fn test_display() {
        let e = Error::Glob {
            pattern: "/etc/rc*.d/S??sshd".to_string(),
            what: "read error".to_string(),
        };
        assert_eq!(e.to_string(), "Glob '/etc/rc*.d/S??sshd' failed: read error");
    }
}
