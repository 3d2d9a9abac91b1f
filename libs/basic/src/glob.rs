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

//! the utils of the globbing pathnames
//!

use crate::error::*;
use crate::Error;
use libc::{glob, glob_t, globfree};
use std::ffi::{CStr, CString};

fn glob_error(pattern: &str, what: &str) -> Error {
    Error::Glob {
        pattern: pattern.to_string(),
        what: what.to_string(),
    }
}

/// Find all the path names that match the pattern, sorted as glob(3) sorts them.
///
/// No match is not an error, an empty list is returned instead.
pub fn glob_all(pattern: &str) -> Result<Vec<String>> {
    if pattern.is_empty() {
        return Err(Error::Invalid {
            what: "empty glob pattern".to_string(),
        });
    }

    let c_pattern = CString::new(pattern).context(NulSnafu)?;
    let mut pglob: glob_t = unsafe { std::mem::zeroed() };

    let ret = unsafe { glob(c_pattern.as_ptr(), 0, None, &mut pglob) };
    let result = match ret {
        0 => {
            let mut paths = Vec::with_capacity(pglob.gl_pathc as usize);
            for i in 0..pglob.gl_pathc as isize {
                let ptr = unsafe { CStr::from_ptr(*pglob.gl_pathv.offset(i)) };
                paths.push(ptr.to_string_lossy().to_string());
            }
            Ok(paths)
        }
        libc::GLOB_NOMATCH => Ok(Vec::new()),
        libc::GLOB_NOSPACE => Err(glob_error(pattern, "running out of memory")),
        libc::GLOB_ABORTED => Err(glob_error(pattern, "read error")),
        _ => Err(glob_error(pattern, "unknown error")),
    };

    unsafe { globfree(&mut pglob) };
    result
}
