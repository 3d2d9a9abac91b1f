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

//! lookup of executables in the search path
use crate::error::*;
use crate::DEFAULT_PATH;
use nix::unistd::{access, AccessFlags};
use std::env;
use std::path::{Path, PathBuf};

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

/// Search the executable in the given colon-separated search path.
///
/// A name containing '/' is not searched, it is only checked for being executable.
pub fn find_executable_in(name: &str, search_path: &str) -> Result<PathBuf> {
    if name.is_empty() {
        return Err(Error::Invalid {
            what: "empty executable name".to_string(),
        });
    }

    if name.contains('/') {
        let path = PathBuf::from(name);
        if is_executable(&path) {
            return Ok(path);
        }
        return Err(Error::NotExisted {
            what: name.to_string(),
        });
    }

    for dir in search_path.split(':').filter(|d| !d.is_empty()) {
        let candidate = Path::new(dir).join(name);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    Err(Error::NotExisted {
        what: name.to_string(),
    })
}

/// Search the executable in $PATH, or in the default path when $PATH is unset.
pub fn find_executable(name: &str) -> Result<PathBuf> {
    let search_path = env::var("PATH").unwrap_or_else(|_| DEFAULT_PATH.to_string());
    find_executable_in(name, &search_path)
}
