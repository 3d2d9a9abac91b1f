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

//! This crate provides common, functions for unit tests
use std::{
    env, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

/// get the source project root path
pub fn get_project_root() -> io::Result<PathBuf> {
    let path = env::current_dir()?;
    let mut current_path = Some(path.as_path());

    while let Some(p) = current_path {
        let has_cargo = p.read_dir()?.any(|p| {
            if let Ok(entry) = p {
                entry.file_name().eq("Cargo.lock")
            } else {
                false
            }
        });

        if has_cargo {
            return Ok(p.into());
        }

        current_path = p.parent();
    }

    Err(io::Error::new(ErrorKind::NotFound, "NotFound"))
}

/// get the crate root path
pub fn get_crate_root() -> io::Result<PathBuf> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Ok(PathBuf::from(manifest_dir))
}

/// Lay out SysV start links "rcN.d/S20<name>" below root, one per runlevel.
///
/// Returns the glob prefix matching the created links, to be followed by the service name.
pub fn create_start_links(root: &Path, name: &str, runlevels: &[u8]) -> io::Result<String> {
    for level in 0..=6u8 {
        fs::create_dir_all(root.join(format!("rc{}.d", level)))?;
    }
    for level in runlevels {
        let link = root.join(format!("rc{}.d", level)).join(format!("S20{}", name));
        fs::write(link, b"")?;
    }
    Ok(format!("{}/rc*.d/S??", root.to_string_lossy()))
}
