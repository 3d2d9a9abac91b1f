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

//! Interfaces related to the unit name.
//!

/// the suffix of service units
pub const SERVICE_SUFFIX: &str = ".service";

/// Strip the given type suffix from the unit name, if it is there.
///
/// A name consisting only of the suffix is returned unchanged.
pub fn unit_name_strip_suffix<'a>(unit_name: &'a str, suffix: &str) -> &'a str {
    match unit_name.strip_suffix(suffix) {
        Some(prefix) if !prefix.is_empty() => prefix,
        _ => unit_name,
    }
}

/// Get the bare service name, "sshd.service" and "sshd" both become "sshd".
pub fn unit_name_to_bare(unit_name: &str) -> &str {
    unit_name_strip_suffix(unit_name, SERVICE_SUFFIX)
}
