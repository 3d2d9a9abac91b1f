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

//! Pure parsers of the control plane answers, one per query.

use crate::error::Result;
use crate::exec::ExecOutput;
use crate::unit::{EnableRequest, EnableState, ServiceState};
use basic::unit_name::SERVICE_SUFFIX;
use constants::START_LINK_THRESHOLD;

/// invoke-rc.d: the action is allowed
const RC_ALLOWED: [i32; 2] = [104, 106];
/// invoke-rc.d: the action is forbidden or deferred, look at the start links
const RC_CHECK_LINKS: [i32; 2] = [101, 105];

/// The first line of the output with surrounding whitespace removed.
pub fn first_line(output: &str) -> &str {
    output.trim_start().lines().next().unwrap_or("").trim()
}

/// Map `is-active` to the service state.
///
/// Any non-zero status, whatever its sign or size, means stopped.
pub fn parse_is_active(out: &ExecOutput) -> ServiceState {
    if out.success() && out.output.contains("active") {
        ServiceState::Running
    } else {
        ServiceState::Stopped
    }
}

/// Map the exit status of a caller supplied status command to the service state.
pub fn parse_status_command(out: &ExecOutput) -> ServiceState {
    if out.success() {
        ServiceState::Running
    } else {
        ServiceState::Stopped
    }
}

/// Map `is-enabled` to the enable state. The comparison is case-sensitive.
pub fn parse_is_enabled(out: &ExecOutput, request: EnableRequest) -> EnableState {
    match first_line(&out.output) {
        "enabled" | "static" if out.success() => EnableState::True,
        "masked" if request == EnableRequest::Mask => EnableState::Mask,
        _ => EnableState::False,
    }
}

/// Map the invoke-rc.d exit status to the enable state. The start links are only
/// counted when the status is not conclusive.
pub fn parse_legacy_status<F>(status: i32, start_link_count: F) -> Result<EnableState>
where
    F: FnOnce() -> Result<usize>,
{
    if RC_ALLOWED.contains(&status) {
        return Ok(EnableState::True);
    }

    if RC_CHECK_LINKS.contains(&status) {
        if start_link_count()? >= START_LINK_THRESHOLD {
            return Ok(EnableState::True);
        }
        return Ok(EnableState::False);
    }

    Ok(EnableState::False)
}

/// One line of `list-unit-files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFileEntry {
    /// unit name, with suffix
    pub name: String,
    /// state as printed by the control plane, e.g. "enabled"
    pub state: String,
}

/// Parse `list-unit-files`, only service units are kept, header and footer are skipped.
pub fn parse_unit_files(output: &str) -> Vec<UnitFileEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let state = fields.next()?;
            if !name.ends_with(SERVICE_SUFFIX) {
                return None;
            }
            Some(UnitFileEntry {
                name: name.to_string(),
                state: state.to_string(),
            })
        })
        .collect()
}
