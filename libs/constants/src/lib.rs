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

//! Common used constants by unitctl and uctl.

/// Default configuration file of unitctl
pub const UNITCTL_CONFIG: &str = "/etc/unitctl/unitctl.conf";

/// Control plane binary, resolved through PATH
pub const SYSTEMCTL: &str = "systemctl";

/// Journal query binary
pub const JOURNALCTL: &str = "journalctl";

/// Number of journal lines attached to a failure
pub const JOURNAL_LINES: u32 = 50;

/// Journal window attached to a failure
pub const JOURNAL_SINCE: &str = "5 minutes ago";

/// SysV policy query helper on Debian-like systems
pub const INVOKE_RC_D: &str = "/usr/sbin/invoke-rc.d";

/// Glob prefix of the SysV start links
pub const START_LINK_PREFIX: &str = "/etc/rc*.d/S??";

/// Minimal number of start links for a legacy service to count as enabled
pub const START_LINK_THRESHOLD: usize = 4;
