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

//! Command resolution: which argument vector and options each operation runs.
//!
//! Caller overrides of start/stop/restart/status replace the control plane invocation
//! entirely. Resolution is total, it never fails.

use crate::exec::{CommandInvocation, ExecOptions};
use crate::unit::{OperationKind, ServiceUnit, UnitFileAction};
use constants::{INVOKE_RC_D, START_LINK_PREFIX, SYSTEMCTL};

/// options of start, stop and restart
pub const LIFECYCLE_OPTIONS: ExecOptions = ExecOptions {
    fail_on_fail: true,
    override_locale: false,
    squelch: false,
    combine: true,
};

/// options of the status query
pub const STATUS_OPTIONS: ExecOptions = ExecOptions {
    fail_on_fail: false,
    override_locale: false,
    squelch: false,
    combine: true,
};

/// options of the enabled query, everything else keeps the runner defaults
pub const ENABLED_QUERY_OPTIONS: ExecOptions = ExecOptions {
    fail_on_fail: false,
    override_locale: true,
    squelch: false,
    combine: false,
};

/// options of unmask/enable/disable/mask and of listing the unit files
pub const UNIT_FILE_OPTIONS: ExecOptions = ExecOptions {
    fail_on_fail: true,
    override_locale: true,
    squelch: false,
    combine: false,
};

/// options of the SysV policy query, only its exit status matters
pub const LEGACY_QUERY_OPTIONS: ExecOptions = ExecOptions {
    fail_on_fail: false,
    override_locale: true,
    squelch: true,
    combine: false,
};

/// Builds the command lines against one control plane binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResolver {
    control_binary: String,
    invoke_rc_d: String,
    start_link_prefix: String,
}

impl Default for CommandResolver {
    fn default() -> Self {
        CommandResolver::new(SYSTEMCTL)
    }
}

impl CommandResolver {
    /// create the resolver for the given control plane binary
    pub fn new(control_binary: &str) -> Self {
        CommandResolver {
            control_binary: control_binary.to_string(),
            invoke_rc_d: INVOKE_RC_D.to_string(),
            start_link_prefix: START_LINK_PREFIX.to_string(),
        }
    }

    /// use another SysV policy helper and start link location
    pub fn with_legacy_layout(mut self, invoke_rc_d: &str, start_link_prefix: &str) -> Self {
        self.invoke_rc_d = invoke_rc_d.to_string();
        self.start_link_prefix = start_link_prefix.to_string();
        self
    }

    /// the resolved systemctl path
    pub fn control_binary(&self) -> &str {
        &self.control_binary
    }

    /// The standard option set of the operation.
    pub fn options(operation: OperationKind) -> ExecOptions {
        match operation {
            OperationKind::Start | OperationKind::Stop | OperationKind::Restart => {
                LIFECYCLE_OPTIONS
            }
            OperationKind::Status => STATUS_OPTIONS,
            OperationKind::EnabledQuery => ENABLED_QUERY_OPTIONS,
        }
    }

    /// Resolve the operation on the unit.
    pub fn resolve(&self, operation: OperationKind, unit: &ServiceUnit) -> CommandInvocation {
        let argv = match unit.override_for(operation) {
            Some(cmd) => vec![cmd.to_string()],
            None => vec![
                self.control_binary.clone(),
                operation.subcommand().to_string(),
                unit.name().to_string(),
            ],
        };
        CommandInvocation {
            argv,
            options: Self::options(operation),
        }
    }

    /// unmask/enable/disable/mask, never overridden.
    pub fn unit_file_action(&self, action: UnitFileAction, unit: &ServiceUnit) -> CommandInvocation {
        CommandInvocation {
            argv: vec![
                self.control_binary.clone(),
                action.subcommand().to_string(),
                unit.name().to_string(),
            ],
            options: UNIT_FILE_OPTIONS,
        }
    }

    /// List all the service unit files.
    pub fn list_unit_files(&self) -> CommandInvocation {
        let mut argv = vec![self.control_binary.clone()];
        argv.extend(
            [
                "list-unit-files",
                "--type",
                "service",
                "--full",
                "--all",
                "--no-pager",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        CommandInvocation {
            argv,
            options: UNIT_FILE_OPTIONS,
        }
    }

    /// Ask the SysV policy layer whether the service may start.
    pub fn legacy_query(&self, unit: &ServiceUnit) -> CommandInvocation {
        CommandInvocation {
            argv: vec![
                self.invoke_rc_d.clone(),
                "--quiet".to_string(),
                "--query".to_string(),
                unit.bare_name().to_string(),
                "start".to_string(),
            ],
            options: LEGACY_QUERY_OPTIONS,
        }
    }

    /// The glob of the start links of the unit, built from the bare name.
    pub fn start_link_pattern(&self, unit: &ServiceUnit) -> String {
        format!("{}{}", self.start_link_prefix, unit.bare_name())
    }
}
