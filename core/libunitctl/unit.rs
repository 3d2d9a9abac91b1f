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

//! The unit descriptor handed in by the caller, and the states derived from the control plane.

use basic::unit_name::unit_name_to_bare;
use std::fmt;
use std::str::FromStr;

/// Operations that are resolved to a command line, possibly overridden by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// start the unit
    Start,
    /// stop the unit
    Stop,
    /// restart the unit
    Restart,
    /// query whether the unit is active
    Status,
    /// query whether the unit is enabled
    EnabledQuery,
}

impl OperationKind {
    /// the control plane subcommand of the operation
    pub fn subcommand(&self) -> &'static str {
        match self {
            OperationKind::Start => "start",
            OperationKind::Stop => "stop",
            OperationKind::Restart => "restart",
            OperationKind::Status => "is-active",
            OperationKind::EnabledQuery => "is-enabled",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Start => "start",
            OperationKind::Stop => "stop",
            OperationKind::Restart => "restart",
            OperationKind::Status => "status",
            OperationKind::EnabledQuery => "enabled",
        };
        write!(f, "{}", name)
    }
}

/// Unit file actions, always issued through the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFileAction {
    Unmask,
    Enable,
    Disable,
    Mask,
}

impl UnitFileAction {
    /// the control plane subcommand of the action
    pub fn subcommand(&self) -> &'static str {
        match self {
            UnitFileAction::Unmask => "unmask",
            UnitFileAction::Enable => "enable",
            UnitFileAction::Disable => "disable",
            UnitFileAction::Mask => "mask",
        }
    }
}

/// What the caller asks the enable state to be, only consulted to tell a masked unit
/// apart from a disabled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnableRequest {
    #[default]
    Default,
    False,
    Mask,
}

impl FromStr for EnableRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" | "true" => Ok(EnableRequest::Default),
            "false" => Ok(EnableRequest::False),
            "mask" => Ok(EnableRequest::Mask),
            _ => Err(format!("invalid enable request '{}'", s)),
        }
    }
}

/// Result of the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// is-active reported the unit active
    Running,
    Stopped,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Running => write!(f, "running"),
            ServiceState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Result of the enabled query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableState {
    True,
    False,
    Mask,
}

impl fmt::Display for EnableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnableState::True => write!(f, "true"),
            EnableState::False => write!(f, "false"),
            EnableState::Mask => write!(f, "mask"),
        }
    }
}

/// Commands supplied by the caller in place of the control plane invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// replaces `systemctl start`
    pub start: Option<String>,
    /// replaces `systemctl stop`
    pub stop: Option<String>,
    /// replaces `systemctl restart`
    pub restart: Option<String>,
    /// replaces `systemctl is-active`, only its exit status counts
    pub status: Option<String>,
}

impl Overrides {
    /// The override of the operation, empty commands count as absent.
    pub fn get(&self, operation: OperationKind) -> Option<&str> {
        let cmd = match operation {
            OperationKind::Start => &self.start,
            OperationKind::Stop => &self.stop,
            OperationKind::Restart => &self.restart,
            OperationKind::Status => &self.status,
            OperationKind::EnabledQuery => return None,
        };
        cmd.as_deref().filter(|c| !c.is_empty())
    }
}

/// One manageable unit. Name and overrides are fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    name: String,
    overrides: Overrides,
    enable_request: EnableRequest,
}

impl ServiceUnit {
    /// create the unit descriptor without overrides
    pub fn new(name: &str) -> Self {
        ServiceUnit {
            name: name.to_string(),
            overrides: Overrides::default(),
            enable_request: EnableRequest::Default,
        }
    }

    /// set the overrides at construction
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// set the enable request at construction
    pub fn with_enable_request(mut self, enable_request: EnableRequest) -> Self {
        self.enable_request = enable_request;
        self
    }

    /// the unit name as the caller gave it
    pub fn name(&self) -> &str {
        &self.name
    }

    /// the unit name without the ".service" suffix
    pub fn bare_name(&self) -> &str {
        unit_name_to_bare(&self.name)
    }

    /// the caller supplied command of the operation, if any
    pub fn override_for(&self, operation: OperationKind) -> Option<&str> {
        self.overrides.get(operation)
    }

    pub fn enable_request(&self) -> EnableRequest {
        self.enable_request
    }
}
