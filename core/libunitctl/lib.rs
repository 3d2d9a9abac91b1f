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

//! unitctl manages the lifecycle of service units through systemctl.
//!
//! When start, stop or restart fails, the recent journal of the unit is retrieved and
//! attached to the raised error, so the caller sees why the unit failed instead of a
//! bare exit status.
pub mod config;
pub mod diagnostics;
pub mod enablement;
pub mod error;
pub mod exec;
pub mod executor;
pub mod parse;
pub mod provider;
pub mod resolver;
pub mod unit;

pub use error::{Error, Result};
pub use exec::{CommandInvocation, CommandRunner, ExecOptions, ExecOutput, SystemRunner};
pub use provider::Provider;
pub use unit::{EnableRequest, EnableState, OperationKind, Overrides, ServiceState, ServiceUnit};
