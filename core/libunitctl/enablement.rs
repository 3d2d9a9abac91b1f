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

//! Selection of the enablement check, made once per target system.

use crate::error::*;
use crate::executor::LifecycleExecutor;
use crate::unit::{EnableState, ServiceUnit};
use std::fmt;
use std::str::FromStr;

/// Answers whether a unit is enabled.
pub trait EnablementCheck {
    /// name used in the configuration
    fn name(&self) -> &'static str;

    /// The enable state of the unit.
    fn check(&self, executor: &LifecycleExecutor, unit: &ServiceUnit) -> Result<EnableState>;
}

/// The native `is-enabled` query.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCheck;

impl EnablementCheck for NativeCheck {
    fn name(&self) -> &'static str {
        "native"
    }

    fn check(&self, executor: &LifecycleExecutor, unit: &ServiceUnit) -> Result<EnableState> {
        executor.enabled_query(unit)
    }
}

/// invoke-rc.d and the SysV start links, for init systems without `is-enabled`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyCheck;

impl EnablementCheck for LegacyCheck {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn check(&self, executor: &LifecycleExecutor, unit: &ServiceUnit) -> Result<EnableState> {
        executor.legacy_enabled_query(unit)
    }
}

/// The configured kind of enablement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnablementStrategy {
    #[default]
    Native,
    Legacy,
}

impl EnablementStrategy {
    /// Build the check of the strategy.
    pub fn into_check(self) -> Box<dyn EnablementCheck> {
        match self {
            EnablementStrategy::Native => Box::new(NativeCheck),
            EnablementStrategy::Legacy => Box::new(LegacyCheck),
        }
    }
}

impl FromStr for EnablementStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "native" => Ok(EnablementStrategy::Native),
            "legacy" => Ok(EnablementStrategy::Legacy),
            _ => Err(Error::InvalidConfig {
                what: format!("EnablementCheck={}", s),
            }),
        }
    }
}

impl fmt::Display for EnablementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnablementStrategy::Native => write!(f, "native"),
            EnablementStrategy::Legacy => write!(f, "legacy"),
        }
    }
}
