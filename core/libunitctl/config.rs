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

#![allow(non_snake_case)]

use crate::diagnostics::JournalQuery;
use crate::enablement::EnablementStrategy;
use crate::error::*;
use crate::resolver::CommandResolver;
use confique::{Config, FileFormat, Partial};
use constants::UNITCTL_CONFIG;

#[derive(Config, Debug)]
pub struct UnitctlConfig {
    #[config(env = "UNITCTL_CONTROL_BINARY", default = "systemctl")]
    pub ControlBinary: String,

    #[config(env = "UNITCTL_JOURNAL_BINARY", default = "journalctl")]
    pub JournalBinary: String,
    #[config(default = 50)]
    pub JournalLines: u32,
    #[config(default = "5 minutes ago")]
    pub JournalSince: String,

    #[config(default = "native")]
    pub EnablementCheck: String,
    #[config(default = "/usr/sbin/invoke-rc.d")]
    pub InvokeRcD: String,
    #[config(default = "/etc/rc*.d/S??")]
    pub StartLinkPrefix: String,

    #[config(env = "UNITCTL_LOG_LEVEL", default = "info")]
    pub LogLevel: String,
    #[config(default = "console")]
    pub LogTarget: String,
}

impl UnitctlConfig {
    pub fn new(file: Option<&str>) -> UnitctlConfig {
        type ConfigPartial = <UnitctlConfig as Config>::Partial;
        let mut partial: ConfigPartial = match Partial::from_env() {
            Err(_) => return UnitctlConfig::default(),
            Ok(v) => v,
        };
        partial = match confique::File::with_format(file.unwrap_or(UNITCTL_CONFIG), FileFormat::Toml)
            .load()
        {
            Err(_) => return UnitctlConfig::default(),
            Ok(v) => partial.with_fallback(v),
        };
        partial = partial.with_fallback(ConfigPartial::default_values());
        match UnitctlConfig::from_partial(partial) {
            Ok(v) => v,
            Err(_) => UnitctlConfig::default(),
        }
    }

    /// Load the file strictly, errors are returned instead of falling back to the defaults.
    pub fn load(file: &str) -> Result<UnitctlConfig> {
        type ConfigPartial = <UnitctlConfig as Config>::Partial;
        let partial: ConfigPartial = Partial::from_env().context(ConfiqueSnafu)?;
        let from_file = confique::File::with_format(file, FileFormat::Toml)
            .required()
            .load()
            .context(ConfiqueSnafu)?;
        let partial = partial
            .with_fallback(from_file)
            .with_fallback(ConfigPartial::default_values());
        UnitctlConfig::from_partial(partial).context(ConfiqueSnafu)
    }

    pub fn enablement_strategy(&self) -> Result<EnablementStrategy> {
        self.EnablementCheck.parse()
    }

    /// The resolver for the configured control plane; a bare binary name is looked up in PATH.
    pub fn resolver(&self) -> CommandResolver {
        let control_binary = match basic::path_lookup::find_executable(&self.ControlBinary) {
            Ok(path) => path.to_string_lossy().to_string(),
            Err(e) => {
                log::debug!(
                    "Cannot locate {}, using it as is: {}",
                    self.ControlBinary,
                    e
                );
                self.ControlBinary.clone()
            }
        };
        CommandResolver::new(&control_binary)
            .with_legacy_layout(&self.InvokeRcD, &self.StartLinkPrefix)
    }

    pub fn journal(&self) -> JournalQuery {
        JournalQuery::new(&self.JournalBinary, self.JournalLines, &self.JournalSince)
    }

    pub fn log_targets(&self) -> Vec<&str> {
        self.LogTarget
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Default for UnitctlConfig {
    fn default() -> Self {
        Self {
            ControlBinary: constants::SYSTEMCTL.to_string(),
            JournalBinary: constants::JOURNALCTL.to_string(),
            JournalLines: constants::JOURNAL_LINES,
            JournalSince: constants::JOURNAL_SINCE.to_string(),
            EnablementCheck: "native".to_string(),
            InvokeRcD: constants::INVOKE_RC_D.to_string(),
            StartLinkPrefix: constants::START_LINK_PREFIX.to_string(),
            LogLevel: "info".to_string(),
            LogTarget: "console".to_string(),
        }
    }
}
