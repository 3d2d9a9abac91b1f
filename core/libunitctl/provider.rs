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

//! The provider composes the command resolver, the lifecycle executor and the failure
//! diagnostics behind one interface, the one the CLI drives.

use crate::config::UnitctlConfig;
use crate::diagnostics::{FailureDiagnostics, JournalQuery};
use crate::enablement::{EnablementCheck, EnablementStrategy};
use crate::error::*;
use crate::exec::CommandRunner;
use crate::executor::LifecycleExecutor;
use crate::parse::UnitFileEntry;
use crate::resolver::CommandResolver;
use crate::unit::{EnableState, OperationKind, ServiceState, ServiceUnit};

/// Manages service units on one target system.
pub struct Provider<R: CommandRunner> {
    runner: R,
    resolver: CommandResolver,
    journal: JournalQuery,
    enablement: Box<dyn EnablementCheck>,
}

impl<R: CommandRunner> Provider<R> {
    /// create the provider from its parts
    pub fn new(
        runner: R,
        resolver: CommandResolver,
        journal: JournalQuery,
        enablement: Box<dyn EnablementCheck>,
    ) -> Self {
        Provider {
            runner,
            resolver,
            journal,
            enablement,
        }
    }

    /// create the provider as configured
    pub fn from_config(runner: R, config: &UnitctlConfig) -> Result<Self> {
        let strategy = config.enablement_strategy()?;
        let resolver = config.resolver();
        log::debug!(
            "Control plane {}, enablement check {}",
            resolver.control_binary(),
            strategy
        );
        Ok(Provider::new(
            runner,
            resolver,
            config.journal(),
            strategy.into_check(),
        ))
    }

    /// create the provider with the default journal query and the native enablement check
    pub fn with_resolver(runner: R, resolver: CommandResolver) -> Self {
        Provider::new(
            runner,
            resolver,
            JournalQuery::default(),
            EnablementStrategy::Native.into_check(),
        )
    }

    /// The executor without failure diagnostics.
    pub fn executor(&self) -> LifecycleExecutor<'_> {
        LifecycleExecutor::new(&self.runner, &self.resolver)
    }

    fn diagnostics(&self) -> FailureDiagnostics<'_> {
        FailureDiagnostics::new(&self.runner, &self.journal)
    }

    /// Start the unit, a failure carries the recent journal.
    pub fn start(&self, unit: &ServiceUnit) -> Result<()> {
        let result = self.executor().start(unit);
        self.diagnostics().wrap(OperationKind::Start, unit, result)
    }

    pub fn stop(&self, unit: &ServiceUnit) -> Result<()> {
        let result = self.executor().stop(unit);
        self.diagnostics().wrap(OperationKind::Stop, unit, result)
    }

    pub fn restart(&self, unit: &ServiceUnit) -> Result<()> {
        let result = self.executor().restart(unit);
        self.diagnostics().wrap(OperationKind::Restart, unit, result)
    }

    /// Whether the unit is running.
    pub fn status(&self, unit: &ServiceUnit) -> Result<ServiceState> {
        self.executor().status(unit)
    }

    /// The enable state, answered by the configured enablement check.
    pub fn enabled(&self, unit: &ServiceUnit) -> Result<EnableState> {
        self.enablement.check(&self.executor(), unit)
    }

    pub fn enable(&self, unit: &ServiceUnit) -> Result<()> {
        self.executor().enable(unit)
    }

    pub fn disable(&self, unit: &ServiceUnit) -> Result<()> {
        self.executor().disable(unit)
    }

    pub fn mask(&self, unit: &ServiceUnit) -> Result<()> {
        self.executor().mask(unit)
    }

    pub fn list_units(&self) -> Result<Vec<UnitFileEntry>> {
        self.executor().list_units()
    }
}
