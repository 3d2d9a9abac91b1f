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

//! The lifecycle executor: runs the resolved commands and maps the answers to states.

use crate::error::*;
use crate::exec::{CommandInvocation, CommandRunner, ExecOutput};
use crate::parse::{
    parse_is_active, parse_is_enabled, parse_legacy_status, parse_status_command,
    parse_unit_files, UnitFileEntry,
};
use crate::resolver::CommandResolver;
use crate::unit::{EnableState, OperationKind, ServiceState, ServiceUnit, UnitFileAction};

/// Runs the operations of one unit through a command runner. Holds no state between calls.
pub struct LifecycleExecutor<'a> {
    runner: &'a dyn CommandRunner,
    resolver: &'a CommandResolver,
}

impl<'a> LifecycleExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, resolver: &'a CommandResolver) -> Self {
        LifecycleExecutor { runner, resolver }
    }

    fn execute(&self, invocation: &CommandInvocation) -> Result<ExecOutput> {
        log::debug!("Running '{}'", invocation.command_line());
        self.runner.run(&invocation.argv, &invocation.options)
    }

    fn unit_file_action(&self, action: UnitFileAction, unit: &ServiceUnit) -> Result<()> {
        let invocation = self.resolver.unit_file_action(action, unit);
        self.execute(&invocation)?;
        Ok(())
    }

    /* start, stop and restart differ only in the subcommand */
    fn lifecycle(&self, operation: OperationKind, unit: &ServiceUnit) -> Result<()> {
        if unit.override_for(operation).is_none() {
            self.unit_file_action(UnitFileAction::Unmask, unit)?;
        }
        let invocation = self.resolver.resolve(operation, unit);
        self.execute(&invocation)?;
        log::info!("{} {} succeeded", operation, unit.name());
        Ok(())
    }

    /// Start the unit, unmasking it first unless a start command is supplied.
    pub fn start(&self, unit: &ServiceUnit) -> Result<()> {
        self.lifecycle(OperationKind::Start, unit)
    }

    /// Stop the unit, unmasking it first unless a stop command is supplied.
    pub fn stop(&self, unit: &ServiceUnit) -> Result<()> {
        self.lifecycle(OperationKind::Stop, unit)
    }

    /// Restart the unit, unmasking it first unless a restart command is supplied.
    pub fn restart(&self, unit: &ServiceUnit) -> Result<()> {
        self.lifecycle(OperationKind::Restart, unit)
    }

    /// Query whether the unit is running.
    pub fn status(&self, unit: &ServiceUnit) -> Result<ServiceState> {
        let invocation = self.resolver.resolve(OperationKind::Status, unit);
        let out = self.execute(&invocation)?;
        let state = match unit.override_for(OperationKind::Status) {
            Some(_) => parse_status_command(&out),
            None => parse_is_active(&out),
        };
        log::debug!("{} is {} (status {})", unit.name(), state, out.status);
        Ok(state)
    }

    /// Query the native enable state.
    pub fn enabled_query(&self, unit: &ServiceUnit) -> Result<EnableState> {
        let invocation = self.resolver.resolve(OperationKind::EnabledQuery, unit);
        let out = self.execute(&invocation)?;
        Ok(parse_is_enabled(&out, unit.enable_request()))
    }

    /// Unmask then enable, the enable is not tried when unmasking fails.
    pub fn enable(&self, unit: &ServiceUnit) -> Result<()> {
        self.unit_file_action(UnitFileAction::Unmask, unit)?;
        self.unit_file_action(UnitFileAction::Enable, unit)
    }

    pub fn disable(&self, unit: &ServiceUnit) -> Result<()> {
        self.unit_file_action(UnitFileAction::Disable, unit)
    }

    /// Disable then mask.
    pub fn mask(&self, unit: &ServiceUnit) -> Result<()> {
        self.unit_file_action(UnitFileAction::Disable, unit)?;
        self.unit_file_action(UnitFileAction::Mask, unit)
    }

    /// Enable state on init systems without a native query: the invoke-rc.d verdict,
    /// backed by the number of start links when it is not conclusive.
    pub fn legacy_enabled_query(&self, unit: &ServiceUnit) -> Result<EnableState> {
        let invocation = self.resolver.legacy_query(unit);
        let out = self.execute(&invocation)?;
        log::debug!("invoke-rc.d for {} returned {}", unit.bare_name(), out.status);
        parse_legacy_status(out.status, || self.start_link_count(unit))
    }

    /// Number of SysV start links of the unit, 0 when there are none.
    pub fn start_link_count(&self, unit: &ServiceUnit) -> Result<usize> {
        let pattern = self.resolver.start_link_pattern(unit);
        let count = self.runner.glob(&pattern)?.len();
        log::debug!("{} start links match '{}'", count, pattern);
        Ok(count)
    }

    /// All the service unit files known to the control plane.
    pub fn list_units(&self) -> Result<Vec<UnitFileEntry>> {
        let invocation = self.resolver.list_unit_files();
        let out = self.execute(&invocation)?;
        Ok(parse_unit_files(&out.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{check_status, ExecOptions};
    use crate::unit::{EnableRequest, Overrides};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Replays canned answers keyed by the command line and records every call.
    #[derive(Default)]
    struct Canned {
        answers: HashMap<String, ExecOutput>,
        links: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl Canned {
        fn answer(mut self, command_line: &str, output: &str, status: i32) -> Self {
            self.answers
                .insert(command_line.to_string(), ExecOutput::new(output, status));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for Canned {
        fn run(&self, argv: &[String], options: &ExecOptions) -> Result<ExecOutput> {
            let line = argv.join(" ");
            self.calls.borrow_mut().push(line.clone());
            let out = self.answers.get(&line).cloned().unwrap_or_default();
            check_status(&line, out, options)
        }

        fn run_shell(&self, command: &str) -> Result<String> {
            self.calls.borrow_mut().push(command.to_string());
            Ok(String::new())
        }

        fn glob(&self, pattern: &str) -> Result<Vec<String>> {
            self.calls.borrow_mut().push(format!("glob {}", pattern));
            Ok(self.links.clone())
        }
    }

    fn resolver() -> CommandResolver {
        CommandResolver::new("/bin/systemctl")
    }

    #[test]
    fn test_start_unmasks_first() {
        let runner = Canned::default();
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        exec.start(&ServiceUnit::new("sshd.service")).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "/bin/systemctl unmask sshd.service",
                "/bin/systemctl start sshd.service"
            ]
        );
    }

    #[test]
    fn test_override_skips_unmask() {
        let runner = Canned::default();
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        let unit = ServiceUnit::new("sshd").with_overrides(Overrides {
            stop: Some("/bin/foo".to_string()),
            ..Default::default()
        });
        exec.stop(&unit).unwrap();
        assert_eq!(runner.calls(), vec!["/bin/foo"]);
    }

    #[test]
    fn test_restart_failure_propagates() {
        let runner = Canned::default().answer("/bin/systemctl restart sshd.service", "boom", 1);
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        let err = exec.restart(&ServiceUnit::new("sshd.service")).unwrap_err();
        assert!(matches!(err, Error::Execution { status: 1, .. }));
    }

    #[test]
    fn test_status() {
        let runner = Canned::default().answer("/bin/systemctl is-active sshd.service", "active\n", 0);
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        assert_eq!(
            exec.status(&ServiceUnit::new("sshd.service")).unwrap(),
            ServiceState::Running
        );

        for status in [-10, -1, 3, 10] {
            let runner = Canned::default().answer(
                "/bin/systemctl is-active sshd.service",
                "inactive\n",
                status,
            );
            let exec = LifecycleExecutor::new(&runner, &r);
            assert_eq!(
                exec.status(&ServiceUnit::new("sshd.service")).unwrap(),
                ServiceState::Stopped
            );
        }
    }

    #[test]
    fn test_status_override() {
        let runner = Canned::default().answer("/bin/foo", "", 0);
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        let unit = ServiceUnit::new("sshd.service").with_overrides(Overrides {
            status: Some("/bin/foo".to_string()),
            ..Default::default()
        });
        assert_eq!(exec.status(&unit).unwrap(), ServiceState::Running);
        assert_eq!(runner.calls(), vec!["/bin/foo"]);
    }

    #[test]
    fn test_enabled_query_masked() {
        let runner = Canned::default().answer("/bin/systemctl is-enabled sshd.service", "masked\n", 1);
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        let unit = ServiceUnit::new("sshd.service").with_enable_request(EnableRequest::Mask);
        assert_eq!(exec.enabled_query(&unit).unwrap(), EnableState::Mask);
        let unit = ServiceUnit::new("sshd.service").with_enable_request(EnableRequest::False);
        assert_eq!(exec.enabled_query(&unit).unwrap(), EnableState::False);
    }

    #[test]
    fn test_enable_disable_mask() {
        let r = resolver();
        let unit = ServiceUnit::new("sshd.service");

        let runner = Canned::default();
        LifecycleExecutor::new(&runner, &r).enable(&unit).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "/bin/systemctl unmask sshd.service",
                "/bin/systemctl enable sshd.service"
            ]
        );

        let runner = Canned::default();
        LifecycleExecutor::new(&runner, &r).disable(&unit).unwrap();
        assert_eq!(runner.calls(), vec!["/bin/systemctl disable sshd.service"]);

        let runner = Canned::default();
        LifecycleExecutor::new(&runner, &r).mask(&unit).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "/bin/systemctl disable sshd.service",
                "/bin/systemctl mask sshd.service"
            ]
        );
    }

    #[test]
    fn test_enable_aborts_on_unmask_failure() {
        let runner = Canned::default().answer("/bin/systemctl unmask sshd.service", "denied", 1);
        let r = resolver();
        let exec = LifecycleExecutor::new(&runner, &r);
        assert!(exec.enable(&ServiceUnit::new("sshd.service")).is_err());
        assert_eq!(runner.calls(), vec!["/bin/systemctl unmask sshd.service"]);
    }

    #[test]
    fn test_legacy_enabled_query() {
        let r = resolver();
        let unit = ServiceUnit::new("sshd.service");
        let query = "/usr/sbin/invoke-rc.d --quiet --query sshd start";

        let runner = Canned::default().answer(query, "", 104);
        let exec = LifecycleExecutor::new(&runner, &r);
        assert_eq!(exec.legacy_enabled_query(&unit).unwrap(), EnableState::True);
        assert_eq!(runner.calls(), vec![query]);

        let mut runner = Canned::default().answer(query, "", 105);
        runner.links = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let exec = LifecycleExecutor::new(&runner, &r);
        assert_eq!(exec.legacy_enabled_query(&unit).unwrap(), EnableState::True);
        assert_eq!(runner.calls(), vec![query, "glob /etc/rc*.d/S??sshd"]);

        let mut runner = Canned::default().answer(query, "", 101);
        runner.links = vec!["a".into()];
        let exec = LifecycleExecutor::new(&runner, &r);
        assert_eq!(exec.legacy_enabled_query(&unit).unwrap(), EnableState::False);
    }

    #[test]
    fn test_start_link_count() {
        let r = resolver();
        let runner = Canned::default();
        let exec = LifecycleExecutor::new(&runner, &r);
        assert_eq!(exec.start_link_count(&ServiceUnit::new("sshd")).unwrap(), 0);
        assert_eq!(
            exec.start_link_count(&ServiceUnit::new("sshd.service")).unwrap(),
            0
        );
        assert_eq!(
            runner.calls(),
            vec!["glob /etc/rc*.d/S??sshd", "glob /etc/rc*.d/S??sshd"]
        );
    }
}
