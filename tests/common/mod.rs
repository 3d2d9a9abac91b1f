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

//! Shared fixtures of the integration tests: a scripted stand-in for the target system.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use unitctl::exec::check_status;
use unitctl::{CommandRunner, ExecOptions, ExecOutput, Result};

pub const SSHD_JOURNAL: &str = "-- Logs begin at Tue 2016-06-14 11:59:21 UTC, end at Tue 2016-06-14 21:45:02 UTC. --
Jun 14 21:41:34 foo.example.com systemd[1]: Stopping sshd.service...
Jun 14 21:41:35 foo.example.com systemd[1]: Starting sshd.service...
Jun 14 21:41:35 foo.example.com systemd[1]: sshd.service: Main process exited, code=exited, status=255/n/a
Jun 14 21:41:35 foo.example.com systemd[1]: Failed to start sshd.service.";

/// Answers commands from a script and records every call in order.
///
/// `systemctl enable`/`disable` update the answer of `systemctl is-enabled`.
#[derive(Default)]
pub struct ScriptedSystem {
    answers: HashMap<String, ExecOutput>,
    shell: HashMap<String, String>,
    links: Vec<String>,
    enabled: RefCell<HashSet<String>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedSystem {
    pub fn new() -> Self {
        ScriptedSystem::default()
    }

    pub fn answer(mut self, command_line: &str, output: &str, status: i32) -> Self {
        self.answers
            .insert(command_line.to_string(), ExecOutput::new(output, status));
        self
    }

    pub fn shell_answer(mut self, command: &str, output: &str) -> Self {
        self.shell.insert(command.to_string(), output.to_string());
        self
    }

    pub fn start_links(mut self, links: &[&str]) -> Self {
        self.links = links.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn enablement(&self, argv: &[String]) -> Option<ExecOutput> {
        if argv.len() != 3 || !argv[0].ends_with("systemctl") {
            return None;
        }
        let unit = argv[2].clone();
        match argv[1].as_str() {
            "enable" => {
                self.enabled.borrow_mut().insert(unit);
                Some(ExecOutput::new("", 0))
            }
            "disable" => {
                self.enabled.borrow_mut().remove(&unit);
                Some(ExecOutput::new("", 0))
            }
            "is-enabled" if self.enabled.borrow().contains(&unit) => {
                Some(ExecOutput::new("enabled\n", 0))
            }
            _ => None,
        }
    }
}

impl CommandRunner for ScriptedSystem {
    fn run(&self, argv: &[String], options: &ExecOptions) -> Result<ExecOutput> {
        let line = argv.join(" ");
        self.calls.borrow_mut().push(line.clone());
        let out = match self.answers.get(&line) {
            Some(out) => out.clone(),
            None => self.enablement(argv).unwrap_or_default(),
        };
        check_status(&line, out, options)
    }

    fn run_shell(&self, command: &str) -> Result<String> {
        self.calls.borrow_mut().push(command.to_string());
        Ok(self.shell.get(command).cloned().unwrap_or_default())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        self.calls.borrow_mut().push(format!("glob {}", pattern));
        Ok(self.links.clone())
    }
}
