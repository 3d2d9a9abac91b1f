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

//! uctl, manage service units and get their journal when they fail.

use clap::Parser;
use std::io::Write;
use std::process::exit;
use unitctl::config::UnitctlConfig;
use unitctl::{EnableRequest, Error, Overrides, Provider, ServiceUnit, SystemRunner};

/// parse program arguments
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Name of unit
    #[clap(subcommand)]
    subcmd: SubCmd,

    /// Configuration file
    #[clap(short, long)]
    config: Option<String>,
}

#[derive(Parser, Debug)]
enum SubCmd {
    /// `[unit]` Start a unit
    #[clap(display_order = 1)]
    Start {
        #[clap(required = true)]
        unit: String,
        /// Run this command instead of systemctl start
        #[clap(long)]
        command: Option<String>,
    },

    /// `[unit]` Stop a unit
    #[clap(display_order = 2)]
    Stop {
        #[clap(required = true)]
        unit: String,
        /// Run this command instead of systemctl stop
        #[clap(long)]
        command: Option<String>,
    },

    /// `[unit]` Restart a unit
    #[clap(display_order = 3)]
    Restart {
        #[clap(required = true)]
        unit: String,
        /// Run this command instead of systemctl restart
        #[clap(long)]
        command: Option<String>,
    },

    /// `[unit]` Show whether a unit is running
    #[clap(display_order = 4)]
    Status {
        #[clap(required = true)]
        unit: String,
        /// Run this command instead of systemctl is-active
        #[clap(long)]
        command: Option<String>,
    },

    /// `[unit-file]` Show whether a unit is enabled
    #[clap(display_order = 5)]
    IsEnabled {
        #[clap(required = true)]
        unit: String,
        /// The requested enable state: default, false or mask
        #[clap(long, default_value = "default")]
        enable_request: EnableRequest,
    },

    /// `[unit-file]` Enable a unit
    #[clap(display_order = 6)]
    Enable {
        #[clap(required = true)]
        unit: String,
    },

    /// `[unit-file]` Disable a unit
    #[clap(display_order = 7)]
    Disable {
        #[clap(required = true)]
        unit: String,
    },

    /// `[unit-file]` Disable and mask a unit
    #[clap(display_order = 8)]
    Mask {
        #[clap(required = true)]
        unit: String,
    },

    /// `[manager]` List all service unit files
    #[clap(display_order = 9)]
    List {},
}

fn unit_with_override(unit: &str, overrides: Overrides) -> ServiceUnit {
    ServiceUnit::new(unit).with_overrides(overrides)
}

/// Run the subcommand, return what is printed on success.
fn execute(provider: &Provider<SystemRunner>, subcmd: SubCmd) -> Result<Option<String>, Error> {
    match subcmd {
        SubCmd::Start { unit, command } => {
            let unit = unit_with_override(
                &unit,
                Overrides {
                    start: command,
                    ..Default::default()
                },
            );
            provider.start(&unit)?;
            Ok(None)
        }
        SubCmd::Stop { unit, command } => {
            let unit = unit_with_override(
                &unit,
                Overrides {
                    stop: command,
                    ..Default::default()
                },
            );
            provider.stop(&unit)?;
            Ok(None)
        }
        SubCmd::Restart { unit, command } => {
            let unit = unit_with_override(
                &unit,
                Overrides {
                    restart: command,
                    ..Default::default()
                },
            );
            provider.restart(&unit)?;
            Ok(None)
        }
        SubCmd::Status { unit, command } => {
            let unit = unit_with_override(
                &unit,
                Overrides {
                    status: command,
                    ..Default::default()
                },
            );
            Ok(Some(provider.status(&unit)?.to_string()))
        }
        SubCmd::IsEnabled {
            unit,
            enable_request,
        } => {
            let unit = ServiceUnit::new(&unit).with_enable_request(enable_request);
            Ok(Some(provider.enabled(&unit)?.to_string()))
        }
        SubCmd::Enable { unit } => {
            provider.enable(&ServiceUnit::new(&unit))?;
            Ok(None)
        }
        SubCmd::Disable { unit } => {
            provider.disable(&ServiceUnit::new(&unit))?;
            Ok(None)
        }
        SubCmd::Mask { unit } => {
            provider.mask(&ServiceUnit::new(&unit))?;
            Ok(None)
        }
        SubCmd::List {} => {
            let lines: Vec<String> = provider
                .list_units()?
                .into_iter()
                .map(|e| format!("{} {}", e.name, e.state))
                .collect();
            Ok(Some(lines.join("\n")))
        }
    }
}

/// Failures of the controlled commands exit with 1, everything else with its errno.
fn exit_code(e: &Error) -> i32 {
    match e {
        Error::Execution { .. } | Error::Diagnostic { .. } => 1,
        _ => match e.get_errno() {
            0 => 1,
            errno => errno,
        },
    }
}

fn main() {
    let args = Args::parse();

    let config = UnitctlConfig::new(args.config.as_deref());
    log::init_log(
        "uctl",
        log::parse_level(&config.LogLevel),
        config.log_targets(),
    );

    let provider = match Provider::from_config(SystemRunner::new(), &config) {
        Err(e) => {
            eprintln!("Failed to set up uctl: {}", e);
            exit(exit_code(&e));
        }
        Ok(v) => v,
    };

    match execute(&provider, args.subcmd) {
        Ok(None) => exit(0),
        Ok(Some(msg)) => {
            /* Don't care if we fail to write the message out. */
            let _ = writeln!(std::io::stdout(), "{}", msg);
            exit(0);
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            exit(exit_code(&e));
        }
    }
}
