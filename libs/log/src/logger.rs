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

//! The console and syslog targets behind the log macros.
use log::{Level, Log, Metadata, Record};
use std::{
    io::Write,
    os::unix::net::UnixDatagram,
    sync::{Once, RwLock},
};

/// Syslog socket
const SYSLOG_SOCKET: &str = "/dev/log";

static REGISTER: Once = Once::new();
static GLOBAL: GlobalLogger = GlobalLogger {
    loggers: RwLock::new(Vec::new()),
};

fn write_msg_common(writer: &mut impl Write, module: &str, msg: String) {
    let time: libc::time_t = unsafe { libc::time(std::ptr::null_mut()) };
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    unsafe { libc::localtime_r(&time, &mut tm) };
    let now_str = format!(
        "{:0>4}-{:0>2}-{:0>2} {:0>2}:{:0>2}:{:0>2} ",
        tm.tm_year + 1900, /* tm_year is years since 1900 */
        tm.tm_mon + 1,     /* tm_mon is months since Jan: [0, 11] */
        tm.tm_mday,
        tm.tm_hour,
        tm.tm_min,
        tm.tm_sec
    );

    /* Don't care if the console is gone. */
    let _ = writer.write_all(format!("{}{} {}\n", now_str, module, msg).as_bytes());
}

struct SysLogger {
    ident: String,
    dgram: UnixDatagram,
}

impl SysLogger {
    fn new(ident: &str) -> Result<Self, std::io::Error> {
        let dgram = UnixDatagram::unbound()?;
        dgram.connect(SYSLOG_SOCKET)?;
        Ok(Self {
            ident: ident.to_string(),
            dgram,
        })
    }

    /* LOG_DAEMON facility with the syslog severity of the level */
    fn priority(level: Level) -> u8 {
        let severity = match level {
            Level::Error => 3,
            Level::Warn => 4,
            Level::Info => 6,
            Level::Debug | Level::Trace => 7,
        };
        (3 << 3) | severity
    }
}

/* This is an extremely simple implementation, and only
 * supports the very basic log function. */
impl Log for SysLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let msg = format!(
            "<{}>{}: {}",
            Self::priority(record.level()),
            self.ident,
            record.args()
        );
        if let Err(e) = self.dgram.send(msg.as_bytes()) {
            eprintln!("Failed to send message to syslogger: {}", e);
        }
    }

    fn flush(&self) {}
}

/* Console output goes to stderr, stdout belongs to the command output. */
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut stderr = std::io::stderr();
        let module_path = record.module_path().unwrap_or("unknown");
        write_msg_common(&mut stderr, module_path, record.args().to_string());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// The logger registered in the log crate, dispatching to the configured targets.
///
/// Targets can be replaced by calling `init_log` again.
struct GlobalLogger {
    loggers: RwLock<Vec<Box<dyn Log>>>,
}

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(loggers) = self.loggers.read() {
            for logger in loggers.iter() {
                logger.log(record);
            }
        }
    }

    fn flush(&self) {
        if let Ok(loggers) = self.loggers.read() {
            for logger in loggers.iter() {
                logger.flush();
            }
        }
    }
}

/// Parse the level name used in the configuration, unknown names fall back to Info.
pub fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "error" => Level::Error,
        "warn" | "warning" => Level::Warn,
        "debug" => Level::Debug,
        "trace" => Level::Trace,
        _ => Level::Info,
    }
}

/// Initialize the global static logger instance.
/// Available log `targets` include `syslog`, `console`.
///
/// Repeated targets take effect only once.
///
/// # Arguments
///
/// * `name` - The application name that initializes the logger, used as the syslog ident.
/// * `level` - Log message level.
/// * `targets` - A set of log targets.
pub fn init_log(name: &str, level: Level, targets: Vec<&str>) {
    let mut seen: Vec<&str> = Vec::new();
    let mut loggers: Vec<Box<dyn Log>> = Vec::new();

    for target in targets {
        if seen.contains(&target) {
            continue;
        }
        seen.push(target);

        let logger = match target {
            "console" => Box::new(ConsoleLogger) as Box<dyn Log>,
            "syslog" => match SysLogger::new(name) {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to create syslogger: {:?}", name, e);
                    continue;
                }
            },
            _ => {
                eprintln!("{}: log target '{}' is strange, ignoring.", name, target);
                continue;
            }
        };
        loggers.push(logger);
    }

    if loggers.is_empty() {
        eprintln!("{}: no available log targets.", name);
    }

    match GLOBAL.loggers.write() {
        Ok(mut v) => *v = loggers,
        Err(_) => {
            eprintln!("{}: failed to replace log targets.", name);
            return;
        }
    }

    REGISTER.call_once(|| {
        if let Err(e) = log::set_logger(&GLOBAL) {
            eprintln!("{}: failed to set global logger: {:?}", name, e);
        }
    });
    log::set_max_level(level.to_level_filter());
}
