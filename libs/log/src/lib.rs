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

//! Logging of unitctl, a thin layer on the log crate writing to the console and syslog.
pub mod logger;

/// reexport log::Log
pub use log::max_level;
pub use log::set_max_level;
pub use log::Log;
pub use log::{debug, error, info, trace, warn};
pub use log::{Level, LevelFilter};
pub use log::{Metadata, Record};

pub use logger::init_log;
pub use logger::parse_level;

/// Initialize console logger.
pub fn init_log_to_console(name: &str, level: crate::Level) {
    init_log(name, level, vec!["console"]);
}

/// Initialize console and syslog logger.
pub fn init_log_to_console_syslog(name: &str, level: crate::Level) {
    init_log(name, level, vec!["console", "syslog"]);
}

#[cfg(test)]
mod tests {
    use crate::{init_log, Level};

    #[test]
    fn test_init_log_to_console() {
        init_log("test", Level::Debug, vec!["console"]);
        crate::error!("hello, error!");
        crate::set_max_level(Level::Info.to_level_filter());
        crate::info!("hello, info!");
        crate::debug!("hello debug!"); /* Won't print */
        init_log("test", Level::Debug, vec!["syslog", "console"]);
        crate::debug!("hello debug2!");
        assert_eq!(crate::max_level(), Level::Debug.to_level_filter());
    }
}
