//! State-trace diagnostics for the attention engine.
//!
//! Controlled by the `DEBUG_LEVEL` environment variable:
//! - 0 or unset: No tracing
//! - 1: Errors only
//! - 2: Info level (commits, accepted marks, config reloads)
//! - 3: Debug level (phase transitions, dropped events)
//! - 4: Trace level (every timer fire, stale tickets included)
//!
//! Output goes to /tmp/par_term_attention_debug.log on Unix/macOS, or
//! %TEMP%\par_term_attention_debug.log on Windows, so trace lines never land
//! in a terminal the user is typing into. Every line is also forwarded to the
//! `log` facade at the matching level.

use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Category for mark store and scheduler decisions.
pub const ATTN: &str = "ATTN";
/// Category for attention cycling.
pub const CYCLE: &str = "CYCLE";
/// Category for timer arming and firing.
pub const TIMER: &str = "TIMER";

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn parse(val: &str) -> Self {
        match val.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_env() -> Self {
        std::env::var("DEBUG_LEVEL")
            .map(|val| Self::parse(&val))
            .unwrap_or(DebugLevel::Off)
    }

    fn label(self) -> &'static str {
        match self {
            DebugLevel::Off => "OFF  ",
            DebugLevel::Error => "ERROR",
            DebugLevel::Info => "INFO ",
            DebugLevel::Debug => "DEBUG",
            DebugLevel::Trace => "TRACE",
        }
    }

    fn as_log_level(self) -> Option<log::Level> {
        match self {
            DebugLevel::Off => None,
            DebugLevel::Error => Some(log::Level::Error),
            DebugLevel::Info => Some(log::Level::Info),
            DebugLevel::Debug => Some(log::Level::Debug),
            DebugLevel::Trace => Some(log::Level::Trace),
        }
    }
}

/// Global trace writer
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new() -> Self {
        let level = DebugLevel::from_env();
        if level == DebugLevel::Off {
            return DebugLogger { level, file: None };
        }

        #[cfg(unix)]
        let log_path = std::path::PathBuf::from("/tmp/par_term_attention_debug.log");
        #[cfg(not(unix))]
        let log_path = std::env::temp_dir().join("par_term_attention_debug.log");

        // A trace file that can't be opened just disables file output.
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&log_path)
            .ok();

        let mut logger = DebugLogger { level, file };
        logger.write_raw(&format!(
            "\n{}\npar-term attention trace started at {} (level={:?})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level == DebugLevel::Off || level > self.level {
            return;
        }
        self.write_raw(&format!(
            "[{}] [{}] [{}] {}\n",
            get_timestamp(),
            level.label(),
            category,
            msg
        ));
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Check if tracing is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    level <= get_logger().lock().level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    get_logger().lock().log(level, category, msg);
}

/// Log formatted message to the trace file and the `log` facade
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if let Some(log_level) = level.as_log_level() {
        log::log!(target: "par_term_attention", log_level, "[{}] {}", category, args);
    }
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

// Convenience macros for tracing
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}
