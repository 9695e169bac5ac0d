use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogSink: Send + Sync {
    fn min_level(&self) -> LogLevel;
    fn write_line(&self, line: &str);
}

pub struct ConsoleSink {
    min_level: LogLevel,
}

impl ConsoleSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl LogSink for ConsoleSink {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Appends to a log file, creating it and its parent directory if needed.
pub struct FileSink {
    file: Mutex<File>,
    min_level: LogLevel,
}

impl FileSink {
    pub fn create(path: &Path, min_level: LogLevel) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            min_level,
        })
    }
}

impl LogSink for FileSink {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Keeps lines in memory; clones share the same buffer.
#[derive(Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    min_level: LogLevel,
}

impl MemorySink {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            min_level,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Logger handed explicitly to whoever needs it; there is no global instance.
pub struct Logger {
    prefix: Option<String>,
    sinks: Vec<Box<dyn LogSink>>,
}

impl Logger {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix,
            sinks: Vec::new(),
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn log(&self, level: LogLevel, file: &str, line: u32, message: &str) {
        if !self.sinks.iter().any(|sink| level >= sink.min_level()) {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        let formatted = if let Some(ref prefix) = self.prefix {
            format!(
                "[{}][{}][{}][{}:{}] {}",
                timestamp,
                level.as_str(),
                prefix,
                file_name,
                line,
                message
            )
        } else {
            format!(
                "[{}][{}][{}:{}] {}",
                timestamp,
                level.as_str(),
                file_name,
                line,
                message
            )
        };

        for sink in self.sinks.iter().filter(|sink| level >= sink.min_level()) {
            sink.write_line(&formatted);
        }
    }
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::LogLevel::Debug, file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::LogLevel::Info, file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::LogLevel::Warning, file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::LogLevel::Error, file!(), line!(), &format!($($arg)*))
    };
}
