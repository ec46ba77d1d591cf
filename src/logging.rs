use log::{LevelFilter, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_FILE: &str = "log.txt";

#[derive(Debug)]
struct FileLogger {
    log_file: PathBuf,
    level: LevelFilter,
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!("{} - {}\n", record.level(), record.args());

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

// Default data directory: ~/zone_dice/data, or ./data without a home.
pub fn default_data_dir() -> PathBuf {
    dir::home_dir()
        .map(|home| home.join("zone_dice").join("data"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

// Install the file logger. Only the first call has any effect.
pub fn init(data_dir: &Path, debug: bool) -> Result<(), SetLoggerError> {
    let _ = create_dir_all(data_dir);
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let logger = LOGGER.get_or_init(|| FileLogger {
        log_file: data_dir.join(LOG_FILE),
        level,
    });

    log::set_logger(logger).map(|()| log::set_max_level(logger.level))
}
