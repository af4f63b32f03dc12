//! JSONL file sink and subscriber installation.
//!
//! Log lines are appended to a single file and flushed per line, so several
//! short-lived CLI processes can share one log without interleaving lines.

use crate::json_layer::JsonLayer;
use crate::{InitError, LogConfig};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Appending file writer shared by every event.
#[derive(Clone)]
pub struct LogFileWriter {
    inner: Arc<Mutex<BufWriter<File>>>,
}

impl LogFileWriter {
    pub fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            inner: Arc::new(Mutex::new(BufWriter::with_capacity(8192, file))),
        })
    }
}

impl io::Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock();
        let result = guard.write(buf);
        // One flush per line keeps lines whole across processes
        guard.flush()?;
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// MakeWriter implementation for tracing-subscriber
#[derive(Clone)]
pub struct WriterFactory {
    writer: LogFileWriter,
}

impl<'a> MakeWriter<'a> for WriterFactory {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer.clone()
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Build and install the global subscriber described by `config`.
pub(crate) fn install_subscriber(config: &LogConfig) -> Result<(), InitError> {
    let json_layer = match &config.log_path {
        Some(path) => {
            let writer =
                LogFileWriter::new(path).map_err(|e| InitError::LogFile(path.clone(), e))?;
            Some(
                JsonLayer::new(config.service_name.clone(), WriterFactory { writer })
                    .with_filter(env_filter(&config.default_level)),
            )
        }
        None => None,
    };

    let stderr_layer = if config.also_stderr || config.log_path.is_none() {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_writer(io::stderr)
                .with_filter(env_filter(&config.default_level)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|_| InitError::AlreadyInitialized)?;

    tracing::debug!(
        service = %config.service_name,
        log_path = ?config.log_path,
        "observability initialized"
    );
    Ok(())
}
