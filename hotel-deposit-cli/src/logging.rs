//! Logger setup: `env_logger` writing to stdout, optionally teed to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Install the global logger.
///
/// `--quiet` shows warnings and errors only, `--verbose` adds debug messages
/// with timestamps and module targets. `RUST_LOG` overrides both.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let target = Tee {
        file: logfile.map(File::create).transpose()?,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(target)))
        .format(move |buf, record| {
            let prefix = match record.level() {
                log::Level::Error => Some("error".if_supports_color(Stdout, |t| t.red()).to_string()),
                log::Level::Warn => {
                    Some("warning".if_supports_color(Stdout, |t| t.yellow()).to_string())
                }
                _ => None,
            };
            if verbose {
                write!(
                    buf,
                    "{} {:<5} {} ",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target().if_supports_color(Stdout, |t| t.dimmed()),
                )?;
            }
            match prefix {
                Some(p) => writeln!(buf, "{p}: {}", record.args()),
                None => writeln!(buf, "{}", record.args()),
            }
        })
        .try_init()
        .map_err(io::Error::other)
}

/// Print an empty log line.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Writes to stdout and, if set, to a log file with ANSI escapes stripped.
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}
