use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fmt;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static LOGGER: PedanticLogger = PedanticLogger;

/// A custom logger that just works.
///
/// Everything is written to stderr so that it never gets mixed up with the tags being printed.
pub struct PedanticLogger;

impl PedanticLogger {
    pub fn setup(level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl Log for PedanticLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        let md = record.metadata();

        if self.enabled(md) {
            let module = record.module_path().unwrap_or_default();

            let mut color = ColorSpec::new();

            match md.level() {
                Level::Error => {
                    color.set_fg(Some(Color::Red));
                }

                Level::Warn => {
                    color.set_fg(Some(Color::Yellow)).set_intense(true);
                }

                Level::Info => {}

                _ => {
                    color.set_dimmed(true);
                }
            }

            let mut stderr = StandardStream::stderr(ColorChoice::Auto);

            stderr.set_color(&color).ok();
            writeln![stderr, "{}: {}", module, record.args()].ok();
            stderr.reset().ok();
        }
    }

    fn flush(&self) {}
}

/// Prints the line that starts the output of a file.
pub fn header(args: fmt::Arguments) {
    let mut color = ColorSpec::new();
    color.set_bold(true).set_intense(true).set_fg(Some(Color::Blue));

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    stdout.set_color(&color).ok();
    writeln![stdout, "{}", args].ok();
    stdout.reset().ok();
}

/// Prints the name of an entry, leaving the line open for its value.
pub fn entry(args: fmt::Arguments) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green))).ok();
    write![stdout, "{}", args].ok();
    stdout.reset().ok();
}

pub fn error(args: fmt::Arguments) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);

    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).ok();
    write![stderr, "error"].ok();
    stderr.reset().ok();
    writeln![stderr, ": {}", args].ok();
}

#[macro_export]
macro_rules! print_header {
    ($($arg:tt)+) => {
        $crate::stdout::header(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! print_entry {
    ($($arg:tt)+) => {
        $crate::stdout::entry(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorln {
    ($($arg:tt)+) => {
        $crate::stdout::error(format_args!($($arg)+))
    };
}
