use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{EnvFilter, Targets},
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for per-attempt outcome lines.
pub const RESULT_TARGET: &str = "task_result";

/// Install the console + rolling file subscriber.
///
/// Outcome lines (`task_result`) are shown at INFO everywhere; other targets
/// at WARN in the file and ERROR on the console. `RUST_LOG`, when set,
/// replaces the console filter. The guard must be kept alive by the caller.
pub fn setup_logger(log_dir: &str) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(log_dir).is_err() {
        eprintln!("Cannot create log directory {}, file logging disabled", log_dir);
    }

    let file_appender = tracing_appender::rolling::hourly(log_dir, "broadcast");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = Targets::new()
        .with_target(RESULT_TARGET, tracing::Level::INFO)
        .with_default(tracing::Level::WARN);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!("error,{}=info", RESULT_TARGET)),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    match installed {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let msg = event_message(event);

        let colored_msg = if msg.contains("[SUCCESS]") {
            let green = Style::new().fg(Color::LightGreen).bold();
            msg.replace("[SUCCESS]", &format!("[{}]", green.paint("SUCCESS")))
        } else if msg.contains("[FAILED]") {
            let red = Style::new().fg(Color::LightRed).bold();
            msg.replace("[FAILED]", &format!("[{}]", red.paint("FAILED")))
        } else {
            msg
        };

        let time = Style::new().dimmed().paint(Local::now().format("%H:%M:%S").to_string());
        writeln!(writer, "{} {}", time, colored_msg)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();
        writeln!(writer, "{} [{}] {}", timestamp, level, event_message(event))
    }
}
