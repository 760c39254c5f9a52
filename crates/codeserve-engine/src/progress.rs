//! Renders image-pull progress to an output sink.
//!
//! On an interactive terminal each layer owns one line that is redrawn in
//! place with a progress bar. Everywhere else the reporter appends one line per
//! status change and never emits escape sequences.

use std::collections::HashMap;
use std::io::Write;

use crossterm::QueueableCommand;
use crossterm::cursor::{MoveDown, MoveUp};
use crossterm::terminal::{Clear, ClearType};

use crate::error::{EngineError, ProgressError};
use crate::event::{ByteProgress, PullEvent};
use crate::sink::{OutputSink, TerminalCapability};

const BAR_WIDTH: u64 = 50;

/// How progress is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Per-layer lines redrawn in place with progress bars.
    Interactive,
    /// Append-only status lines.
    Plain,
}

impl From<TerminalCapability> for RenderMode {
    fn from(capability: TerminalCapability) -> Self {
        if capability.is_interactive() {
            Self::Interactive
        } else {
            Self::Plain
        }
    }
}

/// Consumes pull events and writes them to a sink.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn OutputSink,
    mode: RenderMode,
    /// Line index of each layer in the interactive block.
    lines: HashMap<String, usize>,
    /// Last status printed for each layer in plain mode.
    last_status: HashMap<String, String>,
}

impl<'a> ProgressReporter<'a> {
    /// Creates a reporter, choosing the mode from the sink's terminal capability.
    pub fn new(sink: &'a mut dyn OutputSink) -> Self {
        let capability = sink.terminal_capability();
        tracing::debug!(?capability, "progress sink capability");
        Self::with_mode(sink, RenderMode::from(capability))
    }

    /// Creates a reporter with an explicit mode.
    pub fn with_mode(sink: &'a mut dyn OutputSink, mode: RenderMode) -> Self {
        Self {
            sink,
            mode,
            lines: HashMap::new(),
            last_status: HashMap::new(),
        }
    }

    /// Returns the active render mode.
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Renders every event until the stream ends, returning how many were shown.
    ///
    /// The stream is consumed and dropped before this returns, on success or error.
    ///
    /// # Errors
    ///
    /// Stops at the first undecodable event, embedded engine error, transport
    /// error, or failed write.
    pub fn drain<I>(&mut self, events: I) -> Result<usize, ProgressError>
    where
        I: IntoIterator<Item = Result<PullEvent, EngineError>>,
    {
        let mut rendered = 0;
        for item in events {
            let event = item?;
            self.render(&event)?;
            rendered += 1;
        }
        Ok(rendered)
    }

    /// Renders one event.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::LayerFailed` for events carrying an engine error,
    /// or `ProgressError::Io` if the sink rejects the write.
    pub fn render(&mut self, event: &PullEvent) -> Result<(), ProgressError> {
        if let Some(message) = &event.error {
            return Err(ProgressError::LayerFailed {
                id: event.id.clone(),
                message: message.clone(),
            });
        }
        match self.mode {
            RenderMode::Interactive => self.render_interactive(event)?,
            RenderMode::Plain => self.render_plain(event)?,
        }
        Ok(())
    }

    fn render_interactive(&mut self, event: &PullEvent) -> std::io::Result<()> {
        let text = interactive_text(event);
        let Some(id) = &event.id else {
            // Anything without a layer id starts a fresh block below it.
            self.lines.clear();
            writeln!(self.sink, "{text}")?;
            return self.sink.flush();
        };

        let line = if let Some(&line) = self.lines.get(id) {
            line
        } else {
            let line = self.lines.len();
            let _ = self.lines.insert(id.clone(), line);
            self.sink.write_all(b"\n")?;
            line
        };

        let offset = u16::try_from(self.lines.len() - line).unwrap_or(u16::MAX);
        let _ = self
            .sink
            .queue(MoveUp(offset))?
            .queue(Clear(ClearType::CurrentLine))?;
        write!(self.sink, "{id}: {text}\r")?;
        let _ = self.sink.queue(MoveDown(offset))?;
        self.sink.flush()
    }

    fn render_plain(&mut self, event: &PullEvent) -> std::io::Result<()> {
        let Some(status) = event.status.as_deref() else {
            return Ok(());
        };
        match &event.id {
            Some(id) => {
                if self.last_status.get(id).is_some_and(|last| last == status) {
                    return Ok(());
                }
                let _ = self.last_status.insert(id.clone(), status.to_string());
                writeln!(self.sink, "{id}: {status}")
            }
            None => writeln!(self.sink, "{status}"),
        }
    }
}

/// Renders `stream` to `sink`, choosing the mode from the sink.
///
/// # Errors
///
/// See [`ProgressReporter::drain`].
pub fn report<I>(events: I, sink: &mut dyn OutputSink) -> Result<usize, ProgressError>
where
    I: IntoIterator<Item = Result<PullEvent, EngineError>>,
{
    ProgressReporter::new(sink).drain(events)
}

fn interactive_text(event: &PullEvent) -> String {
    let status = event.status.as_deref().unwrap_or_default();
    let progress = event
        .progress_text
        .clone()
        .or_else(|| event.progress.map(progress_bar));
    match progress {
        Some(progress) if !status.is_empty() => format!("{status} {progress}"),
        Some(progress) => progress,
        None => status.to_string(),
    }
}

/// Formats byte progress as `[====>   ] 1.2MB/3.4MB`, or just the size when
/// the total is unknown.
#[must_use]
pub fn progress_bar(progress: ByteProgress) -> String {
    let Some(total) = progress.total.filter(|&t| t > 0) else {
        return format_size(progress.current);
    };
    let current = progress.current.min(total);
    let filled = current.saturating_mul(BAR_WIDTH) / total;

    let mut bar = "=".repeat(usize::try_from(filled).unwrap_or_default());
    if filled < BAR_WIDTH {
        bar.push('>');
        bar.push_str(&" ".repeat(usize::try_from(BAR_WIDTH - filled - 1).unwrap_or_default()));
    }
    format!(
        "[{bar}] {}/{}",
        format_size(progress.current),
        format_size(total)
    )
}

/// Formats a byte count with SI units (e.g., "12.3MB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1000;
    const MB: u64 = KB * 1000;
    const GB: u64 = MB * 1000;

    if bytes >= GB {
        format!("{:.1}GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}kB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes}B")
    }
}
