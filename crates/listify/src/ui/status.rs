//! Console status sink.

use std::io::{self, Write};

use time::OffsetDateTime;
use time::macros::format_description;

use crate::app::convert::UiSurface;
use crate::domain::model::{Severity, StatusMessage};

/// Writes status lines such as `12:04:31 [ok] Inserted 3 bullet items.`
pub struct ConsoleStatus<W: Write> {
    out: W,
    show_info: bool,
    busy: bool,
    last: Option<StatusMessage>,
}

impl ConsoleStatus<io::Stderr> {
    pub fn stderr(show_info: bool) -> Self {
        Self::new(io::stderr(), show_info)
    }
}

impl<W: Write> ConsoleStatus<W> {
    pub fn new(out: W, show_info: bool) -> Self {
        Self {
            out,
            show_info,
            busy: false,
            last: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Most recent message, including suppressed info messages.
    pub fn last(&self) -> Option<&StatusMessage> {
        self.last.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UiSurface for ConsoleStatus<W> {
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn report(&mut self, status: StatusMessage) {
        let visible = self.show_info || status.severity != Severity::Info;
        if visible {
            let timestamp = OffsetDateTime::now_utc()
                .format(format_description!("[hour]:[minute]:[second]"))
                .unwrap_or_default();
            if let Err(err) = writeln!(self.out, "{timestamp} {status}") {
                tracing::warn!(error = %err, "failed to write status line");
            }
        }
        self.last = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_labelled_status_lines() {
        let mut status = ConsoleStatus::new(Vec::new(), true);
        status.report(StatusMessage::info("working"));
        status.report(StatusMessage::success("done"));

        let output = String::from_utf8(status.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[info] working"));
        assert!(lines[1].ends_with("[ok] done"));
    }

    #[test]
    fn hides_info_when_disabled() {
        let mut status = ConsoleStatus::new(Vec::new(), false);
        status.report(StatusMessage::info("working"));
        status.report(StatusMessage::error("broken"));
        assert_eq!(status.last(), Some(&StatusMessage::error("broken")));

        let output = String::from_utf8(status.into_inner()).unwrap();
        assert!(!output.contains("working"));
        assert!(output.contains("[error] broken"));
    }

    #[test]
    fn tracks_busy_flag() {
        let mut status = ConsoleStatus::new(io::sink(), true);
        status.set_busy(true);
        assert!(status.is_busy());
        status.set_busy(false);
        assert!(!status.is_busy());
    }
}
