//! Terminal output: ANSI notes and the live transfer display.

use std::io::{Stdout, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tgup_core::{MediaItem, ProgressSink, SkipReason};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Info,
    Warn,
    Error,
    Success,
}

impl Note {
    fn symbol(self) -> (&'static str, &'static str) {
        match self {
            Note::Info => (CYAN, "ℹ"),
            Note::Warn => (YELLOW, "⚠"),
            Note::Error => (RED, "✗"),
            Note::Success => (GREEN, "✓"),
        }
    }

    fn plain_prefix(self) -> &'static str {
        match self {
            Note::Info => "INFO:",
            Note::Warn => "WARN:",
            Note::Error => "ERROR:",
            Note::Success => "OK:",
        }
    }
}

/// Render one note line without a trailing newline.
pub fn format_note(kind: Note, msg: &str, color: bool) -> String {
    if color {
        let (style, symbol) = kind.symbol();
        format!("{style}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{} {msg}", kind.plain_prefix())
    }
}

pub fn note_info(msg: &str) {
    println!("{}", format_note(Note::Info, msg, supports_color()));
}

pub fn note_warn(msg: &str) {
    println!("{}", format_note(Note::Warn, msg, supports_color()));
}

pub fn note_error(msg: &str) {
    eprintln!("{}", format_note(Note::Error, msg, supports_color()));
}

pub fn note_success(msg: &str) {
    println!("{}", format_note(Note::Success, msg, supports_color()));
}

/// `1536` -> `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

// ---------------------------------------------------------------------------
// Transfer display
// ---------------------------------------------------------------------------

/// Percent granularity of progress lines.
const PROGRESS_STEP: u64 = 25;
const NOTHING_PRINTED: u64 = u64::MAX;

/// Prints one line per item event plus throttled progress percentages.
///
/// Write errors are ignored; the display never affects a transfer.
pub struct TerminalDisplay<W: Write + Send = Stdout> {
    out: Mutex<W>,
    color: bool,
    last_download: AtomicU64,
    last_upload: AtomicU64,
}

impl TerminalDisplay<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout(), supports_color())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn with_writer(out: W, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
            last_download: AtomicU64::new(NOTHING_PRINTED),
            last_upload: AtomicU64::new(NOTHING_PRINTED),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }

    fn note(&self, kind: Note, msg: &str) {
        self.line(&format_note(kind, msg, self.color));
    }

    fn progress(&self, arrow: &str, done: u64, total: u64, last: &AtomicU64) {
        if total == 0 {
            return;
        }
        let pct = (done.min(total) * 100 / total) / PROGRESS_STEP * PROGRESS_STEP;
        let previous = last.load(Ordering::Relaxed);
        if previous != NOTHING_PRINTED && pct <= previous {
            return;
        }
        last.store(if done >= total { NOTHING_PRINTED } else { pct }, Ordering::Relaxed);

        let text = format!("  {arrow} {pct:>3}%  {} / {}", format_size(done), format_size(total));
        if self.color {
            self.line(&format!("{DIM}{text}{RESET}"));
        } else {
            self.line(&text);
        }
    }
}

impl<W: Write + Send> ProgressSink for TerminalDisplay<W> {
    fn on_start(&self, item: &MediaItem) {
        self.last_download.store(NOTHING_PRINTED, Ordering::Relaxed);
        self.note(
            Note::Info,
            &format!("Downloading {} ({})", item.destination_name(), format_size(item.file_size)),
        );
    }

    fn on_upload(&self, item: &MediaItem, _remote_id: &str) {
        self.last_upload.store(NOTHING_PRINTED, Ordering::Relaxed);
        self.note(Note::Success, &format!("Uploaded {}", item.destination_name()));
    }

    fn on_skip(&self, item: &MediaItem, reason: SkipReason) {
        self.note(Note::Warn, &format!("Skipped {} ({reason})", item.destination_name()));
    }

    fn on_error(&self, item: &MediaItem, message: &str) {
        self.last_download.store(NOTHING_PRINTED, Ordering::Relaxed);
        self.last_upload.store(NOTHING_PRINTED, Ordering::Relaxed);
        self.note(Note::Error, &format!("{}: {message}", item.destination_name()));
    }

    fn on_download_progress(&self, done: u64, total: u64) {
        self.progress("↓", done, total, &self.last_download);
    }

    fn on_upload_progress(&self, done: u64, total: u64) {
        self.progress("↑", done, total, &self.last_upload);
    }
}
