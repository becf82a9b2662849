//! Progress and error reporting during a walk.

use crate::error::WalkError;
use std::io::{IsTerminal, Write};
use std::path::Path;

/// Receives walk progress and per-entry errors.
pub trait Reporter {
    /// A directory is about to be read.
    fn reading(&mut self, path: &Path);
    /// A recoverable filesystem error.
    fn error(&mut self, err: &WalkError);
    /// The whole root has been read.
    fn finished(&mut self, _root: &Path) {}
}

/// Reports to stderr. Progress overwrites a single line and is only shown
/// on a terminal.
pub struct ConsoleReporter {
    show_progress: bool,
    line_dirty: bool,
}

const CLEAR_TO_EOL: &str = "\x1b[K";

impl ConsoleReporter {
    pub fn new(silent: bool) -> Self {
        Self {
            show_progress: !silent && std::io::stderr().is_terminal(),
            line_dirty: false,
        }
    }

    fn clear_line(&mut self, err: &mut impl Write) {
        if self.line_dirty {
            let _ = write!(err, "{CLEAR_TO_EOL}");
            self.line_dirty = false;
        }
    }
}

impl Reporter for ConsoleReporter {
    fn reading(&mut self, path: &Path) {
        tracing::trace!(path = %path.display(), "reading");
        if !self.show_progress {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "Reading {}{CLEAR_TO_EOL}\r", path.display());
        let _ = err.flush();
        self.line_dirty = true;
    }

    fn error(&mut self, walk_err: &WalkError) {
        tracing::debug!(path = %walk_err.path().display(), error = %walk_err, "walk error");
        let mut err = std::io::stderr().lock();
        self.clear_line(&mut err);
        let _ = writeln!(err, "dirsize: {walk_err}");
    }

    fn finished(&mut self, _root: &Path) {
        if !self.show_progress {
            return;
        }
        let mut err = std::io::stderr().lock();
        self.clear_line(&mut err);
        let _ = writeln!(err, "Reading directory structure done");
    }
}

/// Keeps everything it is told. Used by tests and by callers that want to
/// present errors themselves.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub read: Vec<std::path::PathBuf>,
    pub errors: Vec<String>,
}

impl Reporter for CollectingReporter {
    fn reading(&mut self, path: &Path) {
        self.read.push(path.to_path_buf());
    }

    fn error(&mut self, err: &WalkError) {
        self.errors.push(err.to_string());
    }
}
