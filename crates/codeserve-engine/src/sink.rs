//! Output sinks for progress rendering.
//!
//! A sink declares whether it has a native descriptor; only sinks that do can
//! be interactive terminals.

use std::fs::File;
use std::io::{IsTerminal, Stderr, StderrLock, Stdout, StdoutLock, Write};
use std::os::fd::{AsFd, BorrowedFd};

/// Result of the terminal capability query on a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCapability {
    /// The sink has a descriptor attached to a terminal.
    Terminal,
    /// The sink has a descriptor that is not a terminal.
    NotTerminal,
    /// The sink has no native descriptor.
    NoHandle,
}

impl TerminalCapability {
    /// Returns whether progress can be drawn in place.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// A writable destination for progress output.
pub trait OutputSink: Write {
    /// Native descriptor backing this sink, if any.
    fn native_handle(&self) -> Option<BorrowedFd<'_>>;

    /// Queries whether the sink is an interactive terminal.
    fn terminal_capability(&self) -> TerminalCapability {
        match self.native_handle() {
            None => TerminalCapability::NoHandle,
            Some(fd) if fd.is_terminal() => TerminalCapability::Terminal,
            Some(_) => TerminalCapability::NotTerminal,
        }
    }
}

macro_rules! fd_sink {
    ($($ty:ty),* $(,)?) => {
        $(
            impl OutputSink for $ty {
                fn native_handle(&self) -> Option<BorrowedFd<'_>> {
                    Some(self.as_fd())
                }
            }
        )*
    };
}

fd_sink!(Stdout, StdoutLock<'_>, Stderr, StderrLock<'_>, File);

impl OutputSink for Vec<u8> {
    fn native_handle(&self) -> Option<BorrowedFd<'_>> {
        None
    }
}
