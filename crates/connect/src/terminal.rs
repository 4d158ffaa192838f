//! Local terminal handling for interactive shells.

use std::io;

/// Size used when the local terminal cannot be queried.
const FALLBACK_SIZE: (u32, u32) = (80, 24);

/// Returns `(columns, rows)` of the terminal on stdout.
#[must_use]
pub fn terminal_size() -> (u32, u32) {
    #[cfg(unix)]
    {
        match rustix::termios::tcgetwinsize(io::stdout()) {
            Ok(size) if size.ws_col > 0 && size.ws_row > 0 => {
                (u32::from(size.ws_col), u32::from(size.ws_row))
            }
            _ => FALLBACK_SIZE,
        }
    }
    #[cfg(not(unix))]
    {
        FALLBACK_SIZE
    }
}

/// Puts stdin into raw mode and restores the previous mode on drop.
#[derive(Debug)]
pub struct RawModeGuard {
    #[cfg(unix)]
    saved: Option<rustix::termios::Termios>,
}

impl RawModeGuard {
    /// Enters raw mode when stdin is a terminal; otherwise does nothing.
    pub fn enter() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use rustix::termios::{OptionalActions, isatty, tcgetattr, tcsetattr};

            let stdin = io::stdin();
            if !isatty(&stdin) {
                return Ok(Self { saved: None });
            }
            let saved = tcgetattr(&stdin)?;
            let mut raw = saved.clone();
            raw.make_raw();
            tcsetattr(&stdin, OptionalActions::Now, &raw)?;
            Ok(Self { saved: Some(saved) })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Whether raw mode was actually entered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.saved.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(saved) = self.saved.take() {
            let _ = rustix::termios::tcsetattr(
                io::stdin(),
                rustix::termios::OptionalActions::Now,
                &saved,
            );
        }
    }
}
