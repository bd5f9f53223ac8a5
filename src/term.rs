//! Terminal session management with panic-safe cleanup.

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static flag to track if the terminal session is active (for panic handler)
pub(crate) static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard for the preview terminal session: raw mode plus alternate screen.
/// Restores both on drop, including on panic.
pub struct TermGuard {
    /// Whether this guard is responsible for cleanup
    active: bool,
}

impl TermGuard {
    /// Enter raw mode and the alternate screen, returning a guard that
    /// restores the terminal on drop.
    pub fn enter() -> io::Result<Self> {
        // Install panic hook before touching terminal state
        install_panic_hook();

        enable_raw_mode()?;
        if let Err(e) = crossterm::execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        SESSION_ACTIVE.store(true, Ordering::SeqCst);

        Ok(Self { active: true })
    }

    /// Manually restore the terminal without dropping the guard.
    /// After calling this, the guard's drop is a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
            crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        if self.active {
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
            // Best-effort cleanup - ignore errors during drop
            let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

/// Install a panic hook that restores terminal state before panicking,
/// so the shell stays usable even if the preview loop panics.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return; // Already installed
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if SESSION_ACTIVE.load(Ordering::SeqCst) {
            let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            SESSION_ACTIVE.store(false, Ordering::SeqCst);
        }

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_enter_and_drop() {
        // Raw mode needs a real TTY; skip in CI
        match TermGuard::enter() {
            Ok(guard) => {
                assert!(SESSION_ACTIVE.load(Ordering::SeqCst));
                drop(guard);
                assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }

    #[test]
    fn test_guard_manual_exit_makes_drop_noop() {
        match TermGuard::enter() {
            Ok(mut guard) => {
                guard.exit().expect("Should restore terminal");
                assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
                drop(guard);
                assert!(!SESSION_ACTIVE.load(Ordering::SeqCst));
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }

    #[test]
    fn test_panic_hook_installation_is_idempotent() {
        install_panic_hook();
        install_panic_hook();
    }
}
