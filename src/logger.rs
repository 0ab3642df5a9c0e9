//! Logging with colored module prefixes.
//!
//! - `log!` for terminal output with a colored `[module]` prefix
//! - `debug!` for output shown only with `--verbose`
//!
//! Everything goes to stderr; stdout is reserved for command output
//! (rendered pages, JSON).
//!
//! ```ignore
//! log!("apply"; "updated {}", path.display());
//! debug!("sync"; "applied `{}`", meta.title);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{IsTerminal, Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Serializes whole lines so concurrent callers never interleave.
static OUTPUT: Mutex<()> = Mutex::new(());

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Log a message with a colored module prefix
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let _guard = OUTPUT.lock();
    let mut err = stderr().lock();

    // Clear any partial line (e.g. an interactive prompt) before writing
    if err.is_terminal() {
        execute!(err, Clear(ClearType::UntilNewLine)).ok();
    }
    writeln!(err, "{prefix} {message}").ok();
    err.flush().ok();
}

/// Apply color to a module prefix based on module type
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "apply" => prefix.bright_blue().bold().to_string(),
        "validate" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module() {
        for module in ["apply", "validate", "error", "config"] {
            assert!(colorize_prefix(module).contains(&format!("[{module}]")));
        }
    }

    #[test]
    fn test_prefix_color_by_module() {
        assert_ne!(colorize_prefix("apply"), colorize_prefix("error"));
        // Matching is case-insensitive
        assert_eq!(
            colorize_prefix("ERROR").replace("ERROR", "error"),
            colorize_prefix("error")
        );
    }

    #[test]
    fn test_verbose_flag() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
