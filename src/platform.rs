//! Platform-specific key bindings

use crossterm::event::{KeyEvent, KeyModifiers};

/// Platform-appropriate modifier for command shortcuts
/// - macOS: SUPER (Cmd key), Ctrl also accepted
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const COMMAND_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const COMMAND_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Whether `key` carries the command modifier
pub fn is_command(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(COMMAND_MODIFIER)
}

/// Save shortcut display for help text
/// Ctrl+S works on all platforms
pub const SAVE_SHORTCUT: &str = "^S";

/// Export shortcut display
#[cfg(target_os = "macos")]
pub const EXPORT_SHORTCUT: &str = "Cmd+E";

#[cfg(not(target_os = "macos"))]
pub const EXPORT_SHORTCUT: &str = "^E";
