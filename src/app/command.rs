//! Commands and key bindings
//!
//! Every key press and button click becomes a `Command`; the app
//! dispatches commands to the playback controller in one place.

use egui::{Key, Modifiers};

/// User commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick and open a video file
    Open,
    /// Export the current frame
    SaveFrame,
    TogglePlay,
    PrevFrame,
    NextFrame,
    SkipBack,
    SkipForward,
    FirstFrame,
    LastFrame,
    ShowKeymap,
    Quit,
}

impl Command {
    /// Text shown in the keymap help
    pub fn description(&self, skip_step: usize) -> String {
        match self {
            Command::Open => "Open video file".to_string(),
            Command::SaveFrame => "Save current frame".to_string(),
            Command::TogglePlay => "Play/Pause".to_string(),
            Command::PrevFrame => "Previous frame".to_string(),
            Command::NextFrame => "Next frame".to_string(),
            Command::SkipBack => format!("Skip back {skip_step} frames"),
            Command::SkipForward => format!("Skip forward {skip_step} frames"),
            Command::FirstFrame => "First frame".to_string(),
            Command::LastFrame => "Last frame".to_string(),
            Command::ShowKeymap => "Show keymap".to_string(),
            Command::Quit => "Quit application".to_string(),
        }
    }

    /// Look up the command bound to `key` with `modifiers`
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Command> {
        if modifiers.ctrl || modifiers.alt || modifiers.command {
            return None;
        }
        KEY_BINDINGS
            .iter()
            .find(|b| b.key == key && b.shift == modifiers.shift)
            .map(|b| b.command)
    }
}

/// One entry of the dispatch table
#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub key: Key,
    pub shift: bool,
    pub label: &'static str,
    pub command: Command,
}

/// Keyboard dispatch table
pub const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding { key: Key::ArrowLeft, shift: false, label: "← (Left Arrow)", command: Command::PrevFrame },
    KeyBinding { key: Key::ArrowRight, shift: false, label: "→ (Right Arrow)", command: Command::NextFrame },
    KeyBinding { key: Key::ArrowLeft, shift: true, label: "Shift + ←", command: Command::SkipBack },
    KeyBinding { key: Key::ArrowRight, shift: true, label: "Shift + →", command: Command::SkipForward },
    KeyBinding { key: Key::Home, shift: false, label: "Home", command: Command::FirstFrame },
    KeyBinding { key: Key::End, shift: false, label: "End", command: Command::LastFrame },
    KeyBinding { key: Key::Space, shift: false, label: "Space", command: Command::TogglePlay },
    KeyBinding { key: Key::S, shift: false, label: "s", command: Command::SaveFrame },
    KeyBinding { key: Key::O, shift: false, label: "o", command: Command::Open },
    KeyBinding { key: Key::H, shift: false, label: "h", command: Command::ShowKeymap },
    KeyBinding { key: Key::Q, shift: false, label: "q", command: Command::Quit },
];

/// Keymap help text, one binding per line
pub fn keymap_text(skip_step: usize) -> String {
    KEY_BINDINGS
        .iter()
        .map(|b| format!("{}: {}", b.label, b.command.description(skip_step)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            Command::from_key(Key::ArrowLeft, Modifiers::NONE),
            Some(Command::PrevFrame)
        );
        assert_eq!(
            Command::from_key(Key::ArrowRight, Modifiers::SHIFT),
            Some(Command::SkipForward)
        );
        assert_eq!(
            Command::from_key(Key::ArrowLeft, Modifiers::SHIFT),
            Some(Command::SkipBack)
        );
    }

    #[test]
    fn test_letter_keys() {
        assert_eq!(Command::from_key(Key::Space, Modifiers::NONE), Some(Command::TogglePlay));
        assert_eq!(Command::from_key(Key::S, Modifiers::NONE), Some(Command::SaveFrame));
        assert_eq!(Command::from_key(Key::Q, Modifiers::NONE), Some(Command::Quit));
        assert_eq!(Command::from_key(Key::X, Modifiers::NONE), None);
    }

    #[test]
    fn test_ctrl_combinations_ignored() {
        assert_eq!(Command::from_key(Key::S, Modifiers::CTRL), None);
    }

    #[test]
    fn test_keymap_text_lists_every_binding() {
        let text = keymap_text(10);
        assert_eq!(text.lines().count(), KEY_BINDINGS.len());
        assert!(text.contains("Shift + →: Skip forward 10 frames"));
        assert!(text.contains("q: Quit application"));
    }
}
