//! Line commands read from stdin while running headless.

use protocell_core::{Controls, Signals};
use std::io::BufRead;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Save,
    Quit,
}

impl Command {
    /// Parses one input line; unknown lines yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" | "pause" => Some(Self::TogglePause),
            "s" | "save" => Some(Self::Save),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Applies a command to the shared flags.
pub fn apply(command: Command, controls: &Controls, signals: &Signals) {
    match command {
        Command::TogglePause => {
            let paused = controls.toggle_pause();
            tracing::info!(paused, "Pause toggled");
        }
        Command::Save => controls.request_save(),
        Command::Quit => signals.request_shutdown(),
    }
}

/// Spawns a detached thread that turns stdin lines into control requests.
pub fn spawn_stdin_reader(controls: Controls, signals: Signals) -> std::io::Result<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match Command::parse(&line) {
                    Some(command) => apply(command, &controls, &signals),
                    None => tracing::warn!(input = %line.trim(), "Unknown command (p, s, q)"),
                }
                if signals.should_stop() {
                    break;
                }
            }
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("p\n"), Some(Command::TogglePause));
        assert_eq!(Command::parse(" save "), Some(Command::Save));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("jump"), None);
    }

    #[test]
    fn test_apply_commands() {
        let controls = Controls::new();
        let signals = Signals::new();

        apply(Command::TogglePause, &controls, &signals);
        assert!(controls.is_paused());
        apply(Command::Save, &controls, &signals);
        assert!(controls.take_save_request());
        apply(Command::Quit, &controls, &signals);
        assert!(signals.is_shutdown_requested());
    }
}
