//! Audio cue played when an interval completes.
//!
//! Playback is fire-and-forget. The coordinator logs and drops any error a
//! notifier returns.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::storage::NotificationsConfig;

pub trait Notifier {
    fn play_cue(&self) -> Result<()>;
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn play_cue(&self) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn play_cue(&self) -> Result<()> {
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Spawns an external audio player on a sound file without waiting for it.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    player: String,
    sound: PathBuf,
}

impl CommandNotifier {
    pub fn new(player: impl Into<String>, sound: impl Into<PathBuf>) -> Self {
        Self {
            player: player.into(),
            sound: sound.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn play_cue(&self) -> Result<()> {
        if !self.sound.exists() {
            return Err(CoreError::Notifier(format!(
                "sound file not found: {}",
                self.sound.display()
            )));
        }
        let mut child = Command::new(&self.player)
            .arg(&self.sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CoreError::Notifier(format!("failed to run {}: {e}", self.player)))?;

        // Reap the player off the caller's thread.
        let player = self.player.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                debug!(%player, %status, "audio player exited with failure");
            }
            Ok(_) => {}
            Err(e) => warn!(%player, error = %e, "failed to wait for audio player"),
        });
        Ok(())
    }
}

/// Pick the notifier described by the configuration.
pub fn from_config(config: &NotificationsConfig) -> Box<dyn Notifier> {
    if !config.enabled {
        return Box::new(SilentNotifier);
    }
    match &config.sound {
        Some(sound) => Box::new(CommandNotifier::new(config.player.clone(), sound)),
        None => Box::new(TerminalBell),
    }
}
