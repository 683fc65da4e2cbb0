//! Mailbox module - latest-wins command hand-off between the listener and the tick
//!
//! The listener thread calls [`CommandMailbox::send`], the simulation tick drains one
//! value per tick through [`CommandSource::take_if_any`]. The mailbox holds a single
//! slot: a newer command overwrites an unconsumed older one.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Where the piece controller pulls its next command tag from.
///
/// Implementations: [`CommandMailbox`] (listener and keyboard), [`ScriptedCommands`] (testing).
pub trait CommandSource {
    /// Read and clear the pending command, if any
    fn take_if_any(&mut self) -> Option<String>;
}

/// Single-slot mailbox shared between threads. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct CommandMailbox {
    slot: Arc<Mutex<Option<String>>>,
}

impl CommandMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // A panic while holding the lock cannot leave an Option half-written.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite the pending command
    pub fn send(&self, tag: impl Into<String>) {
        *self.lock() = Some(tag.into());
    }

    /// Read and clear the pending command
    pub fn take_if_any(&self) -> Option<String> {
        self.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}

impl CommandSource for CommandMailbox {
    fn take_if_any(&mut self) -> Option<String> {
        CommandMailbox::take_if_any(self)
    }
}

/// Pre-recorded commands, one per tick. `None` entries are ticks without a command.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands {
    script: VecDeque<Option<String>>,
}

impl ScriptedCommands {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            script: commands.into_iter().map(|c| c.map(Into::into)).collect(),
        }
    }

    /// One command per tick, no gaps
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tags.into_iter().map(Some))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl CommandSource for ScriptedCommands {
    fn take_if_any(&mut self) -> Option<String> {
        self.script.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_wins() {
        let mailbox = CommandMailbox::new();
        mailbox.send("lean-left");
        mailbox.send("lean-right");
        assert_eq!(mailbox.take_if_any().as_deref(), Some("lean-right"));
        assert_eq!(mailbox.take_if_any(), None);
    }

    #[test]
    fn clones_share_the_slot() {
        let writer = CommandMailbox::new();
        let mut reader = writer.clone();
        writer.send("shake");
        assert!(!writer.is_empty());
        assert_eq!(CommandSource::take_if_any(&mut reader).as_deref(), Some("shake"));
        assert!(writer.is_empty());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let mailbox = CommandMailbox::new();
        let poisoner = mailbox.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.slot.lock().unwrap();
            panic!("poison the slot");
        })
        .join();

        mailbox.send("Neutral");
        assert_eq!(mailbox.take_if_any().as_deref(), Some("Neutral"));
    }

    #[test]
    fn script_yields_gaps_as_none() {
        let mut script = ScriptedCommands::new([Some("shake"), None, Some("Neutral")]);
        assert_eq!(script.take_if_any().as_deref(), Some("shake"));
        assert_eq!(script.take_if_any(), None);
        assert_eq!(script.take_if_any().as_deref(), Some("Neutral"));
        assert_eq!(script.take_if_any(), None);
        assert_eq!(script.remaining(), 0);
    }
}
