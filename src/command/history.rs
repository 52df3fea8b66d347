use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::Command;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Command file of the binary: the executed commands in order, then the
/// commands taken back by undo, most recent last.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    done: Vec<Command>,
    #[serde(default)]
    undone: Vec<Command>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn done(&self) -> &[Command] {
        &self.done
    }

    pub fn undone(&self) -> &[Command] {
        &self.undone
    }

    pub fn into_commands(self) -> (Vec<Command>, Vec<Command>) {
        (self.done, self.undone)
    }

    /// Appends a newly executed command. Undone commands can no longer be
    /// redone afterwards.
    pub fn record(&mut self, command: Command) {
        self.done.push(command);
        self.undone.clear();
    }

    /// Keeps `commands` available to redo, the last one first.
    pub fn restore_undone(&mut self, commands: Vec<Command>) {
        self.undone = commands;
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let command = self.done.pop().ok_or(HistoryError::NothingToUndo)?;
        self.undone.push(command);
        Ok(())
    }

    pub fn next_redo(&self) -> Result<&Command, HistoryError> {
        self.undone.last().ok_or(HistoryError::NothingToRedo)
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let command = self.undone.pop().ok_or(HistoryError::NothingToRedo)?;
        self.done.push(command);
        Ok(())
    }
}
