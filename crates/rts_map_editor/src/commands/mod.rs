//! Undo/redo command system

mod command;

pub use command::{Command, CommandHistory, CornerSample, CornerSnapshot, TerrainEditCommand};
