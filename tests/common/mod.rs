//! Common test utilities and harness
//!
//! Provides reusable utilities for functional testing:
//! - Isolated config directories
//! - Keyboard-driven editing against a text buffer

#![allow(dead_code)]

use std::path::PathBuf;

use rush::InputAction;
use rush_core::{CellPosition, GridSize, TextBuffer};
use tempfile::TempDir;
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Test environment with isolated config directory
pub struct TestEnvironment {
    /// Temporary directory for test config
    pub temp_dir: TempDir,
    /// Path to the config directory
    pub config_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_dir = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            config_dir,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Write a test config file
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write test config");
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds key presses through the input mapping into a buffer
pub struct EditorTestHarness {
    buffer: TextBuffer,
    modifiers: ModifiersState,
}

impl EditorTestHarness {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            buffer: TextBuffer::new(GridSize::new(columns, rows)),
            modifiers: ModifiersState::empty(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Press a key, returning the mapped action (if any) after applying it
    pub fn press(&mut self, key: Key) -> Option<InputAction> {
        let action = InputAction::from_key(&key, self.modifiers)?;
        action.apply(&mut self.buffer);
        Some(action)
    }

    /// Type each character of a string as its own key press
    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\n' => self.press(Key::Named(NamedKey::Enter)),
                ' ' => self.press(Key::Named(NamedKey::Space)),
                c => self.press(Key::Character(c.to_string().into())),
            };
        }
    }

    /// Visible rows as strings, trailing empty rows dropped
    pub fn visible_lines(&self) -> Vec<String> {
        let mut lines = vec![String::new(); self.buffer.size().rows];
        for (cell, c) in self.buffer.visible_cells() {
            let line = &mut lines[cell.row];
            while line.chars().count() < cell.col {
                line.push(' ');
            }
            line.push(c);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// Assert cursor is at specific position
    pub fn assert_cursor_at(&self, row: usize, col: usize) {
        let cursor = self.buffer.cursor();
        assert_eq!(
            cursor,
            CellPosition::new(row, col),
            "Expected cursor at ({}, {}), got ({}, {})",
            row,
            col,
            cursor.row,
            cursor.col
        );
    }
}
