//! Fluent accumulator for Gerber command lists

use super::commands::GerberCommand;

#[derive(Debug, Clone, Default)]
pub struct GerberBuilder {
    commands: Vec<GerberCommand>,
}

impl GerberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, command: GerberCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn add_all(mut self, commands: impl IntoIterator<Item = GerberCommand>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn build(self) -> Vec<GerberCommand> {
        self.commands
    }
}
