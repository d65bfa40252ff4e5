//! Project Builder
//!
//! Root of the builder tree. Holds the boards and the build options; every
//! [`ProjectBuilder::build`] starts from a fresh id allocator so that
//! building the same tree twice yields identical elements.

use futures::future::try_join_all;

use crate::context::BuildContext;
use crate::core::{BuildError, BuildOptions, BuildOutput};

use super::addables::{Addable, PROJECT_ADDABLES};
use super::{AnyBuilder, BoardBuilder, Buildable};

#[derive(Debug, Default)]
pub struct ProjectBuilder {
    options: BuildOptions,
    boards: Vec<BoardBuilder>,
}

impl ProjectBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            boards: Vec::new(),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BuildOptions {
        &mut self.options
    }

    pub fn boards(&self) -> &[BoardBuilder] {
        &self.boards
    }

    pub fn add_board(&mut self, configure: impl FnOnce(&mut BoardBuilder)) -> &mut Self {
        let mut board = BoardBuilder::new();
        configure(&mut board);
        self.boards.push(board);
        self
    }

    /// Add by kind string; only `"board"` is accepted at the root.
    pub fn add<F>(&mut self, kind: &str, configure: F) -> Result<&mut Self, BuildError>
    where
        F: FnOnce(&mut AnyBuilder),
    {
        let unknown = || BuildError::UnknownAddable {
            container: "project".to_string(),
            kind: kind.to_string(),
        };
        let addable: Addable = kind.parse().map_err(|_| unknown())?;
        if !PROJECT_ADDABLES.contains(&addable) {
            return Err(unknown());
        }
        let mut child = addable.construct();
        configure(&mut child);
        self.append_child(child)
    }

    pub fn append_child(&mut self, child: AnyBuilder) -> Result<&mut Self, BuildError> {
        match child {
            AnyBuilder::Board(board) => {
                self.boards.push(board);
                Ok(self)
            }
            other => Err(BuildError::IllegalChild {
                parent: "project_builder".to_string(),
                child: other.builder_type().to_string(),
            }),
        }
    }

    /// Build every board with a fresh context.
    pub async fn build(&self) -> Result<BuildOutput, BuildError> {
        let ctx = BuildContext::new(&self.options);
        self.build_with(&ctx).await
    }

    /// Build with a caller-supplied context, e.g. one sharing an allocator
    /// with an earlier build.
    pub async fn build_with(&self, ctx: &BuildContext) -> Result<BuildOutput, BuildError> {
        tracing::info!(boards = self.boards.len(), "Building project");
        let boards = try_join_all(self.boards.iter().map(|b| b.build(ctx))).await?;
        let output = BuildOutput::new(boards.into_iter().flatten().collect());
        tracing::info!(
            elements = output.total_elements(),
            components = output.stats.components,
            traces = output.stats.traces,
            "Build complete"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Container;

    fn project() -> ProjectBuilder {
        let mut project = ProjectBuilder::default();
        project.add_board(|b| {
            b.set_size(30.0, 20.0).set_center(0.0, 0.0);
            b.add_power_source(|v| {
                v.set_name("V1").set_voltage("5V");
            })
            .add_resistor(|r| {
                r.set_name("R1").set_resistance("1k");
            })
            .connect([".V1 > .positive", ".R1 > .positive"]);
        });
        project
    }

    #[tokio::test]
    async fn test_build_is_deterministic() {
        let project = project();
        let a = project.build().await.unwrap().to_json().unwrap();
        let b = project.build().await.unwrap().to_json().unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_shared_allocator_keeps_counting() {
        let project = project();
        let ctx = BuildContext::new(project.options());
        project.build_with(&ctx).await.unwrap();
        let second = project.build_with(&ctx).await.unwrap();
        let first_id = second.elements[0].id().1.to_string();
        assert_eq!(first_id, "source_component_2");
    }

    #[test]
    fn test_only_boards_at_root() {
        let mut project = ProjectBuilder::default();
        project.add("board", |_| {}).unwrap();
        assert_eq!(project.boards().len(), 1);
        let err = project.add("resistor", |_| {}).unwrap_err();
        assert!(matches!(err, BuildError::UnknownAddable { ref container, .. } if container == "project"));
    }
}
