//! Boardsmith - declarative circuit board builder
//!
//! Describe a circuit as a tree of builders (project, boards, groups,
//! components, traces) and build it into one flat, ordered list of typed
//! design elements covering the source, schematic and PCB domains.
//!
//! # Quick Start
//!
//! ```no_run
//! use boardsmith::prelude::*;
//!
//! # async fn run() -> Result<(), BuildError> {
//! let mut project = ProjectBuilder::new(BuildOptions::default());
//! project.add_board(|board| {
//!     board.set_size(20.0, 10.0).set_center(0.0, 0.0);
//!     board
//!         .add_resistor(|r| {
//!             r.set_name("R1").set_resistance("10k").set_footprint("0805");
//!         })
//!         .add_capacitor(|c| {
//!             c.set_name("C1").set_capacitance("100nF");
//!         })
//!         .connect([".R1 > .negative", ".C1 > .positive"]);
//! });
//!
//! let output = project.build().await?;
//! for element in &output.elements {
//!     println!("{}", element.element_type());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Builders**: groups, boards, two-terminal parts, bugs, vias, net aliases
//! - **Deterministic ids**: per-category counters, stable across rebuilds
//! - **Selectors**: `.R1 > .positive`, `.U1 > .3`, `net.GND`
//! - **Gerber**: per-layer RS-274X command lists
//! - **Design files**: JSON descriptions loaded into builders

pub mod builder;
pub mod connectivity;
pub mod context;
pub mod core;
pub mod design;
pub mod elements;
pub mod gerber;
pub mod transform;
pub mod units;

// Re-export main types
pub use builder::{
    BoardBuilder, Buildable, ComponentBuilder, ComponentKind, Container, GroupBuilder,
    NetBuilder, ProjectBuilder, TraceBuilder, TraceHintBuilder,
};
pub use connectivity::ConnectivityMap;
pub use context::{BuildContext, IdAllocator};
pub use core::{BuildError, BuildOptions, BuildOutput, BuildStats};
pub use design::{load_design, DesignFile};
pub use elements::Element;
pub use units::{Length, LengthUnit, Quantity, UnitSystem};

/// Build a design file (convenience wrapper).
pub async fn build_design(path: &std::path::Path) -> Result<BuildOutput, BuildError> {
    load_design(path)?.build().await
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BoardBuilder, BuildError, BuildOptions, BuildOutput, Buildable, ComponentBuilder,
        Container, Element, GroupBuilder, ProjectBuilder,
    };
}
