//! Gerber example: build a design file and write one .gbr file per layer.

use boardsmith::gerber::{convert_elements_to_gerber_commands, stringify_gerber_command_layers};
use boardsmith::prelude::*;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<(), BuildError> {
    let design = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/voltage_divider.json".to_string());
    let out_dir = PathBuf::from(std::env::args().nth(2).unwrap_or_else(|| "gerber".to_string()));

    if !Path::new(&design).exists() {
        eprintln!("File not found: {}", design);
        eprintln!("Usage: cargo run --example gerber_layers [design.json] [out_dir]");
        std::process::exit(1);
    }

    let output = boardsmith::build_design(Path::new(&design)).await?;
    let layers = stringify_gerber_command_layers(&convert_elements_to_gerber_commands(
        &output.elements,
    ));

    std::fs::create_dir_all(&out_dir)?;
    for (layer, text) in &layers {
        let path = out_dir.join(layer.file_name());
        std::fs::write(&path, text)?;
        println!("Wrote {} ({} lines)", path.display(), text.lines().count());
    }

    Ok(())
}
