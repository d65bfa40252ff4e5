//! Integration tests for Gerber output

use boardsmith::gerber::{
    convert_elements_to_gerber_commands, stringify_gerber_command_layers, GerberCommand,
    GerberLayerName,
};
use boardsmith::load_design;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

async fn divider_layers() -> std::collections::BTreeMap<GerberLayerName, String> {
    let output = load_design(fixture_path("voltage_divider.json"))
        .unwrap()
        .build()
        .await
        .unwrap();
    let layers = convert_elements_to_gerber_commands(&output.elements);
    stringify_gerber_command_layers(&layers)
}

#[tokio::test]
async fn test_layers_in_fixed_order() {
    let layers = divider_layers().await;
    let names: Vec<&str> = layers.keys().map(|l| l.as_str()).collect();
    assert_eq!(names, vec!["F_Cu", "B_Cu", "F_SilkScreen", "Edge_Cuts"]);
    for text in layers.values() {
        assert!(text.starts_with("G04 Generated by boardsmith"));
        assert!(text.contains("%FSLAX46Y46*%\n%MOMM*%"));
        assert!(text.trim_end().ends_with("M02*"));
    }
}

#[tokio::test]
async fn test_top_copper_apertures() {
    let layers = divider_layers().await;
    let top = &layers[&GerberLayerName::FCu];
    let start = top.find("G04 aperture START LIST*").unwrap();
    let end = top.find("G04 aperture END LIST*").unwrap();
    let list = &top[start..end];
    assert!(list.contains("%ADD10C,0.15*%"));
    assert!(list.contains("%ADD11R,1X1.45*%"));
    assert!(!list.contains("%ADD12"));

    // four 0805 pads flashed with the rectangle
    assert_eq!(top.matches("D03*").count(), 4);
    // two copper traces, each starting with a move
    assert_eq!(top.matches("D02*").count(), 2);
}

#[tokio::test]
async fn test_bottom_copper_is_empty() {
    let layers = divider_layers().await;
    let bottom = &layers[&GerberLayerName::BCu];
    assert!(!bottom.contains("%ADD"));
    assert!(!bottom.contains("D01*"));
}

#[tokio::test]
async fn test_edge_cuts_outline() {
    let layers = divider_layers().await;
    let edge = &layers[&GerberLayerName::EdgeCuts];
    assert!(edge.contains("%TF.FileFunction,Profile,NP*%"));
    assert!(edge.contains("X-15000000Y-10000000D02*"));
    assert_eq!(edge.matches("D01*").count(), 4);
}

#[test]
fn test_empty_design_still_has_every_layer() {
    let layers = convert_elements_to_gerber_commands(&[]);
    assert_eq!(layers.len(), 4);
    for commands in layers.values() {
        assert_eq!(commands.last(), Some(&GerberCommand::EndOfFile));
    }
}
