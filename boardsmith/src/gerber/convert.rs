//! Element list to Gerber layers

use std::collections::BTreeMap;

use crate::elements::{Element, LayerRef, PadShape, PcbBoard, PcbTrace};

use super::apertures::{define_apertures_for_layer, find_aperture, next_aperture_number};
use super::builder::GerberBuilder;
use super::commands::{ApertureTemplateConfig, GerberCommand, GerberUnit, Polarity};
use super::GerberLayerName;

/// Stroke used for the board outline
pub const EDGE_CUTS_APERTURE_DIAMETER: f64 = 0.1;

fn header(layer: GerberLayerName) -> Vec<GerberCommand> {
    GerberBuilder::new()
        .add(GerberCommand::comment(format!(
            "Generated by boardsmith {}",
            env!("CARGO_PKG_VERSION")
        )))
        .add(GerberCommand::AddFileAttribute {
            attribute_name: "FileFunction".to_string(),
            attribute_value: layer.file_function(),
        })
        .add(GerberCommand::FormatSpecification)
        .add(GerberCommand::SetUnit {
            unit: GerberUnit::Mm,
        })
        .add(GerberCommand::SetLayerPolarity {
            polarity: Polarity::Dark,
        })
        .add(GerberCommand::SetLinearInterpolation)
        .build()
}

fn select(glayer: &mut Vec<GerberCommand>, template: &ApertureTemplateConfig) -> bool {
    match find_aperture(glayer, template) {
        Some(aperture_number) => {
            glayer.push(GerberCommand::SelectAperture { aperture_number });
            true
        }
        None => {
            tracing::warn!(%template, "No aperture defined, skipping");
            false
        }
    }
}

fn draw_trace(glayer: &mut Vec<GerberCommand>, trace: &PcbTrace, layer: LayerRef) {
    let points: Vec<_> = trace.route.iter().filter(|p| p.layer == layer).collect();
    let Some(first) = points.first() else {
        return;
    };
    if !select(
        glayer,
        &ApertureTemplateConfig::Circle {
            diameter: first.width,
        },
    ) {
        return;
    }
    glayer.push(GerberCommand::MoveOperation {
        x: first.x,
        y: first.y,
    });
    for point in &points[1..] {
        glayer.push(GerberCommand::PlotOperation {
            x: point.x,
            y: point.y,
        });
    }
}

fn flash(glayer: &mut Vec<GerberCommand>, template: ApertureTemplateConfig, x: f64, y: f64) {
    if select(glayer, &template) {
        glayer.push(GerberCommand::FlashOperation { x, y });
    }
}

fn copper_commands(glayer: &mut Vec<GerberCommand>, elements: &[Element], layer: LayerRef) {
    for element in elements {
        match element {
            Element::PcbSmtpad(pad) if pad.layer == layer => {
                let template = match pad.shape {
                    PadShape::Rect { width, height } => {
                        ApertureTemplateConfig::Rectangle {
                            x_size: width,
                            y_size: height,
                        }
                    }
                    PadShape::Circle { radius } => {
                        ApertureTemplateConfig::Circle {
                            diameter: radius * 2.0,
                        }
                    }
                };
                flash(glayer, template, pad.x, pad.y);
            }
            Element::PcbPlatedHole(hole) if hole.layers.contains(&layer) => flash(
                glayer,
                ApertureTemplateConfig::Circle {
                    diameter: hole.outer_diameter,
                },
                hole.x,
                hole.y,
            ),
            Element::PcbVia(via) if via.layers.contains(&layer) => flash(
                glayer,
                ApertureTemplateConfig::Circle {
                    diameter: via.outer_diameter,
                },
                via.x,
                via.y,
            ),
            Element::PcbTrace(trace) => draw_trace(glayer, trace, layer),
            _ => {}
        }
    }
}

fn silkscreen_commands(glayer: &mut Vec<GerberCommand>, elements: &[Element]) {
    for element in elements {
        match element {
            Element::PcbSilkscreenLine(line) if line.layer == LayerRef::Top => {
                let template = ApertureTemplateConfig::Circle {
                    diameter: line.stroke_width,
                };
                if select(glayer, &template) {
                    glayer.push(GerberCommand::MoveOperation {
                        x: line.x1,
                        y: line.y1,
                    });
                    glayer.push(GerberCommand::PlotOperation {
                        x: line.x2,
                        y: line.y2,
                    });
                }
            }
            Element::PcbSilkscreenText(text) => {
                tracing::debug!(text = %text.text, "Silkscreen text is not plotted");
            }
            _ => {}
        }
    }
}

fn outline_commands(glayer: &mut Vec<GerberCommand>, board: &PcbBoard) {
    let (hw, hh) = (board.width / 2.0, board.height / 2.0);
    let (cx, cy) = (board.center.x, board.center.y);
    let corners = [
        (cx - hw, cy - hh),
        (cx + hw, cy - hh),
        (cx + hw, cy + hh),
        (cx - hw, cy + hh),
        (cx - hw, cy - hh),
    ];
    glayer.push(GerberCommand::MoveOperation {
        x: corners[0].0,
        y: corners[0].1,
    });
    for &(x, y) in &corners[1..] {
        glayer.push(GerberCommand::PlotOperation { x, y });
    }
}

fn edge_cuts_commands(glayer: &mut Vec<GerberCommand>, elements: &[Element]) {
    let boards: Vec<&PcbBoard> = elements
        .iter()
        .filter_map(|element| match element {
            Element::PcbBoard(board) => Some(board),
            _ => None,
        })
        .collect();
    if boards.is_empty() {
        return;
    }
    let aperture_number = next_aperture_number(glayer);
    glayer.push(GerberCommand::DefineApertureTemplate {
        aperture_number,
        template: ApertureTemplateConfig::Circle {
            diameter: EDGE_CUTS_APERTURE_DIAMETER,
        },
    });
    glayer.push(GerberCommand::SelectAperture { aperture_number });
    for board in boards {
        outline_commands(glayer, board);
    }
}

/// Convert built elements into one command list per Gerber layer.
pub fn convert_elements_to_gerber_commands(
    elements: &[Element],
) -> BTreeMap<GerberLayerName, Vec<GerberCommand>> {
    let mut layers = BTreeMap::new();

    for layer in GerberLayerName::ALL {
        let mut glayer = header(layer);
        define_apertures_for_layer(&mut glayer, elements, layer);

        match layer {
            GerberLayerName::FCu | GerberLayerName::BCu => {
                if let Some(copper) = layer.copper_layer() {
                    copper_commands(&mut glayer, elements, copper);
                }
            }
            GerberLayerName::FSilkScreen => silkscreen_commands(&mut glayer, elements),
            GerberLayerName::EdgeCuts => edge_cuts_commands(&mut glayer, elements),
        }

        glayer.push(GerberCommand::EndOfFile);
        tracing::debug!(layer = %layer, commands = glayer.len(), "Converted Gerber layer");
        layers.insert(layer, glayer);
    }

    layers
}

pub fn stringify_gerber_commands(commands: &[GerberCommand]) -> String {
    let mut out = commands
        .iter()
        .map(GerberCommand::to_gerber_string)
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

/// Render every layer to Gerber text.
pub fn stringify_gerber_command_layers(
    layers: &BTreeMap<GerberLayerName, Vec<GerberCommand>>,
) -> BTreeMap<GerberLayerName, String> {
    layers
        .iter()
        .map(|(name, commands)| (*name, stringify_gerber_commands(commands)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{PcbSmtpad, Point};

    fn elements() -> Vec<Element> {
        vec![
            Element::PcbSmtpad(PcbSmtpad {
                pcb_smtpad_id: "pcb_smtpad_0".into(),
                pcb_component_id: "pcb_component_0".into(),
                x: 1.0,
                y: 2.0,
                layer: LayerRef::Top,
                shape: PadShape::Rect {
                    width: 0.6,
                    height: 0.5,
                },
                port_hints: vec!["1".into()],
            }),
            Element::PcbBoard(PcbBoard {
                pcb_board_id: "pcb_board_0".into(),
                center: Point::new(0.0, 0.0),
                width: 10.0,
                height: 4.0,
                thickness: 1.2,
            }),
        ]
    }

    #[test]
    fn test_every_layer_present() {
        let layers = convert_elements_to_gerber_commands(&elements());
        assert_eq!(layers.len(), 4);
        for commands in layers.values() {
            assert_eq!(commands.last(), Some(&GerberCommand::EndOfFile));
        }
    }

    #[test]
    fn test_pad_flashed_on_top_copper() {
        let layers = convert_elements_to_gerber_commands(&elements());
        let text = stringify_gerber_commands(&layers[&GerberLayerName::FCu]);
        assert!(text.contains("%ADD10R,0.6X0.5*%"));
        assert!(text.contains("D10*\nX1000000Y2000000D03*"));
        assert!(text.contains("%TF.FileFunction,Copper,L1,Top*%"));

        let bottom = stringify_gerber_commands(&layers[&GerberLayerName::BCu]);
        assert!(!bottom.contains("D03*"));
    }

    #[test]
    fn test_board_outline_is_closed() {
        let layers = convert_elements_to_gerber_commands(&elements());
        let edge = &layers[&GerberLayerName::EdgeCuts];
        let plots = edge
            .iter()
            .filter(|c| matches!(c, GerberCommand::PlotOperation { .. }))
            .count();
        assert_eq!(plots, 4);
        assert!(edge.contains(&GerberCommand::MoveOperation { x: -5.0, y: -2.0 }));
        assert!(edge.contains(&GerberCommand::PlotOperation { x: -5.0, y: -2.0 }));
    }
}
