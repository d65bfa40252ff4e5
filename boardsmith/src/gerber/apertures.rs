//! Aperture definitions for a Gerber layer

use std::collections::BTreeMap;

use crate::elements::{Element, LayerRef, PadShape};

use super::builder::GerberBuilder;
use super::commands::{ApertureTemplateConfig, GerberCommand};
use super::GerberLayerName;

const FIRST_APERTURE_NUMBER: u32 = 10;

/// Next free aperture number: one past the highest defined, or 10.
pub fn next_aperture_number(glayer: &[GerberCommand]) -> u32 {
    glayer
        .iter()
        .filter_map(|command| match command {
            GerberCommand::DefineApertureTemplate {
                aperture_number, ..
            } => Some(*aperture_number),
            _ => None,
        })
        .max()
        .map(|highest| highest + 1)
        .unwrap_or(FIRST_APERTURE_NUMBER)
}

/// Number of the aperture already defined with `template`
pub fn find_aperture(glayer: &[GerberCommand], template: &ApertureTemplateConfig) -> Option<u32> {
    glayer.iter().find_map(|command| match command {
        GerberCommand::DefineApertureTemplate {
            aperture_number,
            template: defined,
        } if defined == template => Some(*aperture_number),
        _ => None,
    })
}

/// Distinct trace widths per copper layer, in order of first use.
pub fn get_all_trace_widths(elements: &[Element]) -> BTreeMap<LayerRef, Vec<f64>> {
    let mut widths: BTreeMap<LayerRef, Vec<f64>> = BTreeMap::new();
    for element in elements {
        if let Element::PcbTrace(trace) = element {
            for point in &trace.route {
                let layer = widths.entry(point.layer).or_default();
                if !layer.contains(&point.width) {
                    layer.push(point.width);
                }
            }
        }
    }
    widths
}

/// Circle apertures for everything drilled through the board
fn through_hole_configs(elements: &[Element]) -> Vec<ApertureTemplateConfig> {
    elements
        .iter()
        .filter_map(|element| match element {
            Element::PcbPlatedHole(hole) => Some(hole.outer_diameter),
            Element::PcbVia(via) => Some(via.outer_diameter),
            _ => None,
        })
        .map(|diameter| ApertureTemplateConfig::Circle { diameter })
        .collect()
}

fn smtpad_configs(elements: &[Element], layer: LayerRef) -> Vec<ApertureTemplateConfig> {
    elements
        .iter()
        .filter_map(|element| match element {
            Element::PcbSmtpad(pad) if pad.layer == layer => Some(match pad.shape {
                PadShape::Rect { width, height } => ApertureTemplateConfig::Rectangle {
                    x_size: width,
                    y_size: height,
                },
                PadShape::Circle { radius } => ApertureTemplateConfig::Circle {
                    diameter: radius * 2.0,
                },
            }),
            _ => None,
        })
        .collect()
}

fn silkscreen_configs(elements: &[Element]) -> Vec<ApertureTemplateConfig> {
    elements
        .iter()
        .filter_map(|element| match element {
            Element::PcbSilkscreenLine(line) if line.layer == LayerRef::Top => {
                Some(ApertureTemplateConfig::Circle {
                    diameter: line.stroke_width,
                })
            }
            _ => None,
        })
        .collect()
}

/// Append the aperture list a layer needs to `glayer`.
///
/// Copper layers get one circle per trace width, then one aperture per
/// distinct pad shape, then one circle per distinct through-hole diameter.
/// The silkscreen gets one circle per stroke width. Duplicates are skipped;
/// numbering continues from whatever `glayer` already defines.
pub fn define_apertures_for_layer(
    glayer: &mut Vec<GerberCommand>,
    elements: &[Element],
    layer: GerberLayerName,
) {
    glayer.push(GerberCommand::comment("aperture START LIST"));

    let mut configs: Vec<ApertureTemplateConfig> = Vec::new();
    if let Some(copper) = layer.copper_layer() {
        let widths = get_all_trace_widths(elements);
        configs.extend(
            widths
                .get(&copper)
                .into_iter()
                .flatten()
                .map(|&diameter| ApertureTemplateConfig::Circle { diameter }),
        );
        configs.extend(smtpad_configs(elements, copper));
        configs.extend(through_hole_configs(elements));
    } else if layer == GerberLayerName::FSilkScreen {
        configs.extend(silkscreen_configs(elements));
    }

    for config in configs {
        if find_aperture(glayer, &config).is_some() {
            continue;
        }
        let aperture_number = next_aperture_number(glayer);
        glayer.push(GerberCommand::DefineApertureTemplate {
            aperture_number,
            template: config,
        });
    }

    glayer.extend(
        GerberBuilder::new()
            .add(GerberCommand::DeleteAttribute {
                attribute_name: None,
            })
            .add(GerberCommand::comment("aperture END LIST"))
            .build(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{PcbRoutePoint, PcbSmtpad, PcbTrace};

    fn pad(id: &str, shape: PadShape, layer: LayerRef) -> Element {
        Element::PcbSmtpad(PcbSmtpad {
            pcb_smtpad_id: id.to_string(),
            pcb_component_id: "pcb_component_0".to_string(),
            x: 0.0,
            y: 0.0,
            layer,
            shape,
            port_hints: vec![],
        })
    }

    fn trace(width: f64, layer: LayerRef) -> Element {
        let point = |x: f64| PcbRoutePoint {
            x,
            y: 0.0,
            width,
            layer,
            pcb_port_id: None,
        };
        Element::PcbTrace(PcbTrace {
            pcb_trace_id: "pcb_trace_0".to_string(),
            source_trace_id: "source_trace_0".to_string(),
            route: vec![point(0.0), point(1.0)],
        })
    }

    fn defined(glayer: &[GerberCommand]) -> Vec<(u32, ApertureTemplateConfig)> {
        glayer
            .iter()
            .filter_map(|c| match c {
                GerberCommand::DefineApertureTemplate {
                    aperture_number,
                    template,
                } => Some((*aperture_number, template.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_numbering_starts_at_ten() {
        assert_eq!(next_aperture_number(&[]), 10);
        let glayer = vec![GerberCommand::DefineApertureTemplate {
            aperture_number: 14,
            template: ApertureTemplateConfig::Circle { diameter: 1.0 },
        }];
        assert_eq!(next_aperture_number(&glayer), 15);
    }

    #[test]
    fn test_copper_apertures() {
        let rect = PadShape::Rect {
            width: 0.6,
            height: 0.5,
        };
        let elements = vec![
            trace(0.15, LayerRef::Top),
            trace(0.3, LayerRef::Bottom),
            pad("pcb_smtpad_0", rect.clone(), LayerRef::Top),
            pad("pcb_smtpad_1", rect, LayerRef::Top),
            pad("pcb_smtpad_2", PadShape::Circle { radius: 0.25 }, LayerRef::Top),
            pad("pcb_smtpad_3", PadShape::Circle { radius: 1.0 }, LayerRef::Bottom),
        ];
        let mut glayer = Vec::new();
        define_apertures_for_layer(&mut glayer, &elements, GerberLayerName::FCu);

        assert_eq!(
            defined(&glayer),
            vec![
                (10, ApertureTemplateConfig::Circle { diameter: 0.15 }),
                (
                    11,
                    ApertureTemplateConfig::Rectangle {
                        x_size: 0.6,
                        y_size: 0.5
                    }
                ),
                (12, ApertureTemplateConfig::Circle { diameter: 0.5 }),
            ]
        );
        assert_eq!(glayer.first(), Some(&GerberCommand::comment("aperture START LIST")));
        assert_eq!(glayer.last(), Some(&GerberCommand::comment("aperture END LIST")));
    }

    #[test]
    fn test_edge_cuts_defines_nothing() {
        let elements = vec![trace(0.15, LayerRef::Top)];
        let mut glayer = Vec::new();
        define_apertures_for_layer(&mut glayer, &elements, GerberLayerName::EdgeCuts);
        assert!(defined(&glayer).is_empty());
        assert_eq!(glayer.len(), 3);
    }
}
