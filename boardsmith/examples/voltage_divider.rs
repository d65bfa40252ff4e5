//! Voltage divider example: build a small board and print its elements.

use boardsmith::prelude::*;
use boardsmith::ConnectivityMap;

#[tokio::main]
async fn main() -> Result<(), BuildError> {
    let mut project = ProjectBuilder::new(BuildOptions::default());
    project.add_board(|board| {
        board.set_size("30mm", "20mm").set_center(0.0, 0.0);
        board.add_group(|divider| {
            divider
                .set_name("divider")
                .add_resistor(|r| {
                    r.set_name("R1")
                        .set_resistance("10k")
                        .set_footprint("0805")
                        .set_pcb_center(-5.0, 0.0);
                })
                .add_resistor(|r| {
                    r.set_name("R2")
                        .set_resistance("10k")
                        .set_footprint("0805")
                        .set_pcb_center(5.0, 0.0);
                })
                .connect([".R1 > .negative", ".R2 > .positive"]);
        });
        board
            .add_power_source(|v| {
                v.set_name("V1").set_voltage("5V");
            })
            .add_ground(|g| {
                g.set_name("G1");
            })
            .connect([".V1 > .positive", ".R1 > .positive"])
            .connect([".R2 > .negative", ".G1 > .gnd"])
            .connect([".V1 > .negative", ".G1 > .gnd"]);
    });

    let output = project.build().await?;

    println!("Built {} elements", output.total_elements());
    println!(
        "  {} components, {} ports, {} traces, {} pads",
        output.stats.components, output.stats.ports, output.stats.traces, output.stats.pads
    );
    println!();

    for element in &output.elements {
        let (_, id) = element.id();
        println!("{:<22} {}", element.element_type(), id);
    }

    println!();
    println!("Connected sets:");
    for group in ConnectivityMap::from_elements(&output.elements).groups() {
        println!("  {}", group.join(" - "));
    }

    Ok(())
}
