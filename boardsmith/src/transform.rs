//! 2D affine transforms
//!
//! Components place their ports, symbol primitives and footprints in a local
//! frame. Once the placement (center, rotation) is known the local elements
//! are mapped into the board frame: rotate first, then translate.

use crate::elements::{Element, PadShape, Point};

/// Row-major 2x3 affine matrix:
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::identity()
        }
    }

    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Placement transform: rotate about the origin, then move to `center`.
    pub fn placement(center: Point, rotation_degrees: f64) -> Self {
        Self::compose(&[
            Self::translate(center.x, center.y),
            Self::rotate_degrees(rotation_degrees),
        ])
    }

    /// Left-to-right product; the rightmost matrix is applied first.
    pub fn compose(matrices: &[Matrix]) -> Self {
        matrices
            .iter()
            .fold(Self::identity(), |acc, m| acc.multiply(m))
    }

    pub fn multiply(&self, o: &Matrix) -> Self {
        Self {
            a: self.a * o.a + self.c * o.b,
            b: self.b * o.a + self.d * o.b,
            c: self.a * o.c + self.c * o.d,
            d: self.b * o.c + self.d * o.d,
            e: self.a * o.e + self.c * o.f + self.e,
            f: self.b * o.e + self.d * o.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: clean(self.a * p.x + self.c * p.y + self.e),
            y: clean(self.b * p.x + self.d * p.y + self.f),
        }
    }

    /// Rotation component in degrees, normalised to `[0, 360)`
    pub fn rotation_degrees(&self) -> f64 {
        let deg = self.b.atan2(self.a).to_degrees();
        clean(deg.rem_euclid(360.0))
    }
}

/// Snap float noise from sin/cos (e.g. `6.1e-17`) to the nearest
/// micro-unit so rotated output stays stable across builds.
fn clean(v: f64) -> f64 {
    let snapped = (v * 1e9).round() / 1e9;
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

fn is_quarter_turn(degrees: f64) -> bool {
    let r = degrees.rem_euclid(180.0);
    (r - 90.0).abs() < 1e-6
}

/// Map every schematic-domain position through `matrix`.
/// Non-schematic elements pass through unchanged.
pub fn transform_schematic_elements(elements: Vec<Element>, matrix: &Matrix) -> Vec<Element> {
    let rotation = matrix.rotation_degrees();
    elements
        .into_iter()
        .map(|element| match element {
            Element::SchematicPort(mut e) => {
                e.center = matrix.apply(e.center);
                e.facing_direction = e.facing_direction.rotated(rotation);
                Element::SchematicPort(e)
            }
            Element::SchematicLine(mut e) => {
                let p1 = matrix.apply(Point::new(e.x1, e.y1));
                let p2 = matrix.apply(Point::new(e.x2, e.y2));
                e.x1 = p1.x;
                e.y1 = p1.y;
                e.x2 = p2.x;
                e.y2 = p2.y;
                Element::SchematicLine(e)
            }
            Element::SchematicBox(mut e) => {
                let p = matrix.apply(Point::new(e.x, e.y));
                e.x = p.x;
                e.y = p.y;
                if is_quarter_turn(rotation) {
                    std::mem::swap(&mut e.width, &mut e.height);
                }
                Element::SchematicBox(e)
            }
            Element::SchematicText(mut e) => {
                e.position = matrix.apply(e.position);
                Element::SchematicText(e)
            }
            other => other,
        })
        .collect()
}

/// Map every pcb-domain position of footprint elements through `matrix`.
/// Non-pcb elements pass through unchanged.
pub fn transform_pcb_elements(elements: Vec<Element>, matrix: &Matrix) -> Vec<Element> {
    let rotation = matrix.rotation_degrees();
    let place = |x: f64, y: f64| matrix.apply(Point::new(x, y));
    elements
        .into_iter()
        .map(|element| match element {
            Element::PcbSmtpad(mut e) => {
                let p = place(e.x, e.y);
                e.x = p.x;
                e.y = p.y;
                if is_quarter_turn(rotation) {
                    if let PadShape::Rect { width, height } = e.shape {
                        e.shape = PadShape::Rect {
                            width: height,
                            height: width,
                        };
                    }
                }
                Element::PcbSmtpad(e)
            }
            Element::PcbPlatedHole(mut e) => {
                let p = place(e.x, e.y);
                e.x = p.x;
                e.y = p.y;
                Element::PcbPlatedHole(e)
            }
            Element::PcbHole(mut e) => {
                let p = place(e.x, e.y);
                e.x = p.x;
                e.y = p.y;
                Element::PcbHole(e)
            }
            Element::PcbVia(mut e) => {
                let p = place(e.x, e.y);
                e.x = p.x;
                e.y = p.y;
                Element::PcbVia(e)
            }
            Element::PcbSilkscreenLine(mut e) => {
                let p1 = place(e.x1, e.y1);
                let p2 = place(e.x2, e.y2);
                e.x1 = p1.x;
                e.y1 = p1.y;
                e.x2 = p2.x;
                e.y2 = p2.y;
                Element::PcbSilkscreenLine(e)
            }
            Element::PcbSilkscreenText(mut e) => {
                let p = place(e.x, e.y);
                e.x = p.x;
                e.y = p.y;
                Element::PcbSilkscreenText(e)
            }
            Element::PcbPort(mut e) => {
                let p = place(e.x, e.y);
                e.x = p.x;
                e.y = p.y;
                Element::PcbPort(e)
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{FacingDirection, SchematicPort};

    #[test]
    fn test_translate() {
        let m = Matrix::translate(2.0, 3.0);
        assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_rotate_then_translate() {
        let m = Matrix::placement(Point::new(10.0, 0.0), 90.0);
        // (0, -0.5) rotates to (0.5, 0), then moves by (10, 0)
        assert_eq!(m.apply(Point::new(0.0, -0.5)), Point::new(10.5, 0.0));
        assert_eq!(m.rotation_degrees(), 90.0);
    }

    #[test]
    fn test_identity_rotation() {
        assert_eq!(Matrix::identity().rotation_degrees(), 0.0);
        assert_eq!(Matrix::rotate_degrees(-90.0).rotation_degrees(), 270.0);
    }

    #[test]
    fn test_transform_schematic_port() {
        let port = Element::SchematicPort(SchematicPort {
            schematic_port_id: "schematic_port_0".to_string(),
            source_port_id: "source_port_0".to_string(),
            schematic_component_id: "schematic_component_0".to_string(),
            center: Point::new(0.0, -0.5),
            facing_direction: FacingDirection::Up,
        });
        let out = transform_schematic_elements(vec![port], &Matrix::placement(Point::new(1.0, 1.0), 180.0));
        match &out[0] {
            Element::SchematicPort(p) => {
                assert_eq!(p.center, Point::new(1.0, 1.5));
                assert_eq!(p.facing_direction, FacingDirection::Down);
            }
            other => panic!("Expected schematic port, got {:?}", other),
        }
    }
}
