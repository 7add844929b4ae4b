//! SVG rendering of a node diagram.
//!
//! [`Svg`] drives a paint pass over a manager with a fixed camera and
//! collects the painted primitives as SVG elements. The camera shifts the
//! diagram so its bounding box (plus a margin) starts at the document
//! origin.

use std::path::{Path, PathBuf};

use log::{debug, info};
use svg::Document;
use svg::node::element as svg_element;

use crate::color::Color;
use crate::draw::curve::{ConnectCurve, arrow_head};
use crate::draw::{FixedCamera, PaintContext, Painter};
use crate::error::TrellisError;
use crate::export;
use crate::geometry::{Circle, Rect, Vector};
use crate::manager::NodeManager;

const MARGIN: f32 = 50.0;
const FONT_FAMILY: &str = "Arial";

/// SVG exporter for a node diagram
pub struct Svg {
    file_name: PathBuf,
}

impl Svg {
    pub fn new(file_name: impl AsRef<Path>) -> Self {
        Self {
            file_name: file_name.as_ref().to_path_buf(),
        }
    }

    /// Renders the manager's diagram and writes it to the output file
    pub fn export(&self, manager: &NodeManager) -> Result<(), TrellisError> {
        let (camera, width, height) = self.framing(manager);

        let mut painter = SvgPainter::default();
        let mut ctx = PaintContext {
            painter: &mut painter,
            camera: &camera,
        };
        manager.paint(&mut ctx);

        let mut document = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);
        for element in painter.elements {
            document = document.add(element);
        }

        info!(file_name = self.file_name.display().to_string(); "Creating SVG file");
        svg::save(&self.file_name, &document).map_err(export::Error::Io)?;
        Ok(())
    }

    /// Computes the camera shift and document size covering every node
    fn framing(&self, manager: &NodeManager) -> (FixedCamera, f32, f32) {
        let mut min = Vector::new(0.0, 0.0);
        let mut max = Vector::new(0.0, 0.0);
        let mut first = true;
        for node in manager.nodes() {
            let shape = node.body_shape();
            if first {
                min = Vector::new(shape.left(), shape.top());
                max = Vector::new(shape.right(), shape.bottom());
                first = false;
            } else {
                min = Vector::new(min.x().min(shape.left()), min.y().min(shape.top()));
                max = Vector::new(max.x().max(shape.right()), max.y().max(shape.bottom()));
            }
        }

        let offset = Vector::new(MARGIN - min.x(), MARGIN - min.y());
        let width = (max.x() - min.x()) + MARGIN * 2.0;
        let height = (max.y() - min.y()) + MARGIN * 2.0;
        debug!("Final SVG dimensions: {width}x{height}");
        (FixedCamera::new(offset, 1.0), width, height)
    }
}

/// Collects painted primitives as SVG elements
#[derive(Default)]
struct SvgPainter {
    elements: Vec<Box<dyn svg::Node>>,
}

impl Painter for SvgPainter {
    fn draw_rect(
        &mut self,
        rect: Rect,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
        corner_radius: f32,
    ) {
        let element = svg_element::Rectangle::new()
            .set("x", rect.left())
            .set("y", rect.top())
            .set("width", rect.width())
            .set("height", rect.height())
            .set("rx", corner_radius)
            .set("fill", &fill)
            .set("fill-opacity", fill.alpha())
            .set("stroke", &stroke)
            .set("stroke-opacity", stroke.alpha())
            .set("stroke-width", stroke_width);
        self.elements.push(Box::new(element));
    }

    fn draw_circle(&mut self, circle: Circle, fill: Color, stroke: Color, stroke_width: f32) {
        let element = svg_element::Circle::new()
            .set("cx", circle.center().x())
            .set("cy", circle.center().y())
            .set("r", circle.radius())
            .set("fill", &fill)
            .set("fill-opacity", fill.alpha())
            .set("stroke", &stroke)
            .set("stroke-opacity", stroke.alpha())
            .set("stroke-width", stroke_width);
        self.elements.push(Box::new(element));
    }

    fn draw_text_centered(&mut self, center: Vector, text: &str, font_size: f32, color: Color) {
        let element = svg_element::Text::new(text)
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", font_size)
            .set("fill", &color);
        self.elements.push(Box::new(element));
    }

    fn draw_paragraph(
        &mut self,
        left_top: Vector,
        text: &str,
        wrap_width: f32,
        font_size: f32,
        color: Color,
        background: Color,
    ) {
        let line_height = font_size * 1.3;
        let lines: Vec<&str> = text.lines().collect();
        let panel_height = line_height * lines.len() as f32 + font_size;

        let panel = svg_element::Rectangle::new()
            .set("x", left_top.x())
            .set("y", left_top.y())
            .set("width", wrap_width)
            .set("height", panel_height)
            .set("fill", &background)
            .set("fill-opacity", background.alpha());
        self.elements.push(Box::new(panel));

        for (i, line) in lines.iter().enumerate() {
            let element = svg_element::Text::new(*line)
                .set("x", left_top.x() + font_size / 2.0)
                .set("y", left_top.y() + line_height * (i as f32 + 1.0))
                .set("font-family", FONT_FAMILY)
                .set("font-size", font_size)
                .set("fill", &color);
            self.elements.push(Box::new(element));
        }
    }

    fn draw_curve(&mut self, curve: ConnectCurve, color: Color, width: f32) {
        let data = format!(
            "M {} {} C {} {}, {} {}, {} {}",
            curve.start().x(),
            curve.start().y(),
            curve.control1().x(),
            curve.control1().y(),
            curve.control2().x(),
            curve.control2().y(),
            curve.end().x(),
            curve.end().y(),
        );
        let element = svg_element::Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("stroke", &color)
            .set("stroke-opacity", color.alpha())
            .set("stroke-width", width);
        self.elements.push(Box::new(element));
    }

    fn draw_arrow(&mut self, from: Vector, to: Vector, color: Color, width: f32, head_length: f32) {
        let shaft = svg_element::Line::new()
            .set("x1", from.x())
            .set("y1", from.y())
            .set("x2", to.x())
            .set("y2", to.y())
            .set("stroke", &color)
            .set("stroke-opacity", color.alpha())
            .set("stroke-width", width);
        self.elements.push(Box::new(shaft));

        let [left, right] = arrow_head(from, to, head_length);
        let points = format!(
            "{},{} {},{} {},{}",
            to.x(),
            to.y(),
            left.x(),
            left.y(),
            right.x(),
            right.y(),
        );
        let head = svg_element::Polygon::new()
            .set("points", points)
            .set("fill", &color)
            .set("fill-opacity", color.alpha());
        self.elements.push(Box::new(head));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::NodeManager;

    #[test]
    fn test_export_writes_svg_document() {
        let mut manager = NodeManager::default();
        let a = manager.add_node_at(Vector::new(0.0, 0.0));
        let b = manager.add_node_at(Vector::new(400.0, 0.0));
        manager.connect(a, b);

        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("diagram.svg");
        Svg::new(&path).export(&manager).expect("export succeeds");

        let content = std::fs::read_to_string(&path).expect("file written");
        assert!(content.contains("<svg"));
        assert!(content.contains("<rect"));
    }

    #[test]
    fn test_export_of_empty_diagram_succeeds() {
        let manager = NodeManager::default();
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("empty.svg");
        Svg::new(&path).export(&manager).expect("export succeeds");
        assert!(path.exists());
    }
}
