//! Scene to SVG document serialization.

use std::fmt::Write as _;

use kurbo::{BezPath, Circle, Point, Rect, Shape as _};

use crate::{
    color::Rgb8,
    compose::Scene,
    shape::Shape,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

// Flattening tolerance for curves that have no direct SVG element.
const PATH_TOLERANCE: f64 = 0.1;

/// Serialize `scene` into a standalone SVG document sized to its canvas.
pub fn scene_to_svg(scene: &Scene) -> String {
    let size = scene.canvas.size;
    let mut out = String::with_capacity(256 + scene.cells.len() * 128);

    let _ = writeln!(
        out,
        r#"<svg xmlns="{SVG_NS}" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    push_rect(&mut out, scene.canvas.bounds(), scene.background);
    for cell in &scene.cells {
        push_shape(&mut out, &cell.shape, cell.fill);
    }
    out.push_str("</svg>\n");
    out
}

fn push_shape(out: &mut String, shape: &Shape, fill: Rgb8) {
    match shape {
        Shape::Rect(r) => push_rect(out, *r, fill),
        Shape::Circle(c) => push_circle(out, c, fill),
        Shape::QuarterDisc {
            corner,
            center,
            radius,
        } => {
            let wedge = Circle::new(*center, *radius).segment(
                0.0,
                corner.start_angle(),
                std::f64::consts::FRAC_PI_2,
            );
            push_path(out, &wedge.to_path(PATH_TOLERANCE), fill);
        }
        Shape::Triangle(pts) => push_path(out, &polygon_path(pts), fill),
        Shape::Cross {
            horizontal,
            vertical,
        } => {
            push_rect(out, *horizontal, fill);
            push_rect(out, *vertical, fill);
        }
        Shape::Dots(dots) => {
            for dot in dots {
                push_circle(out, dot, fill);
            }
        }
        Shape::Polygon(pts) => push_path(out, &polygon_path(pts), fill),
    }
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

fn push_rect(out: &mut String, r: Rect, fill: Rgb8) {
    let _ = writeln!(
        out,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"/>"#,
        r.x0,
        r.y0,
        r.width(),
        r.height()
    );
}

fn push_circle(out: &mut String, c: &Circle, fill: Rgb8) {
    let _ = writeln!(
        out,
        r#"  <circle cx="{}" cy="{}" r="{}" fill="{fill}"/>"#,
        c.center.x, c.center.y, c.radius
    );
}

fn push_path(out: &mut String, path: &BezPath, fill: Rgb8) {
    let _ = writeln!(out, r#"  <path d="{}" fill="{fill}"/>"#, path.to_svg());
}
