use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Circle, Point, Rect, Vec2};
use rand::Rng;

/// The fixed shape vocabulary a grid cell can hold.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rect,
    Circle,
    QuarterDisc,
    Triangle,
    Cross,
    Dots,
    Polygon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Rect,
        ShapeKind::Circle,
        ShapeKind::QuarterDisc,
        ShapeKind::Triangle,
        ShapeKind::Cross,
        ShapeKind::Dots,
        ShapeKind::Polygon,
    ];

    /// Caption label for the category this kind belongs to.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rect => "geometric rectangles",
            ShapeKind::Circle => "circular motifs",
            ShapeKind::QuarterDisc => "quarter-circle arcs",
            ShapeKind::Triangle => "triangular elements",
            ShapeKind::Cross => "intersecting crosses",
            ShapeKind::Dots => "dotted patterns",
            ShapeKind::Polygon => "irregular polygons",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Cell corner a quarter disc is anchored on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn of(self, cell: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(cell.x0, cell.y0),
            Corner::TopRight => Point::new(cell.x1, cell.y0),
            Corner::BottomRight => Point::new(cell.x1, cell.y1),
            Corner::BottomLeft => Point::new(cell.x0, cell.y1),
        }
    }

    /// Start angle of the quarter sweep pointing into the cell (y axis points down).
    pub fn start_angle(self) -> f64 {
        match self {
            Corner::TopLeft => 0.0,
            Corner::TopRight => FRAC_PI_2,
            Corner::BottomRight => PI,
            Corner::BottomLeft => 3.0 * FRAC_PI_2,
        }
    }
}

/// Geometry of one cell's shape, in canvas pixel space.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    /// Pie slice centered on a cell corner, bounded by the two cell edges meeting there.
    QuarterDisc {
        corner: Corner,
        center: Point,
        radius: f64,
    },
    /// Bottom-left, bottom-right, top-middle.
    Triangle([Point; 3]),
    Cross {
        horizontal: Rect,
        vertical: Rect,
    },
    Dots([Circle; 4]),
    /// 3 to 5 vertices scattered inside the cell; may be non-convex or self-intersecting.
    Polygon(Vec<Point>),
}

impl Shape {
    pub const CIRCLE_SCALE: std::ops::RangeInclusive<f64> = 0.6..=0.9;
    pub const DOT_OFFSETS: [f64; 2] = [0.3, 0.7];

    /// Build a shape of `kind` inside `cell`, drawing any free parameters from `rng`.
    pub fn build<R: Rng>(kind: ShapeKind, cell: Rect, rng: &mut R) -> Self {
        let (w, h) = (cell.width(), cell.height());
        let short = w.min(h);
        let center = cell.center();

        match kind {
            ShapeKind::Rect => Shape::Rect(cell),
            ShapeKind::Circle => {
                let radius = short / 2.0 * rng.random_range(Self::CIRCLE_SCALE);
                Shape::Circle(Circle::new(center, radius))
            }
            ShapeKind::QuarterDisc => {
                let corner = Corner::ALL[rng.random_range(0..Corner::ALL.len())];
                Shape::QuarterDisc {
                    corner,
                    center: corner.of(cell),
                    radius: short,
                }
            }
            ShapeKind::Triangle => Shape::Triangle([
                Point::new(cell.x0, cell.y1),
                Point::new(cell.x1, cell.y1),
                Point::new(center.x, cell.y0),
            ]),
            ShapeKind::Cross => {
                let bar = w / 5.0;
                let half = bar / 2.0;
                Shape::Cross {
                    horizontal: Rect::new(cell.x0, center.y - half, cell.x1, center.y + half),
                    vertical: Rect::new(center.x - half, cell.y0, center.x + half, cell.y1),
                }
            }
            ShapeKind::Dots => {
                let r = short / 10.0;
                let [a, b] = Self::DOT_OFFSETS;
                let at = |fx: f64, fy: f64| {
                    Circle::new(Point::new(cell.x0 + fx * w, cell.y0 + fy * h), r)
                };
                Shape::Dots([at(a, a), at(a, b), at(b, a), at(b, b)])
            }
            ShapeKind::Polygon => {
                let n = rng.random_range(3..=5);
                let points = (0..n)
                    .map(|_| {
                        Point::new(
                            cell.x0 + rng.random::<f64>() * w,
                            cell.y0 + rng.random::<f64>() * h,
                        )
                    })
                    .collect();
                Shape::Polygon(points)
            }
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::QuarterDisc { .. } => ShapeKind::QuarterDisc,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Cross { .. } => ShapeKind::Cross,
            Shape::Dots(_) => ShapeKind::Dots,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Exact axis-aligned bounds of the filled area.
    pub fn bounds(&self) -> Rect {
        fn circle_bounds(c: &Circle) -> Rect {
            Rect::from_center_size(c.center, (2.0 * c.radius, 2.0 * c.radius))
        }

        fn point_bounds(points: &[Point]) -> Rect {
            points
                .iter()
                .skip(1)
                .fold(Rect::from_points(points[0], points[0]), |acc, p| {
                    acc.union_pt(*p)
                })
        }

        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => circle_bounds(c),
            Shape::QuarterDisc {
                corner,
                center,
                radius,
            } => {
                let dx = match corner {
                    Corner::TopLeft | Corner::BottomLeft => *radius,
                    Corner::TopRight | Corner::BottomRight => -*radius,
                };
                let dy = match corner {
                    Corner::TopLeft | Corner::TopRight => *radius,
                    Corner::BottomLeft | Corner::BottomRight => -*radius,
                };
                Rect::from_points(*center, *center + Vec2::new(dx, dy))
            }
            Shape::Triangle(pts) => point_bounds(pts),
            Shape::Cross {
                horizontal,
                vertical,
            } => horizontal.union(*vertical),
            Shape::Dots(dots) => dots
                .iter()
                .map(circle_bounds)
                .reduce(|a, b| a.union(b))
                .unwrap_or(Rect::ZERO),
            Shape::Polygon(pts) if pts.is_empty() => Rect::ZERO,
            Shape::Polygon(pts) => point_bounds(pts),
        }
    }
}
