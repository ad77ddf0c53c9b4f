use crate::builder::{Region, QR};
use crate::style::{EyeShape, ModuleShape, StyleSpec};

// Shapes
//------------------------------------------------------------------------------

/// Primitive in module units, origin at the top left of the margin.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Shape {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    // Corner radii: top left, top right, bottom right, bottom left
    RoundedRect { x: f64, y: f64, w: f64, h: f64, radii: [f64; 4] },
    Circle { cx: f64, cy: f64, r: f64 },
    // Area between two concentric circles
    CircleRing { cx: f64, cy: f64, outer: f64, inner: f64 },
    // Square outline of the given side length and thickness
    SquareRing { x: f64, y: f64, side: f64, thickness: f64 },
}

impl Shape {
    /// Axis aligned bounds as `(x0, y0, x1, y1)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match *self {
            Shape::Rect { x, y, w, h } | Shape::RoundedRect { x, y, w, h, .. } => {
                (x, y, x + w, y + h)
            }
            Shape::Circle { cx, cy, r } | Shape::CircleRing { cx, cy, outer: r, .. } => {
                (cx - r, cy - r, cx + r, cy + r)
            }
            Shape::SquareRing { x, y, side, .. } => (x, y, x + side, y + side),
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x0, y0, x1, y1) = self.bounds();
        if px < x0 || py < y0 || px >= x1 || py >= y1 {
            return false;
        }
        match *self {
            Shape::Rect { .. } => true,
            Shape::RoundedRect { radii, .. } => {
                let corners = [
                    (x0 + radii[0], y0 + radii[0], radii[0]),
                    (x1 - radii[1], y0 + radii[1], radii[1]),
                    (x1 - radii[2], y1 - radii[2], radii[2]),
                    (x0 + radii[3], y1 - radii[3], radii[3]),
                ];
                corners.iter().enumerate().all(|(i, &(cx, cy, r))| {
                    // Outside the corner square the edge is straight
                    let in_corner_x = if i == 0 || i == 3 { px < cx } else { px > cx };
                    let in_corner_y = if i < 2 { py < cy } else { py > cy };
                    !(r > 0.0 && in_corner_x && in_corner_y) || dist_sq(px, py, cx, cy) <= r * r
                })
            }
            Shape::Circle { cx, cy, r } => dist_sq(px, py, cx, cy) <= r * r,
            Shape::CircleRing { cx, cy, outer, inner } => {
                let d = dist_sq(px, py, cx, cy);
                d <= outer * outer && d > inner * inner
            }
            Shape::SquareRing { thickness, .. } => {
                let inner = (x0 + thickness, y0 + thickness, x1 - thickness, y1 - thickness);
                px < inner.0 || py < inner.1 || px >= inner.2 || py >= inner.3
            }
        }
    }
}

fn dist_sq(x: f64, y: f64, cx: f64, cy: f64) -> f64 {
    (x - cx).powi(2) + (y - cy).powi(2)
}


// Layout
//------------------------------------------------------------------------------

/// Shapes for one symbol, shared by the vector and raster backends.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    // Side length in modules, margin included
    pub units: usize,
    pub body: Vec<Shape>,
    pub eye_frames: Vec<Shape>,
    pub eye_balls: Vec<Shape>,
}

pub fn layout(qr: &QR, style: &StyleSpec) -> Layout {
    let w = qr.width();
    let m = style.margin as f64;
    let units = w + 2 * style.margin as usize;

    let mut body = Vec::new();
    for r in 0..w as i32 {
        for c in 0..w as i32 {
            if qr.region_at(r, c) == Region::Finder || !qr.is_dark_at(r, c) {
                continue;
            }
            let (x, y) = (c as f64 + m, r as f64 + m);
            body.push(module_shape(qr, style.module, r, c, x, y));
        }
    }

    let corners = [(0, 0), (0, w - 7), (w - 7, 0)];
    let mut eye_frames = Vec::with_capacity(3);
    let mut eye_balls = Vec::with_capacity(3);
    for (r, c) in corners {
        let (x, y) = (c as f64 + m, r as f64 + m);
        eye_frames.push(match style.eye_frame {
            EyeShape::Square => Shape::SquareRing { x, y, side: 7.0, thickness: 1.0 },
            EyeShape::Circle => {
                Shape::CircleRing { cx: x + 3.5, cy: y + 3.5, outer: 3.5, inner: 2.5 }
            }
        });
        eye_balls.push(match style.eye_ball {
            EyeShape::Square => Shape::Rect { x: x + 2.0, y: y + 2.0, w: 3.0, h: 3.0 },
            EyeShape::Circle => Shape::Circle { cx: x + 3.5, cy: y + 3.5, r: 1.5 },
        });
    }

    Layout { units, body, eye_frames, eye_balls }
}

fn module_shape(qr: &QR, shape: ModuleShape, r: i32, c: i32, x: f64, y: f64) -> Shape {
    match shape {
        ModuleShape::Square => Shape::Rect { x, y, w: 1.0, h: 1.0 },
        ModuleShape::Dot { diameter } => {
            Shape::Circle { cx: x + 0.5, cy: y + 0.5, r: diameter / 2.0 }
        }
        ModuleShape::Round { radius } => {
            let light = |dr: i32, dc: i32| !qr.is_dark_at(r + dr, c + dc);
            let (up, right, down, left) = (light(-1, 0), light(0, 1), light(1, 0), light(0, -1));
            let corner = |a: bool, b: bool| if a && b { radius } else { 0.0 };
            let radii =
                [corner(up, left), corner(up, right), corner(down, right), corner(down, left)];
            if radius == 0.0 || radii.iter().all(|&r| r == 0.0) {
                Shape::Rect { x, y, w: 1.0, h: 1.0 }
            } else {
                Shape::RoundedRect { x, y, w: 1.0, h: 1.0, radii }
            }
        }
    }
}

#[cfg(test)]
mod layout_tests {
    use super::{layout, Shape};
    use crate::builder::{QRBuilder, Region};
    use crate::common::metadata::ECLevel;
    use crate::style::{resolve, EyeShape, ModuleStyle, Settings};

    fn spec(settings: Settings) -> crate::style::StyleSpec {
        resolve(&settings).unwrap()
    }

    #[test]
    fn test_body_skips_finders() {
        let qr = QRBuilder::new(b"HELLO").ec_level(ECLevel::M).build().unwrap();
        let lay = layout(&qr, &spec(Settings::default()));
        let finder_dark = 3 * (24 + 9);
        assert_eq!(lay.body.len(), qr.count_dark_modules() - finder_dark);
        assert_eq!(lay.eye_frames.len(), 3);
        assert_eq!(lay.eye_balls.len(), 3);
        assert_eq!(lay.units, 21);
    }

    #[test]
    fn test_margin_offsets_shapes() {
        let qr = QRBuilder::new(b"HELLO").build().unwrap();
        let lay = layout(&qr, &spec(Settings { margin: 4, ..Settings::default() }));
        assert_eq!(lay.units, 29);
        let frame = Shape::SquareRing { x: 4.0, y: 4.0, side: 7.0, thickness: 1.0 };
        assert_eq!(lay.eye_frames[0], frame);
        assert_eq!(lay.eye_balls[1], Shape::Rect { x: 20.0, y: 6.0, w: 3.0, h: 3.0 });
    }

    #[test]
    fn test_dot_body_with_circle_frame() {
        let qr = QRBuilder::new(b"HELLO").build().unwrap();
        let settings = Settings {
            module_style: ModuleStyle::Dot,
            eye_frame: EyeShape::Circle,
            eye_ball: EyeShape::Square,
            ..Settings::default()
        };
        let lay = layout(&qr, &spec(settings));
        assert!(lay.body.iter().all(|s| matches!(s, Shape::Circle { r, .. } if *r == 0.4)));
        assert!(lay.eye_frames.iter().all(|s| matches!(s, Shape::CircleRing { .. })));
        assert!(lay.eye_balls.iter().all(|s| matches!(s, Shape::Rect { w, .. } if *w == 3.0)));
    }

    #[test]
    fn test_round_only_rounds_exposed_corners() {
        let qr = QRBuilder::new(b"HELLO").build().unwrap();
        let settings = Settings { module_style: ModuleStyle::Round, ..Settings::default() };
        let lay = layout(&qr, &spec(settings));
        let w = qr.width() as i32;
        let mut checked = 0;
        for (r, c) in (0..w).flat_map(|r| (0..w).map(move |c| (r, c))) {
            let neighbours = [(-1, 0), (1, 0), (0, -1), (0, 1)];
            let isolated = qr.is_dark_at(r, c)
                && neighbours.iter().all(|(dr, dc)| !qr.is_dark_at(r + dr, c + dc));
            if !isolated || qr.region_at(r, c) == Region::Finder {
                continue;
            }
            let (x, y) = (c as f64, r as f64);
            let shape = lay.body.iter().find(|s| s.bounds().0 == x && s.bounds().1 == y).unwrap();
            assert_eq!(*shape, Shape::RoundedRect { x, y, w: 1.0, h: 1.0, radii: [0.25; 4] });
            checked += 1;
        }
        assert!(checked > 0);
    }
}
