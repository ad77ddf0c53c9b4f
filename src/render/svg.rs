use std::fmt::Write;

use super::geometry::{Layout, Shape};
use crate::style::StyleSpec;

// Svg document
//------------------------------------------------------------------------------

pub(super) fn to_svg(lay: &Layout, style: &StyleSpec) -> String {
    let size = style.size;
    let scale = size as f64 / lay.units as f64;
    let fg = style.foreground.to_hex();

    let mut out = String::with_capacity(256 + lay.body.len() * 48);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{size}\" \
         height=\"{size}\" viewBox=\"0 0 {size} {size}\">"
    );
    let _ = writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{size}\" height=\"{size}\" fill=\"{}\"/>",
        style.background.to_hex()
    );
    push_path(&mut out, "body", &fg, &lay.body, scale);
    push_path(&mut out, "eye-frame", &fg, &lay.eye_frames, scale);
    push_path(&mut out, "eye-ball", &fg, &lay.eye_balls, scale);
    out.push_str("</svg>\n");
    out
}

fn push_path(out: &mut String, class: &str, fill: &str, shapes: &[Shape], scale: f64) {
    if shapes.is_empty() {
        return;
    }
    let mut d = String::with_capacity(shapes.len() * 40);
    for shape in shapes {
        push_shape(&mut d, shape, scale);
    }
    // Rings are drawn as two nested outlines
    let is_ring = |s: &Shape| matches!(s, Shape::CircleRing { .. } | Shape::SquareRing { .. });
    let rule = if shapes.iter().any(is_ring) { " fill-rule=\"evenodd\"" } else { "" };
    let _ = writeln!(out, "<path class=\"{class}\" fill=\"{fill}\"{rule} d=\"{d}\"/>");
}

fn push_shape(d: &mut String, shape: &Shape, s: f64) {
    match *shape {
        Shape::Rect { x, y, w, h } => push_rect(d, x * s, y * s, (x + w) * s, (y + h) * s),
        Shape::RoundedRect { x, y, w, h, radii } => {
            let (x0, y0, x1, y1) = (x * s, y * s, (x + w) * s, (y + h) * s);
            let [tl, tr, br, bl] = radii.map(|r| r * s);
            let _ = write!(d, "M{} {}H{}", num(x0 + tl), num(y0), num(x1 - tr));
            push_arc(d, tr, x1, y0 + tr);
            let _ = write!(d, "V{}", num(y1 - br));
            push_arc(d, br, x1 - br, y1);
            let _ = write!(d, "H{}", num(x0 + bl));
            push_arc(d, bl, x0, y1 - bl);
            let _ = write!(d, "V{}", num(y0 + tl));
            push_arc(d, tl, x0 + tl, y0);
            d.push('Z');
        }
        Shape::Circle { cx, cy, r } => push_circle(d, cx * s, cy * s, r * s),
        Shape::CircleRing { cx, cy, outer, inner } => {
            push_circle(d, cx * s, cy * s, outer * s);
            push_circle(d, cx * s, cy * s, inner * s);
        }
        Shape::SquareRing { x, y, side, thickness } => {
            let (x1, y1) = (x + side, y + side);
            push_rect(d, x * s, y * s, x1 * s, y1 * s);
            let t = thickness;
            push_rect(d, (x + t) * s, (y + t) * s, (x1 - t) * s, (y1 - t) * s);
        }
    }
}

fn push_rect(d: &mut String, x0: f64, y0: f64, x1: f64, y1: f64) {
    let _ = write!(d, "M{} {}H{}V{}H{}Z", num(x0), num(y0), num(x1), num(y1), num(x0));
}

fn push_circle(d: &mut String, cx: f64, cy: f64, r: f64) {
    let (rs, y) = (num(r), num(cy));
    let (left, right) = (num(cx - r), num(cx + r));
    let _ = write!(d, "M{left} {y}A{rs} {rs} 0 1 0 {right} {y}A{rs} {rs} 0 1 0 {left} {y}Z");
}

// Clockwise quarter arc to (x, y); a zero radius leaves the corner square
fn push_arc(d: &mut String, r: f64, x: f64, y: f64) {
    if r > 0.0 {
        let rs = num(r);
        let _ = write!(d, "A{rs} {rs} 0 0 1 {} {}", num(x), num(y));
    } else {
        let _ = write!(d, "L{} {}", num(x), num(y));
    }
}

// Up to 2 decimals, trailing zeros trimmed
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod svg_tests {
    use std::collections::HashSet;

    use super::{num, to_svg};
    use crate::builder::QRBuilder;
    use crate::common::metadata::ECLevel;
    use crate::render::geometry::layout;
    use crate::style::{resolve, EyeShape, ModuleStyle, Rgb, Settings};

    fn svg(settings: Settings) -> String {
        let qr = QRBuilder::new(b"HELLO").ec_level(ECLevel::M).build().unwrap();
        let style = resolve(&settings).unwrap();
        to_svg(&layout(&qr, &style), &style)
    }

    #[test]
    fn test_num() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(9.523809), "9.52");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(0.0), "0");
    }

    #[test]
    fn test_document_frame() {
        let out = svg(Settings::default());
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg "));
        assert!(out.contains("width=\"200\" height=\"200\" viewBox=\"0 0 200 200\""));
        let bg = "<rect x=\"0\" y=\"0\" width=\"200\" height=\"200\" fill=\"#ffffff\"/>";
        assert!(out.contains(bg));
        assert!(out.contains("<path class=\"body\" fill=\"#000000\" d=\"M"));
        assert!(out.contains("<path class=\"eye-frame\" fill=\"#000000\" fill-rule=\"evenodd\""));
        assert!(out.contains("<path class=\"eye-ball\" fill=\"#000000\" d=\"M"));
        assert!(out.ends_with("</svg>\n"));
    }

    #[test]
    fn test_only_configured_colors() {
        let fg = Rgb::new(0x12, 0x34, 0x56);
        let bg = Rgb::new(0xfe, 0xdc, 0xba);
        let out = svg(Settings { foreground: fg, background: bg, ..Settings::default() });
        let colors = out
            .match_indices("fill=\"#")
            .map(|(i, _)| &out[i + 6..i + 13])
            .collect::<HashSet<_>>();
        assert_eq!(colors, HashSet::from(["#123456", "#fedcba"]));
    }

    #[test]
    fn test_circle_eyes_use_arcs() {
        let out = svg(Settings {
            module_style: ModuleStyle::Dot,
            eye_frame: EyeShape::Circle,
            eye_ball: EyeShape::Circle,
            ..Settings::default()
        });
        let frame = out.lines().find(|l| l.contains("eye-frame")).unwrap();
        // 3 eyes, 2 circles each, 2 arcs per circle
        assert_eq!(frame.matches('A').count(), 12);
        let ball = out.lines().find(|l| l.contains("eye-ball")).unwrap();
        assert_eq!(ball.matches('A').count(), 6);
        assert!(!ball.contains("evenodd"));
    }

    #[test]
    fn test_square_body_scaled_to_size() {
        // 21 modules + 2 * 2 margin = 25 units at 250px is 10px per module
        let out = svg(Settings { size: 250, margin: 2, ..Settings::default() });
        let frame = out.lines().find(|l| l.contains("eye-frame")).unwrap();
        assert!(frame.contains("M20 20H90V90H20Z"));
        assert!(frame.contains("M30 30H80V80H30Z"));
    }

    #[test]
    fn test_deterministic() {
        let settings = Settings { module_style: ModuleStyle::Round, ..Settings::default() };
        assert_eq!(svg(settings.clone()), svg(settings));
    }
}
