use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use super::geometry::{Layout, Shape};
use crate::style::StyleSpec;

// Raster canvas
//------------------------------------------------------------------------------

pub(super) fn to_image(lay: &Layout, style: &StyleSpec) -> RgbaImage {
    let size = style.size;
    let scale = size as f64 / lay.units as f64;
    let fg = style.foreground.to_rgba();

    let mut canvas = RgbaImage::from_pixel(size, size, style.background.to_rgba());
    let shapes = lay.body.iter().chain(&lay.eye_frames).chain(&lay.eye_balls);
    for shape in shapes {
        match *shape {
            Shape::Rect { x, y, w, h } => fill_rect(&mut canvas, x, y, x + w, y + h, scale, fg),
            Shape::SquareRing { x, y, side, thickness: t } => {
                let (x1, y1) = (x + side, y + side);
                fill_rect(&mut canvas, x, y, x1, y + t, scale, fg);
                fill_rect(&mut canvas, x, y1 - t, x1, y1, scale, fg);
                fill_rect(&mut canvas, x, y + t, x + t, y1 - t, scale, fg);
                fill_rect(&mut canvas, x1 - t, y + t, x1, y1 - t, scale, fg);
            }
            _ => fill_shape(&mut canvas, shape, scale, fg),
        }
    }
    canvas
}

// First pixel whose centre lies at or after the edge
fn snap(v: f64, scale: f64, limit: u32) -> u32 {
    ((v * scale - 0.5).ceil().max(0.0) as u32).min(limit)
}

fn fill_rect(
    canvas: &mut RgbaImage,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    scale: f64,
    color: Rgba<u8>,
) {
    let (w, h) = canvas.dimensions();
    let (px0, px1) = (snap(x0, scale, w), snap(x1, scale, w));
    let (py0, py1) = (snap(y0, scale, h), snap(y1, scale, h));
    if px1 <= px0 || py1 <= py0 {
        return;
    }
    let rect = Rect::at(px0 as i32, py0 as i32).of_size(px1 - px0, py1 - py0);
    draw_filled_rect_mut(canvas, rect, color);
}

// Samples every pixel centre within the shape bounds
fn fill_shape(canvas: &mut RgbaImage, shape: &Shape, scale: f64, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    let (x0, y0, x1, y1) = shape.bounds();
    for py in snap(y0, scale, h)..snap(y1, scale, h) {
        for px in snap(x0, scale, w)..snap(x1, scale, w) {
            let (mx, my) = ((px as f64 + 0.5) / scale, (py as f64 + 0.5) / scale);
            if shape.contains(mx, my) {
                canvas.put_pixel(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod raster_tests {
    use image::Rgba;

    use super::to_image;
    use crate::builder::{QRBuilder, Region, QR};
    use crate::common::metadata::ECLevel;
    use crate::render::geometry::layout;
    use crate::style::{resolve, EyeShape, ModuleStyle, Rgb, Settings};

    fn hello() -> QR {
        QRBuilder::new(b"HELLO").ec_level(ECLevel::M).build().unwrap()
    }

    #[test]
    fn test_square_modules_fill_cells() {
        let qr = hello();
        let style = resolve(&Settings { size: 210, ..Settings::default() }).unwrap();
        let img = to_image(&layout(&qr, &style), &style);
        assert_eq!(img.dimensions(), (210, 210));

        let (black, white) = (Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]));
        for r in 0..21 {
            for c in 0..21 {
                let exp = if qr.is_dark_at(r, c) { black } else { white };
                let (x, y) = (c as u32 * 10, r as u32 * 10);
                assert_eq!(*img.get_pixel(x + 5, y + 5), exp, "centre of ({r}, {c})");
                assert_eq!(*img.get_pixel(x, y), exp, "corner of ({r}, {c})");
                assert_eq!(*img.get_pixel(x + 9, y + 9), exp, "corner of ({r}, {c})");
            }
        }
    }

    #[test]
    fn test_margin_is_background() {
        let qr = hello();
        let bg = Rgb::new(10, 200, 30);
        let settings = Settings { size: 290, margin: 4, background: bg, ..Settings::default() };
        let style = resolve(&settings).unwrap();
        let img = to_image(&layout(&qr, &style), &style);
        for i in 0..290 {
            for j in (0..40).chain(250..290) {
                assert_eq!(*img.get_pixel(i, j), bg.to_rgba());
                assert_eq!(*img.get_pixel(j, i), bg.to_rgba());
            }
        }
    }

    #[test]
    fn test_only_two_colors() {
        let qr = hello();
        let settings = Settings {
            size: 333,
            module_style: ModuleStyle::Dot,
            eye_frame: EyeShape::Circle,
            eye_ball: EyeShape::Circle,
            foreground: Rgb::new(200, 0, 0),
            ..Settings::default()
        };
        let style = resolve(&settings).unwrap();
        let img = to_image(&layout(&qr, &style), &style);
        let fg = Rgba([200, 0, 0, 255]);
        let bg = Rgba([255, 255, 255, 255]);
        assert!(img.pixels().all(|p| *p == fg || *p == bg));
        assert!(img.pixels().any(|p| *p == fg));
    }

    #[test]
    fn test_dots_leave_module_corners_light() {
        let qr = hello();
        let settings =
            Settings { size: 210, module_style: ModuleStyle::Dot, ..Settings::default() };
        let style = resolve(&settings).unwrap();
        let img = to_image(&layout(&qr, &style), &style);
        let white = Rgba([255, 255, 255, 255]);
        for r in 0..21 {
            for c in 0..21 {
                if !qr.is_dark_at(r, c) || qr.region_at(r, c) == Region::Finder {
                    continue;
                }
                let (x, y) = (c as u32 * 10, r as u32 * 10);
                assert_ne!(*img.get_pixel(x + 5, y + 5), white);
                assert_eq!(*img.get_pixel(x, y), white);
            }
        }
    }

    #[test]
    fn test_circle_eye_frame_hollow() {
        let qr = hello();
        let settings = Settings { size: 210, eye_frame: EyeShape::Circle, ..Settings::default() };
        let style = resolve(&settings).unwrap();
        let img = to_image(&layout(&qr, &style), &style);
        let white = Rgba([255, 255, 255, 255]);
        // Gap between ring and ball, and the corner outside the ring
        assert_eq!(*img.get_pixel(15, 35), white);
        assert_eq!(*img.get_pixel(1, 1), white);
        assert_ne!(*img.get_pixel(5, 35), white);
        assert_ne!(*img.get_pixel(35, 35), white);
    }
}
