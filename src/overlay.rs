//! Draws detections onto an image for display or export.

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::common::{ClassLabel, SkDetection};
use crate::data::DetectionResult;

const CAPTION_HEIGHT: i32 = 20;
const CAPTION_PADDING: i32 = 4;
const CAPTION_SCALE: f32 = 12.;
const STROKE: i32 = 2;

pub fn label_colour(label: &ClassLabel) -> Rgb<u8> {
    match label {
        ClassLabel::Known(name) => match name.as_str() {
            "L2" => Rgb([78, 205, 196]),
            "L3" => Rgb([69, 183, 209]),
            "L4" => Rgb([150, 206, 180]),
            "L5" => Rgb([254, 202, 87]),
            _ => Rgb([255, 107, 107]),
        },
        ClassLabel::Synthesized(_) => Rgb([255, 107, 107]),
    }
}

/// Strokes each box and, when a font is given, writes its caption above the box
/// (or just inside it when the box touches the top edge).
///
/// Boxes must already be in `canvas` pixel space.
pub fn draw_detections(canvas: &mut RgbImage, detections: &[SkDetection], font: Option<&FontRef>) {
    for det in detections {
        let (x, y, w, h) = det.bbox.as_xy_wh_i32();
        let colour = label_colour(&det.label);

        for inset in 0..STROKE {
            let (rw, rh) = (w - 2 * inset, h - 2 * inset);
            if rw <= 0 || rh <= 0 {
                break;
            }
            let rect = Rect::at(x + inset, y + inset).of_size(rw as u32, rh as u32);
            draw_hollow_rect_mut(canvas, rect, colour);
        }

        if let Some(font) = font {
            draw_caption(canvas, det, x, y, colour, font);
        }
    }
}

fn draw_caption(canvas: &mut RgbImage, det: &SkDetection, x: i32, y: i32, colour: Rgb<u8>, font: &FontRef) {
    let text = det.caption();
    let scale = PxScale::from(CAPTION_SCALE);
    let (text_w, _) = text_size(scale, font, &text);

    let baseline = if y > CAPTION_HEIGHT { y - STROKE } else { y + CAPTION_HEIGHT };
    let top = baseline - CAPTION_HEIGHT;
    let width = text_w as i32 + 2 * CAPTION_PADDING;

    draw_filled_rect_mut(canvas, Rect::at(x, top).of_size(width as u32, CAPTION_HEIGHT as u32), colour);
    draw_text_mut(canvas, Rgb([255, 255, 255]), x + CAPTION_PADDING, top + CAPTION_PADDING, scale, font, &text);
}

/// Copy of `image` with `result` drawn in image space.
pub fn render_overlay(image: &RgbImage, result: &DetectionResult, font: Option<&FontRef>) -> RgbImage {
    let mut canvas = image.clone();
    draw_detections(&mut canvas, &result.image_space(), font);
    canvas
}
