use crate::foundation::core::{Canvas, Rect, Vec2};

/// Margin applied to a background that does not fit the canvas, as a fraction of the canvas side.
pub const BACKGROUND_INSET: f64 = 0.1;
/// Drawn side of a background that does not fit the canvas, as a fraction of the canvas side.
pub const BACKGROUND_SPAN: f64 = 0.8;
/// Offset of the bell from the top-left corner, as a fraction of the canvas side.
pub const FOREGROUND_INSET: f64 = 0.05;

/// How the drawn background width/height are derived from the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundAxes {
    /// Width follows the horizontal fit test and height the vertical one.
    #[default]
    Corrected,
    /// Width and height cross-applied: width from the vertical fit, height from the horizontal.
    Legacy,
}

/// Destination rectangle of a `img_w` x `img_h` background on `canvas`.
///
/// Per axis: an image smaller than the canvas is centred at its natural size, anything else is
/// inset by [`BACKGROUND_INSET`] and drawn at [`BACKGROUND_SPAN`] of the canvas.
pub fn background_rect(canvas: Canvas, img_w: u32, img_h: u32, axes: BackgroundAxes) -> Rect {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let (iw, ih) = (f64::from(img_w), f64::from(img_h));
    let fits_x = cw > iw;
    let fits_y = ch > ih;

    let x = if fits_x {
        (cw - iw) / 2.0
    } else {
        cw * BACKGROUND_INSET
    };
    let y = if fits_y {
        (ch - ih) / 2.0
    } else {
        ch * BACKGROUND_INSET
    };
    let span_x = if fits_x { iw } else { cw * BACKGROUND_SPAN };
    let span_y = if fits_y { ih } else { ch * BACKGROUND_SPAN };

    let (w, h) = match axes {
        BackgroundAxes::Corrected => (span_x, span_y),
        BackgroundAxes::Legacy => (span_y, span_x),
    };
    Rect::new(x, y, x + w, y + h)
}

/// Top-left of the bell on `canvas`.
pub fn foreground_origin(canvas: Canvas) -> Vec2 {
    Vec2::new(
        f64::from(canvas.width) * FOREGROUND_INSET,
        f64::from(canvas.height) * FOREGROUND_INSET,
    )
}

/// Rectangle that centres a `w` x `h` image on `canvas` at natural size.
pub fn centered_rect(canvas: Canvas, w: u32, h: u32) -> Rect {
    let x = (f64::from(canvas.width) - f64::from(w)) / 2.0;
    let y = (f64::from(canvas.height) - f64::from(h)) / 2.0;
    Rect::new(x, y, x + f64::from(w), y + f64::from(h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
