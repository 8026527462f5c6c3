pub use smart_leds::hsv::hsv2rgb;

use crate::{
    color::{Hsv, Rgb},
    math::to_channel,
};

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Linearly interpolate two colors channel by channel
///
/// # Arguments
/// * `from` - Color at `t = 0.0`
/// * `to` - Color at `t = 1.0`
/// * `t` - Interpolation factor, not clamped (results are clamped per channel)
#[inline]
pub fn lerp_rgb(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let lerp = |a: u8, b: u8| {
        let a = f32::from(a);
        to_channel((1.0 - t) * a + t * f32::from(b))
    };
    Rgb {
        r: lerp(from.r, to.r),
        g: lerp(from.g, to.g),
        b: lerp(from.b, to.b),
    }
}

/// Scale every channel of a color by a float factor
#[inline]
pub fn scale_rgb(color: Rgb, factor: f32) -> Rgb {
    Rgb {
        r: to_channel(f32::from(color.r) * factor),
        g: to_channel(f32::from(color.g) * factor),
        b: to_channel(f32::from(color.b) * factor),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Wrap a signed hue sector offset onto the 0-255 circle
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn wrap_hue(hue: i16) -> u8 {
    if hue < 0 {
        (hue + 256) as u8
    } else {
        hue as u8
    }
}

/// Convert RGB to HSV (all channels are 0-255).
///
/// Hue is represented on a 0-255 circle, matching `smart_leds::hsv::Hsv`,
/// with the red, green and blue sectors starting at 0, 85 and 171.
#[allow(clippy::cast_possible_truncation)]
pub fn rgb2hsv(rgb: Rgb) -> Hsv {
    let Rgb { r, g, b } = rgb;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let sat = if max == 0 {
        0
    } else {
        ((u16::from(delta) * 255) / u16::from(max)) as u8
    };

    let hue = if delta == 0 {
        0
    } else {
        let delta = i16::from(delta);
        let (base, x, y) = if max == r {
            (0i16, g, b)
        } else if max == g {
            (85i16, b, r)
        } else {
            (171i16, r, g)
        };
        wrap_hue(base + (43 * (i16::from(x) - i16::from(y))) / delta)
    };

    Hsv { hue, sat, val: max }
}
