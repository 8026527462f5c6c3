//! Per-pixel blend functions used by the layer compositor
//!
//! All blends are pure and channel-wise. `a` is the accumulated output and
//! `b` is the layer being folded in. Dispatch goes through the [`BlendMode`]
//! enum so the per-pixel loop stays free of indirect calls.

use crate::color::{Rgb, hsv2rgb, lerp_rgb, rgb2hsv, scale_rgb};
use crate::math::to_channel;

const BLEND_NAME_MULTIPLY: &str = "multiply";
const BLEND_NAME_ADD: &str = "add";
const BLEND_NAME_SCREEN: &str = "screen";
const BLEND_NAME_HSV_CONTRAST: &str = "hsv_contrast";
const BLEND_NAME_SELECTIVE_MASK: &str = "selective_mask";

const BLEND_ID_MULTIPLY: u8 = 0;
const BLEND_ID_ADD: u8 = 1;
const BLEND_ID_SCREEN: u8 = 2;
const BLEND_ID_HSV_CONTRAST: u8 = 3;
const BLEND_ID_SELECTIVE_MASK: u8 = 4;

/// Half turn on the 0-255 hue circle
const HUE_HALF_TURN: u8 = 128;

/// Blend function assigned to a layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BlendMode {
    /// `a * factor`; the layer only matters through the factor
    Multiply = BLEND_ID_MULTIPLY,
    /// `min(255, a + b * factor)`
    #[default]
    Add = BLEND_ID_ADD,
    /// `255 - (255 - a)(255 - b * factor) / 255`
    Screen = BLEND_ID_SCREEN,
    /// Blend `a` toward its hue-opposite by `factor`
    HsvContrast = BLEND_ID_HSV_CONTRAST,
    /// Scale `a` by `b.r / 255`, letting a layer act as a luminance mask
    SelectiveMask = BLEND_ID_SELECTIVE_MASK,
}

impl BlendMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            BLEND_ID_MULTIPLY => Self::Multiply,
            BLEND_ID_ADD => Self::Add,
            BLEND_ID_SCREEN => Self::Screen,
            BLEND_ID_HSV_CONTRAST => Self::HsvContrast,
            BLEND_ID_SELECTIVE_MASK => Self::SelectiveMask,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Multiply => BLEND_NAME_MULTIPLY,
            Self::Add => BLEND_NAME_ADD,
            Self::Screen => BLEND_NAME_SCREEN,
            Self::HsvContrast => BLEND_NAME_HSV_CONTRAST,
            Self::SelectiveMask => BLEND_NAME_SELECTIVE_MASK,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            BLEND_NAME_MULTIPLY => Some(Self::Multiply),
            BLEND_NAME_ADD => Some(Self::Add),
            BLEND_NAME_SCREEN => Some(Self::Screen),
            BLEND_NAME_HSV_CONTRAST => Some(Self::HsvContrast),
            BLEND_NAME_SELECTIVE_MASK => Some(Self::SelectiveMask),
            _ => None,
        }
    }

    /// Blend a single pixel
    #[inline]
    pub fn blend(self, a: Rgb, b: Rgb, factor: f32) -> Rgb {
        match self {
            Self::Multiply => multiply(a, b, factor),
            Self::Add => add(a, b, factor),
            Self::Screen => screen(a, b, factor),
            Self::HsvContrast => hsv_contrast(a, b, factor),
            Self::SelectiveMask => selective_mask(a, b, factor),
        }
    }

    /// Fold `layer` into `output` pixel by pixel
    ///
    /// Only the overlapping prefix of the two slices is touched.
    pub fn apply(self, output: &mut [Rgb], layer: &[Rgb], factor: f32) {
        for (a, b) in output.iter_mut().zip(layer) {
            *a = self.blend(*a, *b, factor);
        }
    }
}

#[inline]
pub fn multiply(a: Rgb, _b: Rgb, factor: f32) -> Rgb {
    scale_rgb(a, factor)
}

#[inline]
pub fn add(a: Rgb, b: Rgb, factor: f32) -> Rgb {
    let add = |a: u8, b: u8| to_channel(f32::from(a) + f32::from(to_channel(f32::from(b) * factor)));
    Rgb {
        r: add(a.r, b.r),
        g: add(a.g, b.g),
        b: add(a.b, b.b),
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn screen(a: Rgb, b: Rgb, factor: f32) -> Rgb {
    let screen = |a: u8, b: u8| {
        let inv_a = 255 - u16::from(a);
        let inv_b = 255 - u16::from(to_channel(f32::from(b) * factor));
        (255 - (inv_a * inv_b) / 255) as u8
    };
    Rgb {
        r: screen(a.r, b.r),
        g: screen(a.g, b.g),
        b: screen(a.b, b.b),
    }
}

#[inline]
pub fn hsv_contrast(a: Rgb, _b: Rgb, factor: f32) -> Rgb {
    let mut hsv = rgb2hsv(a);
    hsv.hue = hsv.hue.wrapping_add(HUE_HALF_TURN);
    lerp_rgb(a, hsv2rgb(hsv), factor)
}

#[inline]
pub fn selective_mask(a: Rgb, b: Rgb, _factor: f32) -> Rgb {
    scale_rgb(a, f32::from(b.r) / 255.0)
}
