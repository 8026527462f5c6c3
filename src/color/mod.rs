mod utils;

use smart_leds::RGB8;
use smart_leds::hsv::Hsv as HSV;

pub use utils::{BLACK, WHITE, hsv2rgb, lerp_rgb, rgb2hsv, rgb_from_u32, scale_rgb};

pub type Rgb = RGB8;
pub type Hsv = HSV;
