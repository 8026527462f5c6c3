//! Discrete on/off pattern playback
//!
//! A pattern is a pure predicate over `(n, step, param, grid)` selected by a
//! numeric function id. The ids are a stable wire contract shared with
//! stored configuration, so the gaps in the numbering are intentional.

mod fired;
mod sequencer;

pub use fired::FiredPatterns;
pub use sequencer::{PatternSequencer, PlaylistFull, SequencerConfig, SequencerCursor};

use crate::bounds::Grid;

/// Maximum number of steps in a sequencer playlist
pub const MAX_PATTERN_STEPS: usize = 32;

const PATTERN_ID_PAUSE: u8 = 0;
const PATTERN_ID_SCROLL_RIGHT: u8 = 1;
const PATTERN_ID_SCROLL_LEFT: u8 = 2;
const PATTERN_ID_FILL_RIGHT: u8 = 3;
const PATTERN_ID_FILL_LEFT: u8 = 4;
const PATTERN_ID_CRISS_CROSS: u8 = 5;
const PATTERN_ID_ALTERNATE_BLINK: u8 = 6;
const PATTERN_ID_CHECKER_BLINK: u8 = 7;
const PATTERN_ID_SCROLL_COLUMN_RIGHT: u8 = 10;
const PATTERN_ID_SCROLL_COLUMN_LEFT: u8 = 11;
const PATTERN_ID_SCROLL_ROW_DOWN: u8 = 12;
const PATTERN_ID_SCROLL_ROW_UP: u8 = 13;
const PATTERN_ID_BOX_IN: u8 = 14;
const PATTERN_ID_BOX_OUT: u8 = 15;
const PATTERN_ID_DIAGONAL: u8 = 16;
const PATTERN_ID_BITMAP: u8 = 100;

/// Known pattern functions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    /// All lights off for one step
    Pause = PATTERN_ID_PAUSE,
    /// A group of `param` lights moving toward higher indices
    ScrollRight = PATTERN_ID_SCROLL_RIGHT,
    /// A group of `param` lights moving toward lower indices
    ScrollLeft = PATTERN_ID_SCROLL_LEFT,
    FillRight = PATTERN_ID_FILL_RIGHT,
    FillLeft = PATTERN_ID_FILL_LEFT,
    /// Both scrolls at once
    CrissCross = PATTERN_ID_CRISS_CROSS,
    AlternateBlink = PATTERN_ID_ALTERNATE_BLINK,
    CheckerBlink = PATTERN_ID_CHECKER_BLINK,
    ScrollColumnRight = PATTERN_ID_SCROLL_COLUMN_RIGHT,
    ScrollColumnLeft = PATTERN_ID_SCROLL_COLUMN_LEFT,
    ScrollRowDown = PATTERN_ID_SCROLL_ROW_DOWN,
    ScrollRowUp = PATTERN_ID_SCROLL_ROW_UP,
    /// Rectangle border shrinking toward the center
    BoxIn = PATTERN_ID_BOX_IN,
    /// Rectangle border growing from the center
    BoxOut = PATTERN_ID_BOX_OUT,
    Diagonal = PATTERN_ID_DIAGONAL,
    /// States read from an external bitmap, one frame of `count` bits per step
    Bitmap = PATTERN_ID_BITMAP,
}

impl PatternId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_PAUSE => Self::Pause,
            PATTERN_ID_SCROLL_RIGHT => Self::ScrollRight,
            PATTERN_ID_SCROLL_LEFT => Self::ScrollLeft,
            PATTERN_ID_FILL_RIGHT => Self::FillRight,
            PATTERN_ID_FILL_LEFT => Self::FillLeft,
            PATTERN_ID_CRISS_CROSS => Self::CrissCross,
            PATTERN_ID_ALTERNATE_BLINK => Self::AlternateBlink,
            PATTERN_ID_CHECKER_BLINK => Self::CheckerBlink,
            PATTERN_ID_SCROLL_COLUMN_RIGHT => Self::ScrollColumnRight,
            PATTERN_ID_SCROLL_COLUMN_LEFT => Self::ScrollColumnLeft,
            PATTERN_ID_SCROLL_ROW_DOWN => Self::ScrollRowDown,
            PATTERN_ID_SCROLL_ROW_UP => Self::ScrollRowUp,
            PATTERN_ID_BOX_IN => Self::BoxIn,
            PATTERN_ID_BOX_OUT => Self::BoxOut,
            PATTERN_ID_DIAGONAL => Self::Diagonal,
            PATTERN_ID_BITMAP => Self::Bitmap,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }
}

/// One entry of a playlist
///
/// `function_id` is kept raw so that configuration carrying an unknown id
/// still plays (as length 1, all off) instead of being rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternStep {
    pub function_id: u8,
    /// Number of `update` calls each step is held for
    pub step_pause: u16,
    pub param: u16,
}

impl PatternStep {
    pub const fn new(function_id: u8, step_pause: u16, param: u16) -> Self {
        Self {
            function_id,
            step_pause,
            param,
        }
    }

    pub const fn from_id(id: PatternId, step_pause: u16, param: u16) -> Self {
        Self::new(id.as_raw(), step_pause, param)
    }

    pub fn id(self) -> Option<PatternId> {
        PatternId::from_raw(self.function_id)
    }
}

/// Externally supplied bit frames for [`PatternId::Bitmap`]
///
/// Bits are packed least significant first: bit `i` lives in
/// `bytes[i / 8] & (1 << (i % 8))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternBitmap<'a> {
    bytes: &'a [u8],
    bits: usize,
}

impl<'a> PatternBitmap<'a> {
    /// `bits` is capped at the number of bits actually present in `bytes`
    pub fn new(bytes: &'a [u8], bits: usize) -> Self {
        Self {
            bytes,
            bits: bits.min(bytes.len() * 8),
        }
    }

    pub const fn bits(&self) -> usize {
        self.bits
    }

    /// Read one bit, `false` past the end
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.bits {
            return false;
        }
        self.bytes
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }
}

/// Number of steps a pattern runs for
///
/// `bitmap_bits` is only consulted for [`PatternId::Bitmap`]. Unknown ids
/// last a single step.
pub fn pattern_length(step: &PatternStep, grid: Grid, bitmap_bits: usize) -> usize {
    let num_lights = grid.count();
    let Some(id) = step.id() else {
        return 1;
    };
    match id {
        PatternId::Pause => 1,
        PatternId::ScrollRight
        | PatternId::ScrollLeft
        | PatternId::FillRight
        | PatternId::FillLeft
        | PatternId::CrissCross => num_lights,
        PatternId::AlternateBlink | PatternId::CheckerBlink => usize::from(step.param),
        PatternId::ScrollColumnRight | PatternId::ScrollColumnLeft => grid.cols,
        PatternId::ScrollRowDown | PatternId::ScrollRowUp => grid.rows,
        PatternId::BoxIn | PatternId::BoxOut => grid.cols / 2,
        PatternId::Diagonal => grid.rows + grid.cols,
        PatternId::Bitmap => {
            if num_lights == 0 {
                0
            } else {
                bitmap_bits / num_lights
            }
        }
    }
}

/// Evaluate whether light `n` is on at `step_iter` of a pattern
///
/// Pure function of its inputs. Unknown ids, and the bitmap id without a
/// bitmap, evaluate to off.
#[allow(clippy::cast_possible_wrap)]
pub fn pattern_state(
    step: &PatternStep,
    n: usize,
    step_iter: usize,
    grid: Grid,
    bitmap: Option<&PatternBitmap<'_>>,
) -> bool {
    let Some(id) = step.id() else {
        return false;
    };

    let num = grid.count() as i64;
    let cols = grid.cols as i64;
    let rows = grid.rows as i64;
    let group = i64::from(step.param);
    let k = step_iter as i64;
    let i = n as i64;
    let row = grid.row_of(n) as i64;
    let col = grid.col_of(n) as i64;

    match id {
        PatternId::Pause => false,
        PatternId::ScrollRight => scroll_right(i, k, group),
        PatternId::ScrollLeft => scroll_left(i, k, group, num),
        PatternId::FillRight => i >= num - 1 - k,
        PatternId::FillLeft => i <= k,
        PatternId::CrissCross => scroll_right(i, k, group) || scroll_left(i, k, group, num),
        PatternId::AlternateBlink => (i + k) % 2 != 0,
        PatternId::CheckerBlink => (i + row + k) % 2 != 0,
        PatternId::ScrollColumnRight => col == k,
        PatternId::ScrollColumnLeft => col == cols - 1 - k,
        PatternId::ScrollRowDown => row == k,
        PatternId::ScrollRowUp => row == rows - 1 - k,
        PatternId::BoxIn => on_box_border(row, col, k, cols),
        PatternId::BoxOut => on_box_border(row, col, cols / 2 - 1 - k, cols),
        PatternId::Diagonal => k >= row && col == k - row,
        PatternId::Bitmap => bitmap.is_some_and(|bitmap| bitmap.bit(step_iter * grid.count() + n)),
    }
}

#[inline]
fn scroll_right(n: i64, step: i64, group: i64) -> bool {
    n >= step && n < step + group
}

#[inline]
fn scroll_left(n: i64, step: i64, group: i64, num: i64) -> bool {
    let edge = num - 1 - step;
    n <= edge && n + group > edge
}

/// Border of the rectangle inset by `inset` from every edge
#[inline]
fn on_box_border(row: i64, col: i64, inset: i64, cols: i64) -> bool {
    let mirror = cols - 1 - inset;
    let (lo, hi) = if inset <= mirror { (inset, mirror) } else { (mirror, inset) };
    let row_edge = (row == inset || row == mirror) && col >= lo && col <= hi;
    let col_edge = (col == inset || col == mirror) && row >= lo && row <= hi;
    row_edge || col_edge
}
