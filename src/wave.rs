//! Two-direction harmonic wave synthesizer
//!
//! A right-traveling and a left-traveling periodic wave are summed with
//! weights `amp_right` and `1 - amp_right`, and the result `y` (nominally in
//! `[-1, 1]`) is mapped onto a two-color gradient.

use core::f32::consts::TAU;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use embassy_time::Duration;
use heapless::Vec;

use crate::color::{BLACK, Rgb, WHITE};
use crate::math::{away_from_zero, seconds, to_channel, wrap};

/// Maximum number of terms in a harmonic series
pub const MAX_HARMONICS: usize = 8;

/// Smallest magnitude accepted for a wavelength or speed
pub const MIN_WAVE_PARAM: f32 = 1e-3;

/// Error returned when a coefficient array exceeds [`MAX_HARMONICS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooManyTerms;

/// Periodic basis function of one traveling wave
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum WaveBasis {
    #[default]
    Sin = 0,
    Cos = 1,
    Tan = 2,
    /// `|x|`, computed as `hypot(x, 0)`
    Magnitude = 3,
    Sinh = 4,
    Cosh = 5,
    Tanh = 6,
}

impl WaveBasis {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Sin,
            1 => Self::Cos,
            2 => Self::Tan,
            3 => Self::Magnitude,
            4 => Self::Sinh,
            5 => Self::Cosh,
            6 => Self::Tanh,
            _ => return None,
        })
    }

    #[inline]
    pub fn eval(self, x: f32) -> f32 {
        match self {
            Self::Sin => libm::sinf(x),
            Self::Cos => libm::cosf(x),
            Self::Tan => libm::tanf(x),
            Self::Magnitude => libm::hypotf(x, 0.0),
            Self::Sinh => libm::sinhf(x),
            Self::Cosh => libm::coshf(x),
            Self::Tanh => libm::tanhf(x),
        }
    }
}

/// Propagation direction of one of the two waves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveDirection {
    /// Travels toward higher indices
    Right,
    /// Travels toward lower indices
    Left,
}

#[derive(Debug, Clone, Copy)]
pub struct WaveConfig {
    /// Color at `y = 1`
    pub hi: Rgb,
    /// Color at `y = -1`
    pub lo: Rgb,
    /// Weight of the right-traveling wave, the left one gets `1 - amp_right`
    pub amp_right: f32,
    /// Wavelength in lights
    pub wavelength_left: f32,
    /// Speed in lights per second
    pub speed_left: f32,
    pub wavelength_right: f32,
    pub speed_right: f32,
    pub basis_left: WaveBasis,
    pub basis_right: WaveBasis,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            hi: WHITE,
            lo: BLACK,
            amp_right: 0.5,
            wavelength_left: 16.0,
            speed_left: 8.0,
            wavelength_right: 16.0,
            speed_right: 8.0,
            basis_left: WaveBasis::Sin,
            basis_right: WaveBasis::Sin,
        }
    }
}

#[derive(Debug, Clone)]
struct TravelingWave {
    basis: WaveBasis,
    wavelength: f32,
    inv_wavelength: f32,
    period: f32,
    elapsed: f32,
    /// `elapsed / period`, refreshed whenever the clock moves
    phase: f32,
    coeffs: Vec<f32, MAX_HARMONICS>,
}

impl TravelingWave {
    fn new(basis: WaveBasis, wavelength: f32, speed: f32) -> Self {
        let mut wave = Self {
            basis,
            wavelength: 1.0,
            inv_wavelength: 1.0,
            period: 1.0,
            elapsed: 0.0,
            phase: 0.0,
            coeffs: Vec::new(),
        };
        wave.set_motion(wavelength, speed);
        wave
    }

    fn set_motion(&mut self, wavelength: f32, speed: f32) {
        self.wavelength = away_from_zero(wavelength, MIN_WAVE_PARAM);
        self.inv_wavelength = 1.0 / self.wavelength;
        let speed = away_from_zero(speed, MIN_WAVE_PARAM);
        self.period = self.wavelength / speed;
        self.elapsed = 0.0;
        self.phase = 0.0;
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = wrap(self.elapsed + dt, libm::fabsf(self.period));
        self.phase = self.elapsed / self.period;
    }

    /// Evaluate at phase `arg`, summing harmonics when installed
    fn eval(&self, arg: f32) -> f32 {
        if self.coeffs.is_empty() {
            return self.basis.eval(arg);
        }
        self.coeffs
            .iter()
            .enumerate()
            .map(|(k, c)| c * self.basis.eval((k + 1) as f32 * arg))
            .sum()
    }
}

/// Copy coefficients, scaling them so their absolute values sum to 1
fn normalized(coeffs: &[f32]) -> Result<Vec<f32, MAX_HARMONICS>, TooManyTerms> {
    let mut out: Vec<f32, MAX_HARMONICS> = Vec::from_slice(coeffs).map_err(|()| TooManyTerms)?;
    let sum: f32 = out.iter().map(|c| libm::fabsf(*c)).sum();
    if sum > 0.0 {
        for c in &mut out {
            *c /= sum;
        }
    }
    Ok(out)
}

/// Smooth two-color gradient driven by two traveling waves
#[derive(Debug, Clone)]
pub struct WaveSynth {
    hi: Rgb,
    lo: Rgb,
    amp_right: f32,
    amp_left: f32,
    right: TravelingWave,
    left: TravelingWave,
}

impl Default for WaveSynth {
    fn default() -> Self {
        Self::new(&WaveConfig::default())
    }
}

impl WaveSynth {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            hi: config.hi,
            lo: config.lo,
            amp_right: config.amp_right,
            amp_left: 1.0 - config.amp_right,
            right: TravelingWave::new(config.basis_right, config.wavelength_right, config.speed_right),
            left: TravelingWave::new(config.basis_left, config.wavelength_left, config.speed_left),
        }
    }

    /// Set amplitudes and motion of both waves, rewinding their clocks
    ///
    /// Wavelengths and speeds below [`MIN_WAVE_PARAM`] in magnitude are
    /// replaced by a signed [`MIN_WAVE_PARAM`].
    pub fn set_wave_data(
        &mut self,
        amp_right: f32,
        wavelength_left: f32,
        speed_left: f32,
        wavelength_right: f32,
        speed_right: f32,
    ) {
        self.amp_right = amp_right;
        self.amp_left = 1.0 - amp_right;
        self.left.set_motion(wavelength_left, speed_left);
        self.right.set_motion(wavelength_right, speed_right);
    }

    pub fn set_basis(&mut self, direction: WaveDirection, basis: WaveBasis) {
        self.wave_mut(direction).basis = basis;
    }

    /// Select a basis by raw id, ignoring unknown ids
    pub fn set_basis_raw(&mut self, direction: WaveDirection, id: u8) {
        let Some(basis) = WaveBasis::from_raw(id) else {
            #[cfg(feature = "esp32-log")]
            println!("[WaveSynth.set_basis_raw] unknown basis id {}", id);
            return;
        };
        self.set_basis(direction, basis);
    }

    pub fn basis(&self, direction: WaveDirection) -> WaveBasis {
        self.wave(direction).basis
    }

    /// Install harmonic weights, normalized so `Σ|c| = 1` per direction
    ///
    /// An empty slice removes the series for that direction. An all-zero
    /// slice is installed unscaled.
    pub fn set_series_coeffs(&mut self, right: &[f32], left: &[f32]) -> Result<(), TooManyTerms> {
        let right = normalized(right)?;
        let left = normalized(left)?;
        self.right.coeffs = right;
        self.left.coeffs = left;
        Ok(())
    }

    /// Install harmonic weights as given
    ///
    /// Unlike [`Self::set_series_coeffs`] nothing is rescaled, so the summed
    /// wave may leave `[-1, 1]`; the output colors still clamp per channel.
    pub fn set_series_coeffs_unnormalized(&mut self, right: &[f32], left: &[f32]) -> Result<(), TooManyTerms> {
        let right = Vec::from_slice(right).map_err(|()| TooManyTerms)?;
        let left = Vec::from_slice(left).map_err(|()| TooManyTerms)?;
        self.right.coeffs = right;
        self.left.coeffs = left;
        Ok(())
    }

    /// Drop both harmonic series and fall back to the bare basis
    pub fn clear_series(&mut self) {
        self.right.coeffs.clear();
        self.left.coeffs.clear();
    }

    pub fn series_coeffs(&self, direction: WaveDirection) -> &[f32] {
        &self.wave(direction).coeffs
    }

    pub fn set_colors(&mut self, hi: Rgb, lo: Rgb) {
        self.hi = hi;
        self.lo = lo;
    }

    pub const fn colors(&self) -> (Rgb, Rgb) {
        (self.hi, self.lo)
    }

    /// Elapsed time of each wave, wrapped to its period
    pub fn elapsed(&self, direction: WaveDirection) -> f32 {
        self.wave(direction).elapsed
    }

    /// Elapsed time of each wave as a fraction of its period
    pub fn phase(&self, direction: WaveDirection) -> f32 {
        self.wave(direction).phase
    }

    /// Advance both wave clocks
    pub fn advance(&mut self, dt: Duration) {
        let dt = seconds(dt);
        self.right.advance(dt);
        self.left.advance(dt);
    }

    /// Combined wave value at light `n`
    pub fn sample(&self, n: usize) -> f32 {
        let x = n as f32;
        let arg_right = (x * self.right.inv_wavelength - self.right.phase) * TAU;
        let arg_left = (x * self.left.inv_wavelength + self.left.phase) * TAU;
        self.amp_right * self.right.eval(arg_right) + self.amp_left * self.left.eval(arg_left)
    }

    /// Map a wave value onto the gradient, `hi` at 1 and `lo` at -1
    pub fn color_for(&self, y: f32) -> Rgb {
        let mix = |hi: u8, lo: u8| to_channel(0.5 * ((y + 1.0) * f32::from(hi) - (y - 1.0) * f32::from(lo)));
        Rgb {
            r: mix(self.hi.r, self.lo.r),
            g: mix(self.hi.g, self.lo.g),
            b: mix(self.hi.b, self.lo.b),
        }
    }

    /// Paint every light from the current wave state
    pub fn render(&self, leds: &mut [Rgb]) {
        for (n, led) in leds.iter_mut().enumerate() {
            *led = self.color_for(self.sample(n));
        }
    }

    /// Advance, then paint
    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) {
        self.advance(dt);
        self.render(leds);
    }

    fn wave(&self, direction: WaveDirection) -> &TravelingWave {
        match direction {
            WaveDirection::Right => &self.right,
            WaveDirection::Left => &self.left,
        }
    }

    fn wave_mut(&mut self, direction: WaveDirection) -> &mut TravelingWave {
        match direction {
            WaveDirection::Right => &mut self.right,
            WaveDirection::Left => &mut self.left,
        }
    }
}
