mod tests {
    use embassy_time::Duration;
    use myrtio_light_players::{
        color::{BLACK, Rgb, WHITE},
        wave::{
            MAX_HARMONICS, MIN_WAVE_PARAM, TooManyTerms, WaveBasis, WaveConfig, WaveDirection,
            WaveSynth,
        },
    };

    const EPS: f32 = 1e-4;

    fn synth(amp_right: f32) -> WaveSynth {
        WaveSynth::new(&WaveConfig {
            amp_right,
            wavelength_left: 7.0,
            speed_left: 3.0,
            wavelength_right: 11.0,
            speed_right: 5.0,
            ..WaveConfig::default()
        })
    }

    #[test]
    fn test_amplitude_stays_in_range_with_normalized_series() {
        for amp_right in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let mut wave = synth(amp_right);
            wave.set_series_coeffs(&[3.0, -2.0, 1.0], &[1.0, 4.0]).unwrap();
            let mut leds = [BLACK; 48];

            for _ in 0..40 {
                wave.update(Duration::from_millis(37), &mut leds);
                for n in 0..leds.len() {
                    let y = wave.sample(n);
                    assert!(y.abs() <= 1.0 + EPS, "y = {y} at n = {n}");
                }
            }
        }
    }

    #[test]
    fn test_normalized_coefficients_sum_to_one() {
        let mut wave = synth(0.5);
        wave.set_series_coeffs(&[3.0, -2.0, 1.0], &[]).unwrap();
        let coeffs = wave.series_coeffs(WaveDirection::Right);
        let sum: f32 = coeffs.iter().map(|c| c.abs()).sum();
        assert!((sum - 1.0).abs() < EPS);
        assert!((coeffs[0] - 0.5).abs() < EPS);
        assert!(wave.series_coeffs(WaveDirection::Left).is_empty());
    }

    #[test]
    fn test_unnormalized_series_leaves_range() {
        let hi = Rgb::new(100, 100, 100);
        let config = WaveConfig {
            hi,
            lo: BLACK,
            amp_right: 1.0,
            basis_right: WaveBasis::Cos,
            ..WaveConfig::default()
        };

        let mut normalized = WaveSynth::new(&config);
        normalized.set_series_coeffs(&[2.0, 2.0], &[]).unwrap();
        assert_eq!(normalized.sample(0), 1.0);
        assert_eq!(normalized.color_for(normalized.sample(0)), hi);

        let mut raw = WaveSynth::new(&config);
        raw.set_series_coeffs_unnormalized(&[2.0, 2.0], &[]).unwrap();
        assert_eq!(raw.sample(0), 4.0);
        assert_eq!(raw.color_for(raw.sample(0)), Rgb::new(250, 250, 250));

        raw.set_series_coeffs_unnormalized(&[4.0, 4.0], &[]).unwrap();
        assert_eq!(raw.color_for(raw.sample(0)), WHITE);
    }

    #[test]
    fn test_color_endpoints() {
        let hi = Rgb::new(200, 10, 50);
        let lo = Rgb::new(0, 100, 30);
        let mut wave = synth(0.5);
        wave.set_colors(hi, lo);
        assert_eq!(wave.color_for(1.0), hi);
        assert_eq!(wave.color_for(-1.0), lo);
        assert_eq!(wave.color_for(0.0), Rgb::new(100, 55, 40));
        assert_eq!(wave.colors(), (hi, lo));
    }

    #[test]
    fn test_elapsed_wraps_modulo_period() {
        let mut wave = WaveSynth::default();
        wave.set_wave_data(0.5, 10.0, 5.0, 6.0, 4.0);
        wave.advance(Duration::from_millis(2500));
        assert!((wave.elapsed(WaveDirection::Left) - 0.5).abs() < EPS);
        assert!((wave.elapsed(WaveDirection::Right) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_set_wave_data_rewinds_clocks() {
        let mut wave = synth(0.5);
        wave.advance(Duration::from_millis(300));
        wave.set_wave_data(0.3, 8.0, 2.0, 8.0, 2.0);
        assert_eq!(wave.elapsed(WaveDirection::Left), 0.0);
        assert_eq!(wave.elapsed(WaveDirection::Right), 0.0);
    }

    #[test]
    fn test_right_wave_travels_toward_higher_indices() {
        let mut wave = WaveSynth::new(&WaveConfig {
            amp_right: 1.0,
            wavelength_right: 8.0,
            speed_right: 8.0,
            ..WaveConfig::default()
        });
        let before: Vec<f32> = (0..16).map(|n| wave.sample(n)).collect();
        wave.advance(Duration::from_millis(125));
        for n in 0..15 {
            assert!((wave.sample(n + 1) - before[n]).abs() < 1e-3);
        }
    }

    #[test]
    fn test_left_wave_travels_toward_lower_indices() {
        let mut wave = WaveSynth::new(&WaveConfig {
            amp_right: 0.0,
            wavelength_left: 8.0,
            speed_left: 8.0,
            ..WaveConfig::default()
        });
        let before: Vec<f32> = (0..16).map(|n| wave.sample(n)).collect();
        wave.advance(Duration::from_millis(125));
        for n in 1..16 {
            assert!((wave.sample(n - 1) - before[n]).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_wavelength_and_speed_are_guarded() {
        let mut wave = synth(0.5);
        wave.set_wave_data(0.5, 0.0, 0.0, 0.0, -0.0);
        wave.advance(Duration::from_millis(16));
        for n in 0..8 {
            assert!(wave.sample(n).is_finite());
        }
        assert!(MIN_WAVE_PARAM > 0.0);
    }

    #[test]
    fn test_basis_selection() {
        let mut wave = synth(0.5);
        assert_eq!(wave.basis(WaveDirection::Right), WaveBasis::Sin);

        wave.set_basis_raw(WaveDirection::Right, 5);
        assert_eq!(wave.basis(WaveDirection::Right), WaveBasis::Cosh);

        wave.set_basis_raw(WaveDirection::Right, 42);
        assert_eq!(wave.basis(WaveDirection::Right), WaveBasis::Cosh);

        wave.set_basis(WaveDirection::Left, WaveBasis::Tanh);
        assert_eq!(wave.basis(WaveDirection::Left), WaveBasis::Tanh);
    }

    #[test]
    fn test_basis_functions() {
        assert_eq!(WaveBasis::Sin.eval(0.0), 0.0);
        assert_eq!(WaveBasis::Cos.eval(0.0), 1.0);
        assert_eq!(WaveBasis::Magnitude.eval(-2.5), 2.5);
        assert_eq!(WaveBasis::Cosh.eval(0.0), 1.0);
        assert_eq!(WaveBasis::from_raw(7), None);
    }

    #[test]
    fn test_too_many_terms() {
        let mut wave = synth(0.5);
        let coeffs = [1.0; MAX_HARMONICS + 1];
        assert_eq!(wave.set_series_coeffs(&coeffs, &[]), Err(TooManyTerms));
        assert_eq!(wave.set_series_coeffs_unnormalized(&[], &coeffs), Err(TooManyTerms));
        assert!(wave.set_series_coeffs(&coeffs[..MAX_HARMONICS], &[]).is_ok());

        wave.clear_series();
        assert!(wave.series_coeffs(WaveDirection::Right).is_empty());
    }

    #[test]
    fn test_render_fills_buffer() {
        let mut wave = synth(0.5);
        let mut leds = [Rgb::new(1, 2, 3); 12];
        wave.update(Duration::from_millis(10), &mut leds);
        for (n, led) in leds.iter().enumerate() {
            assert_eq!(*led, wave.color_for(wave.sample(n)));
        }
    }

    #[test]
    fn test_phase_follows_clock() {
        let mut wave = WaveSynth::new(&WaveConfig {
            amp_right: 1.0,
            wavelength_right: 8.0,
            speed_right: 4.0,
            ..WaveConfig::default()
        });
        assert_eq!(wave.phase(WaveDirection::Right), 0.0);

        wave.advance(Duration::from_millis(500));
        assert!((wave.phase(WaveDirection::Right) - 0.25).abs() < EPS);
        let expected = ((3.0 / 8.0 - 0.25) * core::f32::consts::TAU).sin();
        assert!((wave.sample(3) - expected).abs() < EPS);

        wave.advance(Duration::from_millis(2000));
        assert!((wave.phase(WaveDirection::Right) - 0.25).abs() < EPS);

        wave.set_wave_data(1.0, 8.0, 4.0, 8.0, 4.0);
        assert_eq!(wave.phase(WaveDirection::Right), 0.0);
        assert_eq!(wave.phase(WaveDirection::Left), 0.0);
    }

    #[test]
    fn test_wave_empty_buffer_is_noop() {
        let mut wave = synth(0.5);
        for _ in 0..100 {
            wave.update(Duration::from_millis(100), &mut []);
        }
        for n in 0..4 {
            assert!(wave.sample(n).is_finite());
        }

        let mut short = [Rgb::new(1, 2, 3); 3];
        wave.update(Duration::from_millis(100), &mut short);
        for (n, led) in short.iter().enumerate() {
            assert_eq!(*led, wave.color_for(wave.sample(n)));
        }
    }
}
