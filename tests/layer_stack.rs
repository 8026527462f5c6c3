mod tests {
    use embassy_time::Duration;
    use myrtio_light_players::{
        blend::BlendMode,
        color::{BLACK, Rgb, WHITE},
        command::Command,
        layer::{Layer, LayerEvent, LayerSlot, LayerStack, PlayerStack},
        pattern::{FiredPatterns, PatternId, PatternSequencer, PatternStep, SequencerConfig},
        bounds::Grid,
        player::{
            PulseConfig, PulseEvent, PulseSpawner, PulseSpawnerConfig, PulseTraveler, RainbowConfig,
            RainbowSweep, RingConfig, RingWave,
        },
    };

    const TICK: Duration = Duration::from_millis(100);
    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    /// Paints one color and counts its updates
    #[derive(Debug)]
    struct Solid {
        color: Rgb,
        updates: u32,
        running: bool,
    }

    impl Solid {
        fn new(color: Rgb) -> Self {
            Self {
                color,
                updates: 0,
                running: true,
            }
        }
    }

    impl Layer for Solid {
        fn update(&mut self, _dt: Duration) -> Option<PulseEvent> {
            self.updates += 1;
            None
        }

        fn render(&mut self, out: &mut [Rgb]) {
            out.fill(self.color);
        }

        fn start(&mut self) {
            self.running = true;
        }

        fn stop(&mut self) {
            self.running = false;
        }

        fn set_colors(&mut self, primary: Rgb, _secondary: Rgb) {
            self.color = primary;
        }
    }

    fn frame<L: Layer, const LEDS: usize, const LAYERS: usize>(
        stack: &mut LayerStack<L, LEDS, LAYERS>,
    ) -> [Rgb; LEDS] {
        let mut out = [RED; LEDS];
        stack.render(&mut out);
        out
    }

    #[test]
    fn test_empty_stack_renders_black() {
        let mut stack: LayerStack<Solid, 6, 2> = LayerStack::new(6);
        assert!(stack.is_empty());
        assert_eq!(frame(&mut stack), [BLACK; 6]);
    }

    #[test]
    fn test_lights_past_length_stay_black() {
        let mut stack: LayerStack<Solid, 8, 2> = LayerStack::new(5);
        stack.push(Solid::new(WHITE)).unwrap();
        assert_eq!(stack.light_count(), 5);

        let out = frame(&mut stack);
        assert_eq!(out[..5], [WHITE; 5]);
        assert_eq!(out[5..], [BLACK; 3]);

        let stack: LayerStack<Solid, 8, 2> = LayerStack::new(100);
        assert_eq!(stack.light_count(), 8);
    }

    #[test]
    fn test_stack_order_matters() {
        let grey = Rgb::new(51, 0, 0);

        let mut stack: LayerStack<Solid, 4, 2> = LayerStack::new(4);
        stack.push(Solid::new(WHITE)).unwrap();
        stack
            .push_with_blend(Solid::new(grey), Some(BlendMode::SelectiveMask))
            .unwrap();
        assert_eq!(frame(&mut stack), [Rgb::new(51, 51, 51); 4]);

        let mut stack: LayerStack<Solid, 4, 2> = LayerStack::new(4);
        stack.push(Solid::new(grey)).unwrap();
        stack
            .push_with_blend(Solid::new(WHITE), Some(BlendMode::SelectiveMask))
            .unwrap();
        assert_eq!(frame(&mut stack), [grey; 4]);
    }

    #[test]
    fn test_layers_default_to_additive_blend() {
        let mut stack: LayerStack<Solid, 3, 2> = LayerStack::new(3);
        stack.push(Solid::new(Rgb::new(100, 0, 200))).unwrap();
        stack.push(Solid::new(Rgb::new(100, 50, 100))).unwrap();
        assert_eq!(stack.stacked()[1].blend, None);
        assert_eq!(frame(&mut stack), [Rgb::new(200, 50, 255); 3]);
    }

    #[test]
    fn test_disabled_layer_is_frozen_and_hidden() {
        let mut stack: LayerStack<Solid, 4, 2> = LayerStack::new(4);
        stack.push(Solid::new(RED)).unwrap();
        stack.push(Solid::new(Rgb::new(0, 0, 255))).unwrap();

        assert!(stack.set_enabled(1, false));
        assert!(!stack.is_enabled(1));
        stack.update(TICK);
        stack.update(TICK);

        assert_eq!(stack.layer(0).unwrap().updates, 2);
        assert_eq!(stack.layer(1).unwrap().updates, 0);
        assert_eq!(frame(&mut stack), [RED; 4]);

        assert!(stack.set_enabled(1, true));
        stack.update(TICK);
        assert_eq!(stack.layer(1).unwrap().updates, 1);
        assert_eq!(frame(&mut stack), [Rgb::new(255, 0, 255); 4]);
    }

    #[test]
    fn test_push_into_full_stack_returns_layer() {
        let mut stack: LayerStack<Solid, 4, 1> = LayerStack::new(4);
        assert_eq!(stack.push(Solid::new(RED)).unwrap(), 0);

        let rejected = stack.push(Solid::new(WHITE)).unwrap_err();
        assert_eq!(rejected.color, WHITE);
        assert_eq!(stack.layer_count(), 1);
    }

    #[test]
    fn test_commands_reach_layers() {
        let mut stack: LayerStack<Solid, 4, 2> = LayerStack::new(4);
        stack.push(Solid::new(RED)).unwrap();

        assert!(stack.apply(&Command::Stop { layer: 0 }));
        assert!(!stack.layer(0).unwrap().running);
        assert!(stack.apply(&Command::Start { layer: 0 }));
        assert!(stack.layer(0).unwrap().running);

        assert!(stack.apply(&Command::SetColors {
            layer: 0,
            primary: WHITE,
            secondary: BLACK,
        }));
        assert_eq!(frame(&mut stack), [WHITE; 4]);

        assert!(stack.apply(&Command::SetLayerBlend {
            layer: 0,
            blend: Some(BlendMode::Multiply),
        }));
        assert_eq!(stack.stacked()[0].blend, Some(BlendMode::Multiply));

        assert!(stack.apply(&Command::SetLayerEnabled {
            layer: 0,
            enabled: false,
        }));
        assert_eq!(frame(&mut stack), [BLACK; 4]);

        assert!(!stack.apply(&Command::FirePattern { layer: 0, pattern: 0 }));
        assert!(!stack.apply(&Command::Stop { layer: 3 }));
        assert!(!stack.apply(&Command::SetLayerEnabled {
            layer: 3,
            enabled: true,
        }));
    }

    #[test]
    fn test_pattern_layer_shows_first_step_on_first_frame() {
        let config = SequencerConfig::default().with_grid(1, 4);
        let playlist = [PatternStep::from_id(PatternId::FillLeft, 1, 0)];
        let sequencer = PatternSequencer::with_playlist(config, &playlist).unwrap();

        let mut stack: PlayerStack<'_, 4, 1> = PlayerStack::new(4);
        stack.push(LayerSlot::Pattern(sequencer)).unwrap();

        stack.update(TICK);
        assert_eq!(frame(&mut stack), [WHITE, BLACK, BLACK, BLACK]);
        stack.update(TICK);
        assert_eq!(frame(&mut stack), [WHITE, WHITE, BLACK, BLACK]);
    }

    #[test]
    fn test_fired_pattern_plays_once() {
        let config = SequencerConfig::default().with_grid(1, 4);
        let playlist = [PatternStep::from_id(PatternId::FillLeft, 1, 0)];
        let fired = FiredPatterns::new(config, &playlist).unwrap();

        let mut stack: PlayerStack<'_, 4, 1> = PlayerStack::new(4);
        stack.push(LayerSlot::Fired(fired)).unwrap();

        assert!(!stack.apply(&Command::FirePattern { layer: 0, pattern: 3 }));
        assert!(stack.apply(&Command::FirePattern { layer: 0, pattern: 0 }));

        let mut frames = Vec::new();
        for _ in 0..5 {
            stack.update(TICK);
            frames.push(frame(&mut stack));
        }
        assert_eq!(frames[0], [WHITE, BLACK, BLACK, BLACK]);
        assert_eq!(frames[3], [WHITE; 4]);
        assert_eq!(frames[4], [BLACK; 4]);

        let Some(LayerSlot::Fired(fired)) = stack.layer(0) else {
            panic!("layer 0 is not the fired pool");
        };
        assert_eq!(fired.active(), 0);
    }

    #[test]
    fn test_rainbow_masked_by_pulse() {
        let rainbow = RainbowSweep::new(RainbowConfig::new(8).with_speed(1.0));
        let mut pulse = PulseTraveler::new(&PulseConfig {
            color: WHITE,
            half_width: 2,
            speed: 10.0,
            num_lights: 8,
            ..PulseConfig::default()
        });
        pulse.start();

        let mut stack: PlayerStack<'_, 8, 2> = PlayerStack::new(8);
        stack.push(LayerSlot::Rainbow(rainbow)).unwrap();
        stack
            .push_with_blend(LayerSlot::Pulse(pulse), Some(BlendMode::SelectiveMask))
            .unwrap();

        let mut out = [BLACK; 8];
        for _ in 0..3 {
            stack.update(TICK);
            stack.render(&mut out);
        }

        let Some(LayerSlot::Rainbow(rainbow)) = stack.layer(0) else {
            panic!("layer 0 is not the rainbow");
        };
        let Some(LayerSlot::Pulse(pulse)) = stack.layer(1) else {
            panic!("layer 1 is not the pulse");
        };
        assert_eq!(rainbow.hue(), 76);

        let mut colors = [BLACK; 8];
        rainbow.render(&mut colors);
        let mut mask = [BLACK; 8];
        pulse.render(&mut mask);

        let mut expected = colors;
        BlendMode::SelectiveMask.apply(&mut expected, &mask, 1.0);
        assert_eq!(out, expected);

        let mut full = 0;
        for i in 0..8 {
            if mask[i] == BLACK {
                assert_eq!(out[i], BLACK, "light {i} outside the pulse");
            } else if mask[i].r == 255 {
                assert_eq!(out[i], colors[i], "light {i} at the pulse peak");
                full += 1;
            }
        }
        assert_eq!(full, 1);
        assert!(mask.iter().filter(|led| **led != BLACK).count() >= 3);
    }

    #[test]
    fn test_pulse_finish_is_reported_once() {
        let mut pulse = PulseTraveler::new(&PulseConfig {
            half_width: 4,
            speed: 5.0,
            num_lights: 20,
            ..PulseConfig::default()
        });
        pulse.start();

        let mut stack: PlayerStack<'_, 20, 2> = PlayerStack::new(20);
        stack
            .push(LayerSlot::Rainbow(RainbowSweep::new(RainbowConfig::new(20))))
            .unwrap();
        stack.push(LayerSlot::Pulse(pulse)).unwrap();

        let mut out = [BLACK; 20];
        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(stack.update(TICK));
            stack.render(&mut out);
        }
        assert_eq!(
            events,
            vec![LayerEvent {
                layer: 1,
                event: PulseEvent::Finished,
            }]
        );
        assert!(stack.layer(1).unwrap().is_finished());

        assert!(stack.apply(&Command::Start { layer: 1 }));
        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(stack.update(TICK));
        }
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_disabled_layer_raises_no_events() {
        let mut pulse = PulseTraveler::new(&PulseConfig {
            speed: 10.0,
            num_lights: 4,
            ..PulseConfig::default()
        });
        pulse.start();

        let mut stack: PlayerStack<'_, 4, 1> = PlayerStack::new(4);
        stack.push(LayerSlot::Pulse(pulse)).unwrap();
        stack.set_enabled(0, false);
        for _ in 0..50 {
            assert!(stack.update(TICK).is_empty());
        }
        assert!(!stack.layer(0).unwrap().is_finished());
    }

    #[test]
    fn test_ring_completion_is_reported_once() {
        let mut ring = RingWave::new(RingConfig {
            grid: Grid::new(1, 21),
            center_col: 10.0,
            ..RingConfig::default()
        });
        ring.start();

        let mut stack: PlayerStack<'_, 21, 1> = PlayerStack::new(21);
        stack.push(LayerSlot::Ring(ring)).unwrap();

        let mut events = 0;
        for _ in 0..60 {
            events += stack.update(TICK).len();
        }
        assert_eq!(events, 1);
        assert!(stack.layer(0).unwrap().is_finished());
    }

    #[test]
    fn test_spawner_layer_renders_within_stack() {
        let spawner = PulseSpawner::new(
            &PulseSpawnerConfig::new(16)
                .with_spawn_time_range(0.05, 0.05)
                .with_seed(3),
        );
        let mut stack: PlayerStack<'_, 16, 1> = PlayerStack::new(12);
        stack.push(LayerSlot::Spawner(spawner)).unwrap();

        let mut out = [BLACK; 16];
        let mut lit = false;
        for _ in 0..20 {
            assert!(stack.update(TICK).is_empty());
            stack.render(&mut out);
            lit |= out[..12].iter().any(|led| *led != BLACK);
            assert_eq!(out[12..], [BLACK; 4]);
        }
        assert!(lit);

        assert!(stack.apply(&Command::Stop { layer: 0 }));
        assert!(stack.layer(0).unwrap().is_finished());
        stack.update(TICK);
        assert_eq!(frame(&mut stack), [BLACK; 16]);
    }
}
