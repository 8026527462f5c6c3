mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_light_players::{
        OutputDriver,
        color::{BLACK, Rgb, WHITE},
        command::{Command, CommandQueue, TryReceiveError, TrySendError},
        frame::SharedFrame,
        frame_scheduler::{DEFAULT_FRAME_DURATION, FrameScheduler},
        layer::{LayerEvent, LayerSlot, PlayerStack},
        player::{PulseConfig, PulseEvent, PulseTraveler, RainbowConfig, RainbowSweep},
    };

    /// Records every frame it is handed
    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<Rgb>>,
    }

    impl OutputDriver for Recorder {
        fn write(&mut self, colors: &[Rgb]) {
            self.frames.push(colors.to_vec());
        }
    }

    fn rainbow_stack() -> PlayerStack<'static, 8, 2> {
        let mut stack = PlayerStack::new(8);
        stack
            .push(LayerSlot::Rainbow(RainbowSweep::new(RainbowConfig::new(8))))
            .unwrap();
        stack
    }

    #[test]
    fn test_first_tick_advances_by_zero() {
        let mut scheduler: FrameScheduler<'_, _, _, 8, 2, 1> =
            FrameScheduler::new(rainbow_stack(), Recorder::default());

        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.dt, Duration::from_ticks(0));
        assert_eq!(result.commands, 0);

        let result = scheduler.tick(Instant::from_millis(100));
        assert_eq!(result.dt, Duration::from_millis(100));

        let Some(LayerSlot::Rainbow(rainbow)) = scheduler.stack().layer(0) else {
            panic!("layer 0 is not the rainbow");
        };
        assert_eq!(rainbow.hue(), 25);
        assert_eq!(scheduler.output().frames.len(), 2);
        assert_eq!(scheduler.output().frames[1], scheduler.frame());
    }

    #[test]
    fn test_schedule_paces_frames() {
        let mut scheduler: FrameScheduler<'_, _, _, 8, 2, 1> =
            FrameScheduler::new(rainbow_stack(), Recorder::default());

        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.next_deadline, Instant::from_millis(0) + DEFAULT_FRAME_DURATION);
        assert_eq!(result.sleep_duration, DEFAULT_FRAME_DURATION);

        let result = scheduler.tick(Instant::from_millis(10));
        assert_eq!(result.next_deadline, Instant::from_millis(0) + DEFAULT_FRAME_DURATION * 2);
        assert_eq!(
            result.sleep_duration,
            DEFAULT_FRAME_DURATION * 2 - Duration::from_millis(10)
        );
    }

    #[test]
    fn test_late_frame_sleeps_zero() {
        let mut scheduler: FrameScheduler<'_, _, _, 8, 2, 1> = FrameScheduler::with_frame_duration(
            rainbow_stack(),
            Recorder::default(),
            Duration::from_millis(20),
        );
        scheduler.tick(Instant::from_millis(0));
        let result = scheduler.tick(Instant::from_millis(50));
        assert_eq!(result.next_deadline, Instant::from_millis(40));
        assert_eq!(result.sleep_duration, Duration::from_ticks(0));
    }

    #[test]
    fn test_long_stall_resets_schedule() {
        let mut scheduler: FrameScheduler<'_, _, _, 8, 2, 1> = FrameScheduler::with_frame_duration(
            rainbow_stack(),
            Recorder::default(),
            Duration::from_millis(20),
        );
        scheduler.tick(Instant::from_millis(0));
        let result = scheduler.tick(Instant::from_millis(1000));
        assert_eq!(result.next_deadline, Instant::from_millis(1020));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));
        assert_eq!(result.dt, Duration::from_millis(1000));
    }

    #[test]
    fn test_commands_are_drained_before_render() {
        let queue: CommandQueue<4> = CommandQueue::new();
        let sender = queue.sender();
        let mut scheduler =
            FrameScheduler::new(rainbow_stack(), Recorder::default()).with_commands(queue.receiver());

        scheduler.tick(Instant::from_millis(0));
        assert!(scheduler.frame().iter().all(|led| *led != BLACK));

        sender.try_send(Command::Stop { layer: 0 }).unwrap();
        sender
            .try_send(Command::SetLayerEnabled {
                layer: 7,
                enabled: false,
            })
            .unwrap();
        let result = scheduler.tick(Instant::from_millis(16));
        assert_eq!(result.commands, 2);
        assert!(queue.is_empty());
        assert_eq!(scheduler.frame(), [BLACK; 8]);

        sender.try_send(Command::Start { layer: 0 }).unwrap();
        scheduler.tick(Instant::from_millis(32));
        assert!(scheduler.frame().iter().all(|led| *led != BLACK));
    }

    #[test]
    fn test_command_queue_is_bounded_fifo() {
        let queue: CommandQueue<2> = CommandQueue::new();
        let first = Command::Start { layer: 0 };
        let second = Command::Stop { layer: 1 };
        let third = Command::Start { layer: 2 };

        queue.try_send(first).unwrap();
        queue.sender().try_send(second).unwrap();
        assert_eq!(queue.try_send(third), Err(TrySendError(third)));
        assert_eq!(queue.len(), 2);

        let receiver = queue.receiver();
        assert_eq!(receiver.try_receive(), Ok(first));

        let mut drained = Vec::new();
        assert_eq!(receiver.drain(|command| drained.push(command)), 1);
        assert_eq!(drained, vec![second]);
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));
    }

    #[test]
    fn test_shared_frame_publishes_whole_frames() {
        let shared: SharedFrame<8> = SharedFrame::new();
        assert_eq!(shared.sequence(), 0);
        assert_eq!(shared.color_at(0), None);

        let mut scheduler: FrameScheduler<'_, _, _, 8, 2, 1> =
            FrameScheduler::new(rainbow_stack(), &shared);
        scheduler.tick(Instant::from_millis(0));
        scheduler.tick(Instant::from_millis(16));
        assert_eq!(shared.sequence(), 2);

        let mut out = [BLACK; 8];
        assert_eq!(shared.snapshot(&mut out), 8);
        assert_eq!(out[..], *scheduler.frame());
        assert_eq!(shared.color_at(3), Some(out[3]));
        assert_eq!(shared.color_at(8), None);
    }

    #[test]
    fn test_shared_frame_truncates() {
        let shared: SharedFrame<2> = SharedFrame::new();
        shared.publish(&[WHITE; 5]);
        assert_eq!(shared.color_at(1), Some(WHITE));
        assert_eq!(shared.color_at(2), None);

        let mut out = [BLACK; 1];
        assert_eq!(shared.snapshot(&mut out), 1);
        assert_eq!(out, [WHITE]);
    }

    #[test]
    fn test_tick_reports_layer_events() {
        let mut pulse = PulseTraveler::new(&PulseConfig {
            half_width: 2,
            speed: 20.0,
            num_lights: 8,
            ..PulseConfig::default()
        });
        pulse.start();
        let mut stack = rainbow_stack();
        stack.push(LayerSlot::Pulse(pulse)).unwrap();

        let mut scheduler: FrameScheduler<'_, _, _, 8, 2, 1> =
            FrameScheduler::new(stack, Recorder::default());
        let mut reported = Vec::new();
        for frame in 0..60 {
            let result = scheduler.tick(Instant::from_millis(frame * 16));
            assert_eq!(result.events, scheduler.events().len());
            reported.extend_from_slice(scheduler.events());
        }
        assert_eq!(
            reported,
            vec![LayerEvent {
                layer: 1,
                event: PulseEvent::Finished,
            }]
        );
    }
}
