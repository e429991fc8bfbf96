//! End-to-end rig scenarios: sensor to actuator through the supervisor,
//! broadcast guarantees, and graceful shutdown.

use std::time::Duration;

use tokio::time;

use petvisor::hw::sim::{
    ReleaseProbe, SimAudioCapture, SimAudioOutput, SimDigitalInput, SimPwmOutput, SimRangefinder,
};
use petvisor::{
    Agent, AudioAgent, Bus, Event, EventKind, NoiseAgent, ProximityAgent, ServoAgent, Supervisor,
    TouchAgent, SWEEP_DUTIES,
};

#[tokio::test]
async fn test_touch_reading_drives_full_servo_sweep() {
    let sup = Supervisor::new(64, Duration::from_secs(2));
    let bus = sup.bus().clone();

    // One low (touched) reading among highs.
    let touch = TouchAgent::new(
        Box::new(SimDigitalInput::new(true).with_script([true, false, true])),
        bus.clone(),
        Duration::from_millis(1),
    );
    let pwm1 = SimPwmOutput::new();
    let pwm2 = SimPwmOutput::new();
    let duties = pwm1.duties();
    let servo = ServoAgent::new(
        Box::new(pwm1),
        Box::new(pwm2),
        &bus,
        Duration::from_millis(1),
    );

    let agents: Vec<Box<dyn Agent>> = vec![Box::new(touch), Box::new(servo)];
    let run = async {
        time::sleep(Duration::from_millis(300)).await;
        sup.trigger_shutdown();
    };
    let (res, _) = tokio::join!(sup.run(agents), run);
    res.unwrap();

    // Full five-step sweep, in order, ending at the starting position.
    assert_eq!(*duties.lock().unwrap(), SWEEP_DUTIES.to_vec());
}

#[tokio::test]
async fn test_every_subscriber_observes_each_event_in_producer_order() {
    let bus = Bus::new(64);
    let mut rx_a = bus.subscribe();
    let mut rx_b = bus.subscribe();

    let first = Event::new(EventKind::Touch);
    let second = Event::new(EventKind::NoiseDetected { rms: 2500.0 });
    bus.publish(first);
    bus.publish(second);

    for rx in [&mut rx_a, &mut rx_b] {
        let e1 = rx.recv().await.unwrap();
        let e2 = rx.recv().await.unwrap();
        assert_eq!(e1.seq, first.seq);
        assert_eq!(e2.seq, second.seq);
        assert!(rx.try_recv().is_err(), "exactly once per subscriber");
    }
}

#[tokio::test]
async fn test_shutdown_mid_sweep_exits_in_grace_and_releases_handles() {
    let probe = ReleaseProbe::new();
    let sup = Supervisor::new(64, Duration::from_secs(2));
    let bus = sup.bus().clone();

    let touch = TouchAgent::new(
        Box::new(
            SimDigitalInput::new(true)
                .with_script([false])
                .with_probe(probe.clone()),
        ),
        bus.clone(),
        Duration::from_millis(1),
    );
    // Long step delay so cancellation lands inside the sweep.
    let servo = ServoAgent::new(
        Box::new(SimPwmOutput::new().with_probe(probe.clone())),
        Box::new(SimPwmOutput::new().with_probe(probe.clone())),
        &bus,
        Duration::from_secs(10),
    );
    let noise = NoiseAgent::new(
        Box::new(SimAudioCapture::new(64).with_probe(probe.clone())),
        bus.clone(),
        2000.0,
        Duration::from_millis(1),
    );
    let proximity = ProximityAgent::new(
        Box::new(SimRangefinder::new(100.0).with_probe(probe.clone())),
        bus.clone(),
        30.0,
        Duration::from_millis(1),
    );
    let audio = AudioAgent::new(
        Box::new(SimAudioOutput::new().with_probe(probe.clone())),
        vec!["purr.wav".to_string()],
        "please_connect.wav".to_string(),
        (60, 60),
    );

    let agents: Vec<Box<dyn Agent>> = vec![
        Box::new(touch),
        Box::new(servo),
        Box::new(noise),
        Box::new(proximity),
        Box::new(audio),
    ];

    let start = time::Instant::now();
    let run = async {
        // Let the touch fire and the sweep begin, then pull the plug.
        time::sleep(Duration::from_millis(100)).await;
        sup.trigger_shutdown();
    };
    let (res, _) = tokio::join!(sup.run(agents), run);
    res.unwrap();

    assert!(
        start.elapsed() < Duration::from_secs(3),
        "exit bounded by grace"
    );
    // Six probed devices, each released exactly once by drop.
    assert_eq!(probe.released(), 6);
}

#[tokio::test]
async fn test_stuck_agent_is_reported_after_grace() {
    // Ignores its cancellation token entirely.
    struct Stubborn;

    #[async_trait::async_trait]
    impl Agent for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }
        async fn run(
            self: Box<Self>,
            _ctx: tokio_util::sync::CancellationToken,
        ) -> Result<(), petvisor::AgentError> {
            time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    let sup = Supervisor::new(64, Duration::from_millis(100));
    let agents: Vec<Box<dyn Agent>> = vec![Box::new(Stubborn)];
    let run = async {
        time::sleep(Duration::from_millis(50)).await;
        sup.trigger_shutdown();
    };
    let (res, _) = tokio::join!(sup.run(agents), run);

    match res {
        Err(petvisor::RuntimeError::GraceExceeded { stuck, .. }) => {
            assert_eq!(stuck, vec!["stubborn"]);
        }
        other => panic!("expected GraceExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_one_agent_failure_does_not_stop_others() {
    // An agent that errors out immediately.
    struct Brittle;

    #[async_trait::async_trait]
    impl Agent for Brittle {
        fn name(&self) -> &str {
            "brittle"
        }
        async fn run(
            self: Box<Self>,
            _ctx: tokio_util::sync::CancellationToken,
        ) -> Result<(), petvisor::AgentError> {
            Err(petvisor::AgentError::Actuate {
                reason: "dead on arrival".to_string(),
            })
        }
    }

    let sup = Supervisor::new(64, Duration::from_secs(2));
    let bus = sup.bus().clone();

    let touch = TouchAgent::new(
        Box::new(SimDigitalInput::new(true).with_script([false, true, false])),
        bus.clone(),
        Duration::from_millis(1),
    );
    let mut rx = bus.subscribe();

    let agents: Vec<Box<dyn Agent>> = vec![Box::new(Brittle), Box::new(touch)];
    let run = async {
        time::sleep(Duration::from_millis(200)).await;
        sup.trigger_shutdown();
    };
    let (res, _) = tokio::join!(sup.run(agents), run);
    res.unwrap();

    // The touch agent kept sampling after the brittle agent died.
    let mut touches = 0;
    while let Ok(ev) = rx.try_recv() {
        assert!(matches!(ev.kind, EventKind::Touch));
        touches += 1;
    }
    assert_eq!(touches, 2);
}
