//! # Demo: full rig on simulated hardware.
//!
//! Wires every agent against the sim devices and runs until Ctrl-C. The
//! touch pad "presses" a few times, the microphone picks up one loud chunk,
//! and the rangefinder sees something pass by; watch the log for detections,
//! sweeps, and notification outcomes (delivery will fail unless something
//! listens on the configured URL, which also demos the alert sound path).
//!
//! ## Run
//! ```bash
//! RUST_LOG=petvisor=debug cargo run --example sim_rig
//! ```

use petvisor::hw::sim::{
    SimAudioCapture, SimAudioOutput, SimDigitalInput, SimMotionDetect, SimPwmOutput,
    SimRangefinder, SimVideoCapture,
};
use petvisor::{
    Agent, AudioAgent, Config, NoiseAgent, NotifierAgent, ProximityAgent, ServoAgent, Supervisor,
    TouchAgent, VisionAgent,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petvisor=info".into()),
        )
        .init();

    let cfg = Config::from_json(
        r#"{
            "url": "http://localhost:9000/notify",
            "payload": { "device": "sim-rig" },
            "sounds": ["purr.wav", "chirp.wav"],
            "idle_sound_min_secs": 3,
            "idle_sound_max_secs": 8,
            "grace_secs": 2
        }"#,
    )?;

    let sup = Supervisor::new(cfg.bus_capacity, cfg.grace());
    let bus = sup.bus();

    let touch = TouchAgent::new(
        Box::new(SimDigitalInput::new(true).with_script([true, true, false, true, false])),
        bus.clone(),
        cfg.touch_cadence(),
    );

    let loud: Vec<i16> = vec![2500; 1024];
    let noise = NoiseAgent::new(
        Box::new(SimAudioCapture::new(1024).with_chunks([loud])),
        bus.clone(),
        cfg.noise_rms_threshold,
        cfg.noise_cadence(),
    );

    let proximity = ProximityAgent::new(
        Box::new(SimRangefinder::new(120.0).with_readings([120.0, 15.0, 15.0, 120.0])),
        bus.clone(),
        cfg.proximity_threshold_cm,
        cfg.proximity_cadence(),
    );

    let vision = VisionAgent::new(
        Box::new(SimVideoCapture::new()),
        Box::new(SimMotionDetect::new(false).with_verdicts([false, true, true, false])),
        bus.clone(),
        cfg.vision_cadence(),
    );

    let servo = ServoAgent::new(
        Box::new(SimPwmOutput::new()),
        Box::new(SimPwmOutput::new()),
        bus,
        cfg.servo_step(),
    );

    let audio = AudioAgent::new(
        Box::new(SimAudioOutput::new()),
        cfg.sounds.clone(),
        cfg.error_sound.clone(),
        (cfg.idle_sound_min_secs, cfg.idle_sound_max_secs),
    );
    let notifier = NotifierAgent::new(&cfg, sup.bus(), audio.alert_sender())?;

    let agents: Vec<Box<dyn Agent>> = vec![
        Box::new(touch),
        Box::new(noise),
        Box::new(proximity),
        Box::new(vision),
        Box::new(servo),
        Box::new(audio),
        Box::new(notifier),
    ];

    sup.run(agents).await?;
    Ok(())
}
