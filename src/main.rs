//! Bouncy Logo entry point
//!
//! On the web the page drives `WebShow` from the library. Natively this runs
//! the show headless at 60 Hz and logs what happens.
//!
//! Usage: `bouncy-logo [config.json] [--seconds N] [--arcade]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bouncy_logo::ShowConfig;
    use bouncy_logo::consts::HOST_FRAME_MS;
    use bouncy_logo::platform::{Host, Mode};
    use bouncy_logo::sim::{FrameInput, Phase, ShowEvent, Viewport};

    /// Two full show cycles with the default timing
    const DEFAULT_SECONDS: f64 = 360.0;

    struct Args {
        config: Option<String>,
        seconds: f64,
        mode: Mode,
    }

    fn parse_args() -> Result<Args, String> {
        let mut args = Args {
            config: None,
            seconds: DEFAULT_SECONDS,
            mode: Mode::Physics,
        };
        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--arcade" => args.mode = Mode::Arcade,
                "--seconds" => {
                    let value = it.next().ok_or("--seconds needs a value")?;
                    args.seconds = value
                        .parse()
                        .map_err(|_| format!("invalid --seconds value: {value}"))?;
                }
                other if other.starts_with("--") => {
                    return Err(format!("unknown option: {other}"));
                }
                path => args.config = Some(path.to_string()),
            }
        }
        Ok(args)
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = parse_args()?;
        let config = match &args.config {
            Some(path) => ShowConfig::load(path)?,
            None => ShowConfig::default(),
        };
        log::info!(
            "Bouncy logo (native) starting with seed: {}, {}s simulated",
            config.seed,
            args.seconds
        );

        let viewport = Viewport::new(1280.0, 720.0).with_banner(48.0);
        let mut host = Host::new(args.mode, config, viewport)?;

        let frames = (args.seconds * 1000.0 / HOST_FRAME_MS).ceil() as u64;
        let mut spawned = 0usize;
        let mut impacts = 0usize;
        let mut sparkles = 0usize;
        let mut cycles = 0usize;

        for i in 0..frames {
            let input = FrameInput {
                timestamp_ms: i as f64 * HOST_FRAME_MS,
                viewport,
            };
            if args.mode == Mode::Arcade {
                host.frame_json(&input)?;
                continue;
            }
            if let Some(frame) = host.frame(&input) {
                for event in &frame.events {
                    match event {
                        ShowEvent::Spawned { .. } => spawned += 1,
                        ShowEvent::Impact { .. } => impacts += 1,
                        ShowEvent::PhaseChanged {
                            to: Phase::Spawning,
                            ..
                        } => cycles += 1,
                        _ => {}
                    }
                }
            }
            sparkles += host.sparkles_due(input.timestamp_ms).len();
        }

        match args.mode {
            Mode::Physics => log::info!(
                "Done: {frames} frames, {cycles} completed cycles, {spawned} spawns, \
                 {impacts} impacts, {sparkles} sparkles"
            ),
            Mode::Arcade => log::info!("Done: {frames} arcade frames"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page constructs `WebShow` directly; nothing to do here
}
