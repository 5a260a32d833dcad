use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use showplayer::{
    InputEvent, Millis, RecordingHost, Script, SessionOpts, ShowSession, SimulatedLoader,
    TimelineRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "showplayer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a show script, then print a summary.
    Validate(ValidateArgs),
    /// Map between scene and slide indices of a show.
    Resolve(ResolveArgs),
    /// Play a show headlessly and print every host call as JSON lines.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input show script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input show script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scene index (0-based) to resolve.
    #[arg(long, conflicts_with = "slide")]
    scene: Option<usize>,

    /// Slide index (0-based) to resolve.
    #[arg(long)]
    slide: Option<usize>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input show script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timed inputs: a JSON array of `{ "at": <ms>, "input": <event> }`.
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Session options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Location the show was opened from (overrides the options file).
    #[arg(long)]
    url: Option<String>,

    /// Simulated slide download latency in milliseconds.
    #[arg(long, default_value_t = 50)]
    latency: Millis,

    /// Slide whose download never completes (repeatable).
    #[arg(long = "unreachable-slide")]
    unreachable_slides: Vec<usize>,

    /// Stop the clock here (ms). Defaults to a few seconds after the last input.
    #[arg(long)]
    until: Option<Millis>,

    /// Log state-machine decisions to stderr (honours RUST_LOG).
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(serde::Deserialize)]
struct TimedInput {
    at: Millis,
    input: InputEvent,
}

const SETTLE_MS: Millis = 5_000;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_script(path: &Path) -> anyhow::Result<Script> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read script '{}'", path.display()))?;
    let script =
        Script::from_json_str(&text).with_context(|| format!("parse script '{}'", path.display()))?;
    Ok(script)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let summary = serde_json::json!({
        "slides": script.slide_count(),
        "scenes": script.num_scenes(),
        "showMode": script.show_mode,
        "loopSlideshow": script.loop_slideshow,
        "recording": script.recording.is_some(),
        "soundtrack": script.soundtrack.is_some(),
    });
    println!("{summary}");
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let out = match (args.scene, args.slide) {
        (Some(scene), _) => serde_json::json!({
            "scene": scene,
            "slide": script.slide_index_from_scene_index(scene),
            "nextScene": script.calculate_next_scene_index(scene),
            "automatic": script.is_automatic(scene),
        }),
        (None, Some(slide)) => serde_json::json!({
            "slide": slide,
            "firstScene": script.scene_index_from_slide_index(slide),
            "builds": script.builds_in_slide(slide),
        }),
        (None, None) => anyhow::bail!("pass --scene or --slide"),
    };
    println!("{out}");
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("showplayer=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let script = read_script(&args.in_path)?;
    let mut opts = match &args.opts {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read options '{}'", path.display()))?;
            SessionOpts::from_json_str(&text)
                .with_context(|| format!("parse options '{}'", path.display()))?
        }
        None => SessionOpts::default(),
    };
    if let Some(url) = args.url {
        opts.url = url;
    }
    opts.validate()?;

    let mut inputs: Vec<TimedInput> = match &args.inputs {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read inputs '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse inputs '{}'", path.display()))?
        }
        None => Vec::new(),
    };
    inputs.sort_by_key(|i| i.at);
    let until = args
        .until
        .unwrap_or_else(|| inputs.last().map_or(0, |i| i.at) + SETTLE_MS);

    let mut loader = SimulatedLoader::for_script(&script, args.latency);
    for slide in args.unreachable_slides {
        loader = loader.with_unreachable_slide(slide);
    }
    let mut session = ShowSession::new(opts, RecordingHost::new(), loader, TimelineRenderer::new());

    session.start_show();
    session.handle(InputEvent::ScriptDownloaded {
        script: Box::new(script),
    });
    flush(&mut session)?;

    for timed in inputs {
        step_until(&mut session, timed.at.min(until))?;
        if timed.at > until {
            break;
        }
        session.handle(timed.input);
        flush(&mut session)?;
    }
    step_until(&mut session, until)?;

    let cursor = session.cursor();
    let summary = serde_json::json!({
        "at": session.now(),
        "final": {
            "state": session.state(),
            "scene": cursor.current_scene,
            "slide": cursor.current_slide,
        },
    });
    println!("{summary}");
    Ok(())
}

type Session = ShowSession<RecordingHost, SimulatedLoader, TimelineRenderer>;

/// Run the clock to `deadline` one due time at a stride so host calls keep their timestamps.
fn step_until(session: &mut Session, deadline: Millis) -> anyhow::Result<()> {
    while let Some(due) = session.next_due() {
        if due > deadline {
            break;
        }
        session.run_until(due);
        flush(session)?;
    }
    session.run_until(deadline);
    flush(session)
}

fn flush(session: &mut Session) -> anyhow::Result<()> {
    let at = session.now();
    for event in session.host_mut().take_events() {
        let line = serde_json::json!({ "at": at, "event": event });
        println!("{}", serde_json::to_string(&line).context("encode host event")?);
    }
    Ok(())
}
