use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use lottie_frames::{BrowserOpts, CancelToken, ConvertConfig, ConvertError, ConvertOpts};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lottie-frames", version)]
/// Render every frame of a Lottie animation to SVG, optionally assembling an MP4.
///
/// With fewer than two positional arguments the missing values are asked for interactively.
struct Cli {
    /// Input Lottie JSON document.
    document: Option<PathBuf>,

    /// Output directory for `<index>.svg` frames.
    output_dir: Option<PathBuf>,

    /// Also assemble the frames into a video (requires `ffmpeg` on PATH).
    #[arg(long)]
    video: bool,

    /// lottie-web SVG player script loaded into the browser page.
    #[arg(long, env = "LOTTIE_PLAYER", default_value = lottie_frames::DEFAULT_PLAYBACK_LIBRARY)]
    player: PathBuf,

    /// Samples rendered per native frame.
    #[arg(long, default_value_t = 4)]
    oversample: u32,

    /// Frame rate of the assembled video.
    #[arg(long, default_value_t = 60)]
    output_fps: u32,

    /// Width and height of the assembled video, in pixels.
    #[arg(long, default_value_t = 512)]
    size: u32,

    /// Chromium/Chrome executable. Searched for when omitted.
    #[arg(long, env = "CHROME")]
    chrome: Option<PathBuf>,

    /// Disable the Chromium sandbox (needed in many containers).
    #[arg(long)]
    no_sandbox: bool,

    /// Per-evaluation timeout inside the browser, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<ConvertError>()
                .map(ConvertError::exit_code)
                .unwrap_or(1);
            eprintln!("Conversion failed: {err:#}");
            ExitCode::from(code)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = resolve_config(&cli)?;
    let opts = ConvertOpts {
        oversample: cli.oversample,
        output_fps: cli.output_fps,
        frame_size: cli.size,
        playback_library: cli.player,
        browser: BrowserOpts {
            executable: cli.chrome,
            sandbox: !cli.no_sandbox,
            eval_timeout: Duration::from_secs(cli.timeout_secs),
            ..Default::default()
        },
        ..Default::default()
    };

    // Installed after prompting so Ctrl-C still aborts a blocked read.
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel()).context("install Ctrl-C handler")?;

    let stats = lottie_frames::convert(&cfg, &opts, &cancel)?;

    eprintln!(
        "All frames converted! ({} frames in {})",
        stats.frames_written,
        cfg.output_dir.display()
    );
    if let Some(video) = stats.video {
        eprintln!("wrote {}", video.display());
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ConvertConfig> {
    if let (Some(document_path), Some(output_dir)) = (&cli.document, &cli.output_dir) {
        return Ok(ConvertConfig {
            document_path: document_path.clone(),
            output_dir: output_dir.clone(),
            encode_to_video: cli.video,
        });
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stderr();
    prompt_config(&mut input, &mut out, cli)
}

fn prompt_config(
    input: &mut impl BufRead,
    out: &mut impl Write,
    cli: &Cli,
) -> anyhow::Result<ConvertConfig> {
    writeln!(out, "Welcome to lottie-frames!")?;

    let document_path = match &cli.document {
        Some(p) => p.clone(),
        None => PathBuf::from(prompt_required(
            input,
            out,
            "Enter the Lottie file path:",
            "Lottie file path is required.",
        )?),
    };
    let output_dir = match &cli.output_dir {
        Some(p) => p.clone(),
        None => PathBuf::from(prompt_required(
            input,
            out,
            "Enter the output directory:",
            "Output directory is required.",
        )?),
    };
    let encode_to_video = cli.video || prompt_yes_no(input, out, "Also encode an MP4 video?")?;

    Ok(ConvertConfig {
        document_path,
        output_dir,
        encode_to_video,
    })
}

fn read_answer(
    input: &mut impl BufRead,
    out: &mut impl Write,
    question: &str,
) -> anyhow::Result<String> {
    write!(out, "? {question} ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("read answer")? == 0 {
        anyhow::bail!("input closed while waiting for: {question}");
    }
    Ok(line.trim().to_string())
}

fn prompt_required(
    input: &mut impl BufRead,
    out: &mut impl Write,
    question: &str,
    required_msg: &str,
) -> anyhow::Result<String> {
    loop {
        let answer = read_answer(input, out, question)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        writeln!(out, ">> {required_msg}")?;
    }
}

fn prompt_yes_no(
    input: &mut impl BufRead,
    out: &mut impl Write,
    question: &str,
) -> anyhow::Result<bool> {
    loop {
        let answer = read_answer(input, out, &format!("{question} (y/N)"))?;
        match answer.to_ascii_lowercase().as_str() {
            "" | "n" | "no" => return Ok(false),
            "y" | "yes" => return Ok(true),
            _ => writeln!(out, ">> Please answer y or n.")?,
        }
    }
}
