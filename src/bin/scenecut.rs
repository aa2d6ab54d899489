use std::{
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use clap::{Parser, error::ErrorKind as ClapErrorKind};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use scenecut::{
    BoundaryEvent, DEFAULT_FRAME_SKIP, DEFAULT_THRESHOLD, DetectionOptions, FfmpegLogLevel,
    FileLogSink, LogSink, MISSING_PATH_MESSAGE, NullLogSink, ProgressCallback, ProgressInfo,
    SceneDetector, SceneReport, log_path_for,
};

const CLI_AFTER_HELP: &str = "Examples:\n  scenecut input.mp4\n  scenecut input.mp4 --threshold 20 --frame-skip 5 --pretty\n  scenecut input.mp4 --progress --verbose\n\nThe result is written to stdout as JSON. A run log is written next to the\nvideo as <name>_scenes.log unless --no-log-file is given.";

#[derive(Debug, Parser)]
#[command(
    name = "scenecut",
    version,
    about = "Detect scene cuts in a video and print them as JSON",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Video file to analyse.
    video: Option<PathBuf>,

    /// Mean grayscale difference (0-255) above which a cut is recorded.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Score every Nth decoded frame.
    #[arg(long, default_value_t = DEFAULT_FRAME_SKIP)]
    frame_skip: u64,

    /// Write the run log here instead of next to the video.
    #[arg(long, conflicts_with = "no_log_file")]
    log_file: Option<PathBuf>,

    /// Do not write a run log.
    #[arg(long)]
    no_log_file: bool,

    /// Show a progress bar on stderr.
    #[arg(long)]
    progress: bool,

    /// Print diagnostic messages on stderr.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, default_value = "error")]
    ffmpeg_log_level: FfmpegLogLevel,

    /// Indent the JSON result.
    #[arg(long)]
    pretty: bool,
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total_frames {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current_frame + 1);
        self.bar.set_message(format!("({} cuts)", info.boundaries_found));
    }

    fn on_boundary(&self, event: &BoundaryEvent) {
        self.bar.println(format!(
            "{} {:.2}s (mean_diff={:.2})",
            "cut".green().bold(),
            event.timestamp,
            event.score
        ));
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .try_init();
}

fn open_log_sink(cli: &Cli, video: &Path) -> Box<dyn LogSink> {
    if cli.no_log_file {
        return Box::new(NullLogSink);
    }
    let path = cli.log_file.clone().unwrap_or_else(|| log_path_for(video));
    match FileLogSink::create(&path) {
        Ok(sink) => Box::new(sink),
        Err(error) => {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("cannot write log file {}: {error}", path.display()).yellow()
            );
            Box::new(NullLogSink)
        }
    }
}

fn run(cli: &Cli) -> SceneReport {
    let Some(video) = cli.video.as_deref() else {
        return SceneReport::error(MISSING_PATH_MESSAGE);
    };

    scenecut::set_ffmpeg_log_level(cli.ffmpeg_log_level);
    let sink = open_log_sink(cli, video);

    let mut options = DetectionOptions::new()
        .with_threshold(cli.threshold)
        .with_frame_skip(cli.frame_skip);

    let progress = cli.progress.then(|| Arc::new(TerminalProgress::new()));
    if let Some(progress) = &progress {
        options = options
            .with_progress(progress.clone())
            .with_progress_interval(cli.frame_skip.max(1));
    }

    let result = SceneDetector::new(options)
        .detect_file(video, sink.as_ref())
        .map(|boundaries| boundaries.scenes());

    if let Some(progress) = progress {
        progress.bar.finish_and_clear();
    }

    SceneReport::from(result)
}

fn print_report(report: &SceneReport, pretty: bool) -> i32 {
    let rendered = if pretty {
        report.to_json_pretty()
    } else {
        report.to_json()
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            report.exit_code()
        }
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            1
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error)
            if matches!(
                error.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
            ) =>
        {
            error.exit()
        }
        Err(error) => {
            let message = error
                .to_string()
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            process::exit(print_report(&SceneReport::error(message), false));
        }
    };

    init_logging(cli.verbose);
    let report = run(&cli);
    process::exit(print_report(&report, cli.pretty));
}
