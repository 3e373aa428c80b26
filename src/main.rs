use anyhow::Context;
use auto_explainer::pipeline::{run_finished, GenerationStep, StepStatus, StepTracker};
use auto_explainer::video::{format_relative, preview};
use auto_explainer::{
    GatewayClient, GatewayConfig, GeneratedVideo, ImagePolicy, Language, Orchestrator,
    PipelineConfig, Session, EXAMPLE_QUESTIONS,
};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, Level};

const PROGRESS_DRAIN: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "auto-explainer")]
#[command(about = "Generate AI explainer scripts with scene images", long_about = None)]
struct Args {
    /// Question or topic to explain
    #[arg(short, long)]
    question: Option<String>,

    /// File with one question per line
    #[arg(short, long)]
    file: Option<String>,

    /// Use one of the built-in example questions (1-based)
    #[arg(long)]
    example: Option<usize>,

    /// Print the built-in example questions and exit
    #[arg(long)]
    list_examples: bool,

    /// Narration language
    #[arg(short, long, value_enum, default_value_t = Language::En)]
    language: Language,

    /// Directory to write Markdown exports into
    #[arg(short, long)]
    export: Option<String>,

    /// Maximum number of scenes that get an image
    #[arg(long, default_value_t = 3)]
    max_images: usize,

    /// Image calls in flight at once
    #[arg(long, default_value_t = 1)]
    image_concurrency: usize,

    /// Timeout for each gateway call in seconds, 0 disables it
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Skip the pacing pauses between stages
    #[arg(long)]
    no_pacing: bool,

    /// AI gateway API key
    #[arg(long)]
    api_key: Option<String>,

    /// AI gateway chat completions URL
    #[arg(long)]
    gateway_url: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    dotenvy::dotenv().ok();

    if args.list_examples {
        for (i, example) in EXAMPLE_QUESTIONS.iter().enumerate() {
            println!("{}. {}", i + 1, example);
        }
        return Ok(());
    }

    let questions = collect_questions(&args).await?;
    if questions.is_empty() {
        eprintln!("Error: provide --question, --file or --example");
        std::process::exit(1);
    }

    let gateway_config = gateway_config(&args)?;
    let gateway = GatewayClient::new(gateway_config).context("Failed to create HTTP client")?;
    let orchestrator = Orchestrator::new(gateway, pipeline_config(&args));

    if let Some(dir) = &args.export {
        tokio::fs::create_dir_all(dir)
            .await
            .context("Failed to create export directory")?;
    }

    let mut session = Session::new();

    let mut failures = 0;
    for question in &questions {
        println!("\nCreating your content: \"{}\"", preview(question, 60));

        let mut printer = tokio::spawn(print_progress(session.subscribe()));
        let outcome = orchestrator.run(&mut session, question, args.language).await;

        // Let the last step lines out before the result; a rejected question
        // never produces any, so don't wait on it forever
        if tokio::time::timeout(PROGRESS_DRAIN, &mut printer).await.is_err() {
            printer.abort();
        }

        match outcome {
            Ok(video) => {
                print_result(&video);
                if let Some(dir) = &args.export {
                    export_markdown(&video, dir).await?;
                }
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                eprintln!("Generation failed: {}\n{}", e, e.hint());
                failures += 1;
            }
        }
    }

    if session.history().len() > 1 {
        print_history(&session);
    }

    if failures == questions.len() {
        std::process::exit(1);
    }
    Ok(())
}

async fn collect_questions(args: &Args) -> anyhow::Result<Vec<String>> {
    let mut questions = Vec::new();

    if let Some(n) = args.example {
        let example = n
            .checked_sub(1)
            .and_then(|i| EXAMPLE_QUESTIONS.get(i))
            .with_context(|| format!("No example question #{}", n))?;
        questions.push(example.to_string());
    }

    if let Some(question) = &args.question {
        questions.push(question.clone());
    }

    if let Some(file_path) = &args.file {
        let content = tokio::fs::read_to_string(file_path)
            .await
            .context(format!("Failed to read file: {}", file_path))?;
        questions.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }

    Ok(questions)
}

fn gateway_config(args: &Args) -> anyhow::Result<GatewayConfig> {
    let mut config = GatewayConfig::from_env_with_key(args.api_key.clone())
        .context("Set the key via --api-key or the AI_GATEWAY_API_KEY environment variable")?;

    if let Some(url) = &args.gateway_url {
        config = config.with_url(url.clone());
    }
    Ok(config)
}

fn pipeline_config(args: &Args) -> PipelineConfig {
    let base = if args.no_pacing {
        PipelineConfig::immediate()
    } else {
        PipelineConfig::default()
    };
    let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));

    base.with_images(ImagePolicy {
        max_images: args.max_images,
        concurrency: args.image_concurrency,
    })
    .with_call_timeout(timeout)
}

/// Prints step changes of one run and returns once the run has finished.
async fn print_progress(mut rx: watch::Receiver<Vec<GenerationStep>>) {
    // Compare against a fresh step list so a coalesced final snapshot still
    // prints every step
    let mut last: Vec<GenerationStep> = StepTracker::new().steps().to_vec();

    while rx.changed().await.is_ok() {
        let steps = rx.borrow_and_update().clone();
        for (step, prev) in steps.iter().zip(last.iter()) {
            if step.status == prev.status {
                continue;
            }
            let marker = match step.status {
                StepStatus::Pending => continue,
                StepStatus::Active => "..",
                StepStatus::Complete => "ok",
                StepStatus::Error => "!!",
            };
            println!("  [{}] {}", marker, step.label);
        }
        let finished = run_finished(&steps);
        last = steps;
        if finished {
            break;
        }
    }
}

fn print_result(video: &GeneratedVideo) {
    let script = &video.script;
    println!("\n{}", script.title);
    println!("Duration: {}", script.duration);
    println!("\n{}", script.summary);

    if !script.key_points.is_empty() {
        println!("\nKey points:");
        for (i, point) in script.key_points.iter().enumerate() {
            println!("  {}. {}", i + 1, point);
        }
    }

    println!("\nScenes:");
    for scene in &script.scenes {
        let image = video
            .image_for(scene.scene_number)
            .map(|img| format!(" [image: {}]", truncate_url(&img.image_url)))
            .unwrap_or_default();
        println!("  {}. {}{}", scene.scene_number, scene.title, image);
    }

    info!(
        "Your AI explainer content is ready with {} scene images.",
        video.scene_images.len()
    );
}

fn print_history(session: &Session) {
    let now = Utc::now();
    println!("\nHistory ({} generated):", session.history().len());
    for video in session.history() {
        println!(
            "  {}  {}  ({})",
            video.id,
            video.title,
            format_relative(video.created_at, now)
        );
    }
}

async fn export_markdown(video: &GeneratedVideo, dir: &str) -> anyhow::Result<()> {
    let path = Path::new(dir).join(video.export_file_name());
    tokio::fs::write(&path, video.to_markdown())
        .await
        .context(format!("Failed to write {}", path.display()))?;
    info!("Script saved to: {}", path.display());
    Ok(())
}

// Inline data URLs can be megabytes long
fn truncate_url(url: &str) -> String {
    preview(url, 80)
}
