//! Stress Lens CLI - Command-line interface for Stress Lens
//!
//! Commands:
//! - questions: Print the questionnaire
//! - assess: Score a questionnaire (flags, stdin JSON, or interactive prompts)
//! - recommend: Print the advice for a stress level
//! - trend: Analyze a stored (or generated demo) stress history
//! - render: Draw a stored (or generated demo) stress history as SVG, PPM, or draw operations

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use stress_lens::chart::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use stress_lens::indicator::{LevelIndicator, ScoreBreakdown};
use stress_lens::questionnaire::{answer_label, Question, ResponseSheet, ANSWER_LABELS, QUESTIONS};
use stress_lens::{
    generate_history, recommendations_for, AssessmentOutcome, AssessmentSession, ChartLayout,
    ChartView, DisplayList, QuestionnaireResponse, RasterSurface, StressLevel, StressSample,
    Surface, SvgSurface, LENS_VERSION, PRODUCER_NAME,
};

/// Stress Lens - Questionnaire stress scoring, trends, and charts
#[derive(Parser)]
#[command(name = "stresslens")]
#[command(author = "Synheart")]
#[command(version = LENS_VERSION)]
#[command(about = "Score stress questionnaires and chart stress history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the questionnaire and the answer scale
    Questions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a questionnaire
    Assess {
        /// Comma-separated answers in question order, e.g. 3,2,4,1,5,3,2,4
        #[arg(short, long)]
        answers: Option<String>,

        /// History file to append the result to (created if missing)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Print the recommendations for a stress level
    Recommend {
        /// Stress level (low, moderate, high, severe)
        #[arg(short, long)]
        level: String,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Analyze the trend of a stress history
    Trend {
        /// History file path (use - for stdin)
        #[arg(long, required_unless_present = "demo")]
        history: Option<PathBuf>,

        /// Use a generated 15-day demo history instead of a file
        #[arg(long, conflicts_with = "history")]
        demo: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Render a stress history as a chart
    Render {
        /// History file path (use - for stdin)
        #[arg(long, required_unless_present = "demo")]
        history: Option<PathBuf>,

        /// Use a generated 15-day demo history instead of a file
        #[arg(long, conflicts_with = "history")]
        demo: bool,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Chart format
        #[arg(long, default_value = "svg")]
        format: ChartFormat,

        /// Chart layout overrides (JSON)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Chart width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: u32,

        /// Chart height in pixels
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: u32,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum ChartFormat {
    /// SVG document
    Svg,
    /// Binary PPM (P6) image
    Ppm,
    /// JSON list of draw operations
    Ops,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StressCliError> {
    match cli.command {
        Commands::Questions { json } => cmd_questions(json),

        Commands::Assess {
            answers,
            history,
            output_format,
        } => cmd_assess(answers.as_deref(), history.as_deref(), output_format),

        Commands::Recommend {
            level,
            output_format,
        } => cmd_recommend(&level, output_format),

        Commands::Trend {
            history,
            demo,
            output_format,
        } => cmd_trend(history_source(history.as_deref(), demo), output_format),

        Commands::Render {
            history,
            demo,
            output,
            format,
            layout,
            width,
            height,
        } => cmd_render(
            history_source(history.as_deref(), demo),
            &output,
            format,
            layout.as_deref(),
            width,
            height,
        ),
    }
}

fn cmd_questions(json: bool) -> Result<(), StressCliError> {
    if json {
        let report = QuestionsReport {
            questions: &QUESTIONS,
            answer_labels: &ANSWER_LABELS,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Stress Assessment");
        println!("=================");
        for q in QUESTIONS.iter() {
            println!("{}. {}", q.id, q.text);
        }
        println!();
        println!("Answer scale:");
        for (i, label) in ANSWER_LABELS.iter().enumerate() {
            println!("  {} = {}", i + 1, label);
        }
    }
    Ok(())
}

fn cmd_assess(
    answers: Option<&str>,
    history: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), StressCliError> {
    let responses = match answers {
        Some(list) => responses_from_list(list)?,
        None if atty::is(atty::Stream::Stdin) => prompt_responses()?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            serde_json::from_str::<Vec<QuestionnaireResponse>>(&buffer)?
        }
    };

    let outcome = match history {
        Some(path) => {
            let mut session = AssessmentSession::new();
            if path.exists() {
                session.load_history(&fs::read_to_string(path)?)?;
            }
            let outcome = session.submit(&responses, Utc::now())?;
            fs::write(path, session.save_history()?)?;
            info!(path = %path.display(), samples = session.history().len(), "history saved");
            outcome
        }
        None => stress_lens::assess(&responses, Utc::now())?,
    };

    match output_format {
        OutputFormat::Text => print_outcome(&outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string(&outcome)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

fn cmd_recommend(level: &str, output_format: OutputFormat) -> Result<(), StressCliError> {
    let level: StressLevel = level.parse()?;
    let advice = recommendations_for(level);

    match output_format {
        OutputFormat::Text => {
            println!("Recommendations ({})", level.label());
            for item in advice {
                println!("  - {}", item);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(advice)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(advice)?),
    }
    Ok(())
}

fn cmd_trend(history: HistorySource<'_>, output_format: OutputFormat) -> Result<(), StressCliError> {
    let session = load_session(history)?;
    let trend = session.trend()?;
    let summary = session.summary()?;

    let report = TrendReport {
        producer: PRODUCER_NAME.to_string(),
        version: LENS_VERSION.to_string(),
        trend,
        summary,
    };

    match output_format {
        OutputFormat::Text => {
            println!(
                "Trend:          {} ({}%)",
                report.trend.direction.as_str(),
                report.trend.percentage
            );
            println!("Average score:  {}", report.summary.average_score);
            println!("Assessments:    {}", report.summary.assessments);
            println!(
                "Last assessed:  {}",
                report.summary.last_assessed.format("%Y-%m-%d %H:%M UTC")
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn cmd_render(
    history: HistorySource<'_>,
    output: &Path,
    format: ChartFormat,
    layout: Option<&Path>,
    width: u32,
    height: u32,
) -> Result<(), StressCliError> {
    let session = load_session(history)?;
    let layout = match layout {
        Some(path) => ChartLayout::from_json(&fs::read_to_string(path)?)?,
        None => ChartLayout::default(),
    };

    let history: Arc<[StressSample]> = Arc::from(session.history());
    let bytes = match format {
        ChartFormat::Svg => draw(SvgSurface::new(width, height), &history, layout)?
            .to_svg()
            .into_bytes(),
        ChartFormat::Ppm => draw(RasterSurface::new(width, height), &history, layout)?.to_ppm(),
        ChartFormat::Ops => {
            serde_json::to_vec_pretty(&draw(DisplayList::new(width, height), &history, layout)?)?
        }
    };
    debug!(bytes = bytes.len(), samples = session.history().len(), "chart rendered");

    if output.to_string_lossy() == "-" {
        io::stdout().write_all(&bytes)?;
    } else {
        fs::write(output, bytes)?;
    }
    Ok(())
}

// Helper functions

/// Where `trend` and `render` take their history from
enum HistorySource<'a> {
    File(&'a Path),
    Demo,
}

fn history_source(history: Option<&Path>, demo: bool) -> HistorySource<'_> {
    match history {
        Some(path) if !demo => HistorySource::File(path),
        _ => HistorySource::Demo,
    }
}

fn load_session(source: HistorySource<'_>) -> Result<AssessmentSession, StressCliError> {
    let history: Vec<StressSample> = match source {
        HistorySource::File(path) => {
            let json = if path.to_string_lossy() == "-" {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                fs::read_to_string(path)?
            };
            serde_json::from_str(&json)?
        }
        HistorySource::Demo => {
            let history = generate_history(Utc::now(), &mut rand::thread_rng())?;
            debug!(samples = history.len(), "generated demo history");
            history
        }
    };

    Ok(AssessmentSession::with_history(history)?)
}

/// Show a history on a fresh surface and hand the surface back
fn draw<S: Surface>(
    surface: S,
    history: &Arc<[StressSample]>,
    layout: ChartLayout,
) -> Result<S, StressCliError> {
    let mut view = ChartView::with_layout(surface, layout);
    view.show(Arc::clone(history))?;
    Ok(view.into_surface())
}

fn responses_from_list(list: &str) -> Result<Vec<QuestionnaireResponse>, StressCliError> {
    let mut sheet = ResponseSheet::new();
    let answers: Vec<&str> = list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

    if answers.len() != QUESTIONS.len() {
        return Err(StressCliError::AnswerCount {
            expected: QUESTIONS.len(),
            actual: answers.len(),
        });
    }

    for (index, raw) in answers.iter().enumerate() {
        let answer = parse_answer(raw)
            .ok_or_else(|| StressCliError::InvalidAnswer(raw.to_string()))?;
        sheet.record(index, answer)?;
    }
    Ok(sheet.responses()?)
}

fn prompt_responses() -> Result<Vec<QuestionnaireResponse>, StressCliError> {
    let mut sheet = ResponseSheet::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("Over the last month, how often have you...");
    for (i, label) in ANSWER_LABELS.iter().enumerate() {
        println!("  {} = {}", i + 1, label);
    }

    while let Some(index) = sheet.next_unanswered() {
        let question = &sheet.questions()[index];
        write!(stdout, "\n[{}/{}] {} ", index + 1, QUESTIONS.len(), question.text)?;
        stdout.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Err(StressCliError::Incomplete(sheet.answered())),
        };

        match parse_answer(line.trim()) {
            Some(answer) => {
                sheet.record(index, answer)?;
                if let Some(label) = answer_label(answer) {
                    println!("  -> {}", label);
                }
            }
            None => println!("  Please answer with a number from 1 to {}", ANSWER_LABELS.len()),
        }
    }

    Ok(sheet.responses()?)
}

fn parse_answer(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|a| answer_label(*a).is_some())
}

fn print_outcome(outcome: &AssessmentOutcome) {
    let indicator = LevelIndicator::new(&outcome.result);
    let breakdown = ScoreBreakdown::new(&outcome.result);

    println!("Stress Assessment Result");
    println!("========================");
    println!("Level:      {}", indicator.label);
    println!("Score:      {:.1}", outcome.result.score());
    println!(
        "Physical:   {}/{}",
        breakdown.physical,
        ScoreBreakdown::PHYSICAL_MAX
    );
    println!(
        "Emotional:  {}/{}",
        breakdown.emotional,
        ScoreBreakdown::EMOTIONAL_MAX
    );
    println!("\nRecommendations:");
    for item in &outcome.recommendations {
        println!("  - {}", item);
    }
}

// Error types

#[derive(Debug)]
enum StressCliError {
    Io(io::Error),
    Compute(stress_lens::ComputeError),
    Json(serde_json::Error),
    AnswerCount { expected: usize, actual: usize },
    InvalidAnswer(String),
    Incomplete(usize),
}

impl From<io::Error> for StressCliError {
    fn from(e: io::Error) -> Self {
        StressCliError::Io(e)
    }
}

impl From<stress_lens::ComputeError> for StressCliError {
    fn from(e: stress_lens::ComputeError) -> Self {
        StressCliError::Compute(e)
    }
}

impl From<serde_json::Error> for StressCliError {
    fn from(e: serde_json::Error) -> Self {
        StressCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<StressCliError> for CliError {
    fn from(e: StressCliError) -> Self {
        match e {
            StressCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            StressCliError::Compute(e) => {
                let hint = match &e {
                    stress_lens::ComputeError::InsufficientHistory { required, .. } => {
                        format!("Record at least {} assessments first", required)
                    }
                    stress_lens::ComputeError::JsonError(_) => {
                        "Ensure the history is a JSON array of {level, score, timestamp}".to_string()
                    }
                    _ => "Check the input values".to_string(),
                };
                CliError {
                    code: "COMPUTE_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint),
                }
            }
            StressCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            StressCliError::AnswerCount { expected, actual } => CliError {
                code: "ANSWER_COUNT".to_string(),
                message: format!("Expected {} answers, got {}", expected, actual),
                hint: Some("Run 'stresslens questions' to see the questionnaire".to_string()),
            },
            StressCliError::InvalidAnswer(raw) => CliError {
                code: "INVALID_ANSWER".to_string(),
                message: format!("Invalid answer '{}'", raw),
                hint: Some(format!("Answers are integers from 1 to {}", ANSWER_LABELS.len())),
            },
            StressCliError::Incomplete(answered) => CliError {
                code: "INCOMPLETE".to_string(),
                message: format!(
                    "Input ended after {} of {} questions",
                    answered,
                    QUESTIONS.len()
                ),
                hint: Some("Answer every question, or pass --answers".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct QuestionsReport {
    questions: &'static [Question],
    answer_labels: &'static [&'static str],
}

#[derive(serde::Serialize)]
struct TrendReport {
    producer: String,
    version: String,
    trend: stress_lens::Trend,
    summary: stress_lens::HistorySummary,
}
