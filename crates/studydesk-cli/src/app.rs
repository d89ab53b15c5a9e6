//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use studydesk_core::{QuizLevel, RoutingMode, StudyTask, Subject};

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(
    author,
    version,
    about = "Study assistant backed by hosted LLMs, with formula-aware Word/PDF export"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Study subject (finance, statistics, law, project-management, other)
    #[arg(long, global = true)]
    pub subject: Option<Subject>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question
    Ask(AskArgs),

    /// Interactive tutoring session
    Chat(ChatArgs),

    /// Generate a synthesis, flashcards or a quiz from course documents
    Study(StudyArgs),

    /// Print the text extracted from documents
    Extract(ExtractArgs),

    /// Convert a text or markdown answer to .docx or .pdf
    Export(ExportArgs),

    /// List discovered models of the primary provider
    Models,

    /// Show providers and routing settings
    Status,

    /// Manage the configuration file
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct AskArgs {
    /// Question
    #[arg(required = true)]
    pub prompt: Vec<String>,

    /// Routing mode (auto, fast, expert, reasoning)
    #[arg(short, long, default_value = "auto")]
    pub mode: RoutingMode,

    /// Course documents used as context
    #[arg(short, long = "doc")]
    pub docs: Vec<PathBuf>,

    #[command(flatten)]
    pub export: ExportTarget,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Routing mode (auto, fast, expert, reasoning)
    #[arg(short, long, default_value = "auto")]
    pub mode: RoutingMode,

    /// Course documents loaded before the first question
    #[arg(short, long = "doc")]
    pub docs: Vec<PathBuf>,
}

#[derive(Args)]
pub struct StudyArgs {
    /// What to generate
    #[arg(value_enum)]
    pub task: TaskKind,

    /// Quiz difficulty (beginner, intermediate, expert)
    #[arg(short, long, default_value = "beginner")]
    pub level: QuizLevel,

    /// Course documents
    #[arg(short, long = "doc", required = true)]
    pub docs: Vec<PathBuf>,

    #[command(flatten)]
    pub export: ExportTarget,
}

#[derive(Args)]
pub struct ExportTarget {
    /// Also write the answer to a .docx or .pdf file
    #[arg(long = "export")]
    pub path: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Keep formulas as text instead of rendering them with LaTeX
    #[arg(long)]
    pub no_render: bool,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Files to read
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Text or markdown file to convert
    pub input: PathBuf,

    /// Output file (.docx or .pdf)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Keep formulas as text instead of rendering them with LaTeX
    #[arg(long)]
    pub no_render: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file contents
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskKind {
    Synthesis,
    Flashcards,
    Quiz,
}

impl TaskKind {
    pub fn task(self, level: QuizLevel) -> StudyTask {
        match self {
            Self::Synthesis => StudyTask::Synthesis,
            Self::Flashcards => StudyTask::Flashcards,
            Self::Quiz => StudyTask::Quiz { level },
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
