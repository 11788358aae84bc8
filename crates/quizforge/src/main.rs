// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quizforge command-line entry point.

mod app;
mod config_cmd;
mod generate;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use quizforge_config::QuizforgeConfig;
use quizforge_core::Difficulty;

/// Quizforge - multiple-choice quiz generation over a rotating pool of Gemini models.
#[derive(Parser, Debug)]
#[command(name = "quizforge", version, about)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a quiz on a topic.
    Generate(GenerateArgs),
    /// Show today's backend usage and a user's remaining allowance.
    Status {
        /// User whose daily allowance is reported.
        #[arg(long, default_value = generate::DEFAULT_USER)]
        user: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Subject of the quiz.
    topic: String,
    /// Extra context passed to the model.
    #[arg(long, short = 'd', default_value = "")]
    description: String,
    /// Number of questions (clamped to 5..=50).
    #[arg(long, short = 'n', default_value_t = 10)]
    questions: u32,
    /// easy, medium or hard.
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,
    /// User the generation is counted against.
    #[arg(long, default_value = generate::DEFAULT_USER)]
    user: String,
    /// Output as JSON.
    #[arg(long)]
    json: bool,
    /// Disable colors.
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => quizforge_config::load_and_validate_path(path),
        None => quizforge_config::load_and_validate(),
    };
    let config: QuizforgeConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            quizforge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    app::init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Generate(args)) => generate::run_generate(&config, args.into()).await,
        Some(Commands::Status { user, json, plain }) => {
            status::run_status(&config, &user, json, plain).await
        }
        Some(Commands::Config) => config_cmd::run_config(&config),
        None => {
            println!("quizforge: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

impl From<GenerateArgs> for generate::GenerateOptions {
    fn from(args: GenerateArgs) -> Self {
        Self {
            topic: args.topic,
            description: args.description,
            questions: args.questions,
            difficulty: args.difficulty,
            user: args.user,
            json: args.json,
            plain: args.plain,
        }
    }
}
