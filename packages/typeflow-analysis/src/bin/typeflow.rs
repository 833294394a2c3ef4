/*
 * Typeflow CLI - Seed-Driven Typestate Analysis
 *
 * Loads a program document (JSON), runs one registered rule over it with a
 * per-seed solve budget, and prints a run summary. With --output, per-seed
 * classification rows are appended to a semicolon-separated report file.
 */

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use typeflow_analysis::{
    available_rules, resolve, AnalysisConfig, AnalysisError, Orchestrator,
};
use typeflow_model::ProgramBuilder;

#[derive(Parser)]
#[command(name = "typeflow")]
#[command(about = "Demand-driven typestate analysis over program documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a program document with one rule
    Run {
        /// Program document (JSON)
        #[arg(short, long)]
        program: PathBuf,

        /// Rule identifier (see `typeflow rules`)
        #[arg(short, long)]
        rule: String,

        /// Value reported in the Rule column instead of the rule identifier
        #[arg(long)]
        rule_label: Option<String>,

        /// Per-seed solve budget in milliseconds
        #[arg(long, default_value = "30000")]
        budget_ms: u64,

        /// Append classification rows to this report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads used to solve seeds
        #[arg(long, default_value = "1")]
        workers: usize,

        /// Class-name prefix promoted to application code (repeatable)
        #[arg(long = "app-class")]
        app_class: Vec<String>,

        /// Value reported in the Analysis column
        #[arg(long, default_value = "typeflow")]
        analysis_name: String,
    },

    /// List registered rules and their automatons
    Rules,
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            program,
            rule,
            rule_label,
            budget_ms,
            output,
            workers,
            app_class,
            analysis_name,
        } => run_analysis(RunArgs {
            program,
            rule,
            rule_label,
            budget_ms,
            output,
            workers,
            app_class,
            analysis_name,
        }),
        Commands::Rules => list_rules(),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

struct RunArgs {
    program: PathBuf,
    rule: String,
    rule_label: Option<String>,
    budget_ms: u64,
    output: Option<PathBuf>,
    workers: usize,
    app_class: Vec<String>,
    analysis_name: String,
}

fn run_analysis(args: RunArgs) -> Result<(), AnalysisError> {
    let document = std::fs::read_to_string(&args.program)
        .map_err(|e| AnalysisError::program_load(&args.program, e.to_string()))?;
    let program = ProgramBuilder::from_json(&document)
        .map_err(|e| AnalysisError::program_load(&args.program, e.to_string()))?
        .build()?;

    let mut config = AnalysisConfig::new(&args.rule)
        .with_analysis_name(&args.analysis_name)
        .with_budget_ms(args.budget_ms)
        .with_workers(args.workers);
    if let Some(label) = args.rule_label {
        config = config.with_rule_label(label);
    }
    if let Some(path) = &args.output {
        config = config.with_output_file(path);
    }
    for pattern in args.app_class {
        config = config.with_application_pattern(pattern);
    }

    let orchestrator = Orchestrator::new(config)?;
    let run = orchestrator.run(&program)?;
    let stats = &run.stats;

    println!("Program:            {}", args.program.display());
    println!("Rule:               {}", orchestrator.rule().name());
    println!("Seeds:              {}", stats.seeds);
    println!("  completed:        {}", stats.completed);
    println!("  timed out:        {}", stats.timed_out);
    println!("  solver errors:    {}", stats.solver_errors);
    println!("In error state:     {}", stats.in_error);
    println!("Reachable methods:  {}", stats.reachable_methods);
    println!("Total time:         {} ms", stats.total_time_ms);
    if let Some(path) = &args.output {
        println!("Report:             {}", path.display());
    }

    Ok(())
}

fn list_rules() -> Result<(), AnalysisError> {
    for name in available_rules() {
        let rule = resolve(name)?;
        println!("{:<18} {}", name, rule.machine().name);
    }
    Ok(())
}
