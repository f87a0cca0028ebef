use std::path::{Path, PathBuf};

use anyhow::Result;
use ariadne::Source;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use util::repl;

use workbench::{
    analyze, corrector::expand_shorthand, parser::parse_all, prelude::*, report::build_report,
    stepper::{self, Stepper},
};

#[derive(Parser, Debug)]
#[command(
    name = "workbench",
    about = "Parse, inspect and reduce untyped lambda terms step by step"
)]
struct Config {
    /// Evaluate this source once and exit instead of starting the REPL
    #[arg(short, long)]
    eval: Option<String>,

    /// Ticks spent on an input before still-reducible terms are shown as pending
    #[arg(short, long, default_value_t = 1000)]
    ticks: usize,

    /// Shown in place of a term that is not yet in normal form
    #[arg(long, default_value = stepper::PENDING)]
    placeholder: String,

    /// Where the line editor keeps its history
    #[arg(long, default_value = "/tmp/workbench.history")]
    history: PathBuf,
}

/// Splits `:cmd rest` into its command and argument. Input without a leading
/// `:` is all argument.
fn split_command(input: &str) -> (&str, &str) {
    match input.strip_prefix(':') {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.split_once(' ').unwrap_or((stripped, ""))
        }
        None => ("", input),
    }
}

struct Repl {
    config: Config,
    stepper: Stepper,
}
impl Repl {
    fn new(config: Config) -> Self {
        let stepper = Stepper::new(config.placeholder.as_str());
        Self { config, stepper }
    }

    fn report(source: &str, e: &Error) -> Result<()> {
        build_report(e).eprint(Source::from(source))?;
        Ok(())
    }

    fn parse(input: &str) -> Result<()> {
        for form in parse_all(input) {
            println!("{}..{}\t{form}", form.span.start, form.span.end);
        }
        Ok(())
    }

    fn free(input: &str) -> Result<()> {
        for result in analyze(input) {
            match result {
                Ok(analysis) => println!("{analysis}"),
                Err(e) => Self::report(input, &e)?,
            }
        }
        Ok(())
    }

    fn print(&self) -> Result<()> {
        let source = self.stepper.source().unwrap_or_default();
        for (i, output) in self.stepper.outputs().enumerate() {
            if i > 0 {
                println!();
            }
            match output {
                Ok(line) => println!("{line}"),
                Err(e) => Self::report(source, e)?,
            }
        }
        Ok(())
    }

    fn evaluate(&mut self, input: &str) -> Result<()> {
        self.stepper.tick(input);
        let mut ticks = 0;
        while self.stepper.pending() > 0 && ticks < self.config.ticks {
            self.stepper.tick(input);
            ticks += 1;
        }
        info!(ticks, pending = self.stepper.pending(), "evaluated");
        self.print()
    }

    fn step(&mut self, input: &str) -> Result<()> {
        let source = if input.trim().is_empty() {
            self.stepper.source().unwrap_or_default().to_string()
        } else {
            input.to_string()
        };
        self.stepper.tick(&source);
        self.print()
    }

    fn show_help() {
        println!(
            "{}",
            r#"
term                -- same as :evaluate term
:parse      term    -- show the parsed forms with their spans
:free       term    -- show each term with its free variables
:step      [term]   -- advance one tick; reloads only if term differs
:evaluate   term    -- reduce until normal or out of ticks
:help               -- show this message

`\` is read as `λ`, e.g. ((\ x y x) a b)
        "#
            .trim()
        );
    }

    fn handle_repl_input(&mut self, input: &str) -> Result<()> {
        let (cmd, input) = split_command(input);
        let input = expand_shorthand(input);
        match cmd {
            "p" | "parse" => Self::parse(&input)?,
            "f" | "free" => Self::free(&input)?,
            "s" | "step" => self.step(&input)?,
            "" | "e" | "eval" | "evaluate" => self.evaluate(&input)?,
            "h" | "he" | "hel" | "help" => Self::show_help(),
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}
impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const PROMPT: &'static str = "λ> ";
    fn history(&self) -> Option<&Path> {
        Some(&self.config.history)
    }
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Ok(());
        }
        self.handle_repl_input(&input)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let config = Config::parse();
    if let Some(source) = config.eval.clone() {
        return Repl::new(config).evaluate(&expand_shorthand(&source));
    }
    println!("Hi, this is an untyped lambda calculus workbench. :h to show help");
    println!();
    repl::start_repl(Repl::new(config))?;
    Ok(())
}
