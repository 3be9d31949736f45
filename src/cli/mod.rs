//! Command-line interface
//!
//! The workflow is a fixed sequence; the flags only override the
//! configuration record's defaults.

use clap::Parser;
use colored::*;

use crate::config::RunConfig;
use crate::data::DatasetLoader;
use crate::error::Result;
use crate::experiment::{Experiment, ExperimentReport};
use crate::schema::DatasetSchema;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn warn(s: &str) -> ColoredString {
    s.truecolor(235, 160, 80)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "palmerml")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Penguin sex classification with elastic-net logistic regression")]
#[command(long_about = None)]
pub struct Cli {
    /// Dataset location: an http(s) URL or a local CSV path
    #[arg(short, long)]
    pub data: Option<String>,

    /// Random seed for splitting and cross-validation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of rows held out for the test set
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Number of cross-validation folds
    #[arg(long)]
    pub cv_folds: Option<usize>,

    /// Emit the full report as JSON instead of the console summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Merge the flags over the configuration defaults
    pub fn to_config(&self) -> RunConfig {
        let mut config = RunConfig::default();
        if let Some(data) = &self.data {
            config.data_source = data.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        if let Some(folds) = self.cv_folds {
            config.cv_folds = folds;
        }
        config
    }
}

/// Load the dataset, run the experiment, render the report
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config();
    let schema = DatasetSchema::penguins();

    let df = DatasetLoader::new().load(&config.data_source)?;
    step_ok(&format!(
        "loaded {} rows x {} columns",
        df.height(),
        df.width()
    ));

    let experiment = Experiment::new(config, schema)?;
    let report = experiment.run(&df)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

// ─── Report rendering ──────────────────────────────────────────────────────────

const BAR_WIDTH: usize = 24;

fn render_report(report: &ExperimentReport) {
    section("Dataset");
    println!(
        "  {}",
        kv("rows", &format!(
            "{} raw, {} after dropping missing {}",
            report.summary.n_rows_raw,
            report.summary.n_rows_clean,
            report.summary.classes.join("/")
        ))
    );
    println!(
        "  {}",
        kv("split", &format!(
            "{} train / {} test",
            report.summary.n_train, report.summary.n_test
        ))
    );

    section("Cross-validation");
    println!(
        "  {}  {}  {}",
        muted("l1_ratio"),
        muted("       C"),
        muted("mean accuracy")
    );
    for point in &report.evaluations {
        let is_best =
            point.l1_ratio == report.best_l1_ratio && point.c == report.best_c;
        let line = format!(
            "{:>8.2}  {:>8.3}  {:.4} ± {:.4}",
            point.l1_ratio, point.c, point.mean_score, point.std_score
        );
        if is_best {
            println!("  {} {}", accent("›"), line.white());
        } else {
            println!("    {}", dim(&line));
        }
    }
    println!();
    println!(
        "  {}",
        kv(
            "best",
            &format!(
                "l1_ratio = {}, C = {} (cv accuracy {:.4})",
                report.best_l1_ratio, report.best_c, report.best_cv_score
            )
        )
    );

    section("Coefficients (by magnitude)");
    let max_magnitude = report.coefficients.max_magnitude().max(f64::MIN_POSITIVE);
    for coef in report.coefficients.ranked() {
        let filled = ((coef.magnitude() / max_magnitude) * BAR_WIDTH as f64).round() as usize;
        let bar: String = "█".repeat(filled.min(BAR_WIDTH));
        let bar = if coef.value >= 0.0 {
            ok(&bar)
        } else {
            warn(&bar)
        };
        println!(
            "  {:>22} {:>9.4}  {}",
            coef.feature,
            coef.value,
            bar
        );
    }
    println!(
        "  {:>22} {:>9.4}",
        dim("intercept"),
        report.coefficients.intercept
    );

    section("Test set");
    println!(
        "  {}  {}  {}  {}  {}",
        muted("class     "),
        muted("precision"),
        muted("recall"),
        muted("    f1"),
        muted("support")
    );
    for class in &report.test_metrics.classes {
        println!(
            "  {:<10}  {:>9.4}  {:>6.4}  {:>6.4}  {:>7}",
            class.class, class.precision, class.recall, class.f1, class.support
        );
    }
    println!();
    step_ok(&format!(
        "test accuracy {:.4} on {} rows",
        report.test_metrics.accuracy, report.test_metrics.n_samples
    ));
}
