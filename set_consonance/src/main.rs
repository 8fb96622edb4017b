// Set Consonance: CLI entry point.
//
// Finds the most consonant octave layout of a digit structure, then plays a
// digit sequence through it as a chord progression.
// The pipeline: table check → spacing search → progression → (crawl) → report.
//
// Usage:
//   cargo run -p set_consonance -- [TEMPLATE] [--config PATH] [--force N]
//     [--skip-dups] [--parallel] [--sequence PATH] [--reverse] [--rotate N]
//     [--transpose N] [--tonic-reps N] [--crawl] [--json PATH]
//
// TEMPLATE is a hex set code, one radix per digit ("444", "0x2232").
// Logging goes through env_logger; set RUST_LOG=debug for the per-spacing
// trace.

use set_consonance::config::RunConfig;
use set_consonance::crawl::CommonToneCrawler;
use set_consonance::pipeline::{self, RunReport};
use set_consonance::progression::describe;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_flag::<PathBuf>(&args, "--config") {
        Some(path) => match RunConfig::load(&path) {
            Ok(c) => c,
            Err(e) => fail("loading config", e),
        },
        None => RunConfig::default(),
    };
    apply_flags(&mut config, &args);

    println!("=== Set Consonance ===");
    println!("Template: {}", config.template);
    if let Some(n) = config.spacing.forced_selection {
        println!("Forced selection: #{}", n);
    }
    println!();

    println!("[1/5] Validating harmonizations...");
    let checked = pipeline::validate_tables().unwrap_or_else(|e| fail("validating", e));
    println!("  {} recipes agree with the catalog.", checked);

    let template = config.template().unwrap_or_else(|e| fail("parsing template", e));
    let sequence = config
        .sequence_for(&template)
        .unwrap_or_else(|e| fail("loading sequence", e));

    println!("[2/5] Searching spacings for {}...", template);
    let spacing = pipeline::optimize(&config, &template).unwrap_or_else(|e| fail("searching", e));
    println!(
        "  Considered {} ({} accepted, {} duplicates).",
        spacing.considered, spacing.accepted, spacing.duplicates
    );
    println!(
        "  Best spacing {:?} (#{}{}): {}",
        spacing.spacing,
        spacing.ordinal,
        if spacing.forced { ", forced" } else { "" },
        spacing.score
    );
    let labels = pipeline::label_winners(&spacing).unwrap_or_else(|e| fail("labelling", e));
    println!("  {} permutations named.", labels.len());

    println!("[3/5] Building progression ({} states)...", sequence.state_count());
    let progression = pipeline::progression(&config, &template, &spacing, &sequence)
        .unwrap_or_else(|e| fail("building progression", e));
    for (i, chord) in progression.chords.iter().enumerate() {
        println!("  {}", describe(chord, i));
        println!("       {}", chord.tone_map_row());
    }
    println!("  Common tones over the cycle: {}", progression.total_common_tones);

    let crawl = if config.crawl_common_tones {
        let crawler =
            CommonToneCrawler::new(&template, &spacing.spacing, &sequence, &config.progression);
        println!("[4/5] Crawling {} tone maps...", crawler.combination_count());
        let report = crawler.crawl().unwrap_or_else(|e| fail("crawling", e));
        println!("  {}", report.summary());
        if let Some(best) = report.best() {
            println!("  Best map #{}: {:?}", best.ordinal, best.tone_map);
        }
        Some(report)
    } else {
        println!("[4/5] Skipping tone-map crawl.");
        None
    };

    let report = RunReport {
        harmonizations_checked: checked,
        spacing,
        labels,
        progression,
        crawl,
    };
    match &config.output {
        Some(path) => {
            println!("[5/5] Writing report to {}...", path.display());
            if let Err(e) = report.write_json(path) {
                fail("writing report", e);
            }
            println!("  Done.");
        }
        None => println!("[5/5] No report requested (--json PATH)."),
    }
}

fn apply_flags(config: &mut RunConfig, args: &[String]) {
    if let Some(template) = args.get(1).filter(|s| !s.starts_with("--")) {
        config.template = template.clone();
    }
    if let Some(n) = parse_flag(args, "--force") {
        config.spacing.forced_selection = Some(n);
    }
    if has_flag(args, "--skip-dups") {
        config.spacing.skip_duplicates = true;
    }
    if has_flag(args, "--parallel") {
        config.parallel = true;
    }
    if let Some(path) = parse_flag::<PathBuf>(args, "--sequence") {
        config.sequence = Some(path);
    }
    if has_flag(args, "--reverse") {
        config.progression.reversed = true;
    }
    if let Some(n) = parse_flag(args, "--rotate") {
        config.progression.rotation = n;
    }
    if let Some(n) = parse_flag(args, "--transpose") {
        config.progression.transposition = n;
    }
    if let Some(n) = parse_flag(args, "--tonic-reps") {
        config.progression.tonic_repetitions = n;
    }
    if has_flag(args, "--crawl") {
        config.crawl_common_tones = true;
    }
    if let Some(path) = parse_flag::<PathBuf>(args, "--json") {
        config.output = Some(path);
    }
}

fn fail(stage: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("  Error {}: {}", stage, error);
    std::process::exit(1);
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
