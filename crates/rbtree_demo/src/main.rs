use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod driver;

/// Grows a red-black tree from random unique keys and writes a Graphviz
/// snapshot after every insertion.
#[derive(Parser, Debug)]
#[command(name = "rbtree-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of keys to insert
    #[arg(short = 'n', long, default_value_t = 15)]
    count: u32,

    /// Keys are drawn from 0..MAX_KEY
    #[arg(short, long, default_value_t = 100)]
    max_key: u32,

    /// RNG seed; seeded from the OS when absent
    #[arg(short, long, env = "RBTREE_DEMO_SEED")]
    seed: Option<u64>,

    /// Directory for the .dot snapshots
    #[arg(short, long, env = "RBTREE_DEMO_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// File name prefix, followed by the step number
    #[arg(long, default_value = "insert_step_")]
    prefix: String,
}

/// Reads the filter from `RBTREE_LOG`, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("RBTREE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(count = cli.count, max_key = cli.max_key, seed = ?cli.seed, "growing tree");

    let tree = driver::grow(&mut rng, cli.count, cli.max_key, |step, tree| {
        let path = driver::snapshot_path(&cli.out_dir, &cli.prefix, step);
        driver::write_snapshot(&path, tree)
    })?;
    let black_height = tree.validate().context("tree invariants broken")?;
    info!(len = tree.len(), black_height, "done");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, run};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_classic_run() {
        let cli = Cli::try_parse_from(["rbtree-demo"]).unwrap();
        assert_eq!(cli.count, 15);
        assert_eq!(cli.max_key, 100);
        assert_eq!(cli.prefix, "insert_step_");
    }

    #[test]
    fn run_writes_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("snapshots");
        let cli = Cli::try_parse_from([
            "rbtree-demo",
            "--count",
            "6",
            "--seed",
            "9",
            "--out-dir",
            out.to_str().unwrap(),
            "--prefix",
            "step_",
        ])
        .unwrap();
        run(&cli).unwrap();
        let mut names: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            ["step_1.dot", "step_2.dot", "step_3.dot", "step_4.dot", "step_5.dot", "step_6.dot"]
        );
    }

    #[test]
    fn run_rejects_too_many_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "rbtree-demo",
            "-n",
            "20",
            "-m",
            "10",
            "-o",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(&cli).is_err());
    }
}
