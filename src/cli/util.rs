//! CLI utility helpers

use bbtgen::{Error, GenerationConfig, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Flags that consume the next argument
const VALUE_FLAGS: &[&str] = &[
    "--seed",
    "--config",
    "--output",
    "-o",
    "--states",
    "--max-depth",
    "--max-repeats",
];

/// Output format selected by `--json` / `--yaml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_args(args: &[String]) -> Self {
        if has_flag(args, "--json") {
            OutputFormat::Json
        } else if has_flag(args, "--yaml") {
            OutputFormat::Yaml
        } else {
            OutputFormat::Text
        }
    }
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Value following `flag`, if present
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Parse the value following `flag`
pub fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid value for {}: {}", flag, raw).into()),
        None if has_flag(args, flag) => Err(format!("Missing value for {}", flag).into()),
        None => Ok(None),
    }
}

/// Arguments that are neither flags nor flag values
pub fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip = true;
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

/// `n` positional arguments or a usage error
pub fn require_positional<'a>(args: &'a [String], n: usize, usage: &str) -> Result<Vec<&'a str>> {
    let found = positional(args);
    if found.len() < n {
        return Err(format!("Usage: {}", usage).into());
    }
    Ok(found)
}

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, "--output")
        .or_else(|| flag_value(args, "-o"))
        .map(PathBuf::from)
}

/// Config file (`--config`) with command-line overrides applied
pub fn load_config(args: &[String]) -> Result<GenerationConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => GenerationConfig::load(Path::new(path))?,
        None => GenerationConfig::default(),
    };

    if let Some(seed) = parse_flag(args, "--seed")? {
        config.seed = Some(seed);
    }
    if let Some(depth) = parse_flag(args, "--max-depth")? {
        config.max_depth = depth;
    }
    if let Some(repeats) = parse_flag(args, "--max-repeats")? {
        config.max_repeats_per_state = repeats;
    }
    if has_flag(args, "--strict") {
        config.strict_ranges = true;
    }
    if has_flag(args, "--include-initial-final") {
        config.exclude_initial_to_final = false;
    }

    config.validate()?;
    Ok(config)
}

/// RNG for a command run; an unseeded run logs the seed it drew
pub fn seeded_rng(config: &GenerationConfig) -> StdRng {
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "random source seeded");
    StdRng::seed_from_u64(seed)
}

/// Render `value` in the selected format and write it out
pub fn emit<T: Serialize>(args: &[String], value: &T, text: impl FnOnce() -> String) -> Result<()> {
    let content = match OutputFormat::from_args(args) {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_norway::to_string(value)?,
        OutputFormat::Text => text(),
    };
    write_output(&parse_output_arg(args), &content)
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            tracing::info!(path = %p.display(), "output written");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
