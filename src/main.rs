use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::warn;
use memmap2::Mmap;

use one_brc::config::{available_workers, DEFAULT_CHUNK_SIZE};
use one_brc::report::{self, Format};
use one_brc::table::DEFAULT_CAPACITY;
use one_brc::verify::Reference;
use one_brc::{aggregate, EngineConfig, Partitioning};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    Dynamic,
    Static,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Compact,
}

#[derive(Parser, Debug)]
#[command(name = "one-brc")]
#[command(about = "Per-key min/mean/max over a `key;value` measurements file")]
#[command(version)]
struct Args {
    /// Measurements file
    #[arg(default_value = "measurements.txt")]
    path: PathBuf,

    /// Worker threads (defaults to the number of processors)
    #[arg(long, env = "ONEBRC_WORKERS")]
    workers: Option<usize>,

    /// Bytes claimed per step with dynamic partitioning
    #[arg(long, env = "ONEBRC_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Slots per worker table, a power of two
    #[arg(long, env = "ONEBRC_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    #[arg(long, value_enum, default_value = "dynamic")]
    strategy: Strategy,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Reference answers (`key=min/avg/max` per line) to compare against
    #[arg(long)]
    verify: Option<PathBuf>,

    /// Total number of lines the input should contain
    #[arg(long)]
    expected_count: Option<u64>,

    /// Don't print the per-key report
    #[arg(long)]
    no_result: bool,

    /// Don't print timing and summary lines
    #[arg(long)]
    no_print: bool,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            workers: self.workers.unwrap_or_else(available_workers),
            capacity: self.capacity,
            partitioning: match self.strategy {
                Strategy::Dynamic => Partitioning::Dynamic {
                    chunk_size: self.chunk_size,
                },
                Strategy::Static => Partitioning::Static,
            },
        }
    }
}

/// First summary line. The chunk size only applies to dynamic partitioning.
fn run_header(len: u64, config: &EngineConfig) -> String {
    match config.partitioning {
        Partitioning::Dynamic { chunk_size } => format!(
            "File size {} chunk size {} procs {}",
            len, chunk_size, config.workers
        ),
        Partitioning::Static => format!("File size {} static ranges procs {}", len, config.workers),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.engine_config();
    let timer = Instant::now();

    let file = File::open(&args.path)
        .with_context(|| format!("couldn't open file {:?}", args.path))?;
    let len = file.metadata()?.len();
    let mmap = if len == 0 {
        None
    } else {
        // SAFETY: the file is only read, and is assumed not to be modified
        // while mapped.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("couldn't map {:?}", args.path))?;
        Some(mmap)
    };
    let data: &[u8] = mmap.as_deref().unwrap_or(&[]);

    if !args.no_print {
        println!("{}", run_header(len, &config));
    }

    let agg = aggregate(data, &config)?;
    let elapsed = timer.elapsed();

    if !args.no_result {
        let format = match args.format {
            OutputFormat::Table => Format::Table,
            OutputFormat::Compact => Format::Compact,
        };
        let mut out = BufWriter::new(io::stdout().lock());
        report::write_report(&mut out, &agg.result, format)?;
        out.flush()?;
    }

    if let Some(path) = &args.verify {
        let reference = Reference::load(path)
            .with_context(|| format!("couldn't read reference {:?}", path))?;
        let mismatches = reference.compare(&agg.result, args.expected_count);
        for m in &mismatches {
            println!("{m}");
        }
        if !mismatches.is_empty() {
            warn!("{} verification mismatches", mismatches.len());
        } else if !args.no_print {
            println!("verified {} stations", reference.len());
        }
    }

    if !args.no_print {
        println!("{:?}", elapsed);
        println!("lines {}", agg.summary.lines);
        println!("stations {}", agg.result.len());
        println!("chunks {}", agg.summary.chunks);
        println!("max probe {}", agg.summary.max_probe);
        println!("collided slots {}", agg.summary.collided);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_chunk_size_only_when_dynamic() {
        let args = Args::parse_from(["one-brc", "--workers", "4", "--chunk-size", "1000"]);
        let config = args.engine_config();
        assert_eq!(
            run_header(5000, &config),
            "File size 5000 chunk size 1000 procs 4"
        );

        let args = Args::parse_from([
            "one-brc",
            "--workers",
            "4",
            "--chunk-size",
            "1000",
            "--strategy",
            "static",
        ]);
        let header = run_header(5000, &args.engine_config());
        assert_eq!(header, "File size 5000 static ranges procs 4");
        assert!(!header.contains("chunk size"));
    }
}
