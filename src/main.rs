//! membuf - load input into a paged buffer and print a range of it

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use membuf::{LogObserver, PagedBuffer, SeekOrigin};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Origin {
    Start,
    Current,
    End,
}

impl From<Origin> for SeekOrigin {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Start => SeekOrigin::Start,
            Origin::Current => SeekOrigin::Current,
            Origin::End => SeekOrigin::End,
        }
    }
}

/// membuf - copy inputs into an in-memory paged buffer, seek, and print a range
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files, concatenated in order (stdin if none)
    inputs: Vec<PathBuf>,

    /// Seek offset applied after loading
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    offset: i64,

    /// Origin the offset is relative to
    #[arg(long, value_enum, default_value = "start")]
    origin: Origin,

    /// Maximum number of bytes to print (everything up to the end if omitted)
    #[arg(short, long)]
    length: Option<usize>,

    /// Size of each read from the buffer
    #[arg(long, default_value = "4096")]
    chunk_size: usize,

    /// Print buffer state to stderr when done
    #[arg(short, long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut buffer = if args.debug {
        PagedBuffer::with_observer(Box::new(LogObserver::new("membuf")))
    } else {
        PagedBuffer::new()
    };

    load_inputs(&mut buffer, &args.inputs)?;
    log::info!("loaded {} bytes into {} blocks", buffer.len(), buffer.block_count());

    // after loading the cursor is at the end, so Current and End coincide
    buffer
        .seek_to(args.offset, args.origin.into())
        .with_context(|| format!("Failed to seek to {} from {:?}", args.offset, args.origin))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let printed = copy_range(&mut buffer, &mut out, args.length, args.chunk_size)?;
    out.flush().context("Failed to flush stdout")?;
    log::info!("printed {} bytes", printed);

    if args.stats {
        eprintln!("{}", buffer);
    }
    buffer.close();

    Ok(())
}

/// Append every input to the buffer.
fn load_inputs(buffer: &mut PagedBuffer, inputs: &[PathBuf]) -> Result<()> {
    if inputs.is_empty() {
        io::copy(&mut io::stdin().lock(), buffer).context("Failed to read stdin")?;
        return Ok(());
    }

    for path in inputs {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let n = io::copy(&mut file, buffer)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        log::debug!("loaded {} bytes from {:?}", n, path);
    }
    Ok(())
}

/// Stream up to `limit` bytes from the cursor into `out`.
fn copy_range(
    buffer: &mut PagedBuffer,
    out: &mut impl Write,
    limit: Option<usize>,
    chunk_size: usize,
) -> Result<usize> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut remaining = limit.unwrap_or(usize::MAX);
    let mut total = 0;

    while remaining > 0 {
        let want = remaining.min(chunk.len());
        let outcome = buffer.read_chunk(&mut chunk[..want]);
        out.write_all(&chunk[..outcome.count])
            .context("Failed to write output")?;
        total += outcome.count;
        remaining -= outcome.count;
        if outcome.end_of_data {
            break;
        }
    }

    Ok(total)
}
