//! AtlasStore CLI
//!
//! Inspect and patch the raw bytes of a file-backed store.

use std::path::PathBuf;

use atlasstore::{Access, Store};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

/// AtlasStore CLI
#[derive(Parser, Debug)]
#[command(name = "atlasstore-cli")]
#[command(about = "Inspect and edit AtlasStore files")]
#[command(version)]
struct Args {
    /// Store file
    path: PathBuf,

    /// Open the file through a memory mapping instead of direct I/O
    #[arg(short, long)]
    mapped: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the store's name, capacity and granted access
    Info {
        /// Access to request
        #[arg(short, long, value_enum, default_value = "read-only")]
        access: AccessArg,
    },

    /// Hex-dump a byte range
    Dump {
        /// First byte to dump
        #[arg(short, long, default_value = "0")]
        offset: usize,

        /// Bytes to dump (default: to the end of the store)
        #[arg(short, long)]
        len: Option<usize>,
    },

    /// Write bytes at an offset
    Write {
        /// Location to write at
        offset: usize,

        /// Bytes as hex (e.g. "48656c6c6f"), or text with --text
        data: String,

        /// Treat DATA as UTF-8 text
        #[arg(short, long)]
        text: bool,
    },

    /// Grow or truncate the store
    Resize {
        /// New capacity in bytes
        capacity: usize,
    },

    /// Delete the store file
    Delete,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AccessArg {
    ReadOnly,
    ReadWrite,
    Exclusive,
}

impl From<AccessArg> for Access {
    fn from(arg: AccessArg) -> Self {
        match arg {
            AccessArg::ReadOnly => Access::ReadOnly,
            AccessArg::ReadWrite => Access::ReadWrite,
            AccessArg::Exclusive => Access::Exclusive,
        }
    }
}

/// Bytes per dump line
const DUMP_WIDTH: usize = 16;

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atlasstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let store = if args.mapped {
        Store::mapped(&args.path)
    } else {
        Store::file(&args.path)
    };

    if let Err(e) = run(&store, args.command) {
        tracing::error!("{}: {}", store, e);
        std::process::exit(1);
    }
}

fn run(store: &Store, command: Commands) -> atlasstore::Result<()> {
    match command {
        Commands::Info { access } => {
            let granted = store.open(access.into())?;
            println!("name:     {}", store);
            println!("capacity: {}", store.capacity());
            match granted {
                Some(access) => println!("access:   {:?}", access),
                None => println!("access:   none granted"),
            }
        }

        Commands::Dump { offset, len } => {
            open(store, Access::ReadOnly)?;
            let len = len.unwrap_or_else(|| store.capacity().saturating_sub(offset));
            let bytes = store.get_vec(offset, len)?;

            for (line, chunk) in bytes.chunks(DUMP_WIDTH).enumerate() {
                println!("{:08x}  {}", offset + line * DUMP_WIDTH, hex_line(chunk));
            }
        }

        Commands::Write { offset, data, text } => {
            let bytes = if text {
                data.into_bytes()
            } else {
                parse_hex(&data)?
            };

            open(store, Access::ReadWrite)?;
            store.put(offset, &bytes)?;
            tracing::info!("Wrote {} bytes at {}", bytes.len(), offset);
        }

        Commands::Resize { capacity } => {
            open(store, Access::ReadWrite)?;
            let previous = store.capacity();
            let capacity = store.set_capacity(capacity)?;
            tracing::info!("Resized {} -> {} bytes", previous, capacity);
        }

        Commands::Delete => {
            store.delete()?;
            tracing::info!("Deleted {}", store);
        }
    }

    store.close()
}

/// Open with at least `access`, failing if only a weaker level is granted
fn open(store: &Store, access: Access) -> atlasstore::Result<()> {
    match store.open(access)? {
        Some(granted) if !access.can_write() || granted.can_write() => Ok(()),
        granted => Err(atlasstore::AtlasError::AccessDenied {
            store: store.name().to_string(),
            access: granted.unwrap_or(Access::ReadOnly),
            operation: "open",
        }),
    }
}

fn hex_line(chunk: &[u8]) -> String {
    let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
    let ascii: String = chunk
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect();
    format!("{:<width$}  |{}|", hex.join(" "), ascii, width = DUMP_WIDTH * 3 - 1)
}

fn parse_hex(data: &str) -> atlasstore::Result<Vec<u8>> {
    let digits: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) || digits.len() % 2 != 0 {
        return Err(atlasstore::AtlasError::Config(format!(
            "expected an even number of hex digits, got '{}'",
            data
        )));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| atlasstore::AtlasError::Config(e.to_string()))
        })
        .collect()
}
