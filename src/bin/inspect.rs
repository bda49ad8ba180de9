//! mastore Inspector
//!
//! Read-only diagnostics for a `.maStore` directory.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mastore::{MultiAlignStore, StoreConfig, TigClass};
use tracing_subscriber::{fmt, EnvFilter};

/// mastore Inspector
#[derive(Parser, Debug)]
#[command(name = "mastore-inspect")]
#[command(about = "Inspect a multi-alignment store")]
#[command(version)]
struct Args {
    /// Store directory (x.maStore)
    store: PathBuf,

    /// Version to open (default: latest)
    #[arg(short = 'v', long)]
    store_version: Option<u32>,

    /// Restrict to a unitig partition
    #[arg(short, long, default_value = "0")]
    unitig_partition: u32,

    /// Restrict to a contig partition
    #[arg(short, long, default_value = "0")]
    contig_partition: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Class {
    Utg,
    Ctg,
}

impl From<Class> for TigClass {
    fn from(class: Class) -> Self {
        match class {
            Class::Utg => TigClass::Unitig,
            Class::Ctg => TigClass::Contig,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print versions, partitions and record counts
    Info,

    /// Dump metadata records
    Dump {
        #[arg(value_enum)]
        class: Class,

        /// Dump a single record
        id: Option<u32>,
    },

    /// Load one tig and print its summary
    Show {
        #[arg(value_enum)]
        class: Class,

        id: u32,
    },
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mastore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> mastore::Result<()> {
    let version = match args.store_version {
        Some(v) => v,
        None => MultiAlignStore::find_latest_version(&args.store)?
            .ok_or_else(|| mastore::StoreError::NotFound(args.store.clone()))?,
    };

    let mut store = MultiAlignStore::open(
        StoreConfig::with_dir(&args.store),
        version,
        args.unitig_partition,
        args.contig_partition,
        false,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Info => {
            writeln!(out, "store       {}", store.store_dir().display())?;
            writeln!(out, "version     {}", version)?;
            writeln!(out, "latest      {:?}", store.latest_version()?)?;
            writeln!(out, "partitions  {:?}", store.partitions(version)?)?;
            writeln!(out, "mode        {:?}", store.mode())?;
            writeln!(out, "unitigs     {}", store.num_unitigs())?;
            writeln!(out, "contigs     {}", store.num_contigs())?;
        }
        Commands::Dump { class, id: Some(id) } => {
            store.dump_record(id, class.into(), &mut out)?;
        }
        Commands::Dump { class, id: None } => {
            store.dump_table(class.into(), &mut out)?;
        }
        Commands::Show { class, id } => match store.load(id, class.into())? {
            Some(tig) => {
                writeln!(out, "id          {}", tig.id)?;
                writeln!(out, "length      {}", tig.gapped_length())?;
                writeln!(out, "summary     {:?}", tig.summary)?;
                writeln!(out, "fragments   {}", tig.fragments.len())?;
                writeln!(out, "unitigs     {}", tig.unitigs.len())?;
            }
            None => writeln!(out, "{} {} not loadable from this session", TigClass::from(class), id)?,
        },
    }

    Ok(())
}
