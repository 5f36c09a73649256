use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand};
use dfx::config::DfxConfig;
use dfx::dataset::Dataset;
use dfx::describer::{
    Describer, DescriberFactory, DescriberKind, PlainFactory, Subject, SubjectShape,
};
use dfx::render::PrefixUrlBuilder;
use dfx::store::CacheStore;
use polars::prelude::{LazyCsvReader, LazyFileListReader as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dfx", about = "Describe tabular datasets with cached statistical describers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Describe a dataset, one of its columns, a column pair, a row or a value
    Describe {
        /// Dataset file (.json as written by dfx, or .csv)
        path: PathBuf,

        #[command(flatten)]
        target: Target,

        /// Run one describer instead of the page for the target (e.g. ColumnId)
        #[arg(long)]
        kind: Option<String>,

        /// Compute without reading or writing the cache store
        #[arg(long)]
        no_cache: bool,

        /// Print only the one-line description
        #[arg(long)]
        brief: bool,
    },
    /// Inspect or reset the cache store
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
#[group(multiple = false)]
pub struct Target {
    /// Column to describe
    #[arg(long)]
    column: Option<String>,

    /// Two columns whose relationship to describe
    #[arg(long, num_args = 2, value_names = ["COLUMN_1", "COLUMN_2"])]
    relationship: Option<Vec<String>>,

    /// Row index to show
    #[arg(long)]
    row: Option<usize>,

    /// Column and value to look up
    #[arg(long, num_args = 2, value_names = ["COLUMN", "VALUE"])]
    value: Option<Vec<String>>,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Remove every cached entry
    Clear,
    /// List cached keys
    Keys,
    /// Check whether a key is cached
    Has { key: String },
}

impl Target {
    fn subject(self) -> Result<Subject> {
        Ok(match self {
            Self { column: Some(c), .. } => Subject::Column(c),
            Self {
                relationship: Some(pair),
                ..
            } => match <[String; 2]>::try_from(pair) {
                Ok([a, b]) => Subject::Relationship(a, b),
                Err(_) => bail!("--relationship takes two column names"),
            },
            Self { row: Some(r), .. } => Subject::Row(r),
            Self { value: Some(pair), .. } => match <[String; 2]>::try_from(pair) {
                Ok([c, v]) => Subject::Value {
                    column: c,
                    value: v,
                },
                Err(_) => bail!("--value takes a column name and a value"),
            },
            _ => Subject::Table,
        })
    }
}

pub fn run_command(command: Commands, config: &DfxConfig) -> Result<()> {
    match command {
        Commands::Describe {
            path,
            target,
            kind,
            no_cache,
            brief,
        } => handle_describe(
            &path,
            target.subject()?,
            kind.as_deref(),
            config.use_cache && !no_cache,
            brief,
            config,
        ),
        Commands::Cache { action } => handle_cache(action, config),
    }
}

fn page_kind(shape: SubjectShape) -> DescriberKind {
    match shape {
        SubjectShape::Table => DescriberKind::TablePage,
        SubjectShape::Column => DescriberKind::ColumnPage,
        SubjectShape::Relationship => DescriberKind::RelationshipPage,
        SubjectShape::Row => DescriberKind::RowPage,
        SubjectShape::Value => DescriberKind::ValuePage,
    }
}

fn handle_describe(
    path: &Path,
    subject: Subject,
    kind: Option<&str>,
    use_cache: bool,
    brief: bool,
    config: &DfxConfig,
) -> Result<()> {
    let dataset = Arc::new(load_dataset(path)?);
    let kind = match kind {
        Some(name) => name.parse::<DescriberKind>()?,
        None => page_kind(subject.shape()),
    };

    let describer: Describer = if use_cache {
        let store = CacheStore::open(config.store_dir());
        store.get_or_create(kind, &dataset, subject)?
    } else {
        let describer = PlainFactory.get_or_create(kind, &dataset, subject)?;
        describer.ensure_evaluated(&PlainFactory);
        describer
    };
    tracing::info!(identity = %describer.identity(), state = %describer.state(), "Described");

    if brief {
        println!("{}", describer.description());
    } else {
        let urls = PrefixUrlBuilder::new(config.url_prefix.clone());
        print!("{}", describer.render(&urls));
    }
    Ok(())
}

fn handle_cache(action: CacheAction, config: &DfxConfig) -> Result<()> {
    let store = CacheStore::open(config.store_dir());
    match action {
        CacheAction::Clear => {
            store.clear()?;
            println!("Cleared {}", store.root().display());
        }
        CacheAction::Keys => {
            for key in store.keys()? {
                println!("{key}");
            }
        }
        CacheAction::Has { key } => {
            println!("{}", store.has(&key));
        }
    }
    Ok(())
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "json" => Ok(Dataset::load_json(path)?),
        "csv" => {
            let df = LazyCsvReader::new(path)
                .with_infer_schema_length(Some(10000))
                .with_has_header(true)
                .finish()?
                .collect()
                .context("Failed to read CSV")?;
            Ok(Dataset::try_from(&df)?)
        }
        _ => bail!("Unsupported file extension: {ext}"),
    }
}
