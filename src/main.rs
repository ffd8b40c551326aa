//! arbor - a file explorer core driven from the command line.
//!
//! Usage:
//!   arbor ls [DIR]                     List a directory
//!   arbor tree [DIR] --depth N         Expand a directory tree
//!   arbor mkdir PARENT NAME            Create a folder
//!   arbor rm PATH                      Delete recursively
//!   arbor rename PATH NEW_NAME         Rename within the parent
//!   arbor paste [--cut] SOURCE TARGET  Copy or move into a directory
//!   arbor size PATH                    Recursive size
//!   arbor info PATH                    Metadata record
//!   arbor actions PATH                 Context-menu actions for an entry

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use arbor_core::{
    ActionTarget, Clipboard, ClipboardMode, EntryKind, ExplorerConfig, ExplorerTree,
    available_actions,
};
use arbor_ops::{OperationExecutor, host_roots};

#[derive(Parser)]
#[command(
    name = "arbor",
    version,
    about = "A file explorer core with a command-line front end",
    long_about = "arbor exposes the operations of a tree-based file explorer: \
                  listing, folder creation, deletion, renaming, copy/cut and \
                  paste, sizing and metadata."
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the children of a directory
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Expand a directory tree
    Tree {
        /// Directory to expand
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Number of levels to expand
        #[arg(short, long, default_value = "2")]
        depth: usize,
    },

    /// Create a folder inside a directory
    Mkdir {
        /// Parent directory
        parent: PathBuf,

        /// Name of the new folder
        name: String,
    },

    /// Delete a file or directory tree
    Rm {
        /// Entry to delete
        path: PathBuf,
    },

    /// Rename an entry within its directory
    Rename {
        /// Entry to rename
        path: PathBuf,

        /// New name
        new_name: String,
    },

    /// Paste an entry into a directory
    Paste {
        /// Entry placed on the clipboard
        source: PathBuf,

        /// Directory to paste into
        target: PathBuf,

        /// Move instead of copying
        #[arg(long)]
        cut: bool,

        /// Number of paste attempts with the same clipboard
        #[arg(short = 'n', long, default_value = "1")]
        times: usize,
    },

    /// Show the recursive size of an entry
    Size {
        /// Entry to measure
        path: PathBuf,
    },

    /// Show the metadata record of an entry
    Info {
        /// Entry to describe
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the context-menu actions available for an entry
    Actions {
        /// Entry the menu is opened on
        path: PathBuf,

        /// Entry currently on the clipboard
        #[arg(long)]
        clipboard: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ExplorerConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");
    let executor = OperationExecutor::new(config);

    match cli.command {
        Command::Ls { dir } => run_ls(&executor, dir).await?,
        Command::Tree { dir, depth } => run_tree(&executor, &dir, depth).await?,
        Command::Mkdir { parent, name } => {
            let created = executor.create_directory(parent, name).await?;
            println!("{}", created.display());
        }
        Command::Rm { path } => run_rm(&executor, path).await?,
        Command::Rename { path, new_name } => {
            let renamed = executor.rename(path, new_name).await?;
            println!("{}", renamed.display());
        }
        Command::Paste {
            source,
            target,
            cut,
            times,
        } => run_paste(&executor, source, target, cut, times).await?,
        Command::Size { path } => {
            let bytes = executor.compute_size(path.clone()).await?;
            println!("{} ({} bytes)  {}", format_size(bytes), bytes, path.display());
        }
        Command::Info { path, format } => {
            let info = executor.describe(path).await?;
            match format {
                OutputFormat::Text => print!("{}", info.render(&executor.config().date_format)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
            }
        }
        Command::Actions { path, clipboard } => run_actions(&path, clipboard)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// List a directory, one entry per line.
async fn run_ls(executor: &OperationExecutor, dir: PathBuf) -> Result<()> {
    let entries = executor.list_children(dir).await?;

    for entry in &entries {
        let (marker, size) = match &entry.kind {
            EntryKind::Directory => ("d", String::new()),
            EntryKind::Symlink { target, broken } => {
                let note = if *broken { " (broken)" } else { "" };
                println!("l {:>10}  {} -> {}{}", "", entry.name, target, note);
                continue;
            }
            EntryKind::File => ("-", format_size(entry.size)),
            EntryKind::Other => ("?", String::new()),
        };
        println!("{} {:>10}  {}", marker, size, entry.name);
    }

    Ok(())
}

/// Expand `dir` up to `depth` levels and print the loaded tree.
async fn run_tree(executor: &OperationExecutor, dir: &Path, depth: usize) -> Result<()> {
    let root = std::path::absolute(dir).context("Invalid path")?;
    let mut tree = ExplorerTree::new([root.clone()]).with_dirs_first(executor.config().dirs_first);

    let mut pending = vec![(root, 0usize)];
    while let Some((dir, level)) = pending.pop() {
        if level >= depth {
            continue;
        }
        if let Err(e) = executor.expand(&mut tree, &dir).await {
            warn!(path = %dir.display(), error = %e, "cannot expand");
            continue;
        }
        if let Some(node) = tree.find(&dir) {
            pending.extend(
                node.children()
                    .iter()
                    .filter(|child| child.is_dir())
                    .map(|child| (child.path.clone(), level + 1)),
            );
        }
    }

    for row in tree.visible_rows() {
        let indent = "  ".repeat(row.depth);
        let marker = match (row.is_dir, row.is_loaded) {
            (true, true) => "▼ ",
            (true, false) => "▶ ",
            _ => "  ",
        };
        println!("{indent}{marker}{}", row.name);
    }

    let stats = tree.stats();
    println!();
    println!("{} directories, {} files", stats.dirs, stats.files);
    Ok(())
}

/// Delete recursively and report what could not be removed.
async fn run_rm(executor: &OperationExecutor, path: PathBuf) -> Result<()> {
    let complete = executor.delete(path.clone()).await?;
    println!("{}", complete.summary());

    if complete.is_success() {
        return Ok(());
    }
    for error in &complete.errors {
        eprintln!("  {error}");
    }
    Err(eyre!("Could not delete everything under {}", path.display()))
}

/// Paste the same clipboard `times` times, reporting each attempt.
async fn run_paste(
    executor: &OperationExecutor,
    source: PathBuf,
    target: PathBuf,
    cut: bool,
    times: usize,
) -> Result<()> {
    let mode = if cut { ClipboardMode::Cut } else { ClipboardMode::Copy };
    let mut clipboard = Clipboard::new();
    clipboard.mark(source, mode);

    let mut failures = 0;
    for attempt in 1..=times.max(1) {
        match executor.paste_into(&mut clipboard, target.clone()).await {
            Ok(pasted) => println!("{attempt}: {}", pasted.display()),
            Err(e) => {
                failures += 1;
                eprintln!("{attempt}: {e}");
            }
        }
    }

    match clipboard.entry() {
        Some(entry) => debug!(source = %entry.source.display(), mode = %entry.mode, "clipboard kept"),
        None => debug!("clipboard cleared"),
    }

    if failures == times.max(1) {
        return Err(eyre!("Nothing was pasted"));
    }
    Ok(())
}

/// Print the enabled context-menu actions for `path`.
fn run_actions(path: &Path, clipboard_source: Option<PathBuf>) -> Result<()> {
    let path = std::path::absolute(path).context("Invalid path")?;
    let is_root = host_roots().iter().any(|root| *root == path);
    let target = ActionTarget::new(path.is_dir(), is_root);

    let mut clipboard = Clipboard::new();
    if let Some(source) = clipboard_source {
        clipboard.copy(source);
    }

    for action in available_actions(target, &clipboard) {
        println!("{action}");
    }
    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
