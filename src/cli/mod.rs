use crate::disk::{free_space_reported, space_shortfall};
use crate::history::HistoryLog;
use crate::reporter::Reporter;
use crate::scanner::{FolderDescriptor, FolderKind};
use crate::utils::format_size;
use crate::{Cleaner, Config, Scanner};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use prettytable::{format, Cell, Row, Table};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jianying-cleaner")]
#[command(version, about = "Find JianyingPro cache folders and move them to the recycle bin", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List product folders and their sizes
    Scan {
        /// Scan these directories instead of the product folders
        paths: Vec<PathBuf>,

        /// Output scan results as JSON (machine-readable)
        #[arg(long)]
        json: bool,
    },

    /// Move selected folders to the recycle bin and recreate them empty
    Clean {
        /// Scan these directories instead of the product folders
        paths: Vec<PathBuf>,

        /// Items to clean: ids separated by commas or spaces, `all` or `none`
        #[arg(short, long)]
        select: Option<String>,

        /// Skip confirmation prompts
        #[arg(short, long)]
        yes: bool,

        /// Allow cleaning preset folders without asking
        #[arg(long)]
        include_presets: bool,

        /// Do not compare free disk space with the selected size
        #[arg(long)]
        skip_space_check: bool,
    },

    /// Show free space on the volume holding a path
    FreeSpace {
        /// Any path on the volume
        path: PathBuf,
    },

    /// Print the cleanup history log
    History {
        /// Only print the last N lines
        #[arg(long)]
        tail: Option<usize>,
    },

    /// Generate default config file
    InitConfig {
        /// Output path for config file
        path: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = if let Some(config_path) = &self.config {
            Config::load(config_path)?
        } else {
            Config::load_or_default(Config::default_path())?
        };

        match self.command {
            Commands::Scan { paths, json } => run_scan(paths, json, &config),
            Commands::Clean {
                paths,
                select,
                yes,
                include_presets,
                skip_space_check,
            } => run_clean(
                paths,
                select,
                yes,
                include_presets,
                skip_space_check,
                &config,
            ),
            Commands::FreeSpace { path } => run_free_space(&path),
            Commands::History { tail } => run_history(tail, &config),
            Commands::InitConfig { path } => init_config(path),
        }
    }
}

/// Which scanned items the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Nothing,
    All,
    Ids(Vec<usize>),
}

/// Parse `1,3 5`, `all`, `none` or an empty answer.
pub fn parse_selection(input: &str) -> Result<Selection> {
    let input = input.trim().to_lowercase();
    if input.is_empty() || input == "none" {
        return Ok(Selection::Nothing);
    }
    if input == "all" {
        return Ok(Selection::All);
    }

    let mut ids = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let id = token
            .parse::<usize>()
            .with_context(|| format!("Invalid item number: `{}`", token))?;
        ids.push(id);
    }
    Ok(Selection::Ids(ids))
}

/// Resolve a selection against scan results.
///
/// Empty folders are never selected. Presets are dropped unless
/// `allow_presets` is set. Returns the targets plus notices for the user.
pub fn apply_selection(
    selection: &Selection,
    folders: &[FolderDescriptor],
    allow_presets: bool,
) -> (Vec<FolderDescriptor>, Vec<String>) {
    let mut targets = Vec::new();
    let mut notices = Vec::new();

    let picked: Vec<&FolderDescriptor> = match selection {
        Selection::Nothing => Vec::new(),
        Selection::All => folders.iter().filter(|f| f.size_bytes() > 0).collect(),
        Selection::Ids(ids) => {
            let mut seen = HashSet::new();
            let mut picked = Vec::new();
            for id in ids {
                if !seen.insert(*id) {
                    continue;
                }
                match folders.iter().find(|f| f.id() == *id) {
                    Some(folder) if folder.size_bytes() == 0 => notices.push(format!(
                        "Item {} ({}) is empty and will be skipped.",
                        id,
                        folder.name()
                    )),
                    Some(folder) => picked.push(folder),
                    None => notices.push(format!("No item with number {}, ignored.", id)),
                }
            }
            picked
        }
    };

    for folder in picked {
        if folder.kind().needs_confirmation() && !allow_presets {
            notices.push(format!("Preset folder '{}' left untouched.", folder.name()));
            continue;
        }
        targets.push(folder.clone());
    }

    (targets, notices)
}

fn progress_bar(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{bar:40.cyan/blue} {pos:>3}%")?
            .progress_chars("=>-"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

fn scan_with_progress(paths: &[PathBuf], config: &Config) -> Result<Vec<FolderDescriptor>> {
    let paths = if paths.is_empty() {
        config.custom_paths.as_slice()
    } else {
        paths
    };
    let scanner = Scanner::from_config(config);

    let pb = progress_bar("Scanning...")?;
    let folders = {
        let mut reporter = Reporter::new()
            .with_log(|msg, level| pb.println(level.paint(msg)))
            .with_progress(|p| pb.set_position(p.round() as u64));
        scanner.scan(paths, &mut reporter)
    };
    pb.finish_and_clear();
    Ok(folders)
}

fn run_scan(paths: Vec<PathBuf>, json: bool, config: &Config) -> Result<()> {
    let folders = scan_with_progress(&paths, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&folders)?);
        return Ok(());
    }

    if folders.is_empty() {
        println!("{}", "No folders found.".yellow());
        return Ok(());
    }

    display_folders(&folders);
    let total: u64 = folders.iter().map(|f| f.size_bytes()).sum();
    println!("\n{} {}", "Total size:".bold(), format_size(total).green().bold());
    Ok(())
}

fn run_clean(
    paths: Vec<PathBuf>,
    select: Option<String>,
    yes: bool,
    include_presets: bool,
    skip_space_check: bool,
    config: &Config,
) -> Result<()> {
    let folders = scan_with_progress(&paths, config)?;
    if folders.is_empty() {
        println!("{}", "No folders found. Nothing to clean.".yellow());
        return Ok(());
    }

    display_folders(&folders);

    let selection = match select {
        Some(answer) => parse_selection(&answer)?,
        None => {
            println!("\n{}", "Select items to clean:".cyan().bold());
            println!("  Enter numbers separated by commas (e.g., 1,3,5)");
            println!("  Or 'all' to select every non-empty item, 'none' to cancel");
            parse_selection(&prompt("> ")?)?
        }
    };

    let (with_presets, _) = apply_selection(&selection, &folders, true);
    let presets: Vec<&FolderDescriptor> = with_presets
        .iter()
        .filter(|f| f.kind().needs_confirmation())
        .collect();
    let allow_presets = if presets.is_empty() || include_presets {
        true
    } else if yes {
        false
    } else {
        let names: Vec<String> = presets
            .iter()
            .map(|f| format!("{}({})", f.id(), f.name()))
            .collect();
        println!(
            "\n{} {}",
            "Warning:".red().bold(),
            format!(
                "the selection includes preset folders {}. They hold your custom templates and effects.",
                names.join(", ")
            )
            .red()
        );
        confirm("Clean the preset folders too?")?
    };

    let (targets, notices) = apply_selection(&selection, &folders, allow_presets);
    for notice in &notices {
        println!("{}", notice.yellow());
    }
    if targets.is_empty() {
        println!("{}", "No folders selected for cleaning.".yellow());
        return Ok(());
    }

    println!("\n{}", "Selected for cleaning:".cyan().bold());
    for folder in &targets {
        let warning = if folder.kind().needs_confirmation() {
            " (important data!)".red().to_string()
        } else {
            String::new()
        };
        println!("  - {} ({}){}", folder.name(), folder.size_display(), warning);
    }
    let total: u64 = targets.iter().map(|f| f.size_bytes()).sum();
    println!(
        "{} {}",
        "Expected space freed:".bold(),
        format_size(total).green().bold()
    );

    if !skip_space_check && !check_free_space(targets[0].path(), total, yes)? {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    if !yes && !confirm("Move the selected items to the recycle bin?")? {
        println!("{}", "Cancelled. Nothing was cleaned.".yellow());
        return Ok(());
    }

    let cleaner = Cleaner::new(HistoryLog::from_config(config));
    let pb = progress_bar("Cleaning...")?;
    let outcome = {
        let mut reporter = Reporter::new()
            .with_log(|msg, level| pb.println(level.paint(msg)))
            .with_progress(|p| pb.set_position(p.round() as u64));
        cleaner.clean(&targets, &mut reporter)
    };
    pb.finish_and_clear();

    println!("\n{}", "Cleaning completed!".green().bold());
    println!("  Moved to recycle bin: {}", outcome.moved_count.to_string().green());
    println!("  Folders recreated: {}", outcome.recreated_count.to_string().green());
    println!(
        "  Subfolders recreated: {}",
        outcome.recreated_subfolder_count.to_string().green()
    );
    println!("  History: {}", cleaner.history().path().display().to_string().bright_black());

    if !outcome.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &outcome.errors {
            println!("  {}", error.red());
        }
    }

    if !outcome.overall_success {
        anyhow::bail!("cleanup finished with {} problem(s)", outcome.errors.len());
    }
    Ok(())
}

/// Advisory check; returns false only when the user declines to continue.
fn check_free_space(path: &Path, required: u64, yes: bool) -> Result<bool> {
    match free_space_reported(path, &mut Reporter::new()) {
        Some(free) if space_shortfall(free, required) => {
            println!(
                "\n{} {}",
                "Warning:".yellow().bold(),
                format!(
                    "free space on the target volume ({}) may not hold the selected items in the recycle bin ({}).",
                    format_size(free),
                    format_size(required)
                )
                .yellow()
            );
            if yes {
                return Ok(true);
            }
            confirm("Continue anyway?")
        }
        Some(_) => Ok(true),
        None => {
            println!(
                "{}",
                "Could not read free disk space, skipping the space check.".yellow()
            );
            Ok(true)
        }
    }
}

fn run_free_space(path: &Path) -> Result<()> {
    match free_space_reported(path, &mut Reporter::new()) {
        Some(free) => {
            println!(
                "{} {} ({} bytes)",
                "Free space:".bold(),
                format_size(free).green().bold(),
                free
            );
            Ok(())
        }
        None => anyhow::bail!("Cannot determine free space for {}", path.display()),
    }
}

fn run_history(tail: Option<usize>, config: &Config) -> Result<()> {
    let history = HistoryLog::from_config(config);
    let lines = match tail {
        Some(count) => history.tail(count)?,
        None => history
            .read_to_string()?
            .lines()
            .map(str::to_string)
            .collect(),
    };

    if lines.is_empty() {
        println!("{}", "No cleanup history yet.".yellow());
        println!("  Log path: {}", history.path().display());
        return Ok(());
    }

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(Config::default_path);
    Config::default().save(&path)?;
    println!(
        "{} {}",
        "Config file created:".green().bold(),
        path.display()
    );
    Ok(())
}

fn display_folders(folders: &[FolderDescriptor]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(vec![
        Cell::new("#"),
        Cell::new("Name"),
        Cell::new("Kind"),
        Cell::new("Size"),
        Cell::new("Path"),
    ]));

    for folder in folders {
        let name = if folder.kind() == FolderKind::Preset {
            format!("{} (important data, clean with care!)", folder.name())
        } else {
            folder.name().to_string()
        };
        table.add_row(Row::new(vec![
            Cell::new(&folder.id().to_string()),
            Cell::new(&name),
            Cell::new(folder.kind().name()),
            Cell::new(folder.size_display()),
            Cell::new(&folder.path().display().to_string()),
        ]));
    }

    println!();
    table.printstd();
}

fn prompt(label: &str) -> Result<String> {
    print!("\n{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn confirm(question: &str) -> Result<bool> {
    let input = prompt(&format!("{} [y/N] > ", question))?;
    let input = input.trim().to_lowercase();
    Ok(matches!(input.as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folders() -> Vec<FolderDescriptor> {
        vec![
            FolderDescriptor::new(1, "Cache", "/d/Cache", FolderKind::Cache, 4096),
            FolderDescriptor::new(2, "Log", "/d/Log", FolderKind::Log, 0),
            FolderDescriptor::new(3, "VELog", "/d/VELog", FolderKind::Log, 10),
            FolderDescriptor::new(4, "Presets", "/d/Presets", FolderKind::Preset, 99),
        ]
    }

    fn ids(targets: &[FolderDescriptor]) -> Vec<usize> {
        targets.iter().map(|f| f.id()).collect()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("").unwrap(), Selection::Nothing);
        assert_eq!(parse_selection(" None ").unwrap(), Selection::Nothing);
        assert_eq!(parse_selection("ALL").unwrap(), Selection::All);
        assert_eq!(parse_selection("1,3, 5").unwrap(), Selection::Ids(vec![1, 3, 5]));
        assert_eq!(parse_selection("2 4").unwrap(), Selection::Ids(vec![2, 4]));
        assert!(parse_selection("1,x").is_err());
    }

    #[test]
    fn test_all_skips_empty_and_presets_unless_allowed() {
        let (targets, notices) = apply_selection(&Selection::All, &folders(), false);
        assert_eq!(ids(&targets), vec![1, 3]);
        assert_eq!(notices.len(), 1);

        let (targets, _) = apply_selection(&Selection::All, &folders(), true);
        assert_eq!(ids(&targets), vec![1, 3, 4]);
    }

    #[test]
    fn test_ids_keep_order_and_report_problems() {
        let selection = Selection::Ids(vec![3, 2, 9, 1, 3]);
        let (targets, notices) = apply_selection(&selection, &folders(), true);
        assert_eq!(ids(&targets), vec![3, 1]);
        assert_eq!(
            notices,
            vec![
                "Item 2 (Log) is empty and will be skipped.".to_string(),
                "No item with number 9, ignored.".to_string(),
            ]
        );
    }

    #[test]
    fn test_nothing_selects_nothing() {
        let (targets, notices) = apply_selection(&Selection::Nothing, &folders(), true);
        assert!(targets.is_empty());
        assert!(notices.is_empty());
    }

    #[test]
    fn test_cli_parses_clean_flags() {
        let cli = Cli::try_parse_from([
            "jianying-cleaner",
            "clean",
            "--select",
            "1,2",
            "--yes",
            "--include-presets",
        ])
        .unwrap();
        match cli.command {
            Commands::Clean {
                select,
                yes,
                include_presets,
                skip_space_check,
                paths,
            } => {
                assert_eq!(select.as_deref(), Some("1,2"));
                assert!(yes);
                assert!(include_presets);
                assert!(!skip_space_check);
                assert!(paths.is_empty());
            }
            _ => panic!("expected clean"),
        }
    }
}
