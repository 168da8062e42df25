use crate::commands::play::Game;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use gazette_core::{ContentItem, GazetteError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum PoolCommands {
    /// List the items in a pool file
    Show {
        /// Content pool JSON file
        file: PathBuf,
    },
    /// Check that a pool file can feed a game's daily set
    Check {
        /// Content pool JSON file
        file: PathBuf,
        /// Game the pool is meant for
        #[arg(short, long, value_enum, default_value_t = Game::Headlines)]
        game: Game,
    },
}

/// Pool files are either a bare item array or a `{"questions": [...]}`
/// wrapper, matching what the newsroom's content endpoints serve.
#[derive(Deserialize)]
#[serde(untagged)]
enum PoolFile {
    Items(Vec<ContentItem>),
    Wrapped { questions: Vec<ContentItem> },
}

pub fn load_pool(path: &Path) -> Result<Vec<ContentItem>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        GazetteError::content(format!("cannot read pool file '{}': {e}", path.display()))
    })?;
    let parsed: PoolFile = serde_json::from_str(&raw).map_err(|e| {
        GazetteError::content(format!("cannot parse pool file '{}': {e}", path.display()))
    })?;

    let items = match parsed {
        PoolFile::Items(items) => items,
        PoolFile::Wrapped { questions } => questions,
    };
    if items.is_empty() {
        return Err(GazetteError::content(format!(
            "pool file '{}' contains no items",
            path.display()
        )));
    }
    Ok(items)
}

pub fn handle_pool_command(cmd: PoolCommands) -> Result<()> {
    match cmd {
        PoolCommands::Show { file } => {
            let items = load_pool(&file)?;

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Id", "Label", "Category", "Value"]);
            for item in &items {
                table.add_row(vec![
                    item.id.clone(),
                    item.label.clone(),
                    item.category.clone().unwrap_or_default(),
                    item.value.map(|v| v.to_string()).unwrap_or_default(),
                ]);
            }
            println!("{}", table);
            println!("{} items", items.len());
        }

        PoolCommands::Check { file, game } => {
            let items = load_pool(&file)?;
            check_pool(&items, game)?;
            println!(
                "'{}' is good for {:?}: {} items",
                file.display(),
                game,
                items.len()
            );
        }
    }

    Ok(())
}

fn check_pool(items: &[ContentItem], game: Game) -> Result<()> {
    let mut ids = HashSet::new();
    for item in items {
        if !ids.insert(item.id.as_str()) {
            return Err(GazetteError::content(format!(
                "duplicate item id '{}'",
                item.id
            )));
        }
    }

    match game {
        Game::Headlines => {
            // One correct answer plus three decoys per round.
            if items.len() < 4 {
                return Err(GazetteError::content(format!(
                    "headlines needs at least 4 items, found {}",
                    items.len()
                )));
            }
        }
        Game::Pairs => {
            let mut sizes: HashMap<&str, usize> = HashMap::new();
            for item in items {
                if let Some(category) = item.category.as_deref() {
                    *sizes.entry(category).or_default() += 1;
                }
            }
            if !sizes.values().any(|&n| n >= 2) {
                return Err(GazetteError::content(
                    "pairs needs at least one category with 2 or more items",
                ));
            }
            let unvalued = items.iter().filter(|i| i.value.is_none()).count();
            if unvalued > 0 {
                return Err(GazetteError::content(format!(
                    "{unvalued} items have no value to compare"
                )));
            }
        }
        Game::Quiz => {
            // Any nonempty question list slices into a daily quiz.
        }
    }

    Ok(())
}
