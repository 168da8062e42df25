use comfy_table::{presets::UTF8_FULL, Table};
use gazette_core::{GameConfig, ProgressLedger, Result, SqliteStore, SystemClock, Variant};
use std::path::Path;
use std::sync::Arc;

pub fn handle_status_command(data_dir: &Path) -> Result<()> {
    let store = Arc::new(SqliteStore::new(&data_dir.join("progress.db"))?);
    let clock = Arc::new(SystemClock);

    let games = [
        ("headlines", GameConfig::headline_game()),
        ("pairs", GameConfig::stat_showdown()),
        ("quiz", GameConfig::news_quiz(Variant::Shuffled)),
    ];

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Game", "Date", "Completed", "Left"]);

    for (name, config) in games {
        let ledger = ProgressLedger::new(store.clone(), clock.clone(), &config)?;
        let snapshot = ledger.load();
        table.add_row(vec![
            name.to_string(),
            snapshot.date_key,
            snapshot.rounds_completed.to_string(),
            snapshot.rounds_left.to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}
