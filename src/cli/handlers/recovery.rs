use std::path::Path;

use chrono::{Duration, Utc};

use crate::cli::commands::RecoveryArgs;
use crate::io::recovery::{self, PRUNE_AGE_DAYS};

/// Print the recovery log, most recent entry first, or prune old entries
pub fn cmd_recovery(
    args: RecoveryArgs,
    data_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.prune {
        let cutoff = Utc::now() - Duration::days(PRUNE_AGE_DAYS);
        let removed = recovery::prune_recovery(data_dir, cutoff)?;
        tracing::info!(removed, "pruned recovery log");
        if json {
            println!("{}", serde_json::json!({ "removed": removed }));
        } else {
            println!(
                "pruned {} entr{}",
                removed,
                if removed == 1 { "y" } else { "ies" }
            );
        }
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(data_dir);
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print!("{}", entry.to_markdown());
        }
    }
    Ok(())
}
