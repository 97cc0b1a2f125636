//! `contactscout saved` subcommands.

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use contactscout_core::db::Database;

use crate::style;

pub fn cmd_list(db: &Database) -> Result<()> {
    let users = db
        .list_saved_users()
        .context("failed to list saved users")?;

    if users.is_empty() {
        println!("No saved users.");
        return Ok(());
    }

    println!();
    println!("{}", style::header("Saved users"));
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Login", "Profile", "Saved at"]);

    for user in &users {
        table.add_row(vec![
            Cell::new(&user.login),
            Cell::new(&user.html_url),
            Cell::new(&user.saved_at),
        ]);
    }

    println!("{}", table);
    println!("{}", style::dim(&format!("{} user(s)", users.len())));

    Ok(())
}

pub fn cmd_add(db: &Database, login: &str, avatar_url: &str, html_url: &str) -> Result<()> {
    let outcome = db
        .save_user(login, avatar_url, html_url)
        .context("failed to save user")?;

    if outcome.already_exists {
        println!("{}", style::warn(&format!("{} is already saved", login)));
    } else {
        println!("{}", style::success(&format!("Saved {}", login)));
    }
    Ok(())
}

pub fn cmd_remove(db: &Database, login: &str) -> Result<()> {
    let removed = db
        .remove_saved_user(login)
        .context("failed to remove user")?;

    if removed {
        println!("{}", style::success(&format!("Removed {}", login)));
    } else {
        println!("{}", style::warn(&format!("{} was not saved", login)));
    }
    Ok(())
}
