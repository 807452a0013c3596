use std::io::{self, BufRead, Write};

use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::cli::Command;
use crate::config::Config;
use crate::edit::{KeySignal, RowEvent, RowState};
use crate::form::AddForm;
use crate::item::ItemId;
use crate::list::{Confirm, PackingList};
use crate::render::Renderer;
use crate::stats::PackingStats;
use crate::storage::KeyValueStore;
use crate::view::{SortMode, project};

#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let mut out = io::stdout().lock();
        if write!(out, "{prompt} [y/N] ").and_then(|_| out.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(error) => {
                warn!(%error, "failed reading confirmation; treating as no");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[instrument(skip(list, cfg, renderer, confirm))]
pub fn dispatch<S: KeyValueStore>(
    list: &mut PackingList<S>,
    cfg: &Config,
    renderer: &Renderer,
    confirm: &mut impl Confirm,
    command: Command,
) -> anyhow::Result<()> {
    debug!(?command, "dispatching command");

    match command {
        Command::Add {
            description,
            quantity,
        } => cmd_add(list, &description.join(" "), quantity),
        Command::Edit {
            id,
            description,
            quantity,
        } => cmd_edit(list, id, description, quantity),
        Command::Toggle { id } => cmd_toggle(list, id),
        Command::Delete { id } => cmd_delete(list, id),
        Command::Clear { yes } => cmd_clear(list, cfg, confirm, yes),
        Command::List { sort } => cmd_list(list, renderer, sort),
        Command::Stats => renderer.print_stats(&PackingStats::of(list.items())),
    }
}

#[instrument(skip(list, description))]
fn cmd_add<S: KeyValueStore>(
    list: &mut PackingList<S>,
    description: &str,
    quantity: u32,
) -> anyhow::Result<()> {
    info!("command add");

    let mut form = AddForm::new();
    form.set_description(description);
    form.set_quantity(quantity);

    let Some(item) = form.submit(list.items(), Utc::now()) else {
        warn!("empty description; nothing added");
        return Ok(());
    };

    let id = item.id;
    list.add(item)?;
    println!("Added item {id}.");
    Ok(())
}

#[instrument(skip(list, description))]
fn cmd_edit<S: KeyValueStore>(
    list: &mut PackingList<S>,
    id: ItemId,
    description: Option<String>,
    quantity: Option<i64>,
) -> anyhow::Result<()> {
    info!("command edit");

    let Some(item) = list.get(id).cloned() else {
        warn!(id, "no item with that id; nothing edited");
        return Ok(());
    };

    let mut row = RowState::default();
    row.handle(&item, RowEvent::BeginEdit);
    if let Some(text) = description {
        row.handle(&item, RowEvent::SetDescription(text));
    }
    if let Some(quantity) = quantity {
        row.handle(&item, RowEvent::SetQuantity(quantity));
    }

    match row.handle(&item, RowEvent::Key(KeySignal::Commit)) {
        Some(commit) => {
            list.edit(commit.id, &commit.description, commit.quantity)?;
            println!("Edited item {id}.");
            Ok(())
        }
        None => {
            let error = row
                .error()
                .ok_or_else(|| anyhow!("edit of item {id} was not saved"))?;
            Err(anyhow::Error::new(error).context(format!("cannot edit item {id}")))
        }
    }
}

#[instrument(skip(list))]
fn cmd_toggle<S: KeyValueStore>(list: &mut PackingList<S>, id: ItemId) -> anyhow::Result<()> {
    info!("command toggle");
    list.toggle(id)?;
    if let Some(item) = list.get(id) {
        let state = if item.packed { "packed" } else { "unpacked" };
        println!("Marked item {id} as {state}.");
    }
    Ok(())
}

#[instrument(skip(list))]
fn cmd_delete<S: KeyValueStore>(list: &mut PackingList<S>, id: ItemId) -> anyhow::Result<()> {
    info!("command delete");
    let existed = list.contains(id);
    list.delete(id)?;
    if existed {
        println!("Deleted item {id}.");
    }
    Ok(())
}

#[instrument(skip(list, cfg, confirm))]
fn cmd_clear<S: KeyValueStore>(
    list: &mut PackingList<S>,
    cfg: &Config,
    confirm: &mut impl Confirm,
    yes: bool,
) -> anyhow::Result<()> {
    info!("command clear");

    let cleared = if yes || !cfg.confirmation() {
        list.clear_with(&mut |_: &str| true)?
    } else {
        list.clear_with(confirm)?
    };

    if cleared {
        println!("Cleared the list.");
    }
    Ok(())
}

#[instrument(skip(list, renderer))]
fn cmd_list<S: KeyValueStore>(
    list: &PackingList<S>,
    renderer: &Renderer,
    sort: SortMode,
) -> anyhow::Result<()> {
    info!("command list");

    let view = project(list.items(), sort);
    renderer.print_items(&view)?;
    renderer.print_stats(&PackingStats::of(list.items()))
}
