//! Interactive command loop over an [`InventoryStore`].
//!
//! Each input line is parsed into a [`ShellCommand`], run against the store,
//! and followed by a render of the summary header, the filtered table and
//! the draft.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use equiptrack_core::{DomainError, RecordId};
use equiptrack_events::Subscription;
use equiptrack_inventory::{
    DraftField, EquipmentRecord, FilterPatch, InventoryEvent, InventoryStore, SlotStore,
    StoreError,
};

use crate::console::ConsolePresenter;

pub const HELP: &str = "\
commands:
  list                          show the inventory
  set <field> <value>           fill a draft field (name, category, tag, status)
  add                           add the draft as a new record
  edit <id|#n>                  load a record into the draft
  save                          write the draft over the record being edited
  cancel                        leave edit mode and clear the draft
  delete <id|#n>                remove a record (asks first)
  filter <category|status> [v]  filter by value; no value clears that filter
  filter clear                  clear both filters
  help                          show this text
  quit                          exit";

/// How a command names a record: by id, or by 1-based row in the current
/// filtered listing (`#2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Id(RecordId),
    Row(usize),
}

impl FromStr for RecordRef {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(row) = s.strip_prefix('#') {
            return row
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(RecordRef::Row)
                .ok_or_else(|| ShellError::InvalidRow(s.to_string()));
        }
        Ok(RecordRef::Id(RecordId::parse(s)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Category,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Set(DraftField, String),
    Add,
    Edit(RecordRef),
    Save,
    Cancel,
    Delete(RecordRef),
    Filter(FilterDimension, Option<String>),
    FilterClear,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("empty input")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("{0}")]
    UnknownField(String),

    #[error("invalid row `{0}` (rows start at #1)")]
    InvalidRow(String),

    #[error("no row {0} in the current listing")]
    RowOutOfRange(usize),

    #[error(transparent)]
    InvalidId(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FromStr for ShellCommand {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "" => Err(ShellError::Empty),
            "list" | "ls" => Ok(ShellCommand::List),
            "add" => Ok(ShellCommand::Add),
            "save" => Ok(ShellCommand::Save),
            "cancel" => Ok(ShellCommand::Cancel),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(ShellError::MissingArgument("set"));
                }
                let field = field.parse::<DraftField>().map_err(ShellError::UnknownField)?;
                // The value is kept verbatim (leading spaces included); trimming
                // is the store's business.
                Ok(ShellCommand::Set(field, value.to_string()))
            }
            "edit" => Ok(ShellCommand::Edit(required(rest, "edit")?.parse()?)),
            "delete" | "rm" => Ok(ShellCommand::Delete(required(rest, "delete")?.parse()?)),
            "filter" => {
                let (dimension, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let value = value.trim();
                let value = (!value.is_empty()).then(|| value.to_string());
                match dimension {
                    "clear" => Ok(ShellCommand::FilterClear),
                    "category" => Ok(ShellCommand::Filter(FilterDimension::Category, value)),
                    "status" => Ok(ShellCommand::Filter(FilterDimension::Status, value)),
                    "" => Err(ShellError::MissingArgument("filter")),
                    other => Err(ShellError::UnknownField(format!(
                        "cannot filter by `{other}` (use category or status)"
                    ))),
                }
            }
            other => Err(ShellError::UnknownCommand(other.to_string())),
        }
    }
}

fn required<'a>(rest: &'a str, verb: &'static str) -> Result<&'a str, ShellError> {
    if rest.is_empty() {
        Err(ShellError::MissingArgument(verb))
    } else {
        Ok(rest)
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Render,
    Quiet,
    Quit,
}

pub type ConsoleStore<S, R, W> = InventoryStore<S, ConsolePresenter<R, W>>;

/// Run one parsed command against the store.
pub fn execute<S, R, W>(store: &mut ConsoleStore<S, R, W>, command: ShellCommand) -> Result<Flow, ShellError>
where
    S: SlotStore,
    R: BufRead,
    W: Write,
{
    match command {
        ShellCommand::List => {}
        ShellCommand::Help => {
            store.presenter().say(HELP)?;
            return Ok(Flow::Quiet);
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
        ShellCommand::Set(field, value) => store.set_draft_field(field, value),
        ShellCommand::Add => {
            if store.add_record()?.is_none() {
                store.presenter().say("draft incomplete: name, category, tag and status are required")?;
            }
        }
        ShellCommand::Edit(target) => {
            let id = resolve(store, target)?;
            if store.begin_edit(&id).is_none() {
                store.presenter().say(&format!("no record with id {id}"))?;
            }
        }
        ShellCommand::Save => {
            if !store.is_editing() {
                store.presenter().say("not editing; use `edit` first or `add` for a new record")?;
            } else if store.save_edit()?.is_none() {
                store.presenter().say("nothing saved: draft incomplete or record gone")?;
            }
        }
        ShellCommand::Cancel => {
            store.cancel_edit();
        }
        ShellCommand::Delete(target) => {
            let id = resolve(store, target)?;
            if store.record(&id).is_none() {
                store.presenter().say(&format!("no record with id {id}"))?;
            } else {
                store.delete_record(&id)?;
            }
        }
        ShellCommand::Filter(dimension, value) => {
            let value = value.unwrap_or_default();
            store.update_filter(match dimension {
                FilterDimension::Category => FilterPatch::category(value),
                FilterDimension::Status => FilterPatch::status(value),
            });
        }
        ShellCommand::FilterClear => store.clear_filter(),
    }
    Ok(Flow::Render)
}

fn resolve<S, R, W>(store: &ConsoleStore<S, R, W>, target: RecordRef) -> Result<RecordId, ShellError>
where
    S: SlotStore,
    R: BufRead,
    W: Write,
{
    match target {
        RecordRef::Id(id) => Ok(id),
        RecordRef::Row(row) => store
            .filtered_records()
            .get(row - 1)
            .map(|r| r.id().clone())
            .ok_or(ShellError::RowOutOfRange(row)),
    }
}

/// Print header, filtered table and draft; then honour a pending focus request.
pub fn render<S, R, W>(store: &ConsoleStore<S, R, W>) -> io::Result<()>
where
    S: SlotStore,
    R: BufRead,
    W: Write,
{
    let out = store.presenter();
    let summary = store.summary();
    let mut header = format!(
        "Total: {}  Available: {}  Loaned: {}",
        summary.total, summary.available, summary.loaned
    );
    let filter = store.filter();
    if !filter.is_empty() {
        header.push_str("  [filter:");
        if let Some(c) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            header.push_str(&format!(" category={c}"));
        }
        if let Some(s) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            header.push_str(&format!(" status={s}"));
        }
        header.push(']');
    }
    out.say(&header)?;

    let rows = store.filtered_records();
    if rows.is_empty() {
        out.say("  (no records)")?;
    }
    for (i, record) in rows.iter().enumerate() {
        out.say(&format_row(i + 1, record, store.edit().editing_id()))?;
    }

    let draft = store.draft();
    let mode = match store.edit().editing_id() {
        Some(id) => format!("editing {id}"),
        None => "new".to_string(),
    };
    let validity = if store.is_draft_valid() { "ready" } else { "incomplete" };
    out.say(&format!(
        "Draft ({mode}, {validity}): name={:?} category={:?} tag={:?} status={:?}",
        draft.name, draft.category, draft.asset_tag, draft.status
    ))?;

    if let Some(field) = out.take_focus() {
        out.say(&format!("-> {} = {:?}", field.as_str(), draft.field(field)))?;
    }
    Ok(())
}

fn format_row(row: usize, record: &EquipmentRecord, editing: Option<&RecordId>) -> String {
    let marker = if editing == Some(record.id()) { '*' } else { ' ' };
    format!(
        "{marker}#{row:<3} {:<20} {:<14} {:<10} {:<10} {}",
        record.name(),
        record.category(),
        record.asset_tag(),
        record.status(),
        record.id()
    )
}

fn describe(event: &InventoryEvent) -> Option<String> {
    match event {
        InventoryEvent::RecordAdded(e) => Some(format!("added \"{}\"", e.record.name())),
        InventoryEvent::RecordUpdated(e) => Some(format!("saved \"{}\"", e.after.name())),
        InventoryEvent::RecordRemoved(e) => Some(format!("removed \"{}\"", e.record.name())),
        _ => None,
    }
}

/// Read-execute-render loop. Returns on `quit` or end of input.
///
/// Storage failures are printed and logged; the loop keeps going so the
/// user can retry once the underlying problem is fixed.
pub fn run<S, R, W>(
    store: &mut ConsoleStore<S, R, W>,
    changes: &Subscription<InventoryEvent>,
) -> anyhow::Result<()>
where
    S: SlotStore,
    R: BufRead,
    W: Write,
{
    changes.drain();
    render(store)?;

    loop {
        let prompt = if store.is_editing() { "edit> " } else { "> " };
        let Some(line) = store.presenter().prompt_line(prompt)? else {
            break;
        };

        let flow = match line.parse::<ShellCommand>().and_then(|cmd| execute(store, cmd)) {
            Ok(flow) => flow,
            Err(ShellError::Empty) => continue,
            Err(ShellError::Store(err)) => {
                store.presenter().say(&format!("error: {err}"))?;
                Flow::Render
            }
            Err(err) => {
                store.presenter().say(&format!("error: {err}"))?;
                Flow::Quiet
            }
        };

        for event in changes.drain() {
            if let Some(text) = describe(&event) {
                store.presenter().say(&text)?;
            }
        }

        match flow {
            Flow::Quit => break,
            Flow::Render => render(store)?,
            Flow::Quiet => {}
        }
    }
    Ok(())
}
