use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use bookmarks_state::{
    Action, BookmarkEvent, BookmarkTreeNode, ReentrancyPolicy, Store,
    StoreClient, StoreOptions, initial_state, normalize_nodes,
};
use clap::Parser;
use env_logger::Env;

/// Replay bookmark events and actions through a state store and print the
/// resulting page state as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with the bookmark tree to start from.
    #[arg(long)]
    tree: Option<PathBuf>,

    /// JSON-lines file of events and actions. Reads stdin when omitted.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Queue actions dispatched while observers are being notified
    /// instead of rejecting them.
    #[arg(long)]
    queue_reentrant: bool,

    /// Stop at the first record that fails to apply.
    #[arg(long)]
    strict: bool,

    /// Pretty-print the final state.
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn store_options(&self) -> StoreOptions {
        let reentrancy = if self.queue_reentrant {
            ReentrancyPolicy::Queue
        } else {
            ReentrancyPolicy::Reject
        };
        StoreOptions {
            reentrancy,
            ..StoreOptions::default()
        }
    }
}

/// One line of the replay stream.
#[derive(Debug)]
enum Record {
    Event(BookmarkEvent),
    Action(Action),
}

impl Record {
    /// Objects with a `type` field are events, objects with a `name` field
    /// are actions. Action names the store does not know are rejected.
    fn parse(line: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(line).context("invalid JSON")?;
        if value.get("type").is_some() {
            let event = serde_json::from_value(value).context("invalid event")?;
            return Ok(Record::Event(event));
        }

        let Some(name) = value.get("name").and_then(|name| name.as_str())
        else {
            bail!("record has neither a `type` nor a `name` field");
        };
        let name = name.to_string();
        match serde_json::from_value(value).context("invalid action")? {
            Action::Unknown => bail!("unknown action `{name}`"),
            action => Ok(Record::Action(action)),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let store = Rc::new(Store::new(args.store_options()));
    if let Some(path) = &args.tree {
        let tree = load_tree(path)?;
        let nodes = normalize_nodes(&tree).with_context(|| {
            format!("invalid bookmark tree in {}", path.display())
        })?;
        store.init(initial_state(nodes))?;
    }

    let client = StoreClient::new(Rc::clone(&store));
    let selected = client.watch("selectedFolder", |state| {
        state.selected_folder().map(str::to_string)
    });
    let closed = client.watch("closedFolders", |state| {
        state.closed_folders().clone()
    });
    client.set_on_change(|names| {
        log::info!("updated: {}", names.join(", "));
    });
    client.attach();
    client.update_from_store();

    let mut replayed = 0_usize;
    let mut failed = 0_usize;
    let events = open_events(args.events.as_deref())?;
    for (index, line) in events.lines().enumerate() {
        let line_no = index + 1;
        let line =
            line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }

        match apply(&store, &client, &line) {
            Ok(()) => replayed += 1,
            Err(err) if args.strict => {
                return Err(err.context(format!("line {line_no}")));
            },
            Err(err) => {
                log::error!("line {line_no} skipped: {err:#}");
                failed += 1;
            },
        }
    }

    log::info!(
        "replayed {replayed} records ({failed} failed), selected {:?}, \
         {} closed folders",
        selected.get().flatten(),
        closed.with(|closed| closed.map_or(0, |closed| closed.len())),
    );

    let state = client.state().context("no bookmark tree was loaded")?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&*state)
    } else {
        serde_json::to_string(&*state)
    }
    .context("failed to serialize the final state")?;
    println!("{json}");
    Ok(())
}

fn load_tree(path: &Path) -> Result<BookmarkTreeNode> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    BookmarkTreeNode::from_json(&json)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn open_events(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        },
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Apply one record. A tree sync arriving before any tree was loaded
/// initializes the store instead of refreshing it.
fn apply(store: &Store, client: &StoreClient, line: &str) -> Result<()> {
    let action = match Record::parse(line)? {
        Record::Event(BookmarkEvent::TreeSynced { root })
            if !store.is_initialized() =>
        {
            store.init(initial_state(normalize_nodes(&root)?))?;
            return Ok(());
        },
        Record::Event(event) => event.into_action()?,
        Record::Action(action) => action,
    };

    log::debug!("replaying {}", action.name());
    client.dispatch(action)?;
    Ok(())
}
