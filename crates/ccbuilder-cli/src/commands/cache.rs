use crate::cli::{CacheArgs, CacheCommands};
use crate::error::Result;
use crate::input::read_parameters;
use crate::store::FileStore;
use ccbuilder::engine::cache::Fingerprint;
use ccbuilder::engine::store::{BuildStore, RecordState};
use std::path::PathBuf;
use tracing::info;

pub async fn run(args: CacheArgs) -> Result<()> {
    match args.command {
        CacheCommands::Show { input, store } => {
            handle_show(input, store)?;
        }
        CacheCommands::Path => {
            handle_path()?;
        }
    }
    Ok(())
}

fn handle_show(input: PathBuf, store: Option<PathBuf>) -> Result<()> {
    let parameters = read_parameters(&input)?;
    let fingerprint = Fingerprint::of(&parameters)?;
    let store = FileStore::open(match store {
        Some(path) => path,
        None => FileStore::default_path()?,
    });
    info!("Inspecting {} in {:?}", fingerprint, store.path());

    println!("Fingerprint: {}", fingerprint);
    match store.get(&fingerprint)? {
        None => println!("State:       unseen"),
        Some(record) if record.parameters != parameters => {
            println!("State:       unseen (stored record has different parameters)")
        }
        Some(record) => match record.state() {
            RecordState::Seen { count } => println!("State:       seen ({} request(s))", count),
            RecordState::Promoted => println!(
                "State:       promoted after {} request(s)",
                record.requested
            ),
        },
    }

    let entries = store.log_entries_for(&fingerprint)?;
    if let Some(last) = entries.last() {
        println!(
            "Builds:      {} (last {} by {}, {:.2}s)",
            entries.len(),
            last.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            last.caller,
            last.build_seconds
        );
    }
    Ok(())
}

fn handle_path() -> Result<()> {
    let path = FileStore::default_path()?;
    println!("{}", path.display());
    Ok(())
}
