use clap::Parser;
use mapnav::project::Project;
use std::path::PathBuf;
use tourd::config;
use tourd::events::AppEvent;
use tourd::host::{self, ProjectStore};
use tourd::sys::runtime;

#[derive(Parser, Debug)]
#[command(name = "tourd", version, about = "Headless map tour playback daemon")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Project file to replay, overrides the config
    #[arg(short = 'p', long)]
    project: Option<PathBuf>,

    /// Start playback right away
    #[arg(long)]
    play: bool,

    /// Write the default config file and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default(args.config.as_deref());
    if args.project.is_some() {
        config.project = args.project;
    }

    let project = match &config.project {
        Some(path) => Project::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
        None => {
            log::warn!("No project configured, nothing to replay");
            Project::default()
        }
    };
    let store = ProjectStore::new(project);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(
        tx.clone(),
        config.socket_path.clone(),
        config.project.clone(),
        store.clone(),
    );

    if args.play {
        tx.try_send(AppEvent::Play)?;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&rt, host::run(config, store, rx));

    Ok(())
}
