use crate::events::AppEvent;
use crate::host::ProjectStore;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Socket server and project watcher, on their own thread and runtime.
pub fn start_background_services(
    tx: Sender<AppEvent>,
    socket_path: PathBuf,
    project_path: Option<PathBuf>,
    store: ProjectStore,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(socket_path, tx).await;
                });
            }

            if let Some(path) = project_path {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(path, store, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
