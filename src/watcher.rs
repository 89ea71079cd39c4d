use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::AppEvent;

const CONFIG_DEBOUNCE_DURATION: Duration = Duration::from_millis(500);

/// Whether a filesystem event means the settings file was (re)written.
pub fn is_settings_change(event: &NotifyEvent, settings_path: &Path) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    let Some(name) = settings_path.file_name() else {
        return false;
    };
    event
        .paths
        .iter()
        .any(|p| p == settings_path || p.file_name() == Some(name))
}

/// Watches the settings file's directory and posts
/// [`AppEvent::SettingsFileChanged`]. Editors often replace files instead of
/// writing in place, so the directory is watched rather than the file.
pub fn spawn_settings_watcher(
    settings_path: PathBuf,
    tx: Sender<AppEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let Some(dir) = settings_path.parent().map(Path::to_path_buf) else {
            log::error!("Settings path {:?} has no parent directory", settings_path);
            return;
        };
        let (fs_tx, fs_rx) = std::sync::mpsc::channel();

        let mut watcher: RecommendedWatcher = match Watcher::new(
            move |res: Result<NotifyEvent, notify::Error>| {
                let _ = fs_tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(w) => w,
            Err(e) => {
                log::error!("Failed to create settings watcher: {}", e);
                return;
            }
        };

        if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            log::error!("Failed to watch settings directory {:?}: {}", dir, e);
            return;
        }

        log::debug!("Settings watcher started for {:?}", settings_path);

        let mut last_change = Instant::now() - CONFIG_DEBOUNCE_DURATION;

        for result in fs_rx {
            match result {
                Ok(event) => {
                    if !is_settings_change(&event, &settings_path) {
                        continue;
                    }
                    // Editors may write in several operations
                    if last_change.elapsed() < CONFIG_DEBOUNCE_DURATION {
                        continue;
                    }
                    last_change = Instant::now();
                    log::debug!("Settings file changed: {:?}", event.kind);
                    if tx.send(AppEvent::SettingsFileChanged).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Settings watch error: {}", e);
                }
            }
        }
    })
}
