use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn event_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/events.log")
}

/// JSON-lines event sink. Writing never fails the caller; a disabled log drops
/// every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn at_state_root(state_root: &Path) -> Self {
        Self {
            path: Some(event_log_path(state_root)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, message: &str) {
        self.append("info", event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.append("warn", event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.append("error", event, message);
    }

    fn append(&self, level: &str, event: &str, message: &str) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        let payload = serde_json::json!({
            "timestamp": chrono::Utc::now().timestamp(),
            "level": level,
            "event": event,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };
        let _ = writeln!(file, "{line}");
    }
}
