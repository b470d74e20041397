use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Process-wide settings read once from the environment.
pub struct CtrlConfig {
    script_path: Option<PathBuf>,
    request_batched: Option<bool>,
}

impl CtrlConfig {
    fn from_env() -> Self {
        let script_path = std::env::var_os("VIDC_SCRIPT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let request_batched = std::env::var("VIDC_REQUEST_MODE")
            .ok()
            .and_then(|mode| parse_request_mode(&mode));
        Self {
            script_path,
            request_batched,
        }
    }

    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    /// `None` leaves the choice to the script.
    pub fn request_batched(&self) -> Option<bool> {
        self.request_batched
    }
}

fn parse_request_mode(mode: &str) -> Option<bool> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "batched" | "request" | "1" | "true" => Some(true),
        "immediate" | "0" | "false" => Some(false),
        other => {
            log::warn!("ignoring unknown VIDC_REQUEST_MODE {:?}", other);
            None
        }
    }
}

pub fn config() -> &'static CtrlConfig {
    static CONFIG: LazyLock<CtrlConfig> = LazyLock::new(CtrlConfig::from_env);
    &CONFIG
}
