//! Control scripts: a codec, a request mode and the ordered steps a client
//! would issue against one encoder session.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use vidc_caps::{Codec, DrainReport, SessionHandle};

#[derive(Debug, Deserialize)]
pub struct Script {
    pub codec: Codec,
    #[serde(default)]
    pub request_batched: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Exactly one of `name` or `control` addresses the capability.
    Set {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        control: Option<u32>,
        value: i32,
    },
    Activate,
    Commit,
}

impl Script {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let script: Script = serde_json::from_str(text).context("malformed control script")?;
        for (index, step) in script.steps.iter().enumerate() {
            step.validate()
                .with_context(|| format!("step {}", index))?;
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Used when no script is configured: a CBR HEVC session with a
    /// sliding-window layer change while streaming.
    pub fn demo() -> Self {
        let set = |name: &str, value| Step::Set {
            name: Some(name.to_string()),
            control: None,
            value,
        };
        Self {
            codec: Codec::Hevc,
            request_batched: false,
            steps: vec![
                set("BITRATE_MODE", 1),
                set("ENH_LAYER_COUNT", 3),
                set("GOP_SIZE", 30),
                Step::Activate,
                set("BIT_RATE", 8_000_000),
                set("ENH_LAYER_COUNT", 1),
                set("REQUEST_SYNC_FRAME", 1),
            ],
        }
    }

    /// Runs every step in order and stops at the first failure.
    pub async fn run(&self, handle: &SessionHandle) -> anyhow::Result<DrainReport> {
        let mut total = DrainReport::default();
        for (index, step) in self.steps.iter().enumerate() {
            let report = step
                .run(handle)
                .await
                .with_context(|| format!("step {} ({:?})", index, step))?;
            for diag in &report.diagnostics {
                log::warn!("step {}: {}", index, diag);
            }
            log::debug!("step {}: {} payloads sent", index, report.sent.len());
            total.extend(report);
        }
        Ok(total)
    }
}

impl Step {
    fn validate(&self) -> anyhow::Result<()> {
        if let Step::Set { name, control, .. } = self {
            match (name, control) {
                (Some(_), None) | (None, Some(_)) => {}
                _ => anyhow::bail!("set needs exactly one of `name` or `control`"),
            }
        }
        Ok(())
    }

    async fn run(&self, handle: &SessionHandle) -> anyhow::Result<DrainReport> {
        let report = match self {
            Step::Set {
                name: Some(name),
                value,
                ..
            } => handle.apply_named(name, *value).await?,
            Step::Set {
                control: Some(control),
                value,
                ..
            } => handle.apply(*control, *value).await?,
            Step::Set { .. } => anyhow::bail!("set without a target"),
            Step::Activate => handle.activate().await?,
            Step::Commit => handle.commit().await?,
        };
        Ok(report)
    }
}
