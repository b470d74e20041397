use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{
    cap::CapId,
    error::{CapError, Result},
    packetizer::DrainReport,
    session::{Session, SessionState},
    transport::Transport,
};

/// Async front for a [`Session`]. The session lives in its own task and
/// handles one command at a time, so callers on many tasks are serialized.
pub struct SessionHandle {
    cancel: CancellationToken,
    tx: mpsc::Sender<SessionCommand>,
}

enum SessionCommand {
    Apply {
        external_id: u32,
        value: i32,
        result: oneshot::Sender<Result<DrainReport>>,
    },
    ApplyNamed {
        name: String,
        value: i32,
        result: oneshot::Sender<Result<DrainReport>>,
    },
    Activate {
        result: oneshot::Sender<Result<DrainReport>>,
    },
    Commit {
        result: oneshot::Sender<Result<DrainReport>>,
    },
    Value {
        id: CapId,
        result: oneshot::Sender<i32>,
    },
    State {
        result: oneshot::Sender<SessionState>,
    },
}

impl SessionHandle {
    pub fn spawn<T>(session: Session<'static, T>) -> Self
    where
        T: Transport + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(64);

        let cancel_clone = cancel.clone();
        tokio::spawn(async move { Self::inner_loop(cancel_clone, rx, session).await });
        Self { cancel, tx }
    }

    async fn inner_loop<T: Transport>(
        cancel: CancellationToken,
        mut rx: mpsc::Receiver<SessionCommand>,
        mut session: Session<'static, T>,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break;
                },
                cmd = rx.recv() => {
                    let Some(cmd) = cmd else {
                        break;
                    };
                    if !Self::inner_command_handler(&mut session, cmd) {
                        log::warn!("session command result dropped, caller went away");
                    }
                },
            }
        }
        log::debug!("{} session task stopped", session.config().codec);
    }

    /// Returns `false` when the caller stopped waiting for the result.
    fn inner_command_handler<T: Transport>(
        session: &mut Session<'static, T>,
        cmd: SessionCommand,
    ) -> bool {
        match cmd {
            SessionCommand::Apply {
                external_id,
                value,
                result,
            } => result.send(session.apply(external_id, value)).is_ok(),
            SessionCommand::ApplyNamed {
                name,
                value,
                result,
            } => result.send(session.apply_named(&name, value)).is_ok(),
            SessionCommand::Activate { result } => result.send(session.activate()).is_ok(),
            SessionCommand::Commit { result } => result.send(session.commit()).is_ok(),
            SessionCommand::Value { id, result } => result.send(session.value(id)).is_ok(),
            SessionCommand::State { result } => {
                result.send(session.session_state()).is_ok()
            }
        }
    }

    async fn request<R>(
        &self,
        cmd: impl FnOnce(oneshot::Sender<R>) -> SessionCommand,
    ) -> Result<R> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(cmd(tx))
            .await
            .map_err(|_| CapError::HandleClosed)?;
        rx.await.map_err(|_| CapError::HandleClosed)
    }

    pub async fn apply(&self, external_id: u32, value: i32) -> Result<DrainReport> {
        self.request(|result| SessionCommand::Apply {
            external_id,
            value,
            result,
        })
        .await?
    }

    pub async fn apply_named(&self, name: &str, value: i32) -> Result<DrainReport> {
        let name = name.to_string();
        self.request(|result| SessionCommand::ApplyNamed { name, value, result })
            .await?
    }

    pub async fn activate(&self) -> Result<DrainReport> {
        self.request(|result| SessionCommand::Activate { result })
            .await?
    }

    pub async fn commit(&self) -> Result<DrainReport> {
        self.request(|result| SessionCommand::Commit { result })
            .await?
    }

    pub async fn value(&self, id: CapId) -> Result<i32> {
        self.request(|result| SessionCommand::Value { id, result })
            .await
    }

    pub async fn session_state(&self) -> Result<SessionState> {
        self.request(|result| SessionCommand::State { result })
            .await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
