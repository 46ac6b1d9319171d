//! Single-consumer command queue for hosts that drive a messenger from
//! other threads.
//!
//! A [`Messenger`] is single-threaded. [`serve`] owns one on the thread that
//! created it and applies commands in arrival order; [`MessengerHandle`] is
//! the `Send` side. Opens, closes and deliveries are therefore serialized,
//! and a message delivered after a close reaches no handler.

use framebridge_channel::{LocalChannel, MessageEvent};
use framebridge_view::Document;
use tokio::sync::{mpsc, oneshot};

use crate::config::OpenOptions;
use crate::error::{MessengerError, Result};
use crate::message::Message;
use crate::messenger::Messenger;

/// One request for the messenger task.
#[derive(Debug)]
pub enum Command {
    Open {
        options: OpenOptions,
        reply: oneshot::Sender<Result<()>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
    /// Post an inbound message on the messenger's channel.
    Deliver(MessageEvent),
}

/// Cloneable, `Send` handle to a served messenger.
#[derive(Debug, Clone)]
pub struct MessengerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl MessengerHandle {
    pub async fn open(&self, options: impl Into<OpenOptions>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Open {
            options: options.into(),
            reply,
        })?;
        rx.await.map_err(|_| MessengerError::QueueClosed)?
    }

    /// Resolves once the session is closed.
    pub async fn close(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Close { reply })?;
        rx.await.map_err(|_| MessengerError::QueueClosed)
    }

    /// Queue an inbound message without waiting for it to be handled.
    pub fn deliver(&self, event: MessageEvent) -> Result<()> {
        self.send(Command::Deliver(event))
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| MessengerError::QueueClosed)
    }
}

/// Create a handle and the receiver to pass to [`serve`].
pub fn command_queue() -> (MessengerHandle, mpsc::UnboundedReceiver<Command>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MessengerHandle { tx }, rx)
}

/// Apply queued commands until every handle is dropped, then close.
pub async fn serve<M, D>(
    messenger: Messenger<M, LocalChannel, D>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) where
    M: Message,
    D: Document + 'static,
{
    while let Some(command) = rx.recv().await {
        match command {
            Command::Open { options, reply } => {
                let _ = reply.send(messenger.open(options));
            }
            Command::Close { reply } => {
                messenger.close();
                let _ = reply.send(());
            }
            Command::Deliver(event) => {
                messenger.channel().post(event);
            }
        }
    }
    tracing::debug!("messenger queue drained");
    messenger.close();
}
