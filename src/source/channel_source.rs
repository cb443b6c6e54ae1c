use futures_channel::{mpsc, oneshot};
use snafu::ResultExt;
use tracing::debug;

use super::record_source::CanceledSnafu;
use super::{RecordSource, SourceError};
use crate::pipeline::RawEntry;

/// A pending request for change records. Whoever owns the records answers it
/// exactly once through [`SourceRequest::respond`].
#[derive(Debug)]
pub struct SourceRequest {
    responder: oneshot::Sender<Option<Vec<RawEntry>>>,
}

impl SourceRequest {
    pub fn respond(self, entries: Option<Vec<RawEntry>>) {
        if self.responder.send(entries).is_err() {
            debug!("Requester went away before the change records were delivered");
        }
    }
}

/// Asks a foreground collaborator for records over a channel and waits for
/// its answer.
#[derive(Debug, Clone)]
pub struct ChannelSource {
    requests: mpsc::UnboundedSender<SourceRequest>,
}

impl ChannelSource {
    /// Creates the source together with the receiving end the collaborator
    /// listens on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SourceRequest>) {
        let (requests, receiver) = mpsc::unbounded();
        (Self { requests }, receiver)
    }
}

impl RecordSource for ChannelSource {
    async fn fetch(&self) -> Result<Option<Vec<RawEntry>>, SourceError> {
        let (responder, response) = oneshot::channel();
        self.requests
            .unbounded_send(SourceRequest { responder })
            .map_err(|_| SourceError::Disconnected)?;
        debug!("Requested change records, waiting for the answer");

        response.await.context(CanceledSnafu)
    }
}
