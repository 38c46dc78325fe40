//! View-model for creating and editing a single transaction.
//!
//! Mirrors the form screen of the mobile app: `load` prefills the form
//! state, `save` decides between insert and update and tells the caller to
//! navigate away on success.

use tokio::sync::{mpsc, watch};

use crate::{
    Error,
    models::{DatabaseId, Transaction, TransactionDraft},
    stores::TransactionStore,
};

/// One-shot navigation signals emitted by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The save succeeded and the form should be dismissed.
    NavigateBack,
}

/// Orchestrates create-vs-update of a transaction against a store.
#[derive(Debug)]
pub struct TransactionEditor<S> {
    store: S,
    events: mpsc::UnboundedSender<EditorEvent>,
    state: watch::Sender<Option<Transaction>>,
}

impl<S: TransactionStore> TransactionEditor<S> {
    /// Create an editor over `store`, returning the editor together with
    /// the receiving end of its navigation event channel.
    pub fn new(store: S) -> (Self, mpsc::UnboundedReceiver<EditorEvent>) {
        let (events, event_receiver) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(None);

        (
            Self {
                store,
                events,
                state,
            },
            event_receiver,
        )
    }

    /// Subscribe to the transaction currently loaded into the form, if any.
    pub fn state(&self) -> watch::Receiver<Option<Transaction>> {
        self.state.subscribe()
    }

    /// Persist the draft: insert when it has no identifier, update
    /// otherwise.
    ///
    /// Returns `true` and emits [EditorEvent::NavigateBack] on success.
    /// On failure the error is logged, no event is emitted and `false` is
    /// returned; the form stays open for the user to retry.
    pub fn save(&mut self, draft: TransactionDraft) -> bool {
        let result = match draft.id {
            None => self.store.insert(draft).map(|_| ()),
            Some(id) => self.store.update(&Transaction {
                id,
                title: draft.title,
                amount: draft.amount,
                date: draft.date,
                kind: draft.kind,
            }),
        };

        match result {
            Ok(()) => {
                // The receiver may be gone when the caller only polls the
                // return value.
                let _ = self.events.send(EditorEvent::NavigateBack);
                true
            }
            Err(error) => {
                tracing::error!("could not save transaction: {error}");
                false
            }
        }
    }

    /// Fetch the transaction with `id` and publish it to the form state.
    ///
    /// An unknown id publishes `None`; other store failures are logged and
    /// also publish `None`.
    pub fn load(&mut self, id: DatabaseId) {
        let loaded = match self.store.get(id) {
            Ok(transaction) => Some(transaction),
            Err(Error::NotFound) => None,
            Err(error) => {
                tracing::error!("could not load transaction {id}: {error}");
                None
            }
        };

        self.state.send_replace(loaded);
    }
}
