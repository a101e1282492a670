use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::api::enrich::{FieldKey, Tooltip};

/// Tooltips for the active character, plus bookkeeping for the enrichment
/// batch currently in flight.
#[derive(Default)]
pub struct TooltipState {
    tooltips: HashMap<FieldKey, Tooltip>,
    cancel_token: Option<CancellationToken>,
    current_batch: u64,
    pub enabled: bool,
}

impl TooltipState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    /// Cancel whatever is in flight and hand out a token and id for a new batch.
    pub fn start_batch(&mut self) -> (CancellationToken, u64) {
        self.cancel();
        self.current_batch += 1;
        let token = CancellationToken::new();
        self.cancel_token = Some(token.clone());
        (token, self.current_batch)
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }

    /// Replace the tooltip set with a finished batch. Results from a
    /// superseded batch are ignored.
    pub fn finish_batch(&mut self, batch_id: u64, tooltips: Vec<(FieldKey, Tooltip)>) -> bool {
        if batch_id != self.current_batch {
            return false;
        }
        self.cancel_token = None;
        self.tooltips = tooltips.into_iter().collect();
        true
    }

    /// Forget everything, e.g. when switching to another character.
    pub fn reset(&mut self) {
        self.cancel();
        self.tooltips.clear();
    }

    pub fn get(&self, key: &FieldKey) -> Option<&Tooltip> {
        self.tooltips.get(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Tooltip> {
        self.tooltips.values()
    }

    pub fn is_loading(&self) -> bool {
        self.cancel_token.is_some()
    }

    pub fn current_batch(&self) -> u64 {
        self.current_batch
    }
}
