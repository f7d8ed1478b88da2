//! # Rolling Summary
//!
//! Bookkeeping for the optional conversation summary. The network call lives in
//! `inference::Summarizer`; this module only decides when a refresh is due and what
//! it should carry. At most one refresh is in flight; exchanges finishing meanwhile
//! are queued into the next one.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub existing: String,
    pub new_information: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollingSummary {
    enabled: bool,
    text: String,
    pending: String,
    in_flight: Option<String>,
}

impl RollingSummary {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Queues a finished exchange and returns a refresh request if one can start now.
    pub fn record_exchange(&mut self, user: &str, assistant: &str) -> Option<SummaryRequest> {
        if !self.enabled {
            return None;
        }
        self.pending
            .push_str(&format!("User: {}\nAssistant: {}\n", user.trim(), assistant.trim()));
        self.next_request()
    }

    /// Stores a refreshed summary and starts the next refresh if exchanges queued up.
    pub fn complete(&mut self, summary: String) -> Option<SummaryRequest> {
        self.text = summary;
        self.in_flight = None;
        self.next_request()
    }

    /// Keeps the previous summary and puts the failed batch back in front of the queue.
    /// No retry is started; the next finished exchange carries it along.
    pub fn fail(&mut self) {
        if let Some(batch) = self.in_flight.take() {
            self.pending.insert_str(0, &batch);
        }
    }

    fn next_request(&mut self) -> Option<SummaryRequest> {
        if self.in_flight.is_some() || self.pending.is_empty() {
            return None;
        }
        let batch = std::mem::take(&mut self.pending);
        self.in_flight = Some(batch.clone());
        Some(SummaryRequest {
            existing: self.text.clone(),
            new_information: batch,
        })
    }
}
