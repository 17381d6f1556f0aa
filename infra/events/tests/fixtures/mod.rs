//! Events shared by the bus integration tests.

/// A submitted quote, the way the lead slice fans it out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteReceived {
    pub lead_id: u64,
}

/// A queued notification job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailerJob {
    pub sequence: usize,
}

/// Latest-value choreography signal.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct StageSnapshot {
    pub scroll: f32,
}
