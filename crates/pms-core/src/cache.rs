use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::row::RawRow;
use crate::source::SourceError;

/// Outcome a waiting pass receives when the fetch it waits on settles.
pub type FetchOutcome = Result<(), SourceError>;

#[derive(Default)]
struct Slots {
    rows: HashMap<String, Rc<Vec<RawRow>>>,
    in_flight: HashMap<String, Vec<oneshot::Sender<FetchOutcome>>>,
}

/// Stage rows shared by every party view for the lifetime of the page.
///
/// Entries are written once per stage name and never invalidated. Clones
/// share the same storage. A stage being fetched is tracked as in flight so
/// a second pass waits for it instead of requesting it again.
#[derive(Clone, Default)]
pub struct StageCache {
    slots: Rc<RefCell<Slots>>,
}

impl std::fmt::Debug for StageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("StageCache")
            .field("cached", &slots.rows.len())
            .field("in_flight", &slots.in_flight.len())
            .finish()
    }
}

impl PartialEq for StageCache {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slots, &other.slots)
    }
}

/// What a pass should do about one stage.
pub enum StageClaim {
    Cached,
    /// This pass fetches the stage and settles the ticket.
    Fetch(FetchTicket),
    /// Another pass is fetching it; resolves when that fetch settles. A
    /// cancelled receiver means the other pass was dropped mid-fetch.
    InFlight(oneshot::Receiver<FetchOutcome>),
}

impl StageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stage_name: &str) -> Option<Rc<Vec<RawRow>>> {
        self.slots.borrow().rows.get(stage_name).cloned()
    }

    pub fn contains(&self, stage_name: &str) -> bool {
        self.slots.borrow().rows.contains_key(stage_name)
    }

    pub fn is_in_flight(&self, stage_name: &str) -> bool {
        self.slots.borrow().in_flight.contains_key(stage_name)
    }

    /// Keeps the first rows stored for a stage.
    pub fn insert(&self, stage_name: &str, rows: Vec<RawRow>) -> Rc<Vec<RawRow>> {
        self.slots
            .borrow_mut()
            .rows
            .entry(stage_name.to_string())
            .or_insert_with(|| Rc::new(rows))
            .clone()
    }

    pub fn claim(&self, stage_name: &str) -> StageClaim {
        let mut slots = self.slots.borrow_mut();
        if slots.rows.contains_key(stage_name) {
            return StageClaim::Cached;
        }
        if let Some(waiters) = slots.in_flight.get_mut(stage_name) {
            let (tx, rx) = oneshot::channel();
            waiters.push(tx);
            return StageClaim::InFlight(rx);
        }
        slots.in_flight.insert(stage_name.to_string(), Vec::new());
        drop(slots);

        StageClaim::Fetch(FetchTicket {
            cache: self.clone(),
            stage: stage_name.to_string(),
            settled: false,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().rows.is_empty()
    }

    fn release(&self, stage_name: &str) -> Vec<oneshot::Sender<FetchOutcome>> {
        self.slots
            .borrow_mut()
            .in_flight
            .remove(stage_name)
            .unwrap_or_default()
    }
}

/// Exclusive right to fetch one stage. Dropping it unsettled releases the
/// stage and cancels whoever waits on it.
#[must_use]
#[derive(Debug)]
pub struct FetchTicket {
    cache: StageCache,
    stage: String,
    settled: bool,
}

impl FetchTicket {
    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn fill(mut self, rows: Vec<RawRow>) -> Rc<Vec<RawRow>> {
        let rows = self.cache.insert(&self.stage, rows);
        self.settle(Ok(()));
        rows
    }

    pub fn fail(mut self, err: SourceError) {
        self.settle(Err(err));
    }

    fn settle(&mut self, outcome: FetchOutcome) {
        self.settled = true;
        for waiter in self.cache.release(&self.stage) {
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        if !self.settled {
            drop(self.cache.release(&self.stage));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn clones_share_entries_and_first_write_wins() {
        let cache = StageCache::new();
        let view = cache.clone();

        cache.insert("Design", vec![RawRow::default()]);
        view.insert("Design", vec![RawRow::default(), RawRow::default()]);

        assert_eq!(view.get("Design").map(|rows| rows.len()), Some(1));
        assert!(cache.contains("Design"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache, view);
        assert_ne!(cache, StageCache::new());
    }

    #[test]
    fn second_claim_waits_for_the_first() {
        let cache = StageCache::new();
        let StageClaim::Fetch(ticket) = cache.claim("Design") else {
            panic!("first claim should fetch");
        };
        let StageClaim::InFlight(waiter) = cache.claim("Design") else {
            panic!("second claim should wait");
        };
        assert!(cache.is_in_flight("Design"));

        ticket.fill(vec![RawRow::default()]);
        assert_eq!(block_on(waiter), Ok(Ok(())));
        assert!(!cache.is_in_flight("Design"));
        assert!(matches!(cache.claim("Design"), StageClaim::Cached));
    }

    #[test]
    fn failures_reach_waiters_and_stay_uncached() {
        let cache = StageCache::new();
        let StageClaim::Fetch(ticket) = cache.claim("Civil") else {
            panic!("first claim should fetch");
        };
        let StageClaim::InFlight(waiter) = cache.claim("Civil") else {
            panic!("second claim should wait");
        };

        ticket.fail(SourceError::Http { status: 500 });
        assert_eq!(block_on(waiter), Ok(Err(SourceError::Http { status: 500 })));
        assert!(matches!(cache.claim("Civil"), StageClaim::Fetch(_)));
    }

    #[test]
    fn dropped_ticket_cancels_waiters() {
        let cache = StageCache::new();
        let ticket = cache.claim("Design");
        let StageClaim::InFlight(waiter) = cache.claim("Design") else {
            panic!("second claim should wait");
        };

        drop(ticket);
        assert!(block_on(waiter).is_err());
        assert!(!cache.is_in_flight("Design"));
    }
}
