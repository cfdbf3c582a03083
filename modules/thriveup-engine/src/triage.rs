//! The candidate stack the swipe screen works through.

use thriveup_common::EventRecord;
use tracing::debug;

use crate::persist::dedupe_by_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageState {
    HasCandidates,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Accept => write!(f, "accept"),
            Decision::Reject => write!(f, "reject"),
        }
    }
}

/// Ordered candidates with stack discipline: the last element is the top,
/// the next event shown to the user.
///
/// Seeded once; every accept or reject removes exactly one candidate and
/// nothing is ever pushed back. Once empty it stays empty.
#[derive(Debug, Clone, Default)]
pub struct TriageStack {
    candidates: Vec<EventRecord>,
}

impl TriageStack {
    /// Seed the stack. The last element of `seed` is the top. Repeated ids
    /// are dropped, keeping the first occurrence.
    pub fn new(seed: Vec<EventRecord>) -> Self {
        let seeded = seed.len();
        let candidates = dedupe_by_id(&seed);
        if candidates.len() != seeded {
            debug!(
                dropped = seeded - candidates.len(),
                "Dropped duplicate candidates from seed"
            );
        }
        Self { candidates }
    }

    pub fn peek_top(&self) -> Option<&EventRecord> {
        self.candidates.last()
    }

    /// Up to `n` candidates, top first.
    pub fn visible(&self, n: usize) -> impl Iterator<Item = &EventRecord> {
        self.candidates.iter().rev().take(n)
    }

    /// Take the top candidate as a keeper. Persisting it is the caller's job.
    pub fn accept(&mut self) -> Option<EventRecord> {
        self.take(Decision::Accept)
    }

    /// Take the top candidate and drop it.
    pub fn reject(&mut self) -> Option<EventRecord> {
        self.take(Decision::Reject)
    }

    fn take(&mut self, decision: Decision) -> Option<EventRecord> {
        let record = self.candidates.pop()?;
        debug!(
            event_id = %record.id,
            %decision,
            remaining = self.candidates.len(),
            "Triaged candidate"
        );
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn state(&self) -> TriageState {
        if self.candidates.is_empty() {
            TriageState::Exhausted
        } else {
            TriageState::HasCandidates
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(ids: &[&str]) -> Vec<EventRecord> {
        ids.iter()
            .map(|id| EventRecord::new(*id, format!("Event {id}")))
            .collect()
    }

    #[test]
    fn top_is_last_pushed() {
        let stack = TriageStack::new(events(&["e1", "e2", "e3"]));
        assert_eq!(stack.peek_top().unwrap().id, "e3");
        assert_eq!(stack.state(), TriageState::HasCandidates);
    }

    #[test]
    fn n_decisions_exhaust_n_candidates() {
        for n in 0..6 {
            let ids: Vec<String> = (0..n).map(|i| format!("e{i}")).collect();
            let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let mut stack = TriageStack::new(events(&id_refs));

            for i in 0..n {
                let taken = if i % 2 == 0 { stack.accept() } else { stack.reject() };
                assert!(taken.is_some());
            }
            assert!(stack.is_empty());
            assert_eq!(stack.state(), TriageState::Exhausted);

            assert!(stack.accept().is_none());
            assert!(stack.reject().is_none());
            assert!(stack.peek_top().is_none());
            assert_eq!(stack.len(), 0);
        }
    }

    #[test]
    fn accepted_record_is_never_the_next_top() {
        let mut stack = TriageStack::new(events(&["e1", "e2", "e3"]));
        while let Some(accepted) = stack.accept() {
            if let Some(top) = stack.peek_top() {
                assert_ne!(top.id, accepted.id);
            }
        }
    }

    #[test]
    fn reject_then_accept_follows_stack_order() {
        let mut stack = TriageStack::new(events(&["e1", "e2", "e3"]));

        assert_eq!(stack.reject().unwrap().id, "e3");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.accept().unwrap().id, "e2");
        assert_eq!(stack.peek_top().unwrap().id, "e1");
    }

    #[test]
    fn visible_lists_top_cards_first() {
        let stack = TriageStack::new(events(&["e1", "e2", "e3", "e4"]));
        let shown: Vec<&str> = stack.visible(3).map(|r| r.id.as_str()).collect();
        assert_eq!(shown, vec!["e4", "e3", "e2"]);

        let small = TriageStack::new(events(&["e1"]));
        assert_eq!(small.visible(3).count(), 1);
    }

    #[test]
    fn duplicate_ids_in_seed_are_dropped() {
        let mut seed = events(&["e1", "e2"]);
        seed.push(EventRecord::new("e1", "Repeat"));
        let stack = TriageStack::new(seed);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek_top().unwrap().id, "e2");
    }
}
