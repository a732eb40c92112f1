use crate::model::{
    CountdownEntry, CountdownState, ExpiryPolicy, SortBy, SortOrder, SortSpec, TickOutcome,
};
use crate::parser::parse_timer_text;

/// Owns the live countdowns. Callers drive it with one tick per elapsed second.
#[derive(Debug, Clone, Default)]
pub struct CountdownRegistry {
    entries: Vec<CountdownEntry>,
    next_order: u64,
}

impl CountdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create<T: Into<String>>(&mut self, label: T, duration_seconds: u64) -> CountdownEntry {
        let entry = CountdownEntry::new(label.into(), duration_seconds, self.next_order);
        self.next_order += 1;
        tracing::debug!(
            id = entry.id.as_str(),
            seconds = duration_seconds,
            label = entry.label.as_str(),
            "countdown created"
        );
        self.entries.push(entry.clone());
        entry
    }

    /// Parse free-form text and start a countdown from it.
    pub fn create_from_text(&mut self, text: &str) -> CountdownEntry {
        let parsed = parse_timer_text(text);
        self.create(parsed.label, parsed.total_seconds)
    }

    pub fn get(&self, id: &str) -> Option<&CountdownEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Advance one countdown by a second. Returns `None` once the entry is gone,
    /// so late ticks for removed countdowns are harmless.
    pub fn tick(&mut self, id: &str) -> Option<TickOutcome> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        Some(tick_entry(entry))
    }

    /// Tick every running countdown once and return the ones that expired on this tick.
    pub fn tick_all(&mut self, policy: ExpiryPolicy) -> Vec<CountdownEntry> {
        self.tick_matching(policy, |_| true)
    }

    /// Tick once each running countdown accepted by `due`; expiry follows `policy`.
    pub fn tick_matching<F>(&mut self, policy: ExpiryPolicy, mut due: F) -> Vec<CountdownEntry>
    where
        F: FnMut(&CountdownEntry) -> bool,
    {
        let mut expired = Vec::new();
        for entry in self
            .entries
            .iter_mut()
            .filter(|entry| entry.state == CountdownState::Running)
        {
            if !due(entry) {
                continue;
            }
            if tick_entry(entry) == TickOutcome::Expired {
                tracing::info!(
                    id = entry.id.as_str(),
                    label = entry.label.as_str(),
                    "countdown expired"
                );
                expired.push(entry.clone());
            }
        }

        if policy == ExpiryPolicy::Remove && !expired.is_empty() {
            self.entries
                .retain(|entry| !expired.iter().any(|gone| gone.id == entry.id));
        }

        expired
    }

    /// Remove a countdown. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Option<CountdownEntry> {
        let idx = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(idx);
        tracing::debug!(id, "countdown removed");
        Some(entry)
    }

    pub fn clear_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_expired());
        before - self.entries.len()
    }

    /// Snapshot of the entries in the requested order; storage order is untouched.
    pub fn list(&self, sort: SortSpec) -> Vec<CountdownEntry> {
        let mut items = self.entries.clone();
        items.sort_by_key(|entry| entry.insertion_order);

        match (sort.by, sort.order) {
            (SortBy::Added, SortOrder::Ascending) => {}
            (SortBy::Added, SortOrder::Descending) => items.reverse(),
            (SortBy::RemainingTime, SortOrder::Ascending) => {
                items.sort_by(|a, b| a.seconds_remaining.cmp(&b.seconds_remaining));
            }
            (SortBy::RemainingTime, SortOrder::Descending) => {
                items.sort_by(|a, b| b.seconds_remaining.cmp(&a.seconds_remaining));
            }
        }

        items
    }

    /// Entries in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &CountdownEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state == CountdownState::Running)
            .count()
    }
}

fn tick_entry(entry: &mut CountdownEntry) -> TickOutcome {
    if entry.is_expired() {
        return TickOutcome::Expired;
    }
    entry.seconds_remaining = entry.seconds_remaining.saturating_sub(1);
    if entry.seconds_remaining == 0 {
        entry.state = CountdownState::Expired;
        TickOutcome::Expired
    } else {
        TickOutcome::Continuing(entry.seconds_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(entries: &[CountdownEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    fn seeded() -> CountdownRegistry {
        let mut registry = CountdownRegistry::new();
        registry.create("tea", 180);
        registry.create("pizza", 900);
        registry.create("eggs", 180);
        registry.create("bread", 60);
        registry
    }

    #[test]
    fn create_assigns_increasing_insertion_order() {
        let mut registry = CountdownRegistry::new();
        let first = registry.create("a", 5);
        let second = registry.create("b", 5);
        assert_eq!(first.insertion_order, 0);
        assert_eq!(second.insertion_order, 1);
        assert_ne!(first.id, second.id);
        assert_eq!(first.seconds_remaining, 5);
        assert_eq!(first.state, CountdownState::Running);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn create_from_text_uses_parser() {
        let mut registry = CountdownRegistry::new();
        let entry = registry.create_from_text("1d 2h 20m food is ready");
        assert_eq!(entry.label, "food is ready");
        assert_eq!(entry.duration_seconds, 94_800);
        assert_eq!(entry.seconds_remaining, 94_800);
    }

    #[test]
    fn list_by_added_follows_creation_order() {
        let registry = seeded();
        let asc = registry.list(SortSpec::new(SortBy::Added, SortOrder::Ascending));
        assert_eq!(labels(&asc), vec!["tea", "pizza", "eggs", "bread"]);

        let desc = registry.list(SortSpec::new(SortBy::Added, SortOrder::Descending));
        assert_eq!(labels(&desc), vec!["bread", "eggs", "pizza", "tea"]);
    }

    #[test]
    fn list_by_remaining_time_is_stable() {
        let registry = seeded();
        let asc = registry.list(SortSpec::new(SortBy::RemainingTime, SortOrder::Ascending));
        assert_eq!(labels(&asc), vec!["bread", "tea", "eggs", "pizza"]);

        let desc = registry.list(SortSpec::new(SortBy::RemainingTime, SortOrder::Descending));
        assert_eq!(labels(&desc), vec!["pizza", "tea", "eggs", "bread"]);
    }

    #[test]
    fn list_does_not_reorder_storage() {
        let registry = seeded();
        let _ = registry.list(SortSpec::new(SortBy::RemainingTime, SortOrder::Ascending));
        let asc = registry.list(SortSpec::new(SortBy::Added, SortOrder::Ascending));
        assert_eq!(labels(&asc), vec!["tea", "pizza", "eggs", "bread"]);
    }

    #[test]
    fn tick_reaches_zero_after_duration_ticks() {
        let mut registry = CountdownRegistry::new();
        let id = registry.create("tea", 3).id;

        assert_eq!(registry.tick(&id), Some(TickOutcome::Continuing(2)));
        assert_eq!(registry.tick(&id), Some(TickOutcome::Continuing(1)));
        assert_eq!(registry.tick(&id), Some(TickOutcome::Expired));

        let entry = registry.get(&id).expect("entry stays resident");
        assert_eq!(entry.seconds_remaining, 0);
        assert_eq!(entry.state, CountdownState::Expired);

        assert_eq!(registry.tick(&id), Some(TickOutcome::Expired));
        assert_eq!(registry.get(&id).map(|e| e.seconds_remaining), Some(0));
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut registry = CountdownRegistry::new();
        let id = registry.create("now", 0).id;
        assert_eq!(registry.tick(&id), Some(TickOutcome::Expired));
        assert_eq!(registry.get(&id).map(|e| e.seconds_remaining), Some(0));
    }

    #[test]
    fn tick_after_remove_is_ignored() {
        let mut registry = CountdownRegistry::new();
        let id = registry.create("tea", 3).id;
        assert!(registry.remove(&id).is_some());
        assert_eq!(registry.tick(&id), None);
        assert!(registry.remove(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn tick_all_with_remove_policy_drops_expired() {
        let mut registry = CountdownRegistry::new();
        registry.create("short", 1);
        registry.create("long", 2);

        let expired = registry.tick_all(ExpiryPolicy::Remove);
        assert_eq!(labels(&expired), vec!["short"]);
        assert_eq!(registry.len(), 1);

        let expired = registry.tick_all(ExpiryPolicy::Remove);
        assert_eq!(labels(&expired), vec!["long"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn tick_all_with_retain_policy_keeps_expired_without_ticking() {
        let mut registry = CountdownRegistry::new();
        registry.create("short", 1);
        registry.create("long", 3);

        let expired = registry.tick_all(ExpiryPolicy::Retain);
        assert_eq!(labels(&expired), vec!["short"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.running_count(), 1);

        let expired = registry.tick_all(ExpiryPolicy::Retain);
        assert!(expired.is_empty());

        let listed = registry.list(SortSpec::new(SortBy::Added, SortOrder::Ascending));
        assert_eq!(listed[0].seconds_remaining, 0);
        assert_eq!(listed[0].state, CountdownState::Expired);
        assert_eq!(listed[1].seconds_remaining, 1);

        assert_eq!(registry.clear_expired(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn tick_matching_skips_entries_not_due() {
        let mut registry = CountdownRegistry::new();
        let tea = registry.create("tea", 1).id;
        registry.create("eggs", 5);

        let expired = registry.tick_matching(ExpiryPolicy::Remove, |entry| entry.id == tea);
        assert_eq!(labels(&expired), vec!["tea"]);

        let listed = registry.list(SortSpec::new(SortBy::Added, SortOrder::Ascending));
        assert_eq!(labels(&listed), vec!["eggs"]);
        assert_eq!(listed[0].seconds_remaining, 5);
    }
}
