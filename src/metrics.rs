/// Counters for one `apply` pass, returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyMetrics {
    pub rules_seen: usize,
    pub rules_pseudo: usize,
    pub selectors_skipped: usize,
    pub elements_styled: usize,
    pub child_wrappers_created: usize,
    pub element_wrappers_created: usize,
    pub spacers_inserted: usize,
    pub declarations_dropped: usize,
}

impl ApplyMetrics {
    pub fn merge(&mut self, other: &ApplyMetrics) {
        self.rules_seen += other.rules_seen;
        self.rules_pseudo += other.rules_pseudo;
        self.selectors_skipped += other.selectors_skipped;
        self.elements_styled += other.elements_styled;
        self.child_wrappers_created += other.child_wrappers_created;
        self.element_wrappers_created += other.element_wrappers_created;
        self.spacers_inserted += other.spacers_inserted;
        self.declarations_dropped += other.declarations_dropped;
    }
}
