// Readtrack Engine — Whitelist
//
// Optional allow-list of group ids. Empty means "no restriction — every
// group is tracked". The handler persists the set back into the config file
// on every mutation; this type only owns the set semantics.

#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    groups: Vec<String>,
}

impl Whitelist {
    pub fn new(groups: Vec<String>) -> Self {
        Whitelist { groups }
    }

    /// Whether events from `group_id` should be processed.
    pub fn allows(&self, group_id: &str) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| g == group_id)
    }

    pub fn contains(&self, group_id: &str) -> bool {
        self.groups.iter().any(|g| g == group_id)
    }

    /// Returns false if the id was already present.
    pub fn add(&mut self, group_id: &str) -> bool {
        if self.contains(group_id) {
            return false;
        }
        self.groups.push(group_id.to_string());
        true
    }

    /// Returns false if the id was not present.
    pub fn remove(&mut self, group_id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g != group_id);
        self.groups.len() != before
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Ids in insertion order, for display and persistence.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.as_str())
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.groups.clone()
    }
}
