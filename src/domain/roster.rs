use uuid::Uuid;

use crate::domain::{Heir, Relationship};

/// An ordered list of heirs.
///
/// Heirs are kept in insertion order and can be removed either by position
/// (as listed) or by identifier. The roster never computes shares itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    heirs: Vec<Heir>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub const fn new() -> Self {
        Self { heirs: Vec::new() }
    }

    /// Appends an heir and returns their identifier.
    pub fn add(&mut self, heir: Heir) -> Uuid {
        let id = heir.id();
        tracing::debug!(%id, relationship = %heir.relationship(), "adding heir");
        self.heirs.push(heir);
        id
    }

    /// Removes the heir at `index` (zero-based), if any.
    pub fn remove_at(&mut self, index: usize) -> Option<Heir> {
        (index < self.heirs.len()).then(|| self.heirs.remove(index))
    }

    /// Removes the heir with the given identifier, if present.
    pub fn remove(&mut self, id: Uuid) -> Option<Heir> {
        let index = self.heirs.iter().position(|heir| heir.id() == id)?;
        self.remove_at(index)
    }

    /// Looks up an heir by identifier.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Heir> {
        self.heirs.iter().find(|heir| heir.id() == id)
    }

    /// Iterates over the heirs in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Heir> {
        self.heirs.iter()
    }

    /// The heirs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Heir] {
        &self.heirs
    }

    /// Number of heirs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heirs.len()
    }

    /// Whether the roster has no heirs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heirs.is_empty()
    }

    /// Class presence and counts for every heir on the roster.
    #[must_use]
    pub fn presence(&self) -> Presence {
        Presence::of(&self.heirs, |_| true)
    }
}

impl FromIterator<Heir> for Roster {
    fn from_iter<T: IntoIterator<Item = Heir>>(iter: T) -> Self {
        Self {
            heirs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Heir;
    type IntoIter = std::slice::Iter<'a, Heir>;

    fn into_iter(self) -> Self::IntoIter {
        self.heirs.iter()
    }
}

/// Which heir classes are present, and how many sons and daughters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
    /// At least one spouse.
    pub has_spouse: bool,
    /// At least one father.
    pub has_father: bool,
    /// At least one mother.
    pub has_mother: bool,
    /// Number of sons.
    pub sons: usize,
    /// Number of daughters.
    pub daughters: usize,
}

impl Presence {
    /// Tallies the heirs for which `counts` returns `true`.
    pub fn of<'a>(
        heirs: impl IntoIterator<Item = &'a Heir>,
        counts: impl Fn(&Heir) -> bool,
    ) -> Self {
        heirs
            .into_iter()
            .filter(|&heir| counts(heir))
            .fold(Self::default(), |mut presence, heir| {
                match heir.relationship() {
                    Relationship::Spouse => presence.has_spouse = true,
                    Relationship::Father => presence.has_father = true,
                    Relationship::Mother => presence.has_mother = true,
                    Relationship::Son => presence.sons += 1,
                    Relationship::Daughter => presence.daughters += 1,
                    Relationship::Brother
                    | Relationship::Sister
                    | Relationship::Grandfather
                    | Relationship::Grandmother => {}
                }
                presence
            })
    }

    /// At least one son.
    #[must_use]
    pub const fn has_sons(&self) -> bool {
        self.sons > 0
    }

    /// At least one daughter.
    #[must_use]
    pub const fn has_daughters(&self) -> bool {
        self.daughters > 0
    }

    /// At least one son or daughter.
    #[must_use]
    pub const fn has_descendants(&self) -> bool {
        self.has_sons() || self.has_daughters()
    }
}
