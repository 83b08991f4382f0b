//! Set reconciliation shared by the membership resources.
//!
//! Desired ("plan") and current ("asis") entries are compared through their
//! [`Identifier`]. Two entries match when they share a populated id or a
//! populated natural key (email, phone number).

pub mod error;

pub use error::ReconcileError;

use tfplug::Context;

/// Call queue members accepted per assignment request
pub const MEMBER_CHUNK_SIZE: usize = 10;
/// Phone numbers accepted per assignment request
pub const PHONE_NUMBER_CHUNK_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    ById(String),
    ByNaturalKey(String),
    /// Remote entries carry both
    Both { id: String, key: String },
}

impl Identifier {
    /// Build from optional parts; empty strings count as unset
    pub fn from_parts(id: Option<&str>, key: Option<&str>) -> Option<Self> {
        let id = id.filter(|s| !s.is_empty());
        let key = key.filter(|s| !s.is_empty());
        match (id, key) {
            (Some(id), Some(key)) => Some(Identifier::Both {
                id: id.to_string(),
                key: key.to_string(),
            }),
            (Some(id), None) => Some(Identifier::ById(id.to_string())),
            (None, Some(key)) => Some(Identifier::ByNaturalKey(key.to_string())),
            (None, None) => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Identifier::ById(id) | Identifier::Both { id, .. } => Some(id),
            Identifier::ByNaturalKey(_) => None,
        }
    }

    pub fn natural_key(&self) -> Option<&str> {
        match self {
            Identifier::ByNaturalKey(key) | Identifier::Both { key, .. } => Some(key),
            Identifier::ById(_) => None,
        }
    }

    pub fn matches(&self, other: &Identifier) -> bool {
        let same_id = matches!((self.id(), other.id()), (Some(a), Some(b)) if a == b);
        let same_key =
            matches!((self.natural_key(), other.natural_key()), (Some(a), Some(b)) if a == b);
        same_id || same_key
    }
}

/// An entry that takes part in set reconciliation
pub trait Keyed {
    /// `None` when the entry carries no usable key
    fn identifier(&self) -> Option<Identifier>;

    fn matches<K: Keyed + ?Sized>(&self, other: &K) -> bool {
        match (self.identifier(), other.identifier()) {
            (Some(a), Some(b)) => a.matches(&b),
            _ => false,
        }
    }
}

/// Entries to add to and remove from the remote set
#[derive(Debug)]
pub struct Delta<'a, P, A> {
    pub assign: Vec<&'a P>,
    pub unassign: Vec<&'a A>,
}

impl<P, A> Delta<'_, P, A> {
    pub fn is_empty(&self) -> bool {
        self.assign.is_empty() && self.unassign.is_empty()
    }
}

/// `assign = plan − asis`, `unassign = asis − plan`
pub fn compute_delta<'a, P: Keyed, A: Keyed>(plan: &'a [P], asis: &'a [A]) -> Delta<'a, P, A> {
    let assign = plan
        .iter()
        .filter(|p| !asis.iter().any(|a| a.matches(*p)))
        .collect();
    let unassign = asis
        .iter()
        .filter(|a| !plan.iter().any(|p| p.matches(*a)))
        .collect();
    Delta { assign, unassign }
}

impl<'a, P, A: Keyed> Delta<'a, P, A> {
    /// Keep only removals of entries recorded in the prior state, so that
    /// members added outside this resource survive an update
    pub fn within_state<S: Keyed>(mut self, state: &[S]) -> Self {
        self.unassign
            .retain(|a| state.iter().any(|s| s.matches(*a)));
        self
    }
}

/// Remote entries that match an entry of `declared`. Reads report only
/// these, so entries managed elsewhere never enter the state.
pub fn retain_declared<T: Keyed, S: Keyed>(remote: Vec<T>, declared: &[S]) -> Vec<T> {
    remote
        .into_iter()
        .filter(|r| declared.iter().any(|d| d.matches(r)))
        .collect()
}

/// Stop before issuing further requests once the lifecycle call is cancelled
pub fn checkpoint(ctx: &Context) -> Result<(), ReconcileError> {
    if ctx.is_cancelled() {
        tracing::warn!("Reconciliation cancelled before the next remote call");
        return Err(ReconcileError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: Option<&'static str>,
        key: Option<&'static str>,
    }

    impl Keyed for Entry {
        fn identifier(&self) -> Option<Identifier> {
            Identifier::from_parts(self.id, self.key)
        }
    }

    fn entry(id: Option<&'static str>, key: Option<&'static str>) -> Entry {
        Entry { id, key }
    }

    #[test]
    fn identifier_matching_uses_populated_keys_only() {
        let by_id = Identifier::ById("1".into());
        let by_key = Identifier::ByNaturalKey("a@example.com".into());
        let both = Identifier::Both {
            id: "1".into(),
            key: "a@example.com".into(),
        };

        assert!(by_id.matches(&both));
        assert!(by_key.matches(&both));
        assert!(!by_id.matches(&by_key));
        assert!(!Identifier::ById("2".into()).matches(&both));
        assert_eq!(Identifier::from_parts(Some(""), Some("")), None);
        assert_eq!(
            Identifier::from_parts(Some(""), Some("k")),
            Some(Identifier::ByNaturalKey("k".into()))
        );
    }

    #[test]
    fn entries_without_keys_never_match() {
        assert!(!entry(None, None).matches(&entry(None, None)));
        assert!(!entry(None, None).matches(&entry(Some("1"), None)));
    }

    #[test]
    fn delta_unassigns_missing_and_assigns_new() {
        // asis {A(1), B(2)}, plan {B(2), C(email)}
        let asis = vec![
            entry(Some("1"), Some("a@example.com")),
            entry(Some("2"), Some("b@example.com")),
        ];
        let plan = vec![entry(Some("2"), None), entry(None, Some("c@example.com"))];

        let delta = compute_delta(&plan, &asis);

        assert_eq!(delta.unassign, vec![&asis[0]]);
        assert_eq!(delta.assign, vec![&plan[1]]);
    }

    #[test]
    fn delta_sets_are_disjoint_and_converge() {
        let asis = vec![
            entry(Some("1"), Some("+1001")),
            entry(Some("2"), Some("+1002")),
            entry(Some("3"), Some("+1003")),
        ];
        let plan = vec![
            entry(None, Some("+1002")),
            entry(Some("3"), None),
            entry(None, Some("+1004")),
        ];

        let delta = compute_delta(&plan, &asis);

        for a in &delta.unassign {
            assert!(!delta.assign.iter().any(|p| p.matches(*a)));
        }

        // applying the delta leaves exactly the planned entries
        let mut result: Vec<Entry> = asis
            .iter()
            .filter(|a| !delta.unassign.iter().any(|u| u.matches(*a)))
            .cloned()
            .collect();
        result.extend(delta.assign.iter().map(|p| (*p).clone()));
        assert_eq!(result.len(), plan.len());
        for p in &plan {
            assert!(result.iter().any(|r| r.matches(p)));
        }
    }

    #[test]
    fn delta_is_empty_once_converged() {
        let asis = vec![entry(Some("1"), Some("+1001")), entry(Some("2"), Some("+1002"))];
        let plan = vec![entry(Some("1"), None), entry(None, Some("+1002"))];
        assert!(compute_delta(&plan, &asis).is_empty());
    }

    #[test]
    fn within_state_keeps_externally_added_entries() {
        let asis = vec![entry(Some("1"), None), entry(Some("9"), None)];
        let plan: Vec<Entry> = vec![];
        let state = vec![entry(Some("1"), None)];

        let delta = compute_delta(&plan, &asis).within_state(&state);

        assert_eq!(delta.unassign, vec![&asis[0]]);
    }

    #[test]
    fn retain_declared_drops_undeclared_entries() {
        let remote = vec![
            entry(Some("1"), Some("a@example.com")),
            entry(Some("9"), Some("x@example.com")),
        ];
        let declared = vec![entry(None, Some("a@example.com")), entry(Some("5"), None)];

        let kept = retain_declared(remote, &declared);

        assert_eq!(kept, vec![entry(Some("1"), Some("a@example.com"))]);
    }

    #[test]
    fn chunking_splits_twenty_five_into_ten_ten_five() {
        let ids: Vec<String> = (0..25).map(|i| format!("id-{}", i)).collect();
        let sizes: Vec<usize> = ids.chunks(MEMBER_CHUNK_SIZE).map(<[String]>::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);

        let sizes: Vec<usize> = ids
            .chunks(PHONE_NUMBER_CHUNK_SIZE)
            .map(<[String]>::len)
            .collect();
        assert_eq!(sizes, vec![5; 5]);
    }

    #[test]
    fn checkpoint_reports_cancellation() {
        let ctx = Context::new();
        assert!(checkpoint(&ctx).is_ok());
        ctx.cancel();
        assert!(matches!(checkpoint(&ctx), Err(ReconcileError::Cancelled)));
    }
}
