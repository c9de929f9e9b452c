/// Outcome of a predicate test.
///
/// `Unknown` means the test could not be resolved because a field it
/// needed was missing from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateResult {
    True,
    False,
    Unknown,
}

impl PredicateResult {
    pub fn is_true(self) -> bool {
        self == PredicateResult::True
    }

    pub fn is_unknown(self) -> bool {
        self == PredicateResult::Unknown
    }

    /// Kleene negation. Unknown stays Unknown.
    pub fn negate(self) -> Self {
        match self {
            PredicateResult::True => PredicateResult::False,
            PredicateResult::False => PredicateResult::True,
            PredicateResult::Unknown => PredicateResult::Unknown,
        }
    }

    /// False if any operand is False, True if all are True, otherwise Unknown.
    /// An empty sequence is True.
    pub fn all<I: IntoIterator<Item = Self>>(results: I) -> Self {
        let mut unknown = false;
        for result in results {
            match result {
                PredicateResult::False => return PredicateResult::False,
                PredicateResult::Unknown => unknown = true,
                PredicateResult::True => {}
            }
        }
        if unknown {
            PredicateResult::Unknown
        } else {
            PredicateResult::True
        }
    }

    /// True if any operand is True, False if all are False, otherwise Unknown.
    /// An empty sequence is False.
    pub fn any<I: IntoIterator<Item = Self>>(results: I) -> Self {
        let mut unknown = false;
        for result in results {
            match result {
                PredicateResult::True => return PredicateResult::True,
                PredicateResult::Unknown => unknown = true,
                PredicateResult::False => {}
            }
        }
        if unknown {
            PredicateResult::Unknown
        } else {
            PredicateResult::False
        }
    }

    /// True iff exactly one operand is True; Unknown as soon as any operand is.
    pub fn exactly_one<I: IntoIterator<Item = Self>>(results: I) -> Self {
        let mut trues = 0usize;
        for result in results {
            match result {
                PredicateResult::Unknown => return PredicateResult::Unknown,
                PredicateResult::True => trues += 1,
                PredicateResult::False => {}
            }
        }
        PredicateResult::from(trues == 1)
    }

    /// First resolved result, or Unknown when nothing resolves.
    pub fn first_known<I: IntoIterator<Item = Self>>(results: I) -> Self {
        results
            .into_iter()
            .find(|r| !r.is_unknown())
            .unwrap_or(PredicateResult::Unknown)
    }
}

impl From<bool> for PredicateResult {
    fn from(value: bool) -> Self {
        if value {
            PredicateResult::True
        } else {
            PredicateResult::False
        }
    }
}
