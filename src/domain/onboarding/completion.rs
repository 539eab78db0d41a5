//! Point-in-time onboarding completion result.

use serde::{Deserialize, Serialize};

use super::Requirements;

/// Completion verdict derived from a requirements snapshot.
///
/// Requirement tags are copied verbatim and in platform order; the service
/// never interprets them, it only checks cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatus {
    pub complete: bool,
    pub currently_due: Vec<String>,
    pub eventually_due: Vec<String>,
}

impl CompletionStatus {
    /// Evaluate a snapshot: complete iff nothing is currently or eventually due.
    pub fn from_requirements(requirements: &Requirements) -> Self {
        Self {
            complete: requirements.is_empty(),
            currently_due: requirements.currently_due.clone(),
            eventually_due: requirements.eventually_due.clone(),
        }
    }

    /// Total number of outstanding requirement tags.
    pub fn outstanding(&self) -> usize {
        self.currently_due.len() + self.eventually_due.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_requirements_are_complete() {
        let status = CompletionStatus::from_requirements(&Requirements::default());
        assert!(status.complete);
        assert_eq!(status.outstanding(), 0);
    }

    #[test]
    fn currently_due_blocks_completion() {
        let status = CompletionStatus::from_requirements(&Requirements {
            currently_due: vec!["individual.id_number".to_string()],
            eventually_due: vec![],
        });
        assert!(!status.complete);
        assert_eq!(status.currently_due, vec!["individual.id_number"]);
        assert!(status.eventually_due.is_empty());
    }

    fn tags() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z_.]{1,24}", 0..6)
    }

    proptest! {
        #[test]
        fn complete_iff_both_lists_empty(currently in tags(), eventually in tags()) {
            let status = CompletionStatus::from_requirements(&Requirements {
                currently_due: currently.clone(),
                eventually_due: eventually.clone(),
            });
            prop_assert_eq!(status.complete, currently.is_empty() && eventually.is_empty());
        }

        #[test]
        fn tags_are_copied_verbatim(currently in tags(), eventually in tags()) {
            let status = CompletionStatus::from_requirements(&Requirements {
                currently_due: currently.clone(),
                eventually_due: eventually.clone(),
            });
            prop_assert_eq!(status.currently_due, currently);
            prop_assert_eq!(status.eventually_due, eventually);
        }
    }
}
