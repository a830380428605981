//! Selection Controller
//!
//! The three independent choices a user makes (state, age group, procedure)
//! and the fixed option sets they are drawn from. A change to any member of
//! the triple re-runs the whole dashboard render.

use serde::{Deserialize, Serialize};

/// US state codes with a dataset, in display order
pub const STATES: [&str; 51] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL",
    "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE",
    "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VA", "VT", "WA", "WI", "WV", "WY",
];

/// Coarse age bands
pub const AGE_GROUPS: [&str; 5] = ["40-49", "50-64", "65+", "18-29", "30-39"];

/// The procedure value that marks pandemic rows
pub const COVID: &str = "COVID";

/// Elective procedure types; COVID is selectable alongside them
pub const ELECTIVES: [&str; 11] = [
    "CYSTOSCOPY",
    "CATARACT",
    "KNEE REPLACEMENT",
    "MASTECTOMY",
    "CHOLECYSTECTOMY",
    "HYSTEROSCOPY",
    "HIP REPLACEMENT",
    "PROSTATECTOMY",
    "CABG",
    "COSMETIC RECONSTRUCTION",
    COVID,
];

/// The current (state, age group, elective) triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub state: String,
    pub age_group: String,
    pub elective: String,
}

impl Default for Selection {
    /// First entry of each option set
    fn default() -> Self {
        Self {
            state: STATES[0].to_string(),
            age_group: AGE_GROUPS[0].to_string(),
            elective: ELECTIVES[0].to_string(),
        }
    }
}

impl Selection {
    pub fn new(
        state: impl Into<String>,
        age_group: impl Into<String>,
        elective: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            age_group: age_group.into(),
            elective: elective.into(),
        }
    }

    /// Builder method: change the state
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Builder method: change the age group
    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = age_group.into();
        self
    }

    /// Builder method: change the elective
    pub fn with_elective(mut self, elective: impl Into<String>) -> Self {
        self.elective = elective.into();
        self
    }

    /// Whether every member comes from the fixed option sets
    ///
    /// Informational only; loading does not reject codes outside the set.
    pub fn is_offered(&self) -> bool {
        STATES.contains(&self.state.as_str())
            && AGE_GROUPS.contains(&self.age_group.as_str())
            && ELECTIVES.contains(&self.elective.as_str())
    }

    /// Selecting COVID as the elective makes both views identical
    pub fn is_covid(&self) -> bool {
        self.elective == COVID
    }
}

/// The option sets offered by the three choosers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionOptions {
    pub states: Vec<String>,
    pub age_groups: Vec<String>,
    pub electives: Vec<String>,
}

impl SelectionOptions {
    pub fn standard() -> Self {
        Self {
            states: STATES.iter().map(|s| s.to_string()).collect(),
            age_groups: AGE_GROUPS.iter().map(|s| s.to_string()).collect(),
            electives: ELECTIVES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
