//! Onboarding/profile payloads built from picker projections.
//!
//! Expertise is stored as a plain array of skill ids. Location is stored as
//! three separate columns.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::application::services::picker::{use_expertise, use_location};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainResult, KeyFlat, KeyGroup, Scope};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertiseRecord {
    /// Selected domains, in projection order
    pub domains: Vec<String>,
    /// Selected skills across all domains, de-duplicated
    pub skills: Vec<String>,
}

impl ExpertiseRecord {
    pub fn from_groups(groups: &[KeyGroup]) -> Self {
        Self {
            domains: groups.iter().map(|g| g.root.clone()).collect(),
            skills: groups
                .iter()
                .flat_map(|g| g.leaves.iter().cloned())
                .unique()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub country: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
}

impl LocationRecord {
    /// First selected country, then the first state under it, then the
    /// first LGA under that state.
    pub fn from_flat(flat: &KeyFlat) -> Self {
        let country = flat.roots.first().cloned();
        let state = country.as_ref().and_then(|c| {
            flat.branches
                .iter()
                .find(|(r, _)| r == c)
                .map(|(_, s)| s.clone())
        });
        let lga = match (&country, &state) {
            (Some(c), Some(s)) => flat
                .leaves
                .iter()
                .find(|(r, b, _)| r == c && b == s)
                .map(|(_, _, l)| l.clone()),
            _ => None,
        };
        Self {
            country,
            state,
            lga,
        }
    }
}

/// Payload an onboarding form would persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingSubmission {
    pub expertise: ExpertiseRecord,
    pub location: LocationRecord,
    pub submitted_at: DateTime<Utc>,
}

impl OnboardingSubmission {
    /// Read both pickers' selections from `scope`.
    ///
    /// Fails when either picker is not mounted above `scope`.
    pub fn from_scope(scope: &Scope) -> DomainResult<Self> {
        let expertise = use_expertise(scope)?;
        let location = use_location(scope)?;
        Ok(Self {
            expertise: ExpertiseRecord::from_groups(&expertise.selected()),
            location: LocationRecord::from_flat(&location.selected_flat()),
            submitted_at: Utc::now(),
        })
    }

    pub fn to_json(&self) -> ApplicationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize onboarding submission".to_string(),
            source: Box::new(e),
        })
    }
}
