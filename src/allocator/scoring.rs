//! Option fit scoring.
//!
//! A feasibility option is scored as the sum of three independent
//! sub-scores, each in [0, 1]:
//!
//! - **Resource-type fit**: position of the option's resource type in the
//!   risk category's ordered preference list — `1 - index/len`, 0 when the
//!   type is not listed.
//! - **Staff load fit**: `max(0, 1 - load/max_load)`.
//! - **Certification fit**: fraction of the category's required
//!   certifications the staff member holds. Only contributes when the
//!   option carries certification data.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::models::FeasibleOption;

/// Per-risk-category preferences driving the fit sub-scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitPolicy {
    /// Ordered resource-type preference per risk category (best first).
    pub type_preferences: HashMap<String, Vec<String>>,
    /// Preference order for categories not in `type_preferences`.
    pub default_preference: Vec<String>,
    /// Required certifications per risk category.
    pub required_certifications: HashMap<String, BTreeSet<String>>,
    /// Staff load ceiling for the load fit score.
    pub max_load: u32,
}

impl Default for FitPolicy {
    /// The reference ward policy: Critical prefers Negative Pressure, then
    /// Isolation, then General; Stable the reverse; Low takes General only.
    /// Critical and High require ICU certification.
    fn default() -> Self {
        let np = "Negative Pressure".to_string();
        let iso = "Isolation".to_string();
        let gen = "General".to_string();

        let mut type_preferences = HashMap::new();
        type_preferences.insert(
            "Critical".into(),
            vec![np.clone(), iso.clone(), gen.clone()],
        );
        type_preferences.insert("High".into(), vec![iso.clone(), np.clone(), gen.clone()]);
        type_preferences.insert(
            "Observation".into(),
            vec![iso.clone(), gen.clone(), np.clone()],
        );
        type_preferences.insert("Stable".into(), vec![gen.clone(), iso.clone(), np.clone()]);
        type_preferences.insert("Low".into(), vec![gen.clone()]);

        let mut required_certifications: HashMap<String, BTreeSet<String>> = HashMap::new();
        let icu: BTreeSet<String> = ["ICU-certified".to_string()].into();
        required_certifications.insert("Critical".into(), icu.clone());
        required_certifications.insert("High".into(), icu);

        Self {
            type_preferences,
            default_preference: vec![np, iso, gen],
            required_certifications,
            max_load: 6,
        }
    }
}

impl FitPolicy {
    /// Creates the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the load ceiling.
    pub fn with_max_load(mut self, max_load: u32) -> Self {
        self.max_load = max_load;
        self
    }

    /// Sets the preference order for one category.
    pub fn with_preference<S: Into<String>>(
        mut self,
        category: impl Into<String>,
        order: Vec<S>,
    ) -> Self {
        self.type_preferences
            .insert(category.into(), order.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the required certifications for one category.
    pub fn with_required_certifications<S: Into<String>>(
        mut self,
        category: impl Into<String>,
        certs: Vec<S>,
    ) -> Self {
        self.required_certifications
            .insert(category.into(), certs.into_iter().map(Into::into).collect());
        self
    }

    /// Resource-type fit: `1 - index/len` in the category's preference
    /// list, 0 when the type is not listed.
    pub fn resource_fit(&self, category: &str, resource_type: &str) -> f64 {
        let order = self
            .type_preferences
            .get(category)
            .unwrap_or(&self.default_preference);
        match order.iter().position(|t| t == resource_type) {
            Some(idx) => 1.0 - idx as f64 / order.len().max(1) as f64,
            None => 0.0,
        }
    }

    /// Staff load fit: `max(0, 1 - load/max_load)`.
    pub fn load_fit(&self, load: u32) -> f64 {
        if self.max_load == 0 {
            return 1.0;
        }
        (1.0 - load as f64 / self.max_load as f64).max(0.0)
    }

    /// Certification fit: fraction of the category's required set held.
    ///
    /// 1.0 when the category requires nothing.
    pub fn certification_fit(&self, category: &str, held: &BTreeSet<String>) -> f64 {
        let required = match self.required_certifications.get(category) {
            Some(req) if !req.is_empty() => req,
            _ => return 1.0,
        };
        let held_count = required.iter().filter(|c| held.contains(*c)).count();
        held_count as f64 / required.len() as f64
    }

    /// Total score for an option against a risk category.
    ///
    /// The certification term only contributes when the option carries
    /// certification data.
    pub fn score(&self, category: &str, option: &FeasibleOption) -> f64 {
        let mut total = self.resource_fit(category, &option.resource_type)
            + self.load_fit(option.staff_load);
        if let Some(certs) = &option.staff_certifications {
            total += self.certification_fit(category, certs);
        }
        total
    }
}
