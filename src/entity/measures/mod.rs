//! Risk-mitigation measures.
//!
//! A [`Measure`] describes one adaptation action: its cost and how it
//! modifies hazard intensity and the impact-function terms (MDD: mean damage
//! degree, PAA: percentage of affected assets). Each modifier is an `(a, b)`
//! pair applied as `a * x + b`.
//!
//! [`Measures`] keeps measures in insertion order, keyed by name.

pub mod source;

use serde::{Deserialize, Serialize};

use crate::entity::tag::Tag;
use crate::risk_error::RiskError;

/// One risk-mitigation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,
    pub color_rgb: [f64; 3],
    pub cost: f64,
    pub hazard_freq_cutoff: f64,
    pub hazard_event_set: String,
    pub hazard_intensity: (f64, f64),
    pub mdd_impact: (f64, f64),
    pub paa_impact: (f64, f64),
    pub risk_transf_attach: f64,
    pub risk_transf_cover: f64,
}

impl Default for Measure {
    fn default() -> Self {
        Self {
            name: String::new(),
            color_rgb: [0.0; 3],
            cost: 0.0,
            hazard_freq_cutoff: 0.0,
            hazard_event_set: String::new(),
            hazard_intensity: (1.0, 0.0),
            mdd_impact: (1.0, 0.0),
            paa_impact: (1.0, 0.0),
            risk_transf_attach: 0.0,
            risk_transf_cover: 0.0,
        }
    }
}

impl Measure {
    /// Measure with the given name and neutral effects.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn check(&self) -> Result<(), RiskError> {
        if self.name.is_empty() {
            return Err(RiskError::MalformedContent("measure without name".into()));
        }
        let scalars = [
            self.cost,
            self.hazard_freq_cutoff,
            self.hazard_intensity.0,
            self.hazard_intensity.1,
            self.mdd_impact.0,
            self.mdd_impact.1,
            self.paa_impact.0,
            self.paa_impact.1,
            self.risk_transf_attach,
            self.risk_transf_cover,
        ];
        if scalars.iter().any(|v| !v.is_finite()) {
            return Err(RiskError::MalformedContent(format!(
                "measure `{}` has non-finite values",
                self.name
            )));
        }
        Ok(())
    }
}

/// Named collection of measures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measures {
    pub tag: Tag,
    data: Vec<Measure>,
}

impl Measures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `meas`, replacing any measure with the same name.
    pub fn add_measure(&mut self, meas: Measure) {
        match self.data.iter_mut().find(|m| m.name == meas.name) {
            Some(existing) => {
                log::warn!("Existing measure `{}` is overwritten.", meas.name);
                *existing = meas;
            }
            None => self.data.push(meas),
        }
    }

    /// Measure named `name`.
    pub fn get_action(&self, name: &str) -> Option<&Measure> {
        self.data.iter().find(|m| m.name == name)
    }

    /// All measures in insertion order.
    pub fn actions(&self) -> impl Iterator<Item = &Measure> + '_ {
        self.data.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.data.iter().map(|m| m.name.as_str()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Validates every measure.
    pub fn check(&self) -> Result<(), RiskError> {
        self.data.iter().try_for_each(Measure::check)
    }

    /// Union by name; measures of `other` win on name clashes.
    pub fn append(&mut self, other: &Measures) {
        self.tag.append(&other.tag);
        for meas in &other.data {
            self.add_measure(meas.clone());
        }
    }
}
