//! Risk predictor seam.
//!
//! The predictive models live outside this crate; the allocator consumes
//! them through the [`RiskPredictor`] trait. The contract is that
//! predictors never fail: when a model is unavailable or errors, the
//! implementation reports the documented fallback values (0.5 probability,
//! 72 h stay) instead of propagating an error, so the pipeline always has
//! a usable number.
//!
//! Prediction for different requests is independent of allocation
//! decisions and may run ahead or in parallel; the batch driver still
//! consumes results strictly in priority order before booking.

use std::collections::HashMap;

use crate::duration::DEFAULT_STAY_HOURS;

/// Feature vector for one request, keyed by column name.
pub type Features = HashMap<String, f64>;

/// Which downstream model a feature projection feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictorTask {
    /// Probability-of-need classifier.
    Need,
    /// Stay-length regressor.
    Duration,
}

/// Which trained model variant to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictorVariant {
    /// Model trained on the first site's data.
    ClientA,
    /// Model trained on the second site's data.
    ClientB,
    /// Averaged ensemble over both site models.
    #[default]
    Ensemble,
}

/// Fallback probability when the need model is unavailable.
pub const FALLBACK_NEED_PROBABILITY: f64 = 0.5;

/// External predictor contract consumed by the batch driver.
///
/// Implementations must not fail: report a fallback value instead.
pub trait RiskPredictor {
    /// Probability in [0, 1] that the request needs a resource.
    fn predict_need(&self, features: &Features) -> f64;

    /// Predicted occupancy duration in hours (non-negative).
    fn predict_duration(&self, features: &Features) -> f64;
}

/// Admission decision for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Probability below threshold: no resource requested, the duration
    /// predictor is never invoked.
    NotRequired { probability: f64 },
    /// Probability at or above threshold, with the predicted stay length.
    Required {
        probability: f64,
        duration_hours: f64,
    },
}

impl Admission {
    /// The need probability behind this decision.
    pub fn probability(&self) -> f64 {
        match self {
            Admission::NotRequired { probability } => *probability,
            Admission::Required { probability, .. } => *probability,
        }
    }

    /// Whether a resource was requested.
    pub fn is_required(&self) -> bool {
        matches!(self, Admission::Required { .. })
    }
}

/// Gates the duration predictor behind the admission threshold.
///
/// Only requests whose need probability reaches `threshold` ever invoke
/// `predict_duration`.
pub fn admit<P: RiskPredictor + ?Sized>(
    predictor: &P,
    need_features: &Features,
    duration_features: &Features,
    threshold: f64,
) -> Admission {
    let probability = predictor.predict_need(need_features);
    if probability < threshold {
        return Admission::NotRequired { probability };
    }
    let duration_hours = predictor.predict_duration(duration_features).max(0.0);
    Admission::Required {
        probability,
        duration_hours,
    }
}

/// Degraded-mode predictor: always reports the documented fallbacks.
///
/// Stands in when no trained model is wired up, and doubles as the
/// reference for what a real implementation must report on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPredictor;

impl RiskPredictor for FallbackPredictor {
    fn predict_need(&self, _features: &Features) -> f64 {
        FALLBACK_NEED_PROBABILITY
    }

    fn predict_duration(&self, _features: &Features) -> f64 {
        DEFAULT_STAY_HOURS
    }
}

/// Routes predictions to one of two site-trained models, or averages them.
///
/// Each deployment site contributes its own trained model; the
/// [`PredictorVariant::Ensemble`] setting reports the mean of the two
/// outputs. The never-fail contract holds as long as both inner models
/// honor it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantPredictor<A, B> {
    client_a: A,
    client_b: B,
    variant: PredictorVariant,
}

impl<A: RiskPredictor, B: RiskPredictor> VariantPredictor<A, B> {
    /// Creates a predictor routing to the given variant.
    pub fn new(client_a: A, client_b: B, variant: PredictorVariant) -> Self {
        Self {
            client_a,
            client_b,
            variant,
        }
    }

    /// The active variant.
    pub fn variant(&self) -> PredictorVariant {
        self.variant
    }
}

impl<A: RiskPredictor, B: RiskPredictor> RiskPredictor for VariantPredictor<A, B> {
    fn predict_need(&self, features: &Features) -> f64 {
        match self.variant {
            PredictorVariant::ClientA => self.client_a.predict_need(features),
            PredictorVariant::ClientB => self.client_b.predict_need(features),
            PredictorVariant::Ensemble => {
                (self.client_a.predict_need(features) + self.client_b.predict_need(features)) / 2.0
            }
        }
    }

    fn predict_duration(&self, features: &Features) -> f64 {
        match self.variant {
            PredictorVariant::ClientA => self.client_a.predict_duration(features),
            PredictorVariant::ClientB => self.client_b.predict_duration(features),
            PredictorVariant::Ensemble => {
                (self.client_a.predict_duration(features)
                    + self.client_b.predict_duration(features))
                    / 2.0
            }
        }
    }
}
