//! Confidence scoring for verification events
//!
//! Combines four independent quality signals into a single 0-100 score with
//! fixed weights. The weights are constants on purpose: regulators and
//! verifiers must be able to recompute any submitted score from its public
//! inputs, so the formula carries no tunable or hidden state.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Weight of each factor, in hundredths. The four weights sum to 100.
pub const DATA_QUALITY_WEIGHT: u32 = 30;
pub const METHODOLOGY_WEIGHT: u32 = 25;
pub const VERIFIER_EXPERIENCE_WEIGHT: u32 = 20;
pub const AI_ANALYSIS_WEIGHT: u32 = 25;

/// Independent quality signals, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub data_quality: u8,
    pub methodology_standard: u8,
    pub verifier_experience: u8,
    pub ai_analysis_score: u8,
}

/// Compute the weighted confidence score, rounded half-up to the nearest
/// integer. Pure integer arithmetic, so the result is exactly reproducible
/// from the inputs.
pub fn compute_confidence_score(factors: &ScoreFactors) -> Result<u8> {
    for (name, value) in [
        ("data_quality", factors.data_quality),
        ("methodology_standard", factors.methodology_standard),
        ("verifier_experience", factors.verifier_experience),
        ("ai_analysis_score", factors.ai_analysis_score),
    ] {
        if value > 100 {
            return Err(RegistryError::InvalidInput(format!(
                "{name} must be within 0-100, got {value}"
            )));
        }
    }

    let weighted = u32::from(factors.data_quality) * DATA_QUALITY_WEIGHT
        + u32::from(factors.methodology_standard) * METHODOLOGY_WEIGHT
        + u32::from(factors.verifier_experience) * VERIFIER_EXPERIENCE_WEIGHT
        + u32::from(factors.ai_analysis_score) * AI_ANALYSIS_WEIGHT;

    // round half-up at the hundredths boundary
    Ok(((weighted + 50) / 100) as u8)
}
