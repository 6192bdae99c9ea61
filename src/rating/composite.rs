//! Composite CAMELS rating
//!
//! The composite is the mean of the pillars that produced a rating, either
//! equally weighted or weighted by [`PillarWeights`] renormalised over the
//! rated pillars. Management is never rated, so its weight never enters the
//! denominator. The mean is rounded half-to-even: 2.5 becomes 2, 3.5 becomes 4.

use serde::Serialize;

use super::pillar::{DetailedRatings, PillarRating, RatingStatus};
use super::scheme::{PillarWeights, RatingScheme, Weighting};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeRating {
    pub composite_rating: Option<u8>,
    pub status: RatingStatus,
    /// Unrounded (weighted) mean of the rated pillars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

impl CompositeRating {
    pub fn insufficient() -> Self {
        Self {
            composite_rating: None,
            status: RatingStatus::InsufficientData,
            average: None,
        }
    }
}

/// Composite over the detailed pillar ratings, per the scheme's weighting
pub fn composite(ratings: &DetailedRatings, scheme: &RatingScheme) -> CompositeRating {
    composite_of(ratings.iter(), scheme.weighting, &scheme.weights)
}

/// Composite over any set of pillar ratings
///
/// Weighted composites fall back to the equal mean when the rated pillars'
/// weights are unusable (negative, non-finite, or summing to zero), so the
/// composite is undefined only when no pillar was rated.
pub fn composite_of<'a, I>(pillars: I, weighting: Weighting, weights: &PillarWeights) -> CompositeRating
where
    I: IntoIterator<Item = &'a PillarRating>,
{
    let rated: Vec<(f64, f64)> = pillars
        .into_iter()
        .filter_map(|p| p.rating.map(|r| (weights.weight(p.pillar), f64::from(r))))
        .collect();
    if rated.is_empty() {
        return CompositeRating::insufficient();
    }

    let weighted = match weighting {
        Weighting::Equal => None,
        Weighting::Weighted => weighted_mean(&rated),
    };
    let average = weighted.unwrap_or_else(|| {
        rated.iter().map(|(_, r)| r).sum::<f64>() / rated.len() as f64
    });

    let rounded = round_half_even(average).clamp(1.0, 5.0) as u8;
    CompositeRating {
        composite_rating: Some(rounded),
        status: RatingStatus::from_rating(rounded),
        average: Some(average),
    }
}

fn weighted_mean(rated: &[(f64, f64)]) -> Option<f64> {
    if rated.iter().any(|(w, _)| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let total_weight: f64 = rated.iter().map(|(w, _)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let average = rated.iter().map(|(w, r)| w * r).sum::<f64>() / total_weight;
    average.is_finite().then_some(average)
}

fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::scheme::Pillar;

    fn rated(pillar: Pillar, rating: Option<u8>) -> PillarRating {
        match rating {
            Some(r) => PillarRating {
                pillar,
                rating: Some(r),
                status: RatingStatus::from_rating(r),
                metric: "metric",
                value: Some(0.0),
                benchmark: None,
            },
            None => PillarRating::insufficient(pillar, "metric"),
        }
    }

    fn four(c: Option<u8>, a: Option<u8>, e: Option<u8>, l: Option<u8>) -> Vec<PillarRating> {
        vec![
            rated(Pillar::Capital, c),
            rated(Pillar::AssetQuality, a),
            rated(Pillar::Earnings, e),
            rated(Pillar::Liquidity, l),
        ]
    }

    #[test]
    fn test_equal_weighting_skips_missing() {
        let pillars = four(Some(2), Some(3), Some(4), None);
        let result = composite_of(&pillars, Weighting::Equal, &PillarWeights::default());

        assert_eq!(result.composite_rating, Some(3));
        assert_eq!(result.status, RatingStatus::Fair);
        assert_eq!(result.average, Some(3.0));
    }

    #[test]
    fn test_no_ratings_is_insufficient() {
        let pillars = four(None, None, None, None);
        let result = composite_of(&pillars, Weighting::Weighted, &PillarWeights::default());

        assert_eq!(result, CompositeRating::insufficient());
        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json, serde_json::json!({"composite_rating": null, "status": "Insufficient data"}));
    }

    #[test]
    fn test_ties_round_to_even() {
        let weights = PillarWeights::default();

        let low = composite_of(&four(Some(2), Some(3), None, None), Weighting::Equal, &weights);
        assert_eq!(low.average, Some(2.5));
        assert_eq!(low.composite_rating, Some(2));

        let high = composite_of(&four(Some(3), Some(4), None, None), Weighting::Equal, &weights);
        assert_eq!(high.average, Some(3.5));
        assert_eq!(high.composite_rating, Some(4));
    }

    #[test]
    fn test_weighted_renormalises_over_rated_pillars() {
        let weights = PillarWeights::default();
        let pillars = four(Some(5), Some(5), Some(1), Some(2));

        // Equal: 13 / 4 = 3.25
        let equal = composite_of(&pillars, Weighting::Equal, &weights);
        assert_eq!(equal.composite_rating, Some(3));

        // Weighted: (1.25 + 1.25 + 0.20 + 0.30) / 0.85 = 3.53
        let weighted = composite_of(&pillars, Weighting::Weighted, &weights);
        assert!((weighted.average.unwrap() - 3.0 / 0.85).abs() < 1e-9);
        assert_eq!(weighted.composite_rating, Some(4));
        assert_eq!(weighted.status, RatingStatus::Marginal);
    }

    #[test]
    fn test_weighted_single_pillar() {
        let pillars = four(None, None, Some(2), None);
        let result = composite_of(&pillars, Weighting::Weighted, &PillarWeights::default());
        assert_eq!(result.composite_rating, Some(2));
    }

    #[test]
    fn test_management_weight_is_ignored() {
        let heavy_management = PillarWeights {
            management: 100.0,
            ..Default::default()
        };
        let pillars = four(Some(1), Some(1), Some(1), Some(1));
        let result = composite_of(&pillars, Weighting::Weighted, &heavy_management);
        assert_eq!(result.composite_rating, Some(1));
        assert_eq!(result.status, RatingStatus::Strong);
    }

    #[test]
    fn test_zero_weight_sole_pillar_falls_back_to_equal() {
        let weights = PillarWeights {
            capital: 0.0,
            ..Default::default()
        };
        let result = composite_of(&four(Some(2), None, None, None), Weighting::Weighted, &weights);

        assert_eq!(result.composite_rating, Some(2));
        assert_eq!(result.status, RatingStatus::Satisfactory);
        assert_eq!(result.average, Some(2.0));
    }

    #[test]
    fn test_non_finite_weight_stays_in_range() {
        let weights = PillarWeights {
            earnings: f64::NAN,
            ..Default::default()
        };
        let result = composite_of(&four(Some(2), Some(3), Some(4), None), Weighting::Weighted, &weights);

        // Unusable weights: equal mean of 2, 3, 4
        assert_eq!(result.composite_rating, Some(3));
        assert_eq!(result.status, RatingStatus::Fair);
        assert_eq!(result.average, Some(3.0));

        let infinite = PillarWeights {
            capital: f64::INFINITY,
            ..Default::default()
        };
        let result = composite_of(&four(Some(1), Some(5), None, None), Weighting::Weighted, &infinite);
        assert_eq!(result.composite_rating, Some(3));
    }
}
