use std::collections::BTreeMap;

use heurtris_evaluator::{board_feature::BoardFeature, weights::Weights};
use serde::Serialize;

/// Trained weight vector keyed by feature id, as printed in training reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightsModel {
    pub algorithm: &'static str,
    pub fitness: f64,
    pub weights: BTreeMap<&'static str, f64>,
    /// The same coefficients in weight-vector order, ready for `play --weights`.
    pub weights_arg: String,
}

impl WeightsModel {
    pub fn new(algorithm: &'static str, fitness: f64, weights: &Weights) -> Self {
        Self {
            algorithm,
            fitness,
            weights: BoardFeature::ALL
                .iter()
                .map(|&feature| (feature.id(), weights[feature]))
                .collect(),
            weights_arg: weights
                .as_array()
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_is_keyed_by_feature_id() {
        let weights = Weights::new([0.5, -0.25, -0.125, -1.0, -0.0625]);
        let model = WeightsModel::new("genetic", 12.5, &weights);
        assert_eq!(model.weights.len(), BoardFeature::LEN);
        assert_eq!(model.weights["complete_lines"], 0.5);
        assert_eq!(model.weights["well_sum"], -0.0625);
        assert_eq!(model.weights_arg.parse::<Weights>().unwrap(), weights);
    }
}
