//! Логарифмическая нормализация признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};

/// Поэлементное ln(1 + x).
///
/// Определено в нуле и сжимает правый хвост счетных признаков.
/// Преобразование без параметров: train и test обрабатываются
/// независимо и одинаково.
pub fn log1p_features(X: &Array2<f64>) -> Array2<f64> {
    X.mapv(f64::ln_1p)
}

/// Дисперсия по каждому признаку (диагностика, данных не меняет)
pub fn feature_variances(X: &Array2<f64>) -> Array1<f64> {
    X.var_axis(Axis(0), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn log1p_is_defined_at_zero() {
        let X = array![[0.0, 1.0], [2.0, 3.0]];
        let transformed = log1p_features(&X);

        assert_eq!(transformed[[0, 0]], 0.0);
        assert!((transformed[[0, 1]] - 2.0f64.ln()).abs() < 1e-12);
        assert_eq!(transformed.shape(), X.shape());
    }

    #[test]
    fn log1p_round_trips_through_exp() {
        let X = array![[0.0, 0.5, 12500.0], [98.0, 1.0, 250.0]];
        let transformed = log1p_features(&X);

        for (orig, log) in X.iter().zip(transformed.iter()) {
            let back = log.exp() - 1.0;
            assert!((back - orig).abs() < 1e-9 * orig.abs().max(1.0));
        }
    }

    #[test]
    fn variance_shrinks_for_skewed_features() {
        let X = array![[250.0], [500.0], [12500.0], [250.0]];
        let raw = feature_variances(&X);
        let transformed = feature_variances(&log1p_features(&X));

        assert!(transformed[0] < raw[0]);
    }
}
