//! Логистическая регрессия с L1/L2 регуляризацией

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Вид штрафа на веса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Penalty {
    L1,
    L2,
}

impl std::fmt::Display for Penalty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Penalty::L1 => write!(f, "l1"),
            Penalty::L2 => write!(f, "l2"),
        }
    }
}

/// Бинарный классификатор, обучаемый проксимальным градиентным спуском.
///
/// Один решатель обслуживает оба штрафа: L2 входит в градиент,
/// L1 применяется soft-threshold-шагом после обновления весов.
/// Целевая функция: средний log-loss + R(w) / (C * n), свободный член
/// не штрафуется. Инициализация нулевая, обучение детерминировано.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    penalty: Penalty,
    max_iter: usize,
    tol: f64,
    learning_rate: f64,
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    is_fitted: bool,
}

impl LogisticRegression {
    pub fn new(c: f64, penalty: Penalty) -> Self {
        Self {
            c,
            penalty,
            max_iter: 500,
            tol: 1e-6,
            learning_rate: 0.1,
            coefficients: None,
            intercept: None,
            is_fitted: false,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn penalty(&self) -> Penalty {
        self.penalty
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    pub fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = X.nrows();
        let n_features = X.ncols();
        if n_samples == 0 || n_features == 0 {
            return Err(Error::EmptyDataset);
        }
        if n_samples != y.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} targets", n_samples),
                actual: format!("{} targets", y.len()),
            });
        }
        if self.c <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "C must be positive, got {}",
                self.c
            )));
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;
        let lr = self.learning_rate;
        let lambda = 1.0 / (self.c * n_samples as f64);

        for _iter in 0..self.max_iter {
            let linear = X.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);
            let errors = &predictions - y;

            let mut dw = X.t().dot(&errors) / n_samples as f64;
            let db = errors.mean().unwrap_or(0.0);
            if self.penalty == Penalty::L2 {
                dw = dw + &weights * lambda;
            }

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - &dw * lr;
            bias -= lr * db;

            // Проксимальный шаг для L1
            if self.penalty == Penalty::L1 {
                let threshold = lr * lambda;
                weights.mapv_inplace(|w| {
                    if w > threshold {
                        w - threshold
                    } else if w < -threshold {
                        w + threshold
                    } else {
                        0.0
                    }
                });
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.is_fitted = true;
        Ok(())
    }

    /// Вероятности класса 1
    pub fn predict_proba(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.coefficients.as_ref().ok_or(Error::NotFitted)?;
        if X.ncols() != weights.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} features", weights.len()),
                actual: format!("{} features", X.ncols()),
            });
        }
        let linear = X.dot(weights) + self.intercept.unwrap_or(0.0);
        Ok(Self::sigmoid(&linear))
    }

    /// Жесткие метки по порогу 0.5
    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(X)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    pub fn coefficients(&self) -> Result<&Array1<f64>> {
        self.coefficients.as_ref().ok_or(Error::NotFitted)
    }

    pub fn intercept(&self) -> Result<f64> {
        self.intercept.ok_or(Error::NotFitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable_data() -> (Array2<f64>, Array1<f64>) {
        let X = array![
            [-1.2], [-1.0], [-0.9], [-1.1], [-0.8], [-1.3],
            [0.8], [1.0], [1.1], [0.9], [1.2], [1.3],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        (X, y)
    }

    #[test]
    fn fits_separable_data() {
        let (X, y) = separable_data();
        let mut model = LogisticRegression::new(1.0, Penalty::L2);
        model.fit(&X, &y).unwrap();

        let predictions = model.predict(&X).unwrap();
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| (*p - *t).abs() < 0.5)
            .count();
        assert_eq!(correct, 12);
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let (X, y) = separable_data();
        let mut model = LogisticRegression::new(10.0, Penalty::L1);
        model.fit(&X, &y).unwrap();

        for p in model.predict_proba(&X).unwrap() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn strong_l1_penalty_zeroes_weights() {
        let (X, y) = separable_data();
        let mut model = LogisticRegression::new(0.001, Penalty::L1);
        model.fit(&X, &y).unwrap();

        for w in model.coefficients().unwrap() {
            assert!(w.abs() < 1e-9);
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let (X, y) = separable_data();
        let mut first = LogisticRegression::new(1.0, Penalty::L2);
        let mut second = LogisticRegression::new(1.0, Penalty::L2);
        first.fit(&X, &y).unwrap();
        second.fit(&X, &y).unwrap();

        assert_eq!(
            first.coefficients().unwrap(),
            second.coefficients().unwrap()
        );
        assert_eq!(first.intercept().unwrap(), second.intercept().unwrap());
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = LogisticRegression::new(1.0, Penalty::L2);
        let X = array![[0.0]];
        assert!(matches!(model.predict(&X), Err(Error::NotFitted)));
    }

    #[test]
    fn rejects_non_positive_c() {
        let (X, y) = separable_data();
        let mut model = LogisticRegression::new(0.0, Penalty::L2);
        assert!(matches!(
            model.fit(&X, &y),
            Err(Error::InvalidParameter(_))
        ));
    }
}
