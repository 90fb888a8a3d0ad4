//! Композиция стандартизации и классификатора

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::models::logistic::{LogisticRegression, Penalty};
use crate::preprocessing::StandardScaler;

/// Двухступенчатая модель: StandardScaler + LogisticRegression.
///
/// Статистики масштабирования берутся только из строк, переданных
/// в `fit`; `predict`/`predict_proba` применяют их к новым данным.
/// После подбора гиперпараметров экземпляр не изменяется.
pub struct ScaledLogistic {
    scaler: StandardScaler,
    model: LogisticRegression,
}

impl ScaledLogistic {
    pub fn new(c: f64, penalty: Penalty) -> Self {
        Self {
            scaler: StandardScaler::new(),
            model: LogisticRegression::new(c, penalty),
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let X_scaled = self.scaler.fit_transform(X)?;
        self.model.fit(&X_scaled, y)
    }

    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        self.model.predict(&self.scaler.transform(X)?)
    }

    pub fn predict_proba(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        self.model.predict_proba(&self.scaler.transform(X)?)
    }

    /// Коэффициенты классификатора в пространстве стандартизованных признаков
    pub fn coefficients(&self) -> Result<&Array1<f64>> {
        self.model.coefficients()
    }

    pub fn intercept(&self) -> Result<f64> {
        self.model.intercept()
    }

    pub fn c(&self) -> f64 {
        self.model.c()
    }

    pub fn penalty(&self) -> Penalty {
        self.model.penalty()
    }
}
