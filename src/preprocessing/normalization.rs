//! Стандартизация признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};

use crate::error::{Error, Result};

/// Вычитает среднее и делит на стандартное отклонение по каждому признаку.
/// Статистики берутся только из данных, переданных в `fit`.
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }

        let mean = X.mean_axis(Axis(0)).ok_or(Error::EmptyDataset)?;
        let mut std = X.std_axis(Axis(0), 0.0);

        // Избегаем деления на ноль на константных признаках
        for value in std.iter_mut() {
            if *value < 1e-10 {
                *value = 1.0;
            }
        }

        self.mean = Some(mean);
        self.std = Some(std);
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(Error::NotFitted);
        }

        let mean = self.mean.as_ref().ok_or(Error::NotFitted)?;
        let std = self.std.as_ref().ok_or(Error::NotFitted)?;
        if X.ncols() != mean.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} features", mean.len()),
                actual: format!("{} features", X.ncols()),
            });
        }

        let centered = X - &mean.clone().insert_axis(Axis(0));
        Ok(centered / &std.clone().insert_axis(Axis(0)))
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}
