//! Стратифицированное разбиение train/test

#![allow(non_snake_case)]

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};

/// Результат разбиения: четыре массива плюс индексы строк исходной таблицы
pub struct TrainTestSplit {
    pub X_train: Array2<f64>,
    pub X_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

pub struct StratifiedSplitter {
    test_ratio: f64,
    seed: u64,
}

impl StratifiedSplitter {
    pub fn new(test_ratio: f64, seed: u64) -> Self {
        Self { test_ratio, seed }
    }

    /// Делит индексы на train/test с сохранением пропорций классов.
    ///
    /// Размер теста всегда равен round(test_ratio * n): квоты классов
    /// считаются через floor, остаток раздается классам с наибольшей
    /// дробной частью. Один и тот же seed дает одно и то же разбиение.
    pub fn split_indices(&self, y: &Array1<f64>) -> Result<(Vec<usize>, Vec<usize>)> {
        let n = y.len();
        if n == 0 {
            return Err(Error::EmptyDataset);
        }
        if !(0.0..1.0).contains(&self.test_ratio) {
            return Err(Error::InvalidParameter(format!(
                "test_ratio must be in [0, 1), got {}",
                self.test_ratio
            )));
        }

        // Группировка индексов по классам (метки по возрастанию)
        let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, &value) in y.iter().enumerate() {
            class_indices.entry(value.round() as i64).or_default().push(idx);
        }

        let n_test_total = (self.test_ratio * n as f64).round() as usize;

        // Квоты: floor плюс наибольшие остатки
        let mut quotas: BTreeMap<i64, usize> = BTreeMap::new();
        let mut remainders: Vec<(f64, usize, i64)> = Vec::new();
        let mut assigned = 0usize;
        for (&label, indices) in &class_indices {
            let exact = self.test_ratio * indices.len() as f64;
            let base = exact.floor() as usize;
            quotas.insert(label, base);
            assigned += base;
            remainders.push((exact - base as f64, indices.len(), label));
        }
        remainders.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.cmp(&a.1))
                .then(a.2.cmp(&b.2))
        });
        for &(_, _, label) in remainders.iter().take(n_test_total.saturating_sub(assigned)) {
            if let Some(quota) = quotas.get_mut(&label) {
                *quota += 1;
            }
        }

        // Перемешивание внутри классов одним потоком ГПСЧ
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut train_indices = Vec::with_capacity(n - n_test_total);
        let mut test_indices = Vec::with_capacity(n_test_total);
        for (label, indices) in class_indices.iter_mut() {
            indices.shuffle(&mut rng);
            let quota = quotas[label].min(indices.len());
            test_indices.extend_from_slice(&indices[..quota]);
            train_indices.extend_from_slice(&indices[quota..]);
        }

        train_indices.sort_unstable();
        test_indices.sort_unstable();
        Ok((train_indices, test_indices))
    }

    pub fn split(&self, X: &Array2<f64>, y: &Array1<f64>) -> Result<TrainTestSplit> {
        if X.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} rows", X.nrows()),
                actual: format!("{} targets", y.len()),
            });
        }

        let (train_indices, test_indices) = self.split_indices(y)?;
        Ok(TrainTestSplit {
            X_train: X.select(Axis(0), &train_indices),
            X_test: X.select(Axis(0), &test_indices),
            y_train: y.select(Axis(0), &train_indices),
            y_test: y.select(Axis(0), &test_indices),
            train_indices,
            test_indices,
        })
    }
}
