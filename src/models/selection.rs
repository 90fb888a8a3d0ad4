//! Подбор гиперпараметров: решетка C x penalty под кросс-валидацией

#![allow(non_snake_case)]

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::evaluation::roc_auc;
use crate::models::logistic::Penalty;
use crate::models::pipeline::ScaledLogistic;

/// Стратифицированный K-fold: классы раздаются по фолдам по кругу,
/// перемешивание внутри класса управляется seed
pub struct StratifiedKFold {
    n_splits: usize,
    seed: u64,
}

pub struct Fold {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    pub fn split(&self, y: &Array1<f64>) -> Result<Vec<Fold>> {
        if self.n_splits < 2 {
            return Err(Error::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if y.len() < self.n_splits {
            return Err(Error::InvalidParameter(format!(
                "n_samples ({}) must be >= n_splits ({})",
                y.len(),
                self.n_splits
            )));
        }

        let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (idx, &value) in y.iter().enumerate() {
            class_indices.entry(value.round() as i64).or_default().push(idx);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        for indices in class_indices.values_mut() {
            indices.shuffle(&mut rng);
            for (i, &idx) in indices.iter().enumerate() {
                folds[i % self.n_splits].push(idx);
            }
        }

        let splits = (0..self.n_splits)
            .map(|fold_idx| {
                let test_indices = folds[fold_idx].clone();
                let train_indices = folds
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != fold_idx)
                    .flat_map(|(_, f)| f.iter().copied())
                    .collect();
                Fold {
                    train_indices,
                    test_indices,
                }
            })
            .collect();

        Ok(splits)
    }
}

/// Пространство поиска
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub c_values: Vec<f64>,
    pub penalties: Vec<Penalty>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            c_values: vec![0.001, 0.01, 0.1, 1.0, 10.0, 100.0],
            penalties: vec![Penalty::L1, Penalty::L2],
        }
    }
}

/// Оценка одной комбинации гиперпараметров
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub c: f64,
    pub penalty: Penalty,
    pub fold_scores: Vec<f64>, // только фолды с определенным AUC
    pub skipped_folds: usize,  // фолды с одним классом
    pub mean_score: f64,
}

pub struct GridSearchResult {
    pub best: CandidateScore,
    pub candidates: Vec<CandidateScore>,
    pub model: ScaledLogistic,
}

/// Полный перебор решетки; каждая комбинация оценивается средним
/// ROC AUC по стратифицированным фолдам
pub struct GridSearch {
    grid: ParamGrid,
    n_folds: usize,
    seed: u64,
}

impl GridSearch {
    pub fn new(grid: ParamGrid, n_folds: usize, seed: u64) -> Self {
        Self {
            grid,
            n_folds,
            seed,
        }
    }

    /// Перебирает комбинации (C внешним циклом, penalty внутренним),
    /// выбирает лучшую по среднему AUC и дообучает ее на всей выборке.
    ///
    /// Фолд с единственным классом дает неопределенный AUC и
    /// пропускается при усреднении; комбинация без единого валидного
    /// фолда отбрасывается. При равенстве средних выигрывает первая
    /// комбинация в порядке перебора (сравнение строго больше).
    pub fn fit(&self, X: &Array2<f64>, y: &Array1<f64>) -> Result<GridSearchResult> {
        if X.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} rows", X.nrows()),
                actual: format!("{} targets", y.len()),
            });
        }

        let folds = StratifiedKFold::new(self.n_folds, self.seed).split(y)?;

        let mut candidates: Vec<CandidateScore> = Vec::new();
        let mut best: Option<usize> = None;

        for &c in &self.grid.c_values {
            for &penalty in &self.grid.penalties {
                let mut fold_scores = Vec::with_capacity(folds.len());
                let mut skipped_folds = 0;

                for fold in &folds {
                    let X_fit = X.select(Axis(0), &fold.train_indices);
                    let y_fit = y.select(Axis(0), &fold.train_indices);
                    let X_val = X.select(Axis(0), &fold.test_indices);
                    let y_val = y.select(Axis(0), &fold.test_indices);

                    let mut candidate = ScaledLogistic::new(c, penalty);
                    candidate.fit(&X_fit, &y_fit)?;
                    let proba = candidate.predict_proba(&X_val)?;

                    match roc_auc(&y_val, &proba) {
                        Some(auc) => fold_scores.push(auc),
                        None => {
                            skipped_folds += 1;
                            tracing::debug!(
                                c,
                                %penalty,
                                "single-class fold, AUC undefined, fold skipped"
                            );
                        }
                    }
                }

                if fold_scores.is_empty() {
                    tracing::warn!(c, %penalty, "no scorable fold, candidate dropped");
                    continue;
                }

                let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
                tracing::debug!(c, %penalty, mean_score, "candidate scored");

                let is_better = best.map_or(true, |i| mean_score > candidates[i].mean_score);
                candidates.push(CandidateScore {
                    c,
                    penalty,
                    fold_scores,
                    skipped_folds,
                    mean_score,
                });
                if is_better {
                    best = Some(candidates.len() - 1);
                }
            }
        }

        let best_idx = best.ok_or(Error::NoViableCandidate)?;
        let best_score = candidates[best_idx].clone();
        tracing::info!(
            c = best_score.c,
            penalty = %best_score.penalty,
            mean_auc = best_score.mean_score,
            "grid search finished"
        );

        // Дообучение победителя на всей обучающей выборке
        let mut model = ScaledLogistic::new(best_score.c, best_score.penalty);
        model.fit(X, y)?;

        Ok(GridSearchResult {
            best: best_score,
            candidates,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::Rng;

    fn noisy_classification(n: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut X = Array2::zeros((n, 2));
        let mut y = Array1::zeros(n);
        for i in 0..n {
            let label = (i % 2) as f64;
            X[[i, 0]] = label * 2.0 + rng.gen_range(-1.0..1.0);
            X[[i, 1]] = rng.gen_range(-1.0..1.0);
            y[i] = label;
        }
        (X, y)
    }

    #[test]
    fn stratified_folds_cover_every_index_once() {
        let (_, y) = noisy_classification(100, 1);
        let folds = StratifiedKFold::new(5, 42).split(&y).unwrap();

        assert_eq!(folds.len(), 5);
        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test_indices.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        for fold in &folds {
            assert_eq!(fold.train_indices.len() + fold.test_indices.len(), 100);
        }
    }

    #[test]
    fn folds_keep_class_balance() {
        let (_, y) = noisy_classification(100, 1);
        let folds = StratifiedKFold::new(5, 42).split(&y).unwrap();

        for fold in &folds {
            let positives = fold.test_indices.iter().filter(|&&i| y[i] > 0.5).count();
            // 50/50 в исходных данных -> 10 из 20 в каждом фолде
            assert_eq!(positives, 10);
        }
    }

    #[test]
    fn best_candidate_stays_inside_grid() {
        let (X, y) = noisy_classification(60, 2);
        let grid = ParamGrid::default();
        let result = GridSearch::new(grid.clone(), 5, 42).fit(&X, &y).unwrap();

        assert!(grid.c_values.contains(&result.best.c));
        assert!(grid.penalties.contains(&result.best.penalty));
        assert_eq!(result.model.c(), result.best.c);
        assert_eq!(result.model.penalty(), result.best.penalty);
    }

    #[test]
    fn reported_score_matches_fold_mean() {
        let (X, y) = noisy_classification(60, 3);
        let result = GridSearch::new(ParamGrid::default(), 5, 42)
            .fit(&X, &y)
            .unwrap();

        for candidate in &result.candidates {
            let recomputed =
                candidate.fold_scores.iter().sum::<f64>() / candidate.fold_scores.len() as f64;
            assert!((candidate.mean_score - recomputed).abs() < 1e-12);
            assert!(candidate.mean_score <= result.best.mean_score);
        }
    }

    #[test]
    fn tie_break_prefers_first_in_grid_order() {
        let (X, y) = noisy_classification(60, 4);
        let result = GridSearch::new(ParamGrid::default(), 5, 42)
            .fit(&X, &y)
            .unwrap();

        let first_at_max = result
            .candidates
            .iter()
            .find(|cand| cand.mean_score == result.best.mean_score)
            .unwrap();
        assert_eq!(first_at_max.c, result.best.c);
        assert_eq!(first_at_max.penalty, result.best.penalty);
    }

    #[test]
    fn selection_is_deterministic() {
        let (X, y) = noisy_classification(60, 5);
        let first = GridSearch::new(ParamGrid::default(), 5, 42)
            .fit(&X, &y)
            .unwrap();
        let second = GridSearch::new(ParamGrid::default(), 5, 42)
            .fit(&X, &y)
            .unwrap();

        assert_eq!(first.best.c, second.best.c);
        assert_eq!(first.best.penalty, second.best.penalty);
        assert_eq!(first.best.mean_score, second.best.mean_score);
    }

    #[test]
    fn single_class_data_is_reported_not_miscomputed() {
        let X = Array2::zeros((20, 2));
        let y = Array1::ones(20);
        let result = GridSearch::new(ParamGrid::default(), 5, 42).fit(&X, &y);

        assert!(matches!(result, Err(Error::NoViableCandidate)));
    }
}
