//! Метрики бинарной классификации

use ndarray::Array1;
use serde::Serialize;

/// Доля точных совпадений меток
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| (*t - *p).abs() < 0.5)
        .count();
    correct as f64 / y_true.len() as f64
}

/// ROC-кривая и площадь под ней
#[derive(Debug, Clone, Serialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub auc: f64,
}

/// Строит ROC-кривую по вероятностям класса 1.
///
/// Площадь считается трапециями; одинаковые значения score
/// обрабатываются одним шагом, чтобы связки не завышали площадь.
/// None, если в выборке представлен только один класс.
pub fn roc_curve(y_true: &Array1<f64>, scores: &Array1<f64>) -> Option<RocCurve> {
    let mut pairs: Vec<(f64, f64)> = scores
        .iter()
        .zip(y_true.iter())
        .map(|(&s, &t)| (s, t))
        .collect();
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let n_pos = pairs.iter().filter(|(_, t)| *t > 0.5).count();
    let n_neg = pairs.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut auc = 0.0;
    let mut prev_tpr = 0.0;
    let mut prev_fpr = 0.0;

    let mut i = 0;
    while i < pairs.len() {
        let threshold = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == threshold {
            if pairs[i].1 > 0.5 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }

        let t = tp / n_pos as f64;
        let f = fp / n_neg as f64;
        auc += (f - prev_fpr) * (t + prev_tpr) / 2.0;
        fpr.push(f);
        tpr.push(t);
        prev_tpr = t;
        prev_fpr = f;
    }

    Some(RocCurve { fpr, tpr, auc })
}

pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Option<f64> {
    roc_curve(y_true, scores).map(|curve| curve.auc)
}

/// Метрики одного класса
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Отчет по обоим классам
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub classes: Vec<ClassMetrics>,
}

impl ClassReport {
    pub fn format(&self) -> String {
        let mut output = format!(
            "{:>12} {:>10} {:>10} {:>10} {:>10}\n",
            "class", "precision", "recall", "f1-score", "support"
        );
        for class in &self.classes {
            output.push_str(&format!(
                "{:>12} {:>10.4} {:>10.4} {:>10.4} {:>10}\n",
                class.label, class.precision, class.recall, class.f1, class.support
            ));
        }
        output
    }
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Точность, полнота, F1 и поддержка для классов 0 и 1
pub fn classification_report(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> ClassReport {
    let mut tp = 0.0;
    let mut tn = 0.0;
    let mut fp = 0.0;
    let mut fn_ = 0.0;
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        match (*t > 0.5, *p > 0.5) {
            (true, true) => tp += 1.0,
            (false, false) => tn += 1.0,
            (false, true) => fp += 1.0,
            (true, false) => fn_ += 1.0,
        }
    }

    let positive = ClassMetrics {
        label: 1,
        precision: safe_ratio(tp, tp + fp),
        recall: safe_ratio(tp, tp + fn_),
        f1: f1_score(safe_ratio(tp, tp + fp), safe_ratio(tp, tp + fn_)),
        support: (tp + fn_) as usize,
    };
    let negative = ClassMetrics {
        label: 0,
        precision: safe_ratio(tn, tn + fn_),
        recall: safe_ratio(tn, tn + fp),
        f1: f1_score(safe_ratio(tn, tn + fn_), safe_ratio(tn, tn + fp)),
        support: (tn + fp) as usize,
    };

    ClassReport {
        classes: vec![negative, positive],
    }
}

/// Признаки, отсортированные по коэффициенту классификатора (по убыванию)
pub fn rank_features(names: &[String], coefficients: &Array1<f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = names
        .iter()
        .cloned()
        .zip(coefficients.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}
