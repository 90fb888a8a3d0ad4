/// Метрики качества

pub mod metrics;

pub use metrics::{
    accuracy, classification_report, rank_features, roc_auc, roc_curve, ClassMetrics, ClassReport,
    RocCurve,
};
