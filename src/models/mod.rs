/// Модели и подбор гиперпараметров

pub mod logistic;
pub mod pipeline;
pub mod selection;

pub use logistic::{LogisticRegression, Penalty};
pub use pipeline::ScaledLogistic;
pub use selection::{CandidateScore, GridSearch, GridSearchResult, ParamGrid, StratifiedKFold};
