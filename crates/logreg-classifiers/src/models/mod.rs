pub mod logistic;
pub mod sgd;

pub use logistic::{predict_probability, random_theta, sigmoid, LogisticRegressionClassifier};
pub use sgd::{cross_entropy, fit_sgd, FitHistory, SgdFit};
