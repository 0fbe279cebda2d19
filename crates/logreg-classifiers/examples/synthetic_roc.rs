use logreg_classifiers::config::{ThresholdGrid, TrainerConfig};
use logreg_classifiers::models::LogisticRegressionClassifier;
use logreg_classifiers::stats::{classification_metrics, roc_curve};
use ndarray::{Array1, Array2};

fn main() {
    env_logger::init();

    // Tiny synthetic dataset: bias column plus 2 features
    let x = Array2::from_shape_vec(
        (6, 3),
        vec![
            1.0, 1.0, 0.0, // class 1
            1.0, 0.0, 1.0, // class 0
            1.0, 1.0, 0.1, // class 1
            1.0, 0.0, 0.9, // class 0
            1.0, 0.8, 0.3, // class 1
            1.0, 0.4, 0.5, // class 0
        ],
    )
    .expect("failed to create feature matrix");

    let y = Array1::from_vec(vec![1, 0, 1, 0, 1, 0]);

    println!("Synthetic X shape: {:?}", x.shape());

    let mut clf = LogisticRegressionClassifier::new(TrainerConfig::new(0.1, 2000, 1e-6, 0.001));
    let history = clf.fit(&x, &y).expect("training failed").clone();
    println!(
        "{}: {} epochs, converged = {}, final loss = {:?}",
        clf.name(),
        history.epochs,
        history.converged,
        history.final_loss()
    );

    let proba = clf.predict_proba(&x).expect("prediction failed");
    println!("Probabilities = {:?}", proba.to_vec());

    let metrics = classification_metrics(&y, &proba, 0.5).expect("metrics failed");
    println!("Accuracy = {:.3}", metrics.accuracy);

    let curve = roc_curve(&y, &proba, &ThresholdGrid::default()).expect("roc failed");
    for point in curve.iter() {
        println!("threshold {:.2}: fpr {:.3} tpr {:.3}", point.threshold, point.fpr, point.tpr);
    }
    println!("AUC = {:.3}", curve.auc());
}
