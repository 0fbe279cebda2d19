use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::error::{ClassifierError, Result};
use crate::models::FitHistory;
use crate::stats::RocCurve;

fn finite_points(curve: &RocCurve) -> (Vec<f64>, Vec<f64>) {
    curve
        .iter()
        .filter(|p| p.fpr.is_finite() && p.tpr.is_finite())
        .map(|p| (p.fpr, p.tpr))
        .unzip()
}

fn chance_line() -> Box<Scatter<f64, f64>> {
    Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("Chance")
        .line(Line::new().color("gray").dash(DashType::Dash))
}

fn roc_layout(title: &str) -> Layout {
    Layout::new()
        .title(title)
        .x_axis(Axis::new().title("FPR").range(vec![0.0, 1.0]))
        .y_axis(Axis::new().title("TPR").range(vec![0.0, 1.0]))
        .width(640)
        .height(640)
}

/// Plot one ROC curve with the chance diagonal, axes fixed to [0, 1].
///
/// Points with an undefined rate are left out.
pub fn plot_roc_curve(curve: &RocCurve, title: &str) -> Result<Plot> {
    plot_roc_curves(&[("ROC", curve)], title)
}

/// Overlay several named ROC curves, e.g. an untrained baseline and the fitted model.
pub fn plot_roc_curves(curves: &[(&str, &RocCurve)], title: &str) -> Result<Plot> {
    if curves.is_empty() || curves.iter().all(|(_, c)| c.is_empty()) {
        return Err(ClassifierError::EmptyInput("ROC curve"));
    }

    let mut plot = Plot::new();
    for (name, curve) in curves {
        let (fpr, tpr) = finite_points(curve);
        let trace = Scatter::new(fpr, tpr)
            .mode(Mode::LinesMarkers)
            .name(*name);
        plot.add_trace(trace);
    }
    plot.add_trace(chance_line());
    plot.set_layout(roc_layout(title));

    Ok(plot)
}

/// Plot the per-epoch training loss.
pub fn plot_loss_history(history: &FitHistory, title: &str) -> Result<Plot> {
    if history.loss_history.is_empty() {
        return Err(ClassifierError::EmptyInput("loss history"));
    }

    let epochs: Vec<usize> = (1..=history.loss_history.len()).collect();
    let trace = Scatter::new(epochs, history.loss_history.clone())
        .mode(Mode::Lines)
        .name("Cross-entropy");

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Epoch"))
        .y_axis(Axis::new().title("Loss"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);

    Ok(plot)
}
