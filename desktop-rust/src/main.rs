mod app;
mod io;
mod model;

use app::DepthApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Hole Depth Estimator",
        options,
        Box::new(|_cc| Box::new(DepthApp::default())),
    )
}
