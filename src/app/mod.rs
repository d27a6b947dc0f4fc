//! Command-line run: measure the selected directions and print the report.
mod report;
mod runner;


pub use report::render_report;
pub use runner::run_speed_test;
