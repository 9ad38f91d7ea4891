//! Arvak VQE Demo Suite
//!
//! Building blocks for the `demo-vqe` binary and the end-to-end tests:
//!
//! - [`circuits`]: ansatz templates (TwoLocal, hardware-efficient, a single
//!   Ry layer and the fixed 5-parameter template for the reduced H₂ model)
//! - [`problems`]: reference Hamiltonians
//! - console helpers and [`ProgressBarObserver`], which drives an
//!   `indicatif` bar from the optimizer's progress notifications

pub mod circuits;
pub mod problems;

use arvak_vqe::{ProgressObserver, ProgressUpdate};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(template.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Progress observer that advances a bar to the latest evaluation index and
/// shows the energy seen there.
pub struct ProgressBarObserver {
    bar: ProgressBar,
    updates: usize,
}

impl ProgressBarObserver {
    /// Drive `bar`. Its length grows if the run outlasts it.
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar, updates: 0 }
    }

    /// Number of notifications received.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Finish the bar with `message`.
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_progress(&mut self, update: &ProgressUpdate<'_>) {
        self.updates += 1;
        let position = update.evaluation as u64;
        if position > self.bar.length().unwrap_or(0) {
            self.bar.set_length(position);
        }
        self.bar.set_position(position);
        self.bar.set_message(format!("E = {:.6}", update.energy));
    }
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_tracks_latest_evaluation() {
        let bar = ProgressBar::hidden();
        bar.set_length(5);
        let mut observer = ProgressBarObserver::new(bar.clone());

        observer.on_progress(&ProgressUpdate {
            evaluation: 10,
            energy: -0.5,
            parameters: &[0.0],
        });
        assert_eq!(observer.updates(), 1);
        assert_eq!(bar.position(), 10);
        assert_eq!(bar.length(), Some(10));
    }
}
