use std::io::Write;

/// Receives the completed fraction (0.0 to 1.0) after each pipeline step.
pub trait Progress: Send + Sync {
	fn report(&self, fraction: f64);
}

/// Discards progress.
pub struct Silent;

impl Progress for Silent {
	fn report(&self, _fraction: f64) {}
}

/// Logs progress at debug level.
pub struct LogProgress;

impl Progress for LogProgress {
	fn report(&self, fraction: f64) {
		log::debug!("progress {:.0}%", fraction * 100.0);
	}
}

/// Redraws a single-line bar on stderr.
pub struct TermProgress {
	width: usize,
}

impl TermProgress {
	pub fn new() -> Self {
		Self { width: 30 }
	}

	fn render(&self, fraction: f64) -> String {
		let fraction = fraction.clamp(0.0, 1.0);
		let filled = (fraction * self.width as f64).round() as usize;
		format!(
			"[{}{}] {:>3.0}%",
			"#".repeat(filled),
			"-".repeat(self.width - filled),
			fraction * 100.0
		)
	}
}

impl Default for TermProgress {
	fn default() -> Self {
		Self::new()
	}
}

impl Progress for TermProgress {
	fn report(&self, fraction: f64) {
		let mut err = std::io::stderr().lock();
		let _ = write!(err, "\r{}", self.render(fraction));
		if fraction >= 1.0 {
			let _ = writeln!(err);
		}
		let _ = err.flush();
	}
}
