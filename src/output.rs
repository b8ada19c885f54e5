//! Output control with structured logging

use std::time::Instant;

#[derive(Clone, Debug)]
pub struct OutputManager {
    pub verbose: bool,
    quiet: bool,
    start_time: Option<Instant>,
}

impl OutputManager {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            start_time: Some(Instant::now()),
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            start_time: Some(Instant::now()),
        }
    }

    // Structured logging levels
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.print_with_timestamp("INFO", message, "ℹ️");
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("INFO", message, "ℹ️");
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("SUCCESS", message, "✅");
        }
    }

    pub fn warning(&self, message: &str) {
        self.print_with_timestamp("WARN", message, "⚠️");
    }

    pub fn error(&self, message: &str) {
        self.print_with_timestamp("ERROR", message, "❌");
    }

    pub fn detail(&self, detail: &str) {
        if self.verbose {
            eprintln!("      📝 {}", detail);
        }
    }

    // Helper methods
    fn print_with_timestamp(&self, level: &str, message: &str, emoji: &str) {
        let timestamp = if let Some(start_time) = self.start_time {
            format!("[{:8.3}s]", start_time.elapsed().as_secs_f64())
        } else {
            String::new()
        };

        if self.verbose {
            eprintln!("{} {} {} {}", timestamp, emoji, level, message);
        } else {
            eprintln!("{} {}", emoji, message);
        }
    }
}
