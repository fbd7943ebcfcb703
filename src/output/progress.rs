use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_red, bright_yellow};

/// Spinner shown on stderr while repositories are being cloned.
///
/// Clones share the same bar, so concurrent acquisitions can print through
/// it without tearing the spinner line.
#[derive(Clone)]
pub struct AcquireProgress {
    pb: ProgressBar,
}

impl AcquireProgress {
    pub fn start(repo_count: usize) -> Self {
        Self::with_target(ProgressDrawTarget::stderr(), repo_count)
    }

    fn with_target(target: ProgressDrawTarget, repo_count: usize) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(target);
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {msg} {spinner}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(
            bright_yellow(format!("Cloning {repo_count} repositories")).to_string(),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    /// A progress handle that draws nothing.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Prints a line above the spinner, or to stdout when nothing is drawn.
    pub fn println(&self, line: impl AsRef<str>) {
        if self.pb.is_hidden() {
            println!("{}", line.as_ref());
        } else {
            self.pb.println(line);
        }
    }

    pub fn finish(self, repo_count: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Cloned {repo_count} repositories ✓")).to_string(),
        );
    }

    pub fn abandon(self) {
        self.pb
            .abandon_with_message(bright_red("Cloning aborted ✗").to_string());
    }
}
