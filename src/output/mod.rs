mod exports;
mod progress;
mod report;
mod styling;
mod summary;
mod tables;

pub use exports::write_report;
pub use progress::AcquireProgress;
#[cfg(test)]
pub(crate) use progress::tests::captured as captured_progress;
pub use styling::{bright, bright_green, dim, error_line, magenta_bold, skip_line};
pub use summary::print_summary;

/// Prints the suitelens banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🧪 suitelens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Multi-repository E2E suite runner")
    );
}
