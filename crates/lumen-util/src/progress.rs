//! Terminal status output.
//!
//! Build progress is reported as right-aligned label lines in the style of
//! mainstream build tools, e.g. `   Compiling acme/todomvc`. All output
//! goes to stderr so stdout stays free for downstream consumers.

use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Column the status labels are right-aligned to.
const LABEL_WIDTH: usize = 12;

/// Colour role of a status label.
#[derive(Clone, Copy)]
enum Tone {
    Action,
    Info,
    Warn,
}

impl Tone {
    fn style(self) -> Style {
        let bold = Style::new().bold();
        match self {
            Tone::Action => bold.green(),
            Tone::Info => bold.cyan(),
            Tone::Warn => bold.yellow(),
        }
    }
}

fn emit(tone: Tone, label: &str, message: &str) {
    let label = format!("{label:>LABEL_WIDTH$}");
    let _ = writeln!(
        std::io::stderr(),
        "{} {message}",
        tone.style().apply_to(label)
    );
}

/// Report an action the driver is taking (`Compiling`, `Finished`, ...).
pub fn status(label: &str, message: &str) {
    emit(Tone::Action, label, message);
}

/// Report a fact rather than an action (`Output`, `Timings`, ...).
pub fn status_info(label: &str, message: &str) {
    emit(Tone::Info, label, message);
}

/// Report something suspicious that does not stop the build.
pub fn status_warn(label: &str, message: &str) {
    emit(Tone::Warn, label, message);
}

/// Progress bar over a known number of modules.
///
/// Ticked by the build driver as module compilations complete; finish with
/// [`ProgressBar::finish_and_clear`] before printing the summary line.
pub fn module_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} modules")
            .expect("valid template")
            .progress_chars("=> "),
    );
    pb
}
