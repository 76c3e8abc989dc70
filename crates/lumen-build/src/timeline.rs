//! Nested phase timing for build profiling.
//!
//! The driver wraps each stage of a build in [`Timeline::phase`], yielding
//! a tree of tagged intervals on the monotonic clock. Worker threads never
//! touch the timeline; it belongs to the driver thread alone and is passed
//! explicitly into the root task.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// A tagged time interval with nested subphases.
#[derive(Debug, Clone)]
pub struct Phase {
    pub tag: String,
    start: Instant,
    end: Option<Instant>,
    children: Vec<Phase>,
}

impl Phase {
    fn open(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            start: Instant::now(),
            end: None,
            children: Vec::new(),
        }
    }

    /// Duration of a closed phase; an open phase measures up to now.
    pub fn duration(&self) -> Duration {
        self.end.unwrap_or_else(Instant::now) - self.start
    }

    pub fn children(&self) -> &[Phase] {
        &self.children
    }
}

/// Recorder for one build's phase tree.
pub struct Timeline {
    root: Phase,
    /// Child-index path from the root to the currently open phase.
    cursor: Vec<usize>,
}

impl Timeline {
    /// Start a timeline whose root phase wraps the entire build.
    pub fn start(tag: &str) -> Self {
        Self {
            root: Phase::open(tag),
            cursor: Vec::new(),
        }
    }

    fn open_phase(&mut self) -> &mut Phase {
        let mut phase = &mut self.root;
        for &idx in &self.cursor {
            phase = &mut phase.children[idx];
        }
        phase
    }

    /// Record `task` as a subphase of the currently open phase.
    ///
    /// Nested `phase` calls within `task` become children of this phase.
    pub fn phase<T>(&mut self, tag: &str, task: impl FnOnce(&mut Timeline) -> T) -> T {
        let parent = self.open_phase();
        parent.children.push(Phase::open(tag));
        let idx = parent.children.len() - 1;
        self.cursor.push(idx);
        let value = task(self);
        self.open_phase().end = Some(Instant::now());
        self.cursor.pop();
        value
    }

    /// Close the root phase and return the finished tree.
    pub fn finish(mut self) -> Phase {
        self.root.end = Some(Instant::now());
        self.root
    }
}

/// Render a phase tree, one `<percent>% - <tag>` line per phase.
///
/// Percent is the phase's share of its parent's duration, truncated to an
/// integer; the root reports 100%. Children follow their parent, indented
/// two spaces per depth.
pub fn render(root: &Phase) -> String {
    let mut out = String::new();
    render_phase(&mut out, root, root.duration(), 0);
    out
}

fn render_phase(out: &mut String, phase: &Phase, parent_duration: Duration, depth: usize) {
    let percent = if parent_duration.as_nanos() == 0 {
        100
    } else {
        (100 * phase.duration().as_nanos() / parent_duration.as_nanos()) as u128
    };
    let _ = writeln!(out, "{:indent$}{percent}% - {}", "", phase.tag, indent = depth * 2);
    for child in &phase.children {
        render_phase(out, child, phase.duration(), depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn records_nested_phases() {
        let mut timeline = Timeline::start("build");
        timeline.phase("analyze", |t| {
            t.phase("stat", |_| sleep(Duration::from_millis(2)));
            t.phase("load", |_| sleep(Duration::from_millis(2)));
        });
        timeline.phase("compile", |_| sleep(Duration::from_millis(2)));
        let root = timeline.finish();

        assert_eq!(root.tag, "build");
        let tags: Vec<&str> = root.children().iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["analyze", "compile"]);
        let inner: Vec<&str> = root.children()[0]
            .children()
            .iter()
            .map(|p| p.tag.as_str())
            .collect();
        assert_eq!(inner, vec!["stat", "load"]);
    }

    #[test]
    fn subphase_contained_in_parent() {
        let mut timeline = Timeline::start("build");
        timeline.phase("outer", |t| {
            t.phase("inner", |_| sleep(Duration::from_millis(3)));
            sleep(Duration::from_millis(1));
        });
        let root = timeline.finish();

        let outer = &root.children()[0];
        let inner = &outer.children()[0];
        assert!(inner.duration() <= outer.duration());
        assert!(outer.duration() <= root.duration());
    }

    #[test]
    fn phase_returns_task_value() {
        let mut timeline = Timeline::start("build");
        let n = timeline.phase("answer", |_| 42);
        assert_eq!(n, 42);
    }

    #[test]
    fn render_shows_percent_and_indent() {
        let mut timeline = Timeline::start("build");
        timeline.phase("analyze", |_| sleep(Duration::from_millis(5)));
        let root = timeline.finish();

        let rendered = render(&root);
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("100% - build"));
        let child = lines.next().unwrap();
        assert!(child.starts_with("  "));
        assert!(child.ends_with("% - analyze"));
        let percent: u32 = child
            .trim()
            .split('%')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(percent <= 100);
    }
}
