//! Append-only record of the computation.

use quadrix_core::format_number;
use serde::Serialize;

/// One human-readable computation step.
///
/// `formula` and `result` hold LaTeX fragments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    /// What the step does.
    pub title: String,
    /// The general formula applied.
    pub formula: String,
    /// The formula with numbers substituted, and its value.
    pub result: String,
    /// Full trace of a nested sub-problem.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Step>,
}

impl Step {
    /// A step without children.
    pub fn new(
        title: impl Into<String>,
        formula: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            formula: formula.into(),
            result: result.into(),
            children: Vec::new(),
        }
    }

    /// Attaches nested steps.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Step>) -> Self {
        self.children = children;
        self
    }
}

/// Ordered steps; never reordered or pruned.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// An empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Appends all steps of `other`.
    pub fn append(&mut self, other: Trace) {
        self.steps.extend(other.steps);
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of top-level steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consumes the trace.
    #[must_use]
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

pub(crate) fn num(v: f64) -> String {
    format_number(v)
}

pub(crate) fn list<T>(items: &[T], show: impl Fn(&T) -> String) -> String {
    let parts: Vec<String> = items.iter().map(show).collect();
    format!("[{}]", parts.join(", "))
}

pub(crate) fn nums(values: &[f64]) -> String {
    list(values, |v| num(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut a = Trace::new();
        a.push(Step::new("one", "", ""));
        let mut b = Trace::new();
        b.push(Step::new("two", "", ""));
        b.push(Step::new("three", "", ""));
        a.append(b);
        let titles: Vec<&str> = a.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[test]
    fn test_serializes_children_only_when_present() {
        let leaf = Step::new("leaf", "f", "1");
        let json = serde_json::to_value(&leaf).unwrap();
        assert!(json.get("children").is_none());
        let parent = Step::new("parent", "", "").with_children(vec![leaf]);
        let json = serde_json::to_value(&parent).unwrap();
        assert_eq!(json["children"][0]["title"], "leaf");
    }

    #[test]
    fn test_number_lists() {
        assert_eq!(nums(&[0.5, 1.0, 1.5]), "[0.5, 1, 1.5]");
        assert_eq!(nums(&[]), "[]");
    }
}
