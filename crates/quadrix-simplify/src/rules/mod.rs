//! Rewrite rules grouped by topic.

pub mod arithmetic;
pub mod exp_log;
pub mod trig;

use egg::Rewrite;

use crate::language::QuadLang;

/// Every rule the simplifier runs by default.
#[must_use]
pub fn all_rules() -> Vec<Rewrite<QuadLang, ()>> {
    let mut rules = arithmetic::rules();
    rules.extend(trig::rules());
    rules.extend(exp_log::rules());
    rules
}
