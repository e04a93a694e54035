//! Extraction cost for simplified integrands.

use egg::{CostFunction, Id, Language};

use crate::language::QuadLang;

/// Prefers small trees, with transcendental calls and divisions weighted
/// up so that cancellations win over rewrites that only move them around.
#[derive(Default)]
pub struct DisplayCost;

impl CostFunction<QuadLang> for DisplayCost {
    type Cost = usize;

    fn cost<C>(&mut self, enode: &QuadLang, mut costs: C) -> Self::Cost
    where
        C: FnMut(Id) -> Self::Cost,
    {
        let base_cost = match enode {
            QuadLang::Num(_) | QuadLang::Symbol(_) | QuadLang::Neg(_) => 1,
            QuadLang::Add(_) | QuadLang::Sub(_) | QuadLang::Mul(_) => 2,
            QuadLang::Div(_) | QuadLang::Pow(_) | QuadLang::Sqrt(_) | QuadLang::Abs(_) => 3,
            _ => 5,
        };
        enode.fold(base_cost, |sum, id| sum + costs(id))
    }
}
