//! Property-based tests for folding, differentiation and polynomials.
