/// A value that can stand in a generator tuple and be rewritten by Nielsen moves.
///
/// Both concrete matrices and formal words implement this, so a single
/// rewrite routine drives the matrix tuple and its word shadow in lock-step.
pub trait GroupElement: Clone {
    /// Returns `self · rhs`.
    fn compose(&self, rhs: &Self) -> Self;

    /// Returns `self⁻¹`.
    fn inverse(&self) -> Self;
}
