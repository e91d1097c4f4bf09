pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A position-dependent query referenced a point that is not in the
    /// arrangement sequence.
    #[error("point is not in the arrangement sequence")]
    PointNotInSequence,

    /// `append_point` was handed a point the sequence already holds.
    #[error("point is already in the arrangement sequence")]
    PointAlreadyPresent,
}
