use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("structures do not have same atom count (initial: {initial}, final: {final_})")]
    SiteCountMismatch { initial: usize, final_: usize },

    #[error("structures contain no sites")]
    EmptyStructure,
}
