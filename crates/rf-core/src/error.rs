use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum CoreReason {
    /// The shape of a declared rule violates the rule contract.
    #[error("rule definition error")]
    RuleDefinition,
    /// A condition failed for a reason other than a missing fact.
    #[error("rule evaluation error")]
    RuleEvaluation,
    /// An action failed.
    #[error("rule execution error")]
    RuleExecution,
    /// A fact bound to an action parameter is absent.
    #[error("missing fact")]
    MissingFact,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for CoreReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::RuleDefinition => 3001,
            Self::RuleEvaluation => 3002,
            Self::RuleExecution => 3003,
            Self::MissingFact => 3004,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type CoreError = StructError<CoreReason>;
pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn core_error(reason: CoreReason, detail: String) -> CoreError {
    StructError::from(reason).with_detail(detail)
}
