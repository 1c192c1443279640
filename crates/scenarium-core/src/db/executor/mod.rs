mod delete;
mod load;
mod save;

pub(crate) use delete::DeleteExecutor;
pub(crate) use load::LoadExecutor;
pub(crate) use save::SaveExecutor;
pub use save::SaveMode;

// Design notes:
// - Executors are the only code that touches raw rows. Everything above
//   them works with decoded entities and typed ids.
// - Corruption means invalid persisted bytes or a row whose decoded id
//   disagrees with its key. Both are store-state problems, never caller
//   mistakes.
// - Every committed mutation publishes exactly one change event, after
//   the store write.

use crate::{
    db::store::{DataKey, RawRow},
    error::{ErrorClass, ErrorOrigin, InternalError},
    traits::EntityKind,
};
use thiserror::Error as ThisError;

///
/// ExecutorError
///

#[derive(Debug, ThisError)]
pub(crate) enum ExecutorError {
    #[error("corruption detected ({origin}): {message}")]
    Corruption {
        origin: ErrorOrigin,
        message: String,
    },

    #[error("data key exists: {0}")]
    KeyExists(DataKey),
}

impl ExecutorError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::KeyExists(_) => ErrorClass::Conflict,
            Self::Corruption { .. } => ErrorClass::Corruption,
        }
    }

    pub(crate) const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::KeyExists(_) => ErrorOrigin::Store,
            Self::Corruption { origin, .. } => *origin,
        }
    }

    pub(crate) fn corruption(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::Corruption {
            origin,
            message: message.into(),
        }
    }

    // Construct a store-origin corruption error with canonical taxonomy.
    pub(crate) fn store_corruption(message: impl Into<String>) -> Self {
        Self::corruption(ErrorOrigin::Store, message)
    }

    // Construct a serialize-origin corruption error with canonical taxonomy.
    pub(crate) fn serialize_corruption(message: impl Into<String>) -> Self {
        Self::corruption(ErrorOrigin::Serialize, message)
    }
}

impl From<ExecutorError> for InternalError {
    fn from(err: ExecutorError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}

// Decode a row and verify the persisted id agrees with its data key.
pub(super) fn decode_checked<E: EntityKind>(
    key: DataKey,
    row: &RawRow,
) -> Result<E, InternalError> {
    let entity = row.try_decode::<E>().map_err(|err| {
        InternalError::from(ExecutorError::serialize_corruption(format!(
            "failed to deserialize row: {key} ({err})"
        )))
    })?;

    let actual = DataKey::new(entity.id());
    if actual != key {
        return Err(ExecutorError::store_corruption(format!(
            "row key mismatch: expected {key}, found {actual}"
        ))
        .into());
    }

    Ok(entity)
}

///
/// TESTS
///
