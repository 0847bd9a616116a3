// Case Provider Port

use crate::application::case::Case;
use crate::error::Result;
use std::sync::Arc;

/// Access to the currently open case
pub trait CaseProvider: Send + Sync {
    /// Current case, or `AppError::NoCurrentCase`
    fn current_case(&self) -> Result<Arc<Case>>;
}
