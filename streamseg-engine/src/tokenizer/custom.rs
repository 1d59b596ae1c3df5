//! User-supplied tokenizer callbacks

use super::Degradation;
use crate::error::BackendError;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type TokenizeFn = dyn Fn(&str) -> Result<Vec<String>, BackendError> + Send + Sync;

/// Shared handle to a sentence tokenizer callback
#[derive(Clone)]
pub struct CustomTokenizer(Arc<TokenizeFn>);

impl CustomTokenizer {
    /// Wrap a fallible callback
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<String>, BackendError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a callback that cannot report errors
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        Self::new(move |text| Ok(f(text)))
    }

    /// Run the callback, turning errors and panics into a degradation
    pub(crate) fn call(&self, text: &str) -> Result<Vec<String>, Degradation> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.0)(text))) {
            Ok(Ok(sentences)) => Ok(sentences),
            Ok(Err(BackendError::Failed(reason))) => Err(Degradation::InvocationFailed(reason)),
            Ok(Err(BackendError::Timeout(after))) => Err(Degradation::TimedOut(after)),
            Err(payload) => Err(Degradation::InvocationFailed(format!(
                "tokenizer panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

impl fmt::Debug for CustomTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomTokenizer").field(&"<callback>").finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
