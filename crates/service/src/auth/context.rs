use tokio::sync::watch;
use uuid::Uuid;

use super::errors::AuthError;

/// Per-request state threaded through the workflow and into the store.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    cancel: Option<watch::Receiver<bool>>,
}

/// Trips the cancellation flag of the context it was created with.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl RequestContext {
    pub fn new() -> Self {
        Self { request_id: Uuid::new_v4(), cancel: None }
    }

    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (Self { request_id: Uuid::new_v4(), cancel: Some(rx) }, CancelHandle(tx))
    }

    pub fn request_id(&self) -> Uuid { self.request_id }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    pub fn ensure_active(&self) -> Result<(), AuthError> {
        if self.is_cancelled() {
            return Err(AuthError::Cancelled);
        }
        Ok(())
    }
}

impl Default for RequestContext {
    fn default() -> Self { Self::new() }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::AuthErrorKind;

    #[test]
    fn plain_context_never_cancels() {
        let ctx = RequestContext::new();
        assert!(!ctx.is_cancelled());
        assert!(ctx.ensure_active().is_ok());
    }

    #[test]
    fn cancel_is_seen_by_clones() {
        let (ctx, handle) = RequestContext::cancellable();
        let clone = ctx.clone();
        assert!(ctx.ensure_active().is_ok());
        handle.cancel();
        assert!(ctx.is_cancelled());
        assert!(clone.ensure_active().unwrap_err().is(AuthErrorKind::Cancelled));
        assert_eq!(ctx.request_id(), clone.request_id());
    }

    #[test]
    fn dropped_handle_does_not_cancel() {
        let (ctx, handle) = RequestContext::cancellable();
        drop(handle);
        assert!(!ctx.is_cancelled());
    }
}
