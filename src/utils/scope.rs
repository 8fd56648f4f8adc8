use tokio_util::sync::CancellationToken;

/// Lifetime of a mounted view.
///
/// Every async load a view starts gets a child token from here. Tearing the
/// scope down cancels them all; loads check the token after each await and
/// drop their result instead of writing to a view that is gone. The HTTP
/// request itself keeps running to completion.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
