use tokio::sync::oneshot::error::RecvError;

#[derive(Debug)]
pub(crate) struct Callback<T>(pub(crate) tokio::sync::oneshot::Sender<T>);

impl<T> Callback<T> {
    pub(crate) fn create() -> (Self, CallbackAwaiter<T>) {
        let (tx, rx) = tokio::sync::oneshot::channel();
        (Callback(tx), CallbackAwaiter(rx))
    }

    /// Never blocks. A receiver that already gave up simply drops the value.
    pub(crate) fn send(self, value: T) {
        let _ = self.0.send(value);
    }
}

#[derive(Debug)]
pub(crate) struct CallbackAwaiter<T>(pub(crate) tokio::sync::oneshot::Receiver<T>);

impl<T> CallbackAwaiter<T> {
    /// Errors when the matching [`Callback`] was dropped without sending.
    pub(crate) async fn recv(self) -> Result<T, RecvError> {
        self.0.await
    }
}
