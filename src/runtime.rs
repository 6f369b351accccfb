//! Runtime - View-model scopes
//!
//! Every background task a screen starts is launched in its scope and stops
//! when the scope closes (the screen goes away).

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

/// Close signal shared by the tasks of one screen
#[derive(Clone)]
pub struct ViewModelScope {
    sender: broadcast::Sender<()>,
    closed: Arc<RwLock<bool>>,
}

impl Default for ViewModelScope {
    fn default() -> Self { Self::new() }
}

impl ViewModelScope {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender, closed: Arc::new(RwLock::new(false)) }
    }

    /// Subscribe to the close signal
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Close the scope. Running tasks are dropped at their next await point.
    pub async fn close(&self) {
        let mut closed = self.closed.write().await;
        if !*closed {
            *closed = true;
            let _ = self.sender.send(());
        }
    }

    pub async fn is_closed(&self) -> bool {
        *self.closed.read().await
    }

    /// Spawn `task` until it finishes or the scope closes.
    pub fn launch<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut close = self.subscribe();
        let closed = self.closed.clone();
        tokio::spawn(async move {
            if *closed.read().await {
                return;
            }
            tokio::select! {
                _ = close.recv() => tracing::trace!("scope closed, task dropped"),
                _ = task => {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn close_stops_launched_tasks() {
        let scope = ViewModelScope::new();
        let handle = scope.launch(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        scope.close().await;
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop")
            .expect("join");
        assert!(scope.is_closed().await);
    }

    #[tokio::test]
    async fn launch_after_close_does_nothing() {
        let scope = ViewModelScope::new();
        scope.close().await;
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        scope.launch(async move { let _ = tx.send(()); }).await.expect("join");
        assert!(rx.await.is_err());
    }
}
