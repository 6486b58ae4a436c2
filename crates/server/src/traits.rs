//! Server lifecycle traits

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// A server that runs until its shutdown token is cancelled
///
/// Implementors bind in [`Server::run`], report their bound address while
/// serving, and return once in-flight work has drained.
///
/// # Example
///
/// ```ignore
/// let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0), router);
/// let token = CancellationToken::new();
///
/// tokio::spawn({
///     let token = token.clone();
///     async move { server.run(token).await }
/// });
///
/// // ... later
/// token.cancel();
/// ```
#[async_trait]
pub trait Server: Send + Sync + 'static {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Bound address while running, `None` otherwise
    fn address(&self) -> Option<SocketAddr>;

    fn is_running(&self) -> bool;

    /// Bind, serve until `shutdown` is cancelled, then drain in-flight requests
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Token whose cancellation starts graceful shutdown
    ///
    /// # Errors
    ///
    /// Fails if the address cannot be parsed or bound, or if serving aborts.
    async fn run(&self, shutdown: CancellationToken) -> Result<()>;
}

/// Convenience methods available on every [`Server`]
///
/// # Example
///
/// ```ignore
/// // Background server, stopped explicitly (tests)
/// let (handle, token) = server.spawn();
/// token.cancel();
/// handle.await??;
///
/// // Foreground server, stopped by Ctrl+C or SIGTERM (binaries)
/// server.run_until_signal().await?;
/// ```
pub trait ServerExt: Server + Sized {
    /// Run on a background task; cancel the returned token to stop it
    ///
    /// Returns the task handle, which resolves to the result of
    /// [`Server::run`], together with the token that stops it.
    fn spawn(self) -> (tokio::task::JoinHandle<Result<()>>, CancellationToken) {
        let token = CancellationToken::new();
        let token_clone = token.clone();
        let handle = tokio::spawn(async move { self.run(token_clone).await });
        (handle, token)
    }

    /// Run until Ctrl+C or SIGTERM
    fn run_until_signal(self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let shutdown = crate::shutdown::ShutdownController::with_signals();
            self.run(shutdown.token()).await
        }
    }
}

impl<T: Server + Sized> ServerExt for T {}
