use dns_bridge_domain::PeerAddr;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::server::Connected;
use tracing::{debug, trace, warn};

/// Accepted connections waiting to be picked up by the gRPC server.
const INCOMING_BACKLOG: usize = 128;

/// Pause after a failed `accept` (e.g. EMFILE) before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

pub(crate) type Incoming = ReceiverStream<io::Result<BridgeConnection>>;

enum BridgeStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

/// A client connection to the bridge, plaintext or TLS, tagged with its peer.
///
/// The peer is exposed to handlers through the request extensions via
/// [`Connected`].
pub struct BridgeConnection {
    stream: BridgeStream,
    peer: PeerAddr,
}

impl BridgeConnection {
    fn plain(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream: BridgeStream::Plain(stream),
            peer: PeerAddr::Tcp(peer),
        }
    }

    fn tls(stream: TlsStream<TcpStream>, peer: SocketAddr) -> Self {
        Self {
            stream: BridgeStream::Tls(Box::new(stream)),
            peer: PeerAddr::Tcp(peer),
        }
    }
}

impl Connected for BridgeConnection {
    type ConnectInfo = PeerAddr;

    fn connect_info(&self) -> Self::ConnectInfo {
        self.peer.clone()
    }
}

impl AsyncRead for BridgeConnection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().stream {
            BridgeStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            BridgeStream::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for BridgeConnection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut self.get_mut().stream {
            BridgeStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            BridgeStream::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        match &mut self.get_mut().stream {
            BridgeStream::Plain(stream) => Pin::new(stream).poll_write_vectored(cx, bufs),
            BridgeStream::Tls(stream) => Pin::new(stream).poll_write_vectored(cx, bufs),
        }
    }

    fn is_write_vectored(&self) -> bool {
        match &self.stream {
            BridgeStream::Plain(stream) => stream.is_write_vectored(),
            BridgeStream::Tls(stream) => stream.is_write_vectored(),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().stream {
            BridgeStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            BridgeStream::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().stream {
            BridgeStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            BridgeStream::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

/// Accepts connections from `listener` until `shutdown` fires or the
/// returned stream is dropped.
///
/// With a TLS acceptor every handshake runs on its own task, bounded by
/// `handshake_timeout`, so a stalled client never holds up the accept loop.
/// Failed handshakes are logged and dropped; they never reach the server.
pub(crate) fn spawn_accept_loop(
    listener: TcpListener,
    tls: Option<TlsAcceptor>,
    handshake_timeout: Duration,
    shutdown: CancellationToken,
) -> (JoinHandle<()>, Incoming) {
    let (tx, rx) = mpsc::channel(INCOMING_BACKLOG);

    let task = tokio::spawn(async move {
        loop {
            let (tcp_stream, peer) = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Accept loop: shutdown requested");
                    break;
                }
                _ = tx.closed() => {
                    debug!("Accept loop: server stopped consuming connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        continue;
                    }
                },
            };

            trace!(client = %peer, "Accepted TCP connection");

            let Some(acceptor) = tls.clone() else {
                if tx.send(Ok(BridgeConnection::plain(tcp_stream, peer))).await.is_err() {
                    break;
                }
                continue;
            };

            let tx = tx.clone();
            tokio::spawn(async move {
                match tokio::time::timeout(handshake_timeout, acceptor.accept(tcp_stream)).await {
                    Ok(Ok(tls_stream)) => {
                        debug!(client = %peer, "TLS handshake completed");
                        let _ = tx.send(Ok(BridgeConnection::tls(tls_stream, peer))).await;
                    }
                    Ok(Err(e)) => {
                        warn!(client = %peer, error = %e, "TLS handshake failed");
                    }
                    Err(_) => {
                        warn!(client = %peer, timeout = ?handshake_timeout, "TLS handshake timed out");
                    }
                }
            });
        }
    });

    (task, ReceiverStream::new(rx))
}
