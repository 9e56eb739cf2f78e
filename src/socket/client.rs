use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpStream, UdpSocket};

/// Anything a connector can hand back from a successful attempt.
///
/// A race only needs the endpoint pair, for diagnostics. Dropping the value
/// must close the underlying socket.
pub trait Socket: Send + fmt::Debug + 'static {
    fn local_addr(&self) -> io::Result<SocketAddr>;

    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

/// An established connection: a TCP stream or a connected UDP socket.
#[derive(Debug)]
pub enum Connection {
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl Connection {
    /// Check if the underlying socket is still usable.
    ///
    /// For TCP this is a non-blocking one-byte peek that catches FIN and RST.
    /// A connected UDP socket has no liveness to speak of.
    pub fn is_connected(&self) -> bool {
        match self {
            Connection::Tcp(s) => Self::check_tcp_connected(s),
            Connection::Udp(s) => s.peer_addr().is_ok(),
        }
    }

    fn check_tcp_connected(stream: &TcpStream) -> bool {
        if stream.peer_addr().is_err() {
            return false;
        }

        let mut byte = [0u8; 1];
        let mut buf = ReadBuf::new(&mut byte);
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        match stream.poll_peek(&mut cx, &mut buf) {
            Poll::Ready(Ok(0)) => false, // EOF
            Poll::Ready(Ok(_)) => true,  // data pending
            Poll::Pending => true,       // idle
            Poll::Ready(Err(_)) => false,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Connection::Tcp(_))
    }

    pub fn as_tcp(&self) -> Option<&TcpStream> {
        match self {
            Connection::Tcp(s) => Some(s),
            Connection::Udp(_) => None,
        }
    }

    pub fn into_tcp(self) -> Option<TcpStream> {
        match self {
            Connection::Tcp(s) => Some(s),
            Connection::Udp(_) => None,
        }
    }

    pub fn into_udp(self) -> Option<UdpSocket> {
        match self {
            Connection::Udp(s) => Some(s),
            Connection::Tcp(_) => None,
        }
    }
}

impl Socket for Connection {
    fn local_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Connection::Tcp(s) => s.local_addr(),
            Connection::Udp(s) => s.local_addr(),
        }
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Connection::Tcp(s) => s.peer_addr(),
            Connection::Udp(s) => s.peer_addr(),
        }
    }
}

impl AsyncRead for Connection {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Connection::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            // One datagram per read; excess bytes of a large datagram are dropped
            Connection::Udp(s) => s.poll_recv(cx, buf),
        }
    }
}

impl AsyncWrite for Connection {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Connection::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            Connection::Udp(s) => s.poll_send(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Connection::Tcp(s) => Pin::new(s).poll_flush(cx),
            Connection::Udp(_) => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Connection::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            Connection::Udp(_) => Poll::Ready(Ok(())),
        }
    }
}
