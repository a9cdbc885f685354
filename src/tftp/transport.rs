use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::debug;
use tokio::net::{UdpSocket, lookup_host};
use tokio::time::timeout;

/// Receives datagrams on one local UDP port. The receive timeout is fixed
/// when the socket is created; a zero duration blocks indefinitely.
pub struct Receiver {
    socket: UdpSocket,
    port: u16,
    recv_timeout: Duration,
    last_sender: Option<SocketAddr>,
}

impl Receiver {
    pub async fn bind(port: u16, recv_timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("binding udp port {port}"))?;
        let port = socket.local_addr()?.port();
        debug!("receiver bound to port {port}");

        Ok(Self {
            socket,
            port,
            recv_timeout,
            last_sender: None,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address of the peer that sent the most recently received datagram.
    pub fn last_sender(&self) -> Option<SocketAddr> {
        self.last_sender
    }

    /// Waits for one datagram. Returns `Ok(None)` when the timeout fixed
    /// at bind time expires with nothing received; that outcome is not a
    /// socket error.
    pub async fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        if self.recv_timeout.is_zero() {
            let (len, addr) = self.socket.recv_from(buf).await?;
            self.last_sender = Some(addr);
            return Ok(Some((len, addr)));
        }

        match timeout(self.recv_timeout, self.socket.recv_from(buf)).await {
            Ok(Ok((len, addr))) => {
                self.last_sender = Some(addr);
                Ok(Some((len, addr)))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(None),
        }
    }
}

/// Sends datagrams to one resolved remote endpoint.
pub struct Sender {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl Sender {
    /// Resolves `host` (an address or a DNS name) and connects an
    /// ephemeral local socket to it.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let mut addrs = lookup_host((host, port))
            .await
            .with_context(|| format!("resolving {host}:{port}"))?;
        let Some(remote) = addrs.next() else {
            bail!("no address found for {host}:{port}");
        };

        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(remote).await?;
        debug!("sender connected to {remote}");

        Ok(Self { socket, remote })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    pub async fn send(&self, buf: &[u8]) -> Result<usize> {
        Ok(self.socket.send(buf).await?)
    }
}
