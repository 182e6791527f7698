use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// One A record answer for every query
    Answer,
    /// Never reply
    Silent,
    /// Reply first with a wrong transaction id, then correctly
    WrongIdFirst,
    /// Reply first from a different socket, then correctly
    StrayFirst,
    /// Reply with the right id but an unparseable body
    Garbage,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicU64>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::Relaxed);
                        let query = &buf[..len];
                        let response = Self::build_mock_response(query);

                        match behavior {
                            MockBehavior::Answer => {
                                let _ = socket.send_to(&response, peer).await;
                            }
                            MockBehavior::Silent => {}
                            MockBehavior::WrongIdFirst => {
                                let mut wrong = response.clone();
                                if wrong.len() >= 2 {
                                    wrong[0] ^= 0xFF;
                                }
                                let _ = socket.send_to(&wrong, peer).await;
                                let _ = socket.send_to(&response, peer).await;
                            }
                            MockBehavior::StrayFirst => {
                                if let Ok(stray) = UdpSocket::bind("127.0.0.1:0").await {
                                    let _ = stray.send_to(&response, peer).await;
                                }
                                let _ = socket.send_to(&response, peer).await;
                            }
                            MockBehavior::Garbage => {
                                let mut garbage = query.get(..2).unwrap_or_default().to_vec();
                                garbage.extend_from_slice(b"\x81\x80\x00\x05\x00\x00\x00\x00\x00\x00\xff\xff");
                                let _ = socket.send_to(&garbage, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Copies id and question, sets QR/RD/RA, appends `93.184.216.34` for the
    /// first name via a compression pointer.
    pub fn build_mock_response(query: &[u8]) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }

        let mut response = Vec::with_capacity(512);
        response.extend_from_slice(&query[0..2]);
        response.push(0x81);
        response.push(0x80);
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&query[12..]);
        response.extend_from_slice(&[
            0xc0, 0x0c, // name pointer
            0x00, 0x01, // A
            0x00, 0x01, // IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04, // rdlength
            93, 184, 216, 34,
        ]);

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
