//! Command and callback sockets of the Lua connector.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::config::QuikConfig;
use super::error::QuikError;
use super::message::Message;

/// Line terminator written after every command.
const FRAME_END: &[u8] = b"\r\n";

/// Both sockets, opened and closed together.
#[derive(Debug)]
pub struct QuikConnection {
    command: BufReader<TcpStream>,
    callback: TcpStream,
    write_timeout: Duration,
    read_timeout: Duration,
}

impl QuikConnection {
    /// Dial the command socket, then the callback socket.
    ///
    /// If the callback dial fails the command socket is shut down again.
    pub async fn open(config: &QuikConfig) -> Result<Self, QuikError> {
        let mut command = dial(&config.cmd_addr(), config.connect_timeout).await?;
        let callback = match dial(&config.callback_addr(), config.connect_timeout).await {
            Ok(callback) => callback,
            Err(err) => {
                if let Err(close_err) = command.shutdown().await {
                    tracing::debug!(error = %close_err, "Failed to close command socket");
                }
                return Err(err);
            }
        };

        tracing::info!(
            cmd = %config.cmd_addr(),
            callback = %config.callback_addr(),
            "Connected to QUIK"
        );

        Ok(Self {
            command: BufReader::new(command),
            callback,
            write_timeout: config.write_timeout,
            read_timeout: config.read_timeout,
        })
    }

    /// Send one command and read its response line.
    pub async fn exchange(&mut self, request: &Message) -> Result<Message, QuikError> {
        let payload = serde_json::to_vec(request)?;

        tokio::time::timeout(self.write_timeout, write_frame(self.command.get_mut(), &payload))
            .await
            .map_err(|_| QuikError::Timeout { operation: "write" })??;

        let mut line = String::new();
        let read = tokio::time::timeout(self.read_timeout, self.command.read_line(&mut line))
            .await
            .map_err(|_| QuikError::Timeout { operation: "read" })??;
        if read == 0 || !line.ends_with('\n') {
            return Err(QuikError::ConnectionClosed);
        }

        let response: Message = serde_json::from_str(line.trim_end_matches(['\r', '\n']))?;
        if !response.is_response_to(request) {
            return Err(QuikError::ErrorResponse {
                request_cmd: request.cmd.clone(),
                response: Box::new(response),
            });
        }

        Ok(response)
    }

    /// Shut down both sockets.
    pub async fn shutdown(mut self) -> Result<(), QuikError> {
        let command = self.command.get_mut().shutdown().await;
        let callback = self.callback.shutdown().await;
        command?;
        callback?;
        Ok(())
    }
}

async fn dial(addr: &str, timeout: Duration) -> Result<TcpStream, QuikError> {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(QuikError::Connect {
            addr: addr.to_string(),
            message: err.to_string(),
        }),
        Err(_) => Err(QuikError::Connect {
            addr: addr.to_string(),
            message: format!("timed out after {timeout:?}"),
        }),
    }
}

/// Write `payload` then `\r\n`, one `write` each. A partial write is an error.
pub(crate) async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), QuikError>
where
    W: AsyncWrite + Unpin,
{
    write_once(writer, payload).await?;
    write_once(writer, FRAME_END).await?;
    writer.flush().await?;
    Ok(())
}

async fn write_once<W>(writer: &mut W, buf: &[u8]) -> Result<(), QuikError>
where
    W: AsyncWrite + Unpin,
{
    let written = writer.write(buf).await?;
    if written != buf.len() {
        return Err(QuikError::ShortWrite {
            written,
            expected: buf.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Accepts half of every buffer.
    #[derive(Default)]
    struct HalfWriter {
        calls: usize,
        written: Vec<u8>,
    }

    impl AsyncWrite for HalfWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            self.calls += 1;
            let n = buf.len() / 2;
            self.written.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn frame_is_payload_then_crlf() {
        let mut out: Vec<u8> = Vec::new();
        write_frame(&mut out, br#"{"cmd":"ping"}"#).await.unwrap();
        assert_eq!(out, b"{\"cmd\":\"ping\"}\r\n");
    }

    #[tokio::test]
    async fn short_write_fails_without_retry() {
        let mut writer = HalfWriter::default();
        let err = write_frame(&mut writer, b"0123456789").await.unwrap_err();

        assert!(matches!(
            err,
            QuikError::ShortWrite {
                written: 5,
                expected: 10
            }
        ));
        assert_eq!(writer.calls, 1);
        assert_eq!(writer.written, b"01234");
    }

    #[tokio::test]
    async fn dial_refused_is_connect_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = dial(&addr, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, QuikError::Connect { .. }));
    }
}
