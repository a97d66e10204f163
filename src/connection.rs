//! Module that deals with connection and wire protocol logic.
//!
//! The EOS command API speaks JSON-RPC 2.0, carried as HTTP/1.1 POSTs to
//! `/command-api` over a local unix socket. Responses are framed by
//! `Content-Length`, and the connection is kept alive across requests.

use std::{io::ErrorKind, path::Path};
use tokio::net::UnixStream;

use serde_json::Value;

use crate::{
    DomParameters, Error, InterfaceDetail, InterfaceMap, InterfaceStatus, ResponseFormat, Result,
    RpcRequest, RpcResponse, ShowInterfacesStatus, TransceiverDom,
};

/// An active connection, on which commands can be executed and responses
/// received.
///
/// The request/response mechanism is serial: each `runCmds` exchange is
/// fully read before the next one is sent.
pub struct Connection {
    stream: UnixStream,
    buffer: Vec<u8>,
    next_id: u64,
}

impl Connection {
    /// Open a new connection to this `unix_socket`.
    pub(crate) async fn new<P: AsRef<Path>>(unix_socket: P) -> Result<Self> {
        let stream = UnixStream::connect(unix_socket).await?;
        log::trace!("conn: connected to command API socket");
        Ok(Connection {
            stream,
            buffer: Vec::with_capacity(2 * READ_FRAME_SIZE),
            next_id: 1,
        })
    }

    /// Run `cmds` on the switch and return one result object per command.
    ///
    /// A JSON-RPC error response is logged together with the offending
    /// commands and surfaced as [Error::RpcError].
    pub async fn run_cmds(
        &mut self,
        cmds: &[String],
        format: ResponseFormat,
    ) -> Result<Vec<Value>> {
        let id = self.next_id;
        self.next_id += 1;

        let body = serde_json::to_vec(&RpcRequest::new(cmds, format, id))?;
        let head = format!(
            "POST /command-api HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        self.write_to_server(head.as_bytes()).await?;
        self.write_to_server(&body).await?;
        log::trace!("conn: sent request {} for {:?}", id, cmds);

        let body = self.read_response().await?;
        let response: RpcResponse = serde_json::from_slice(&body)?;
        if let Some(error) = response.error {
            log::error!(
                "failed to run commands {:?}: {}",
                cmds,
                error.last_detail().unwrap_or(&error.message)
            );
            return Err(Error::RpcError(error));
        }
        response.result.ok_or_else(|| {
            Error::InvalidResponse("response carried neither result nor error".into())
        })
    }

    /// Run `show interfaces status` and return the per-interface entries in
    /// the order the server listed them.
    pub async fn show_interfaces_status(&mut self) -> Result<Vec<(String, InterfaceStatus)>> {
        let result = self
            .run_cmds(&["show interfaces status".to_owned()], ResponseFormat::Json)
            .await?;
        let parsed: ShowInterfacesStatus = serde_json::from_value(first_result(result)?)?;
        parsed.into_entries()
    }

    /// Run `show interfaces <name> transceiver dom` and return the DOM
    /// parameter block, or `None` when the port carries no DDM data.
    pub async fn show_transceiver_dom(&mut self, if_name: &str) -> Result<Option<DomParameters>> {
        let cmd = format!("show interfaces {} transceiver dom", if_name);
        let result = self.run_cmds(&[cmd], ResponseFormat::Json).await?;
        let map: InterfaceMap = serde_json::from_value(first_result(result)?)?;
        let dom: Option<TransceiverDom> = map.entry(if_name)?;
        Ok(dom.and_then(|d| d.parameters))
    }

    /// Run `show interfaces <name>` and return the detail entry for it.
    pub async fn show_interface(&mut self, if_name: &str) -> Result<InterfaceDetail> {
        let cmd = format!("show interfaces {}", if_name);
        let result = self.run_cmds(&[cmd], ResponseFormat::Json).await?;
        let map: InterfaceMap = serde_json::from_value(first_result(result)?)?;
        map.require(if_name)
    }

    /// Reads one full HTTP response from the server and returns its body.
    async fn read_response(&mut self) -> Result<Vec<u8>> {
        self.buffer.clear();
        loop {
            if let Some(head) = parse_head(&self.buffer)? {
                let total = head.body_start + head.content_length;
                if self.buffer.len() >= total {
                    if head.status != 200 {
                        return Err(Error::HttpError(head.status, head.reason));
                    }
                    let body = self.buffer[head.body_start..total].to_vec();
                    self.buffer.clear();
                    return Ok(body);
                }
            }
            self.fetch_frame().await?;
        }
    }

    /// Reads one frame of data from the server into the buffer.
    async fn fetch_frame(&mut self) -> Result<()> {
        loop {
            self.stream.readable().await?;
            let mut frame = [0_u8; READ_FRAME_SIZE];
            match self.stream.try_read(&mut frame) {
                Ok(0) => {
                    return Err(Error::eof("premature EOF in response"));
                }
                Ok(count) => {
                    log::trace!("conn: received {} bytes", count);
                    self.buffer.extend_from_slice(&frame[..count]);
                    return Ok(());
                }
                Err(err) => {
                    if err.kind() != ErrorKind::WouldBlock {
                        return Err(Error::IoError(err));
                    }
                }
            }
        }
    }

    /// Writes `data` to the server, returning only after it has been written
    /// fully.
    async fn write_to_server(&self, data: &[u8]) -> Result<()> {
        let total_size = data.len();
        let mut written_size = 0;
        loop {
            self.stream.writable().await?;
            match self.stream.try_write(&data[written_size..]) {
                Ok(n) => {
                    written_size += n;
                    if written_size >= total_size {
                        return Ok(());
                    }
                }
                Err(err) => {
                    if err.kind() != ErrorKind::WouldBlock {
                        return Err(Error::from(err));
                    }
                }
            }
        }
    }
}

/// Parsed HTTP response head.
struct ResponseHead {
    status: u16,
    reason: String,
    body_start: usize,
    content_length: usize,
}

/// Parse the status line and headers out of `buffer`, returning `None` when
/// the head has not been fully received yet.
fn parse_head(buffer: &[u8]) -> Result<Option<ResponseHead>> {
    let head_end = match find_subsequence(buffer, b"\r\n\r\n") {
        Some(pos) => pos,
        None => return Ok(None),
    };
    let head = std::str::from_utf8(&buffer[..head_end])
        .map_err(|_| Error::InvalidResponse("response head is not valid utf-8".into()))?;

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next();
    let status: u16 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::InvalidResponse(format!("malformed status line: {}", status_line)))?;
    let reason = parts.next().unwrap_or("").to_owned();

    let mut content_length: Option<usize> = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok();
            }
        }
    }
    let content_length = content_length
        .ok_or_else(|| Error::InvalidResponse("response without content-length".into()))?;

    Ok(Some(ResponseHead {
        status,
        reason,
        body_start: head_end + 4,
        content_length,
    }))
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Take the first command result out of a `runCmds` result array.
fn first_result(mut result: Vec<Value>) -> Result<Value> {
    if result.is_empty() {
        return Err(Error::InvalidResponse("empty result array".into()));
    }
    Ok(result.swap_remove(0))
}

/// Reads are done in sizes of this
const READ_FRAME_SIZE: usize = 2048;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_head_incomplete() {
        let buffer = b"HTTP/1.1 200 OK\r\nContent-Length: 12\r\n";
        assert!(parse_head(buffer)
            .expect("should not have failed parsing")
            .is_none());
    }

    #[test]
    fn test_parse_head_complete() {
        let buffer = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 12\r\n\r\n{\"a\": true}x";
        let head = parse_head(buffer)
            .expect("should not have failed parsing")
            .expect("head should be complete");
        assert_eq!(head.status, 200);
        assert_eq!(head.reason, "OK");
        assert_eq!(head.content_length, 12);
        assert_eq!(&buffer[head.body_start..], b"{\"a\": true}x");
    }

    #[test]
    fn test_parse_head_error_status() {
        let buffer = b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\n\r\n";
        let head = parse_head(buffer)
            .expect("should not have failed parsing")
            .expect("head should be complete");
        assert_eq!(head.status, 401);
        assert_eq!(head.reason, "Unauthorized");
    }

    #[test]
    fn test_parse_head_without_content_length() {
        let buffer = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n";
        assert!(parse_head(buffer).is_err());
    }

    #[test]
    fn test_parse_head_malformed_status_line() {
        let buffer = b"garbage\r\nContent-Length: 0\r\n\r\n";
        assert!(parse_head(buffer).is_err());
    }

    #[test]
    fn test_first_result() {
        assert!(first_result(vec![]).is_err());
        let value = first_result(vec![serde_json::json!({"ok": 1})])
            .expect("should not have failed");
        assert_eq!(value["ok"], 1);
    }
}
