// ABOUTME: Newline-delimited JSON-RPC transport over any async reader and writer
// ABOUTME: Drives the request processor sequentially; stdin/stdout in production
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Stdio Transport
//!
//! One JSON message per line in, one JSON response per line out. Only
//! protocol traffic is written; logs go to stderr.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::request_processor::McpRequestProcessor;
use crate::errors::AppResult;
use crate::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};

/// Line-oriented MCP transport
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
    processor: Arc<McpRequestProcessor>,
}

impl StdioTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Transport over the process's stdin and stdout
    #[must_use]
    pub fn stdio(processor: Arc<McpRequestProcessor>) -> Self {
        Self::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            processor,
        )
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Transport over an arbitrary reader and writer
    pub const fn new(reader: R, writer: W, processor: Arc<McpRequestProcessor>) -> Self {
        Self {
            reader,
            writer,
            processor,
        }
    }

    /// Serve requests until the reader reaches EOF
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the stream fails
    pub async fn run(self) -> AppResult<()> {
        info!("MCP stdio transport ready - listening on stdin/stdout");

        let Self {
            mut reader,
            mut writer,
            processor,
        } = self;
        let mut line = Vec::new();
        let mut handled = 0_u64;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            if line.trim_ascii().is_empty() {
                continue;
            }

            if let Some(response) = Self::process_line(&processor, &line).await {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                writer.write_all(&encoded).await?;
                writer.flush().await?;
            }
            handled += 1;
        }

        info!(messages = handled, "MCP client closed the stream");
        Ok(())
    }

    /// Bytes that are not UTF-8 JSON get a parse error; the session goes on
    async fn process_line(processor: &McpRequestProcessor, line: &[u8]) -> Option<JsonRpcResponse> {
        let message = match serde_json::from_slice::<Value>(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Invalid JSON-RPC message: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = message.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => processor.handle_request(request).await,
            Err(e) => {
                debug!("Malformed JSON-RPC request: {}", e);
                Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                ))
            }
        }
    }
}
