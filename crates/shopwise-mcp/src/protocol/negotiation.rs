//! Capability negotiation during initialization.

use crate::types::{Implementation, InitializeParams, InitializeResult, McpResult, MCP_VERSION};

/// Handshake state for one connection.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: Option<Implementation>,
    pub client_protocol: Option<String>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
        }

        match &params.client_info {
            Some(client) => {
                tracing::info!("Initialized with client: {} v{}", client.name, client.version)
            }
            None => tracing::info!("Initialized with unnamed client"),
        }

        self.client = params.client_info;
        self.client_protocol = Some(params.protocol_version);

        Ok(InitializeResult::current())
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }
}
