//! Implementation of [`SessionClient`] for [`ProcessSessionClient`].

use lsp_types::{
    ClientCapabilities, DocumentFormattingClientCapabilities, DocumentFormattingParams,
    InitializeParams, InitializeResult, InitializedParams, OneOf, TextDocumentClientCapabilities,
    TextEdit,
};
use tracing::debug;

use super::lifecycle::ADAPTER_TARGET;
use super::process::ProcessSessionClient;
use crate::client::{SessionCapabilities, SessionClient, SessionClientError};

impl SessionClient for ProcessSessionClient {
    fn initialize(&mut self) -> Result<SessionCapabilities, SessionClientError> {
        debug!(target: ADAPTER_TARGET, "initializing language server");

        let (child, transport) = self.spawn_process().map_err(|e| {
            SessionClientError::with_source("failed to spawn the language server", e)
        })?;

        self.set_running_state(child, transport);

        let params = InitializeParams {
            process_id: Some(std::process::id()),
            capabilities: ClientCapabilities {
                text_document: Some(TextDocumentClientCapabilities {
                    formatting: Some(DocumentFormattingClientCapabilities::default()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let result: InitializeResult = self
            .send_request("initialize", params)
            .map_err(|e| SessionClientError::with_source("startup handshake failed", e))?;

        self.send_notification("initialized", InitializedParams {})
            .map_err(|e| {
                SessionClientError::with_source("failed to send initialized notification", e)
            })?;

        let formatting_supported = matches!(
            result.capabilities.document_formatting_provider,
            Some(OneOf::Left(true) | OneOf::Right(_))
        );

        debug!(
            target: ADAPTER_TARGET,
            formatting = formatting_supported,
            "language server initialized with capabilities"
        );

        Ok(SessionCapabilities::new(formatting_supported))
    }

    fn format(
        &mut self,
        params: DocumentFormattingParams,
    ) -> Result<Vec<TextEdit>, SessionClientError> {
        self.send_request_optional::<_, Vec<TextEdit>>("textDocument/formatting", params)
            .map(Option::unwrap_or_default)
            .map_err(|e| SessionClientError::with_source("formatting request failed", e))
    }

    fn shutdown(&mut self) -> Result<(), SessionClientError> {
        self.stop();
        Ok(())
    }
}
