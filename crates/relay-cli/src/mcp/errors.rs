//! Error handling utilities for the MCP server

use relay_core::RelayError;
use rmcp::ErrorData;

/// Converts a relay error into an MCP error, keeping input problems
/// distinguishable from internal faults.
pub fn to_mcp_error(message: &str, error: &RelayError) -> ErrorData {
    match error {
        RelayError::InvalidInput { .. } => {
            ErrorData::invalid_params(format!("{message}: {error}"), None)
        }
        _ => ErrorData::internal_error(format!("{message}: {error}"), None),
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_invalid_input_maps_to_invalid_params() {
        let error = RelayError::invalid_input("task").with_reason("cannot be empty");
        let mcp = to_mcp_error("Failed to process task", &error);
        assert_eq!(mcp.code, ErrorCode::INVALID_PARAMS);
        assert!(mcp.message.contains("cannot be empty"));
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error = RelayError::configuration("bad value");
        let mcp = to_mcp_error("Failed to process task", &error);
        assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
    }
}
