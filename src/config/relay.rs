//! Relay configuration

use serde::Deserialize;

use super::error::ValidationError;

const MAX_BUFFER: usize = 65536;

/// Sizing for the relay actor and connection outboxes
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Queued commands waiting for the relay task
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,

    /// Queued notifications per connection before new ones are dropped
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// Largest accepted WebSocket message in bytes
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl RelayConfig {
    /// Validate relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.command_buffer == 0 || self.command_buffer > MAX_BUFFER {
            return Err(ValidationError::InvalidBufferSize("relay.command_buffer"));
        }
        if self.outbound_buffer == 0 || self.outbound_buffer > MAX_BUFFER {
            return Err(ValidationError::InvalidBufferSize("relay.outbound_buffer"));
        }
        if self.max_message_bytes == 0 {
            return Err(ValidationError::InvalidMessageSize);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            command_buffer: default_command_buffer(),
            outbound_buffer: default_outbound_buffer(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

fn default_command_buffer() -> usize {
    1024
}

fn default_outbound_buffer() -> usize {
    64
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RelayConfig::default();
        assert_eq!(config.command_buffer, 1024);
        assert_eq!(config.outbound_buffer, 64);
        assert_eq!(config.max_message_bytes, 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffers_rejected() {
        let config = RelayConfig {
            outbound_buffer: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidBufferSize("relay.outbound_buffer"))
        );

        let config = RelayConfig {
            command_buffer: MAX_BUFFER + 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidBufferSize("relay.command_buffer"))
        );
    }

    #[test]
    fn test_zero_message_size_rejected() {
        let config = RelayConfig {
            max_message_bytes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMessageSize));
    }
}
