//! Messaging limits

use serde::Deserialize;

use super::error::ValidationError;

/// Limits applied by the router, the retrieval API and the connection hub.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Messages returned by the "latest" queries
    #[serde(default = "default_live_window")]
    pub live_window: u32,

    /// Archived messages per page
    #[serde(default = "default_archive_page_size")]
    pub archive_page_size: u32,

    /// Outbound events buffered per connection before drops
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,

    /// Rooms accepted by one summary request
    #[serde(default = "default_max_summary_rooms")]
    pub max_summary_rooms: usize,
}

impl MessagingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.live_window == 0 || self.live_window > 1_000 {
            return Err(ValidationError::LimitOutOfRange("live_window", 1_000));
        }
        if self.archive_page_size == 0 || self.archive_page_size > 1_000 {
            return Err(ValidationError::LimitOutOfRange("archive_page_size", 1_000));
        }
        if self.connection_buffer == 0 || self.connection_buffer > 65_536 {
            return Err(ValidationError::LimitOutOfRange("connection_buffer", 65_536));
        }
        if self.max_summary_rooms == 0 || self.max_summary_rooms > 10_000 {
            return Err(ValidationError::LimitOutOfRange("max_summary_rooms", 10_000));
        }
        Ok(())
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            live_window: default_live_window(),
            archive_page_size: default_archive_page_size(),
            connection_buffer: default_connection_buffer(),
            max_summary_rooms: default_max_summary_rooms(),
        }
    }
}

fn default_live_window() -> u32 {
    50
}

fn default_archive_page_size() -> u32 {
    50
}

fn default_connection_buffer() -> usize {
    128
}

fn default_max_summary_rooms() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MessagingConfig::default();
        assert_eq!(config.live_window, 50);
        assert_eq!(config.archive_page_size, 50);
        assert_eq!(config.connection_buffer, 128);
        assert_eq!(config.max_summary_rooms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_live_window_is_rejected() {
        let config = MessagingConfig {
            live_window: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::LimitOutOfRange("live_window", 1_000))
        );
    }

    #[test]
    fn oversized_summary_bound_is_rejected() {
        let config = MessagingConfig {
            max_summary_rooms: 20_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
