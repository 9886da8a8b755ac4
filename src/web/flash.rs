//! Flash messages
//!
//! One-shot notices shown on the next rendered page ("Site config added
//! successfully.", "Invalid email or password."). They ride in the session
//! under a single key as a JSON list and are drained when a page renders.

use serde::{Deserialize, Serialize};

use crate::traits::session::SessionData;

const FLASH_KEY: &str = "_flashes";

/// A pending notice with a display category the stylesheet knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: "danger".to_string(),
            message: message.into(),
        }
    }
}

/// Append a flash to the session's pending list.
pub fn push_flash(data: &mut SessionData, flash: Flash) {
    let mut flashes = peek_flashes(data);
    flashes.push(flash);
    match serde_json::to_string(&flashes) {
        Ok(encoded) => data.set(FLASH_KEY.to_string(), encoded),
        Err(error) => tracing::error!(error = %error, "Failed to encode flash messages"),
    }
}

/// Remove and return all pending flashes.
pub fn take_flashes(data: &mut SessionData) -> Vec<Flash> {
    match data.remove(FLASH_KEY) {
        Some(encoded) => decode(&encoded),
        None => Vec::new(),
    }
}

fn peek_flashes(data: &SessionData) -> Vec<Flash> {
    data.get(FLASH_KEY).map(|s| decode(s)).unwrap_or_default()
}

fn decode(encoded: &str) -> Vec<Flash> {
    // A corrupt list is dropped rather than breaking the page
    serde_json::from_str(encoded).unwrap_or_default()
}

// ============================================================================
// Flash tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session() -> SessionData {
        SessionData::new(Duration::from_secs(60))
    }

    #[test]
    fn test_push_then_take() {
        let mut data = session();
        push_flash(&mut data, Flash::danger("Site config not found."));
        push_flash(&mut data, Flash::success("Site config added successfully."));

        let flashes = take_flashes(&mut data);
        assert_eq!(
            flashes,
            vec![
                Flash::danger("Site config not found."),
                Flash::success("Site config added successfully."),
            ]
        );
    }

    #[test]
    fn test_take_drains() {
        let mut data = session();
        push_flash(&mut data, Flash::success("once"));

        assert_eq!(take_flashes(&mut data).len(), 1);
        assert!(take_flashes(&mut data).is_empty());
    }

    #[test]
    fn test_empty_session_has_no_flashes() {
        let mut data = session();
        assert!(take_flashes(&mut data).is_empty());
    }

    #[test]
    fn test_corrupt_payload_is_dropped() {
        let mut data = session();
        data.set(FLASH_KEY.to_string(), "not json".to_string());
        assert!(take_flashes(&mut data).is_empty());
    }
}
