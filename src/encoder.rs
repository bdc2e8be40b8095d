//! Payload encoding
//!
//! Wraps a view projection with producer metadata so front ends receive a
//! self-describing JSON document.

use crate::dashboard::{DashboardState, ViewMode, ViewProjection};
use crate::error::RoiError;
use crate::{PRODUCER_NAME, ROI_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current payload schema version
pub const PAYLOAD_SCHEMA_VERSION: &str = "roi.view.v1";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// A projected view ready to hand to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub schema_version: String,
    pub producer: PayloadProducer,
    pub computed_at_utc: String,
    pub view: ViewMode,
    pub projection: ViewProjection,
}

/// Encoder for producing view payloads
pub struct DashboardEncoder {
    instance_id: String,
}

impl Default for DashboardEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode the currently selected view
    pub fn encode(&self, state: &DashboardState) -> Result<DashboardPayload, RoiError> {
        self.encode_view(state, state.view())
    }

    /// Encode a specific view
    pub fn encode_view(
        &self,
        state: &DashboardState,
        view: ViewMode,
    ) -> Result<DashboardPayload, RoiError> {
        let projection = state.project_view(view)?;

        Ok(DashboardPayload {
            schema_version: PAYLOAD_SCHEMA_VERSION.to_string(),
            producer: PayloadProducer {
                name: PRODUCER_NAME.to_string(),
                version: ROI_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            view,
            projection,
        })
    }

    /// Encode to a compact JSON string
    pub fn encode_to_json(&self, state: &DashboardState) -> Result<String, RoiError> {
        let payload = self.encode(state)?;
        serde_json::to_string(&payload).map_err(RoiError::JsonError)
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json_pretty(&self, state: &DashboardState) -> Result<String, RoiError> {
        let payload = self.encode(state)?;
        serde_json::to_string_pretty(&payload).map_err(RoiError::JsonError)
    }
}
