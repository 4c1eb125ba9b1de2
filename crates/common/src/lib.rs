// ================
// crates/common/src/lib.rs
// ================
//! Common types and structures
//! shared between the risk-register client surfaces and the login core.
//! This module defines the login/logout reply shapes and the request/response
//! contracts of the risk-analysis collaborator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Epoch milliseconds, the unit every persisted instant is stored in
pub type EpochMillis = i64;

/// Value shown in a register cell the collaborator could not fill
pub const TREATMENT_PLACEHOLDER: &str = "-";

/// Maximum number of analysis items turned into register rows per asset
pub const MAX_ITEMS_PER_ASSET: usize = 5;

// ============================================================================
// Login surface
// ============================================================================

/// Reply of a successful `login`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginSuccess {
    pub success: bool,
    pub user: String,
    pub token: String,
    pub expires_at: EpochMillis,
}

impl LoginSuccess {
    pub fn new(user: String, token: String, expires_at: EpochMillis) -> Self {
        Self {
            success: true,
            user,
            token,
            expires_at,
        }
    }
}

/// Rejection of a `login` call
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginFailure {
    pub success: bool,
    pub message: String,
}

impl LoginFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Reply of `logout`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutResponse {
    pub success: bool,
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

// ============================================================================
// Risk-analysis collaborator contracts
// ============================================================================

/// Validation failures of collaborator requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("the 'activo' field is required")]
    MissingAsset,

    #[error("'activo', 'riesgo' and 'impacto' are all required")]
    IncompleteTreatmentRequest,
}

/// Body of the risk-analysis request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRisksRequest {
    #[serde(rename = "activo")]
    pub asset: String,
}

impl AnalyzeRisksRequest {
    /// Build a request, trimming the asset name. Blank names are refused.
    pub fn new(asset: &str) -> Result<Self, RequestError> {
        let asset = asset.trim();
        if asset.is_empty() {
            return Err(RequestError::MissingAsset);
        }
        Ok(Self {
            asset: asset.to_string(),
        })
    }
}

/// One suggested risk and its impact
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RiskItem {
    #[serde(rename = "riesgo")]
    pub risk: String,
    #[serde(rename = "impacto")]
    pub impact: String,
}

/// Reply of the risk-analysis endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyzeRisksResponse {
    #[serde(rename = "activo", default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default)]
    pub items: Vec<RiskItem>,
}

/// Body of the treatment-recommendation request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TreatmentRequest {
    #[serde(rename = "activo")]
    pub asset: String,
    #[serde(rename = "riesgo")]
    pub risk: String,
    #[serde(rename = "impacto")]
    pub impact: String,
}

impl TreatmentRequest {
    pub fn new(asset: &str, risk: &str, impact: &str) -> Result<Self, RequestError> {
        let (asset, risk, impact) = (asset.trim(), risk.trim(), impact.trim());
        if asset.is_empty() || risk.is_empty() || impact.is_empty() {
            return Err(RequestError::IncompleteTreatmentRequest);
        }
        Ok(Self {
            asset: asset.to_string(),
            risk: risk.to_string(),
            impact: impact.to_string(),
        })
    }
}

/// Reply of the treatment-recommendation endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TreatmentResponse {
    #[serde(rename = "tratamiento", default)]
    pub treatment: Option<String>,
}

impl TreatmentResponse {
    /// The recommended treatment, or the placeholder when the reply is empty
    pub fn treatment_or_placeholder(&self) -> String {
        match self.treatment.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => TREATMENT_PLACEHOLDER.to_string(),
        }
    }
}

// ============================================================================
// Register rows
// ============================================================================

/// A row of the risk register table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RiskRow {
    pub key: String,
    #[serde(rename = "activo")]
    pub asset: String,
    #[serde(rename = "riesgo")]
    pub risk: String,
    #[serde(rename = "impacto")]
    pub impact: String,
    #[serde(rename = "tratamiento")]
    pub treatment: String,
}

impl RiskRow {
    /// Turn an analysis reply into register rows.
    ///
    /// At most [`MAX_ITEMS_PER_ASSET`] items are used. Keys are numbered
    /// consecutively starting at `next_key`, and every row starts with the
    /// placeholder treatment.
    pub fn from_analysis(next_key: u64, asset: &str, response: &AnalyzeRisksResponse) -> Vec<Self> {
        response
            .items
            .iter()
            .take(MAX_ITEMS_PER_ASSET)
            .enumerate()
            .map(|(idx, item)| Self {
                key: (next_key + idx as u64).to_string(),
                asset: asset.to_string(),
                risk: item.risk.clone(),
                impact: item.impact.clone(),
                treatment: TREATMENT_PLACEHOLDER.to_string(),
            })
            .collect()
    }

    /// Whether a recommendation still has to be requested for this row
    pub fn needs_treatment(&self) -> bool {
        self.treatment.is_empty() || self.treatment == TREATMENT_PLACEHOLDER
    }

    /// Request for this row's treatment recommendation
    pub fn treatment_request(&self) -> Result<TreatmentRequest, RequestError> {
        TreatmentRequest::new(&self.asset, &self.risk, &self.impact)
    }

    /// Apply a collaborator reply. A failed call (`None`) keeps whatever the
    /// row already shows, falling back to the placeholder.
    pub fn apply_treatment(&mut self, response: Option<&TreatmentResponse>) {
        self.treatment = match response {
            Some(resp) => resp.treatment_or_placeholder(),
            None if self.treatment.is_empty() => TREATMENT_PLACEHOLDER.to_string(),
            None => return,
        };
    }
}
