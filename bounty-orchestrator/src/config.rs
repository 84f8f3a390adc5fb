use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, Binary};

use crate::error::OrchestratorError;

/// Micro-units per whole unit of the native asset.
pub const MICRO_UNITS: u64 = 1_000_000;

/// Minimum-balance top-up sent to every freshly deployed escrow.
pub const DEFAULT_APP_FUNDING: u64 = 3 * MICRO_UNITS;

pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 4;

/// Deployment-level settings for the client side of the portal.
#[cw_serde]
#[serde(deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Application id of the singleton bounty manager
    pub manager_app_id: u64,
    #[serde(default = "default_app_funding")]
    pub app_funding: u64,
    #[serde(default = "default_confirmation_rounds")]
    pub confirmation_rounds: u64,
    /// Native denomination escrows pay their reward in
    pub denom: String,
    /// Content gateway prefix, e.g. `https://gateway.example/ipfs/`
    pub gateway_url: String,
    pub approval_program: Binary,
    pub clear_program: Binary,
}

fn default_app_funding() -> u64 {
    DEFAULT_APP_FUNDING
}

fn default_confirmation_rounds() -> u64 {
    DEFAULT_CONFIRMATION_ROUNDS
}

impl OrchestratorConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self, OrchestratorError> {
        let config: OrchestratorConfig =
            from_json(bytes).map_err(|e| OrchestratorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.manager_app_id == 0 {
            return Err(OrchestratorError::Config(
                "manager_app_id must be set".to_string(),
            ));
        }
        if self.denom.is_empty() {
            return Err(OrchestratorError::Config("denom must be set".to_string()));
        }
        if self.confirmation_rounds == 0 {
            return Err(OrchestratorError::Config(
                "confirmation_rounds must be at least 1".to_string(),
            ));
        }
        if self.approval_program.is_empty() || self.clear_program.is_empty() {
            return Err(OrchestratorError::Config(
                "escrow programs must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Public URL of pinned content.
    pub fn image_url(&self, cid: &str) -> String {
        format!("{}/{}", self.gateway_url.trim_end_matches('/'), cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "manager_app_id": 1001,
        "denom": "ustake",
        "gateway_url": "https://gateway.example/ipfs/",
        "approval_program": "AQID",
        "clear_program": "AQ=="
    }"#;

    #[test]
    fn defaults_are_applied() {
        let config = OrchestratorConfig::from_json(CONFIG.as_bytes()).unwrap();
        assert_eq!(config.manager_app_id, 1001);
        assert_eq!(config.app_funding, 3_000_000);
        assert_eq!(config.confirmation_rounds, 4);
        assert_eq!(config.approval_program.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn image_url_joins_gateway_and_cid() {
        let config = OrchestratorConfig::from_json(CONFIG.as_bytes()).unwrap();
        assert_eq!(
            config.image_url("bafyabc"),
            "https://gateway.example/ipfs/bafyabc"
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = CONFIG.replace("\"manager_app_id\"", "\"extra\": 1, \"manager_app_id\"");
        assert!(matches!(
            OrchestratorConfig::from_json(json.as_bytes()),
            Err(OrchestratorError::Config(_))
        ));
    }

    #[test]
    fn misspelled_field_does_not_fall_back_to_default() {
        let json = CONFIG.replace("\"denom\"", "\"app_fundng\": 5000000, \"denom\"");
        assert!(matches!(
            OrchestratorConfig::from_json(json.as_bytes()),
            Err(OrchestratorError::Config(_))
        ));
    }

    #[test]
    fn missing_denom_is_rejected() {
        let json = CONFIG.replace("\"ustake\"", "\"\"");
        assert_eq!(
            OrchestratorConfig::from_json(json.as_bytes()),
            Err(OrchestratorError::Config("denom must be set".to_string()))
        );
    }

    #[test]
    fn zero_manager_is_rejected() {
        let json = CONFIG.replace("1001", "0");
        assert!(matches!(
            OrchestratorConfig::from_json(json.as_bytes()),
            Err(OrchestratorError::Config(_))
        ));
    }
}
