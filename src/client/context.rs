//! Per-environment connection state shared by the clients

use crate::chain::{Keypair, Pubkey};
use crate::config::{BulkConfig, Config, EnvConfig};
use crate::core::bulk::BulkSettings;
use crate::core::confirm::SignatureConfirmer;
use crate::rpc::{HttpRpcClient, HttpRpcConfig, RpcClient};
use crate::utils::error::{Result, SolenError};
use std::sync::Arc;
use tracing::info;

/// Everything a client needs to talk to one cluster as one wallet
#[derive(Clone)]
pub struct Context {
    env: String,
    token: Option<String>,
    rpc: Arc<dyn RpcClient>,
    keypair: Arc<Keypair>,
    bulk: BulkConfig,
}

impl Context {
    pub fn new(
        env: impl Into<String>,
        rpc: Arc<dyn RpcClient>,
        keypair: Keypair,
        bulk: BulkConfig,
    ) -> Self {
        Self {
            env: env.into(),
            token: None,
            rpc,
            keypair: Arc::new(keypair),
            bulk,
        }
    }

    /// Connect to the endpoint configured for `env` (or the default env) and
    /// load its keypair
    pub fn from_config(config: &Config, env: Option<&str>) -> Result<Self> {
        let EnvConfig {
            env,
            rpc_url,
            keypair_path,
            token,
        } = config.env_settings(env)?;

        let keypair = Keypair::read_from_file(&keypair_path)?;
        let rpc = HttpRpcClient::new(HttpRpcConfig::new(&rpc_url)).map_err(|e| {
            SolenError::config(format!("Failed to create RPC client for {}: {}", rpc_url, e))
        })?;
        info!("Solana client env: {} - {}", env, rpc_url);

        Ok(Self {
            env,
            token,
            rpc: Arc::new(rpc),
            keypair: Arc::new(keypair),
            bulk: config.bulk.clone(),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    /// Token mint configured for this environment
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn rpc(&self) -> &Arc<dyn RpcClient> {
        &self.rpc
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn bulk(&self) -> &BulkConfig {
        &self.bulk
    }

    /// Poller with the configured budget, targeting finalized
    pub fn confirmer(&self) -> SignatureConfirmer {
        SignatureConfirmer::new(self.rpc.clone(), self.bulk.poll_config())
    }

    pub fn bulk_settings(&self) -> BulkSettings {
        BulkSettings::new(&self.env, self.bulk.data_folder())
            .with_transient_backoff(self.bulk.transient_backoff())
            .with_batch(self.bulk.batch_config())
    }

    /// Resolve an optional address argument, defaulting to the wallet
    pub fn owner_or_self(&self, owner: Option<&str>) -> Result<Pubkey> {
        match owner {
            Some(owner) => owner.parse(),
            None => Ok(self.pubkey()),
        }
    }
}
