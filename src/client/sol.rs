//! Native SOL balance

use super::context::Context;
use crate::chain::LAMPORTS_PER_SOL;
use crate::utils::error::Result;

pub struct SolClient {
    context: Context,
}

impl SolClient {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// SOL balance of `owner` (default: the wallet)
    pub async fn balance(&self, owner: Option<&str>) -> Result<f64> {
        let owner = self.context.owner_or_self(owner)?;
        let lamports = self.context.rpc().get_balance(&owner.to_string()).await?;
        Ok(lamports as f64 / LAMPORTS_PER_SOL as f64)
    }
}
