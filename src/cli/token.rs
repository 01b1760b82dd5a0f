//! `balance`, `transfer` and `bulk-transfer`

use super::table::{render_pairs, render_summary};
use super::{BulkStep, EnvArgs, run_options};
use crate::client::{Context, SolClient, TokenClient};
use crate::core::bulk::SubmitOptions;
use crate::utils::format_amount;
use anyhow::Context as _;

pub(super) async fn balance(
    context: &Context,
    env: &EnvArgs,
    wallet: Option<&str>,
    sol: bool,
) -> anyhow::Result<()> {
    let owner = context.owner_or_self(wallet)?.to_string();
    let pairs = if sol {
        let balance = SolClient::new(context.clone()).balance(Some(&owner)).await?;
        vec![("wallet", owner), ("SOL", format_amount(balance, 9))]
    } else {
        let client = TokenClient::new(context.clone(), env.token.as_deref()).await?;
        let balance = client.balance(Some(&owner)).await?;
        vec![
            ("wallet", owner),
            ("token", client.mint().to_string()),
            ("balance", format_amount(balance, usize::from(client.decimals()))),
        ]
    };
    println!("{}", render_pairs(&pairs));
    Ok(())
}

pub(super) async fn transfer(
    context: &Context,
    env: &EnvArgs,
    wallet: &str,
    amount: f64,
    dry_run: bool,
    skip_confirm: bool,
) -> anyhow::Result<()> {
    let client = TokenClient::new(context.clone(), env.token.as_deref()).await?;
    let signature = client
        .transfer_token(wallet, amount, SubmitOptions { dry_run, skip_confirm })
        .await
        .with_context(|| format!("Failed to transfer {} to {}", amount, wallet))?;
    println!(
        "{}",
        render_pairs(&[
            ("dest", wallet.to_string()),
            ("amount", amount.to_string()),
            ("signature", signature),
        ])
    );
    Ok(())
}

pub(super) async fn bulk_transfer(
    context: Context,
    env: &EnvArgs,
    step: &BulkStep,
) -> anyhow::Result<()> {
    let client = TokenClient::new(context, env.token.as_deref()).await?;
    let job = client.bulk_transfer()?;
    let csv = &step.args().csv;

    match step {
        BulkStep::Init(_) => {
            job.init(csv).await?;
        }
        BulkStep::Run { .. } => {
            let options = run_options(step).unwrap_or_default();
            job.run(csv, options).await?;
        }
        BulkStep::Confirm(_) => {
            job.confirm(csv).await?;
        }
        BulkStep::Status(_) => {}
    }
    println!("{}", render_summary(&job.status(csv).await?));
    Ok(())
}
