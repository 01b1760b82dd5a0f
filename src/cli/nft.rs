//! `nft` queries and `bulk-update`

use super::table::{render, render_pairs, render_summary};
use super::{BulkStep, NftCommand, connect, run_options};
use crate::chain::metadata::Metadata;
use crate::client::{Context, NftClient};
use crate::config::Config;
use crate::core::bulk::{MetadataUpdate, SubmitOptions};
use crate::utils::format_block_time;

pub(super) async fn run(config: &Config, command: NftCommand) -> anyhow::Result<()> {
    match command {
        NftCommand::Accounts { env, owner } => {
            let client = NftClient::new(connect(config, &env)?);
            let accounts = client.get_all_nft_accounts_by_owner(owner.as_deref()).await?;
            let rows: Vec<Vec<String>> = accounts
                .into_iter()
                .map(|a| {
                    vec![
                        a.account,
                        a.token,
                        a.token_balance.to_string(),
                        a.hold_by_owner.to_string(),
                    ]
                })
                .collect();
            println!("{}", render(&["account", "token", "balance", "held"], &rows));
        }
        NftCommand::Data { mint, env } => {
            let client = NftClient::new(connect(config, &env)?);
            let metadata = client.get_data(&mint, true).await?;
            println!("{}", render_metadata(&metadata));
        }
        NftCommand::Transactions { mint, env } => {
            let client = NftClient::new(connect(config, &env)?);
            let rows: Vec<Vec<String>> = client
                .get_transactions(&mint)
                .await?
                .into_iter()
                .map(|info| {
                    vec![
                        info.signature,
                        info.slot.to_string(),
                        format_block_time(info.block_time),
                        if info.err.is_some() { "failed" } else { "ok" }.to_string(),
                    ]
                })
                .collect();
            println!("{}", render(&["signature", "slot", "time", "status"], &rows));
        }
        NftCommand::Holders { mint, env } => {
            let client = NftClient::new(connect(config, &env)?);
            let rows: Vec<Vec<String>> = client
                .get_holders(&mint)
                .await?
                .into_iter()
                .map(|holder| vec![holder])
                .collect();
            println!("{}", render(&["holder"], &rows));
        }
        NftCommand::Update {
            mint,
            env,
            name,
            symbol,
            uri,
            fee,
            dry_run,
            skip_confirm,
        } => {
            let client = NftClient::new(connect(config, &env)?);
            let update = MetadataUpdate {
                name,
                symbol,
                uri,
                fee,
                creators: None,
            };
            let signature = client
                .update_token_metadata(&mint, &update, SubmitOptions { dry_run, skip_confirm })
                .await?;
            println!("{}", render_pairs(&[("mint", mint), ("signature", signature)]));
        }
    }
    Ok(())
}

pub(super) async fn bulk_update(context: Context, step: &BulkStep) -> anyhow::Result<()> {
    let job = NftClient::new(context).bulk_update()?;
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

fn render_metadata(metadata: &Metadata) -> String {
    let creators = metadata
        .data
        .creators
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| format!("{} ({}%{})", c.address, c.share, if c.verified { ", verified" } else { "" }))
        .collect::<Vec<_>>()
        .join(", ");
    render_pairs(&[
        ("mint", metadata.mint.to_string()),
        ("update authority", metadata.update_authority.to_string()),
        ("name", metadata.data.name.clone()),
        ("symbol", metadata.data.symbol.clone()),
        ("uri", metadata.data.uri.clone()),
        ("seller fee (bps)", metadata.data.seller_fee_basis_points.to_string()),
        ("creators", creators),
        ("primary sale happened", metadata.primary_sale_happened.to_string()),
        ("mutable", metadata.is_mutable.to_string()),
    ])
}
