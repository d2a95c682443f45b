use super::{balances, ui};
use crate::core::commission::{CommissionSummary, summarize_commissions};
use crate::core::currency::Currency;
use crate::core::repository::PartnerRepository;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::debug;

pub async fn run(repository: &dyn PartnerRepository, today: NaiveDate) -> Result<()> {
    let pb = ui::new_spinner("Fetching dashboard data...");
    let fetched = futures::try_join!(
        repository.fetch_partner_safes(),
        repository.fetch_commissions()
    );
    pb.finish_and_clear();
    let (safes, commissions) = fetched?;
    debug!(
        "Dashboard fetched {} partner safes and {} commissions",
        safes.len(),
        commissions.len()
    );

    let summary = summarize_commissions(&commissions, today);
    println!("{}", render_commissions(&summary));
    ui::print_separator();
    println!("{}", balances::render_safe_type_totals(&safes));
    Ok(())
}

pub fn render_commissions(summary: &CommissionSummary) -> String {
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Period")];
    header.extend(
        Currency::ALL
            .iter()
            .map(|currency| ui::header_cell(&currency.to_string())),
    );
    table.set_header(header);

    let periods = [
        (format!("Today ({})", summary.date.format("%Y-%m-%d")), &summary.daily),
        (format!("This month ({})", summary.date.format("%Y-%m")), &summary.monthly),
    ];
    for (label, totals) in periods {
        let mut row = vec![Cell::new(label)];
        row.extend(
            Currency::ALL
                .iter()
                .map(|currency| ui::amount_cell(totals.get(*currency), *currency)),
        );
        table.add_row(row);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Commissions", ui::StyleType::Title),
        table
    )
}
