use super::ui;
use crate::core::balance::{aggregate_by_safe_type, grand_total};
use crate::core::currency::{Currency, CurrencyTotals};
use crate::core::partner::{PartnerSafeRecord, SafeTypeKind};
use crate::core::repository::PartnerRepository;
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

pub async fn run(repository: &dyn PartnerRepository, show_partners: bool) -> Result<()> {
    let pb = ui::new_spinner("Fetching partner safes...");
    let records = repository.fetch_partner_safes().await;
    pb.finish_and_clear();
    let records = records?;
    debug!("Fetched {} partner safes", records.len());

    if show_partners {
        println!("{}", render_partner_safes(&records));
        ui::print_separator();
    }
    println!("{}", render_safe_type_totals(&records));
    Ok(())
}

fn currency_headers(first: &str) -> Vec<Cell> {
    let mut header = vec![ui::header_cell(first)];
    header.extend(
        Currency::ALL
            .iter()
            .map(|currency| ui::header_cell(&currency.to_string())),
    );
    header
}

fn currency_cells(totals: &CurrencyTotals, bold: bool) -> Vec<Cell> {
    Currency::ALL
        .iter()
        .map(|currency| {
            let amount = totals.get(*currency);
            if bold {
                ui::total_amount_cell(amount, *currency)
            } else {
                ui::amount_cell(amount, *currency)
            }
        })
        .collect()
}

/// Renders one row per safe-type with its summed balances and an office-wide total.
pub fn render_safe_type_totals(records: &[PartnerSafeRecord]) -> String {
    let totals = aggregate_by_safe_type(records);

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Balances by safe type", ui::StyleType::Title)
    );

    if totals.is_empty() {
        output.push_str(&ui::style_text("No partner safes found", ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(currency_headers("Safe type"));
    for (name, total) in &totals {
        let mut row = vec![Cell::new(name)];
        row.extend(currency_cells(total, false));
        table.add_row(row);
    }

    let overall = grand_total(&totals);
    let mut row = vec![Cell::new(ui::style_text("Total", ui::StyleType::TotalLabel))];
    row.extend(currency_cells(&overall, true));
    table.add_row(row);

    output.push_str(&table.to_string());
    output
}

/// Renders every partner safe, grouped by safe-type name.
pub fn render_partner_safes(records: &[PartnerSafeRecord]) -> String {
    let mut sorted: Vec<&PartnerSafeRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.safe_type_name
            .cmp(&b.safe_type_name)
            .then_with(|| a.partner_name.cmp(&b.partner_name))
    });

    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Partner"),
        ui::header_cell("Phone"),
        ui::header_cell("Kind"),
    ];
    header.extend(currency_headers("Safe type"));
    table.set_header(header);

    for record in sorted {
        let kind = match record.safe_type_kind {
            SafeTypeKind::Crypto => "Crypto",
            SafeTypeKind::Physical => "Physical",
        };
        let mut row = vec![
            Cell::new(&record.partner_name),
            ui::format_optional_cell(record.partner_phone.as_deref()),
            Cell::new(kind),
            Cell::new(&record.safe_type_name),
        ];
        row.extend(Currency::ALL.iter().map(|c| ui::amount_cell(record.total(*c), *c)));
        table.add_row(row);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Partner safes", ui::StyleType::Title),
        table
    )
}
