use super::ui;
use crate::core::config::ExchangeConfig;
use crate::core::exchange::{AmountField, ExchangeFormState, ExchangeType};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::debug;

/// One edit of the exchange form, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRequest {
    pub exchange_type: Option<ExchangeType>,
    pub rate: Option<String>,
    pub usd_amount: Option<String>,
    pub iqd_amount: Option<String>,
    pub disable_auto_calculate: bool,
}

/// Builds the form from configured defaults and applies the requested edit.
pub fn build_form(config: &ExchangeConfig, request: &ExchangeRequest) -> ExchangeFormState {
    let rate = request
        .rate
        .clone()
        .or_else(|| config.default_rate.map(|rate| rate.to_string()))
        .unwrap_or_default();
    let mut form = ExchangeFormState::new(
        request.exchange_type.unwrap_or(config.default_type),
        rate,
        config.auto_calculate && !request.disable_auto_calculate,
    );

    if let Some(usd) = &request.usd_amount {
        form = form.apply_edit(AmountField::Usd, usd);
    }
    if let Some(iqd) = &request.iqd_amount {
        form = form.apply_edit(AmountField::Iqd, iqd);
    }
    debug!("Exchange form after edit: {form:?}");
    form
}

pub fn render_form(form: &ExchangeFormState) -> Result<String> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

    let display = |text: &str| {
        if text.is_empty() {
            Cell::new(ui::style_text("(empty)", ui::StyleType::Subtle))
        } else {
            Cell::new(text)
        }
    };

    table.add_row(vec![Cell::new("Type"), Cell::new(form.exchange_type)]);
    table.add_row(vec![Cell::new("Rate (IQD per USD)"), display(&form.rate)]);
    table.add_row(vec![Cell::new("USD amount"), display(&form.usd_amount)]);
    table.add_row(vec![Cell::new("IQD amount"), display(&form.iqd_amount)]);
    table.add_row(vec![
        Cell::new("Auto-calculate"),
        Cell::new(if form.auto_calculate { "on" } else { "off" }),
    ]);

    let status = match form.to_entry() {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).context("Failed to serialize exchange entry")?;
            format!(
                "{} {}",
                ui::style_text("Ready to submit:", ui::StyleType::TotalLabel),
                ui::style_text(&json, ui::StyleType::TotalValue)
            )
        }
        Err(e) => ui::style_text(&format!("Not ready to submit: {e}"), ui::StyleType::Error),
    };

    Ok(format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Currency exchange", ui::StyleType::Title),
        table,
        status
    ))
}

pub fn run(config: &ExchangeConfig, request: &ExchangeRequest) -> Result<()> {
    let form = build_form(config, request);
    println!("{}", render_form(&form)?);
    Ok(())
}
