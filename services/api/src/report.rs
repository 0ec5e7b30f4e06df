use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use prohibition_review::error::AppError;
use prohibition_review::review::{localize_date, review_now, ProhibitionPolicy, ReviewWindow};
use prohibition_review::vips::format_vips_datetime;

#[derive(Args, Debug)]
pub(crate) struct WindowReportArgs {
    /// Prohibition notice type code (UL, IRP or ADP)
    #[arg(long)]
    pub(crate) prohibition_type: String,
    /// Date the prohibition was served (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) service_date: NaiveDate,
    /// Evaluate as of this date or YYYY-MM-DDTHH:MM:SS (defaults to now in Vancouver)
    #[arg(long, value_parser = crate::infra::parse_moment)]
    pub(crate) today: Option<NaiveDateTime>,
}

#[derive(Args, Debug)]
pub(crate) struct FeeReportArgs {
    /// Prohibition notice type code (UL, IRP or ADP)
    #[arg(long)]
    pub(crate) prohibition_type: String,
    /// Presentation type code (WRIT or ORAL)
    #[arg(long)]
    pub(crate) presentation_type: String,
}

pub(crate) fn run_window_report(args: WindowReportArgs) -> Result<(), AppError> {
    let WindowReportArgs {
        prohibition_type,
        service_date,
        today,
    } = args;

    let policy = ProhibitionPolicy::try_resolve(&prohibition_type)?;
    let today = today.unwrap_or_else(review_now);
    let window = policy.review_window(&localize_date(service_date)?, today)?;

    print!("{}", render_window_report(&policy, &window));
    Ok(())
}

pub(crate) fn run_fee_report(args: FeeReportArgs) -> Result<(), AppError> {
    let policy = ProhibitionPolicy::try_resolve(&args.prohibition_type)?;
    println!("{}", render_fee_report(&policy, &args.presentation_type));
    Ok(())
}

fn render_window_report(policy: &ProhibitionPolicy, window: &ReviewWindow) -> String {
    let mut out = format!("Review window: {}\n", policy.kind.label());
    out.push_str(&format!(
        "  Earliest: {}\n",
        format_vips_datetime(&window.minimum_date)
    ));
    out.push_str(&format!(
        "  Latest:   {}\n",
        format_vips_datetime(&window.maximum_date)
    ));

    if window.is_degenerate() {
        out.push_str("  Legislated window has passed; only the earliest possible date remains.\n");
    }

    let days: Vec<String> = window
        .review_days()
        .map(|day| day.format("%a %b %-d").to_string())
        .collect();
    if days.is_empty() {
        out.push_str("  No business days fall inside the window.\n");
    } else {
        out.push_str(&format!("  Business days ({}):\n", days.len()));
        for day in days {
            out.push_str(&format!("    - {day}\n"));
        }
    }
    out
}

fn render_fee_report(policy: &ProhibitionPolicy, presentation_type: &str) -> String {
    match policy.amount_due(presentation_type) {
        Some(amount) => format!(
            "{} review fee for '{}': ${amount}",
            policy.kind.label(),
            presentation_type
        ),
        None => format!(
            "No fee applies to '{}' for {} reviews",
            presentation_type,
            policy.kind.label()
        ),
    }
}
