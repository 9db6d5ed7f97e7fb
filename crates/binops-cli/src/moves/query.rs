use binops_client::BinopsClient;
use binops_core::MoveStatus;

/// Print move requests, optionally only those in `status`.
///
/// # Errors
///
/// Returns an error if the list cannot be fetched.
pub(crate) async fn run_requests(
    client: &BinopsClient,
    status: Option<MoveStatus>,
) -> anyhow::Result<()> {
    let requests = client.list_move_requests(status).await?;
    if requests.is_empty() {
        println!(
            "no move requests found{}",
            status.map(|s| format!(" with status {s}")).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{:<38}{:<8}{:<12}{:<12}{:<13}ASSIGNED",
        "ID", "BIN #", "DATE", "TYPE", "STATUS"
    );
    for request in &requests {
        let assigned = match (request.assigned_shift(), request.assigned_user()) {
            (Some(shift), _) => format!("shift {shift}"),
            (None, Some(user)) => format!("user {user}"),
            (None, None) => "\u{2014}".to_string(),
        };
        println!(
            "{:<38}{:<8}{:<12}{:<12}{:<13}{}",
            request.id,
            request
                .bin_number
                .map_or_else(|| "\u{2014}".to_string(), |n| n.to_string()),
            super::fmt_day(request.scheduled_at()),
            request.move_type.as_str(),
            request.status.as_str(),
            assigned
        );
    }
    Ok(())
}
