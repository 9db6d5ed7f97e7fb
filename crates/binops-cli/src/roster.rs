//! Read-only views of the shifts, routes and users an operator assigns to.

use binops_client::BinopsClient;

/// Print every shift with its driver and progress.
///
/// # Errors
///
/// Returns an error if the shift list cannot be fetched.
pub(crate) async fn run_shifts(client: &BinopsClient) -> anyhow::Result<()> {
    let shifts = client.get_shifts().await?;
    if shifts.is_empty() {
        println!("no shifts found");
        return Ok(());
    }

    println!(
        "{:<38}{:<12}{:<11}{:<24}PROGRESS",
        "ID", "DATE", "STATUS", "DRIVER"
    );
    for shift in &shifts {
        println!(
            "{:<38}{:<12}{:<11}{:<24}{}/{}",
            shift.id,
            shift.date,
            shift.status.as_str(),
            shift.driver_label(),
            shift.bins_collected,
            shift.bin_count
        );
    }
    Ok(())
}

/// Print the stops a driver has not completed yet, in route order.
///
/// # Errors
///
/// Returns an error if the driver's route cannot be fetched.
pub(crate) async fn run_stops(client: &BinopsClient, driver_id: &str) -> anyhow::Result<()> {
    let details = client.get_shift_details_by_driver_id(driver_id).await?;
    let remaining = details.remaining();
    if remaining.is_empty() {
        println!("driver {driver_id} has no remaining stops");
        return Ok(());
    }

    println!("{:<6}{:<38}{:<8}STREET", "SEQ", "BIN ID", "BIN #");
    for stop in &remaining {
        println!(
            "{:<6}{:<38}{:<8}{}",
            stop.sequence_order,
            stop.bin_id,
            stop.bin_number.map_or_else(|| "\u{2014}".to_string(), |n| n.to_string()),
            stop.current_street.as_deref().unwrap_or("\u{2014}")
        );
    }
    Ok(())
}

/// Print all users.
///
/// # Errors
///
/// Returns an error if the user list cannot be fetched.
pub(crate) async fn run_users(client: &BinopsClient) -> anyhow::Result<()> {
    let users = client.get_users().await?;
    println!("{:<38}{:<24}{:<10}EMAIL", "ID", "NAME", "ROLE");
    for user in &users {
        println!(
            "{:<38}{:<24}{:<10}{}",
            user.id,
            user.name,
            user.role.as_deref().unwrap_or("\u{2014}"),
            user.email.as_deref().unwrap_or("\u{2014}")
        );
    }
    Ok(())
}
