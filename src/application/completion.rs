//! Background task that completes overdue bookings.
//!
//! Runs in a tokio::spawn loop, periodically flipping active bookings whose
//! end time has passed to `completed`. The booking engine itself never
//! drives time-based transitions.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::domain::{BookingStatus, DomainError, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Start the booking completion background task.
pub fn start_completion_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "Booking completion task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = complete_due_bookings(&repos).await {
                        warn!(error = %e, "Booking completion check error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Booking completion task shutting down");
                    break;
                }
            }
        }

        info!("Booking completion task stopped");
    });
}

async fn complete_due_bookings(
    repos: &Arc<dyn RepositoryProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let due = repos.bookings().find_due_for_completion(Utc::now()).await?;

    if due.is_empty() {
        return Ok(());
    }

    info!(count = due.len(), "Completing overdue bookings");

    for booking in due {
        match repos
            .bookings()
            .transition(booking.id, BookingStatus::Completed)
            .await
        {
            Ok(_) => {}
            // Lost the race to a concurrent cancel or an earlier sweep;
            // the terminal state stands.
            Err(DomainError::AlreadyCancelled(_)) | Err(DomainError::AlreadyCompleted(_)) => {}
            Err(e) => warn!(booking_id = %booking.id, error = %e, "Failed to complete booking"),
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
