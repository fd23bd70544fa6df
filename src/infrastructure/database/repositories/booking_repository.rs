//! SeaORM implementation of BookingRepository
//!
//! The conditional insert wraps the overlap re-check and the row insert in
//! one database transaction, so two concurrent requests for the same
//! vehicle and overlapping windows can never both commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingQuery, BookingRepository, BookingStatus, InsertOutcome};
use crate::domain::error::ConflictingBooking;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn try_conditional_insert(
        &self,
        b: Booking,
    ) -> Result<InsertOutcome, TransactionError<DbErr>> {
        self.db
            .transaction::<_, InsertOutcome, DbErr>(move |txn| {
                Box::pin(async move {
                    let overlapping = booking::Entity::find()
                        .filter(booking::Column::VehicleId.eq(b.vehicle_id))
                        .filter(booking::Column::Status.eq(BookingStatus::Active.as_str()))
                        .filter(booking::Column::StartTime.lt(b.end_time))
                        .filter(booking::Column::EndTime.gt(b.start_time))
                        .order_by_asc(booking::Column::StartTime)
                        .all(txn)
                        .await?;

                    if !overlapping.is_empty() {
                        return Ok(InsertOutcome::Conflict(
                            overlapping
                                .into_iter()
                                .map(|m| ConflictingBooking {
                                    id: m.id,
                                    start_time: m.start_time,
                                    end_time: m.end_time,
                                })
                                .collect(),
                        ));
                    }

                    domain_to_active_model(&b).insert(txn).await?;
                    Ok(InsertOutcome::Inserted(b))
                })
            })
            .await
    }
}

/// Lock contention between two write transactions. SQLite aborts one of
/// them with a busy error instead of blocking.
fn is_busy(e: &TransactionError<DbErr>) -> bool {
    let msg = e.to_string().to_lowercase();
    msg.contains("database is locked") || msg.contains("busy")
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let status = BookingStatus::parse(&m.status).ok_or_else(|| {
        DomainError::Storage(format!("unknown booking status '{}' for {}", m.status, m.id))
    })?;
    Ok(Booking {
        id: m.id,
        vehicle_id: m.vehicle_id,
        from_pincode: m.from_pincode,
        to_pincode: m.to_pincode,
        start_time: m.start_time,
        end_time: m.end_time,
        customer_id: m.customer_id,
        status,
        estimated_ride_duration_hours: m.estimated_ride_duration_hours,
        created_at: m.created_at,
    })
}

fn domain_to_active_model(b: &Booking) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(b.id),
        vehicle_id: Set(b.vehicle_id),
        from_pincode: Set(b.from_pincode.clone()),
        to_pincode: Set(b.to_pincode.clone()),
        start_time: Set(b.start_time),
        end_time: Set(b.end_time),
        customer_id: Set(b.customer_id.clone()),
        status: Set(b.status.as_str().to_string()),
        estimated_ride_duration_hours: Set(b.estimated_ride_duration_hours),
        created_at: Set(b.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert_if_vacant(&self, b: Booking) -> DomainResult<InsertOutcome> {
        debug!("Conditional insert for booking: {}", b.id);

        match self.try_conditional_insert(b.clone()).await {
            Ok(outcome) => Ok(outcome),
            // Lost a lock race against a concurrent conditional insert.
            // Retry once; the fresh re-check either commits or reports the
            // winner as a conflict.
            Err(e) if is_busy(&e) => {
                debug!("Conditional insert hit lock contention, retrying once");
                self.try_conditional_insert(b)
                    .await
                    .map_err(|e| DomainError::Storage(e.to_string()))
            }
            Err(e) => Err(DomainError::Storage(e.to_string())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_overlapping_active(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::VehicleId.eq(vehicle_id))
            .filter(booking::Column::Status.eq(BookingStatus::Active.as_str()))
            .filter(booking::Column::StartTime.lt(end))
            .filter(booking::Column::EndTime.gt(start))
            .order_by_asc(booking::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_filtered(&self, query: &BookingQuery) -> DomainResult<Vec<Booking>> {
        let mut select = booking::Entity::find();
        if let Some(ref customer_id) = query.customer_id {
            select = select.filter(booking::Column::CustomerId.eq(customer_id.clone()));
        }
        if let Some(status) = query.status {
            select = select.filter(booking::Column::Status.eq(status.as_str()));
        }

        let models = select
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn transition(&self, id: Uuid, to: BookingStatus) -> DomainResult<Booking> {
        if to == BookingStatus::Active {
            return Err(DomainError::Validation(
                "active is not a transition target".to_string(),
            ));
        }
        debug!("Transitioning booking {} to {}", id, to);

        // Compare-and-set in one statement: the status guard in the WHERE
        // clause makes the check and the write indivisible.
        let result = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(to.as_str()))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(BookingStatus::Active.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            })?;

        if result.rows_affected == 0 {
            return Err(match current.status {
                BookingStatus::Cancelled => DomainError::AlreadyCancelled(id),
                BookingStatus::Completed => DomainError::AlreadyCompleted(id),
                BookingStatus::Active => {
                    DomainError::Storage(format!("booking {id} changed during transition"))
                }
            });
        }
        Ok(current)
    }

    async fn find_due_for_completion(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Active.as_str()))
            .filter(booking::Column::EndTime.lte(now))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────
