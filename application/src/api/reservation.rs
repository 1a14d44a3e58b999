//! [`Reservation`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A booking of a `Room` by a `Customer` for a stay.
#[derive(Clone, Debug, From)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    id: Id,

    /// Underlying [`domain::Reservation`].
    reservation: OnceCell<domain::Reservation>,
}

impl From<domain::Reservation> for Reservation {
    fn from(reservation: domain::Reservation) -> Self {
        Self {
            id: reservation.id.into(),
            reservation: OnceCell::new_with(Some(reservation)),
        }
    }
}

impl Reservation {
    /// Returns the underlying [`domain::Reservation`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Reservation`] doesn't exist.
    async fn reservation(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Reservation, Error> {
        let id = self.id.into();
        self.reservation
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::reservation::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::ReservationError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A booking of a `Room` by a `Customer` for a stay.
#[graphql_object(context = Context)]
impl Reservation {
    /// Unique identifier of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Reserved `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn room(&self, ctx: &Context) -> Result<api::Room, Error> {
        let room_id = self.reservation(ctx).await?.room_id;
        #[expect(
            unsafe_code,
            reason = "`Reservation` references only existing `Room`s"
        )]
        let room = unsafe { api::Room::new_unchecked(room_id) };
        Ok(room)
    }

    /// `Customer` who made this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let customer_id = self.reservation(ctx).await?.customer_id;
        #[expect(
            unsafe_code,
            reason = "`Reservation` references only existing `Customer`s"
        )]
        let customer = unsafe { api::Customer::new_unchecked(customer_id) };
        Ok(customer)
    }

    /// `DateTime` when the stay starts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.start",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn start(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.reservation(ctx).await?.start.coerce())
    }

    /// `DateTime` when the stay ends.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.end",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn end(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.reservation(ctx).await?.end.coerce())
    }

    /// Number of nights of the stay.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.nights",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn nights(&self, ctx: &Context) -> Result<i32, Error> {
        let nights = self.reservation(ctx).await?.nights();
        Ok(i32::try_from(nights).unwrap_or(i32::MAX))
    }

    /// Number of guests staying.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.guests",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn guests(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.reservation(ctx).await?.guests.get().into())
    }

    /// Total price of the stay.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.reservation(ctx).await?.price)
    }

    /// Rating given by the guest after the stay, from 1 to 5 stars.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.rating",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rating(&self, ctx: &Context) -> Result<Option<i32>, Error> {
        Ok(self
            .reservation(ctx)
            .await?
            .rating
            .map(|r| r.get().into()))
    }

    /// Status of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.reservation(ctx).await?.status.into())
    }

    /// `DateTime` when this `Reservation` was made.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.reservation(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Reservation`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::reservation::Id)]
#[into(domain::reservation::Id)]
#[graphql(name = "ReservationId", transparent)]
pub struct Id(Uuid);

/// Status of a `Reservation`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ReservationStatus")]
pub enum Status {
    /// Booked, but the guest hasn't arrived yet.
    Pending,

    /// Guest has arrived and stays in the `Room`.
    CheckedIn,

    /// Guest has left.
    Completed,

    /// Cancelled before the guest left.
    Cancelled,
}

impl From<domain::reservation::Status> for Status {
    fn from(status: domain::reservation::Status) -> Self {
        use domain::reservation::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::CheckedIn => Self::CheckedIn,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::reservation::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::CheckedIn => Self::CheckedIn,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}
