//! [`Room`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, occupancy, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A hotel room.
#[derive(Clone, Debug, From)]
pub struct Room {
    /// ID of this [`Room`].
    id: Id,

    /// Underlying [`domain::Room`].
    room: OnceCell<domain::Room>,
}

impl From<domain::Room> for Room {
    fn from(room: domain::Room) -> Self {
        Self {
            id: room.id.into(),
            room: OnceCell::new_with(Some(room)),
        }
    }
}

impl Room {
    /// Creates a new [`Room`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Room`] with the provided ID exists,
    /// otherwise accessing this [`Room`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            room: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Room`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Room`] doesn't exist.
    async fn room(&self, ctx: &Context) -> Result<&domain::Room, Error> {
        let id = self.id.into();
        self.room
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::room::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::RoomError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A hotel room.
#[graphql_object(context = Context)]
impl Room {
    /// Unique identifier of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Number of this `Room`, unique across the hotel.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number(&self, ctx: &Context) -> Result<Number, Error> {
        Ok(self.room(ctx).await?.number.clone().into())
    }

    /// Kind of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<Kind, Error> {
        Ok(self.room(ctx).await?.kind.into())
    }

    /// Floor this `Room` is located on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.floor",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn floor(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.room(ctx).await?.floor.into())
    }

    /// Maximum number of guests this `Room` fits.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.capacity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn capacity(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.room(ctx).await?.capacity.get().into())
    }

    /// Price of a single night in this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.room(ctx).await?.price)
    }

    /// Description of this `Room`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.room(ctx).await?.description.clone().map(Into::into))
    }

    /// Amenities this `Room` is equipped with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.amenities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amenities(
        &self,
        ctx: &Context,
    ) -> Result<Vec<Amenity>, Error> {
        Ok(self
            .room(ctx)
            .await?
            .amenities
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `DateTime` when this `Room` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.room(ctx).await?.created_at.coerce())
    }

    /// Current status of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        ctx.service()
            .execute(query::RoomStatus {
                room_id: self.id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|out| out.status.into())
    }

    /// `Reservation`s of this `Room`, ordered by their start.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.reservations",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn reservations(
        &self,
        status: Option<api::reservation::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::Reservation>, Error> {
        ctx.service()
            .execute(query::reservations::List::by(
                read::reservation::list::Filter {
                    room_id: Some(self.id.into()),
                    status: status.map(Into::into),
                    ..read::reservation::list::Filter::default()
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// `MaintenanceIssue`s reported for this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.maintenanceIssues",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn maintenance_issues(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceIssue>, Error> {
        ctx.service()
            .execute(query::maintenance_issues::List::by(
                read::maintenance_issue::list::Filter {
                    room_id: Some(self.id.into()),
                    overlapping: None,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|is| is.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Room`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::room::Id)]
#[into(domain::room::Id)]
#[graphql(name = "RoomId", transparent)]
pub struct Id(Uuid);

/// Number of a `Room`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RoomNumber", with = scalar::Via::<domain::room::Number>)]
pub struct Number(domain::room::Number);

/// Description of a `Room`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RoomDescription",
    with = scalar::Via::<domain::room::Description>,
)]
pub struct Description(domain::room::Description);

/// Amenity of a `Room`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RoomAmenity", with = scalar::Via::<domain::room::Amenity>)]
pub struct Amenity(domain::room::Amenity);

/// Kind of a `Room`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RoomKind")]
pub enum Kind {
    /// Room with a single bed for one guest.
    Single,

    /// Room with one double bed.
    Double,

    /// Room with two separate beds.
    Twin,

    /// Suite with a separate living area.
    Suite,

    /// Family room with extra beds.
    Family,
}

impl From<domain::room::Kind> for Kind {
    fn from(kind: domain::room::Kind) -> Self {
        use domain::room::Kind as K;
        match kind {
            K::Single => Self::Single,
            K::Double => Self::Double,
            K::Twin => Self::Twin,
            K::Suite => Self::Suite,
            K::Family => Self::Family,
        }
    }
}

impl From<Kind> for domain::room::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Single => Self::Single,
            Kind::Double => Self::Double,
            Kind::Twin => Self::Twin,
            Kind::Suite => Self::Suite,
            Kind::Family => Self::Family,
        }
    }
}

/// Status of a `Room` at some instant.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RoomStatus")]
pub enum Status {
    /// Free for booking.
    Available,

    /// Held by a pending or checked-in `Reservation`.
    Occupied,

    /// Out of service because of an active `MaintenanceIssue`.
    Maintenance,
}

impl From<occupancy::Status> for Status {
    fn from(status: occupancy::Status) -> Self {
        use occupancy::Status as S;
        match status {
            S::Available => Self::Available,
            S::Occupied => Self::Occupied,
            S::Maintenance => Self::Maintenance,
        }
    }
}

pub mod status {
    //! Definitions related to the current [`Status`] of a [`Room`].

    use common::DateTime;
    use juniper::graphql_object;
    use service::query;

    use super::{Room, Status};
    use crate::{api, Context};

    /// Current [`Status`] of a [`Room`] along with its occupant, if any.
    #[derive(Debug)]
    pub struct Report(query::room_status::Output);

    impl From<query::room_status::Output> for Report {
        fn from(output: query::room_status::Output) -> Self {
            Self(output)
        }
    }

    /// Current status of a `Room` along with its occupant, if any.
    #[graphql_object(name = "RoomStatusReport", context = Context)]
    impl Report {
        /// `Room` this report is about.
        #[must_use]
        pub fn room(&self) -> Room {
            self.0.room.clone().into()
        }

        /// Current `RoomStatus`.
        #[must_use]
        pub fn status(&self) -> Status {
            self.0.status.into()
        }

        /// `Reservation` occupying the `Room`, if it's `OCCUPIED`.
        #[must_use]
        pub fn reservation(&self) -> Option<api::Reservation> {
            self.0.stay.as_ref().map(|s| s.reservation.clone().into())
        }

        /// Full name of the guest occupying the `Room`, if it's `OCCUPIED`.
        #[must_use]
        pub fn guest_name(&self) -> Option<String> {
            self.0.stay.as_ref().map(|s| s.guest_name.to_string())
        }

        /// `DateTime` this report is given as of.
        #[must_use]
        pub fn as_of(&self) -> DateTime {
            self.0.as_of.coerce()
        }
    }
}
