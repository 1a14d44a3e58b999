//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money};
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{
    api::{self, query},
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Room`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_CAPACITY` - `capacity` is not within `1..=32`;
    /// - `INVALID_FLOOR` - `floor` doesn't fit into the building;
    /// - `NEGATIVE_PRICE` - `price` is negative;
    /// - `ROOM_NUMBER_OCCUPIED` - another `Room` has the same `number`.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            capacity = %capacity,
            floor = %floor,
            gql.name = "createRoom",
            kind = ?kind,
            number = %number,
            otel.name = Self::SPAN_NAME,
            price = %price,
        ),
    )]
    pub async fn create_room(
        number: api::room::Number,
        kind: api::room::Kind,
        floor: i32,
        capacity: i32,
        price: Money,
        description: Option<api::room::Description>,
        amenities: Option<Vec<api::room::Amenity>>,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        let floor = domain::room::Floor::try_from(floor)
            .map_err(|_| query::InputError::Floor.into())
            .map_err(ctx.error())?;
        let capacity = query::capacity(capacity).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateRoom {
                number: number.into(),
                kind: kind.into(),
                floor,
                capacity,
                price,
                description: description.map(Into::into),
                amenities: amenities
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email.as_ref().map(ToString::to_string),
            first_name = %first_name,
            gql.name = "createCustomer",
            last_name = %last_name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn create_customer(
        first_name: api::customer::Name,
        last_name: api::customer::Name,
        email: Option<api::customer::Email>,
        phone: Option<api::customer::Phone>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(command::CreateCustomer {
                first_name: first_name.into(),
                last_name: last_name.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Books the `Room` for the `Customer` within the `[start; end)` period.
    ///
    /// The `Reservation` is created `PENDING`, priced by the nightly price of
    /// the `Room`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAPACITY_EXCEEDED` - `guests` don't fit into the `Room`;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `INVALID_GUESTS` - `guests` is not a positive number;
    /// - `INVALID_PERIOD` - `end` is not after `start`;
    /// - `ROOM_NOT_EXISTS` - the `Room` does not exist;
    /// - `ROOM_OCCUPIED` - another `Reservation` holds the `Room` within the
    ///                     period;
    /// - `ROOM_UNDER_MAINTENANCE` - a `MaintenanceIssue` blocks the `Room`
    ///                              within the period.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            end = %end,
            gql.name = "createReservation",
            guests = %guests,
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
            start = %start,
        ),
    )]
    pub async fn create_reservation(
        room_id: api::room::Id,
        customer_id: api::customer::Id,
        start: DateTime,
        end: DateTime,
        guests: i32,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let guests = u8::try_from(guests)
            .ok()
            .and_then(domain::reservation::Guests::new)
            .ok_or_else(|| InputError::Guests.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateReservation {
                room_id: room_id.into(),
                customer_id: customer_id.into(),
                start,
                end,
                guests,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers arrival of the guest of the `PENDING` `Reservation`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Reservation` is not `PENDING`;
    /// - `RESERVATION_EXPIRED` - the stay has already ended;
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` does not exist;
    /// - `TOO_EARLY` - the stay starts on a later day.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "checkInReservation",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn check_in_reservation(
        id: api::reservation::Id,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        ctx.service()
            .execute(command::CheckInReservation {
                reservation_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers departure of the guest of the `CHECKED_IN` `Reservation`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Reservation` is not `CHECKED_IN`;
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "checkOutReservation",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn check_out_reservation(
        id: api::reservation::Id,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        ctx.service()
            .execute(command::CheckOutReservation {
                reservation_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `PENDING` or `CHECKED_IN` `Reservation`, releasing its
    /// `Room`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_TRANSITION` - the `Reservation` is already `COMPLETED` or
    ///                          `CANCELLED`;
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelReservation",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_reservation(
        id: api::reservation::Id,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        ctx.service()
            .execute(command::CancelReservation {
                reservation_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rates the `COMPLETED` `Reservation` from 1 to 5 stars.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_RATING` - `rating` is not within `1..=5`;
    /// - `INVALID_TRANSITION` - the `Reservation` is not `COMPLETED`;
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rateReservation",
            id = %id,
            otel.name = Self::SPAN_NAME,
            rating = %rating,
        ),
    )]
    pub async fn rate_reservation(
        id: api::reservation::Id,
        rating: i32,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let rating = u8::try_from(rating)
            .ok()
            .and_then(domain::reservation::Rating::new)
            .ok_or_else(|| InputError::Rating.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::RateReservation {
                reservation_id: id.into(),
                rating,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Puts the `Room` out of service until `estimatedCompletionAt`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_ESTIMATE` - `estimatedCompletionAt` is not in the future;
    /// - `ROOM_NOT_EXISTS` - the `Room` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            estimated_completion_at = %estimated_completion_at,
            gql.name = "reportMaintenanceIssue",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn report_maintenance_issue(
        room_id: api::room::Id,
        description: api::maintenance_issue::Description,
        estimated_completion_at: DateTime,
        ctx: &Context,
    ) -> Result<api::MaintenanceIssue, Error> {
        ctx.service()
            .execute(command::ReportMaintenanceIssue {
                room_id: room_id.into(),
                description: description.into(),
                estimated_completion_at,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Resolves the `MaintenanceIssue`, bringing its `Room` back to service.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `MAINTENANCE_ISSUE_NOT_EXISTS` - the `MaintenanceIssue` does not
    ///                                    exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "resolveMaintenanceIssue",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn resolve_maintenance_issue(
        id: api::maintenance_issue::Id,
        ctx: &Context,
    ) -> Result<api::MaintenanceIssue, Error> {
        ctx.service()
            .execute(command::ResolveMaintenanceIssue { issue_id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_GUESTS"]
        #[status = BAD_REQUEST]
        #[message = "Number of guests must be positive"]
        Guests,

        #[code = "INVALID_RATING"]
        #[status = BAD_REQUEST]
        #[message = "Rating must be within `1..=5`"]
        Rating,
    }
}

define_error! {
    enum TransitionError {
        #[code = "INVALID_TRANSITION"]
        #[status = CONFLICT]
        #[message = "`Reservation` status doesn't allow the operation"]
        Invalid,
    }
}

impl AsError for command::create_room::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NEGATIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "`Room` price cannot be negative"]
                NegativePrice,

                #[code = "ROOM_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`RoomNumber` is occupied by another `Room`"]
                RoomNumberOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NegativePrice(_) => Error::NegativePrice.into(),
            Self::RoomNumberOccupied(_) => Error::RoomNumberOccupied.into(),
        })
    }
}

impl AsError for command::create_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAPACITY_EXCEEDED"]
                #[status = BAD_REQUEST]
                #[message = "Number of guests exceeds `Room` capacity"]
                CapacityExceeded,

                #[code = "CUSTOMER_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Customer` with the provided ID does not exist"]
                CustomerNotExists,

                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`end` must be after `start`"]
                InvalidPeriod,

                #[code = "PRICE_OVERFLOW"]
                #[status = BAD_REQUEST]
                #[message = "Price of the stay is too large"]
                PriceOverflow,

                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,

                #[code = "ROOM_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`Room` is occupied during the requested stay"]
                RoomOccupied,

                #[code = "ROOM_UNDER_MAINTENANCE"]
                #[status = CONFLICT]
                #[message = "`Room` is under maintenance during the \
                             requested stay"]
                RoomUnderMaintenance,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CapacityExceeded { .. } => Error::CapacityExceeded.into(),
            Self::CustomerNotExists(_) => Error::CustomerNotExists.into(),
            Self::InvalidPeriod { .. } => Error::InvalidPeriod.into(),
            Self::PriceOverflow(_) => Error::PriceOverflow.into(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
            Self::RoomOccupied(_) => Error::RoomOccupied.into(),
            Self::RoomUnderMaintenance(_) => Error::RoomUnderMaintenance.into(),
        })
    }
}

impl AsError for command::check_in_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RESERVATION_EXPIRED"]
                #[status = CONFLICT]
                #[message = "`Reservation` stay has already ended"]
                Expired,

                #[code = "TOO_EARLY"]
                #[status = CONFLICT]
                #[message = "`Reservation` stay starts on a later day"]
                TooEarly,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Expired(_) => Error::Expired.into(),
            Self::InvalidTransition(_) => {
                TransitionError::Invalid.into()
            }
            Self::ReservationNotExists(_) => {
                query::ReservationError::NotExists.into()
            }
            Self::TooEarly(_) => Error::TooEarly.into(),
        })
    }
}

/// Implements [`AsError`] for an `ExecutionError` of a [`Command`] moving a
/// [`domain::Reservation`] to another status.
///
/// [`Command`]: service::Command
macro_rules! impl_transition_as_error {
    ($($cmd:ident),* $(,)?) => {$(
        impl AsError for command::$cmd::ExecutionError {
            fn try_as_error(&self) -> Option<Error> {
                Some(match self {
                    Self::Db(e) => return e.try_as_error(),
                    Self::InvalidTransition(_) => {
                        TransitionError::Invalid.into()
                    }
                    Self::ReservationNotExists(_) => {
                        query::ReservationError::NotExists.into()
                    }
                })
            }
        }
    )*};
}

impl_transition_as_error!(
    cancel_reservation,
    check_out_reservation,
    rate_reservation,
);

impl AsError for command::report_maintenance_issue::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_ESTIMATE"]
                #[status = BAD_REQUEST]
                #[message = "`estimatedCompletionAt` must be in the future"]
                InvalidEstimate,

                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidEstimate(_) => Error::InvalidEstimate.into(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
        })
    }
}

impl AsError for command::resolve_maintenance_issue::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "MAINTENANCE_ISSUE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`MaintenanceIssue` with the provided ID does \
                             not exist"]
                IssueNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::IssueNotExists(_) => Error::IssueNotExists.into(),
        })
    }
}
