//! [`Customer`]-related definitions.

use std::future;

use common::{DateTime, Handler as _};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A hotel guest.
#[derive(Clone, Debug, From)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// [`domain::Customer`] representing this [`Customer`].
    customer: OnceCell<domain::Customer>,
}

impl From<domain::Customer> for Customer {
    fn from(customer: domain::Customer) -> Self {
        Self {
            id: customer.id.into(),
            customer: OnceCell::new_with(Some(customer)),
        }
    }
}

impl Customer {
    /// Creates a new [`Customer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Customer`] with the provided ID exists,
    /// otherwise accessing this [`Customer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            customer: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Customer`] representing this [`Customer`].
    ///
    /// # Errors
    ///
    /// Error if the [`domain::Customer`] doesn't exist.
    async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Customer, Error> {
        let id = self.id.into();
        self.customer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::customer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CustomerError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A hotel guest.
#[graphql_object(context = Context)]
impl Customer {
    /// Unique identifier of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// First name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.customer(ctx).await?.first_name.clone().into())
    }

    /// Last name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.customer(ctx).await?.last_name.clone().into())
    }

    /// First and last names of this `Customer` separated with a space.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.fullName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn full_name(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.customer(ctx).await?.full_name().to_string())
    }

    /// Email of this `Customer`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.customer(ctx).await?.email.clone().map(Into::into))
    }

    /// Phone of this `Customer`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.customer(ctx).await?.phone.clone().map(Into::into))
    }

    /// `DateTime` when this `Customer` was registered.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.customer(ctx).await?.created_at.coerce())
    }

    /// `Reservation`s made by this `Customer`, ordered by their start.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.reservations",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn reservations(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Reservation>, Error> {
        ctx.service()
            .execute(query::reservations::List::by(
                read::reservation::list::Filter {
                    customer_id: Some(self.id.into()),
                    ..read::reservation::list::Filter::default()
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Customer`.
#[derive(Clone, Copy, Debug, Display, Eq, Into, From, GraphQLScalar, PartialEq)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(Uuid);

/// Name of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerName",
    with = scalar::Via::<domain::customer::Name>,
)]
pub struct Name(domain::customer::Name);

/// Email of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerEmail",
    with = scalar::Via::<domain::customer::Email>,
)]
pub struct Email(domain::customer::Email);

/// Phone of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerPhone",
    with = scalar::Via::<domain::customer::Phone>,
)]
pub struct Phone(domain::customer::Phone);
