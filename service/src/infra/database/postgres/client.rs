//! Lazily connecting Postgres database clients.

use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Non-transactional Postgres database client.
///
/// Takes a [`connection::Pooled`] connection on the first use and keeps it
/// until dropped.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to take connections from.
    pool: connection::Pool,

    /// [`connection::Pooled`] connection, once taken.
    conn: Arc<OnceCell<connection::Pooled>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            conn: Arc::new(OnceCell::new()),
        }
    }

    /// Takes a new [`connection::Pooled`] connection from the
    /// [`connection::Pool`].
    pub(crate) async fn pooled(
        &self,
    ) -> Result<connection::Pooled, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    /// Returns the [`connection::Pooled`] connection of this [`NonTx`]
    /// client, taking it on the first call.
    async fn conn(
        &self,
    ) -> Result<&connection::Pooled, Traced<database::Error>> {
        self.conn
            .get_or_try_init(|| self.pooled())
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Transactional Postgres database client.
///
/// Begins the transaction on the first use, so a [`Tx`] never used for
/// querying never holds a connection.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client to take the connection with.
    non_tx: NonTx,

    /// Open [`connection::Tx`], if begun and not committed yet.
    tx: Arc<RwLock<Option<connection::Tx>>>,

    /// Serializes beginning of the [`connection::Tx`].
    begin: Arc<Mutex<()>>,
}

impl Tx {
    /// Creates a new [`Tx`] client out of the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(non_tx: NonTx) -> Self {
        Self {
            non_tx,
            tx: Arc::new(RwLock::new(None)),
            begin: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the open [`connection::Tx`] of this [`Tx`] client, beginning
    /// it if required.
    async fn conn(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        if self.tx.read().await.is_none() {
            let _begin = self.begin.lock().await;
            if self.tx.read().await.is_none() {
                let pooled =
                    self.non_tx.pooled().await.map_err(tracerr::wrap!())?;
                let tx = connection::Tx::begin(pooled)
                    .await
                    .map_err(tracerr::wrap!())?;
                *self.tx.write().await = Some(tx);
            }
        }

        RwLockReadGuard::try_map(self.tx.read().await, Option::as_ref)
            .map_err(|_| tracerr::new!(postgres::Error::ConcurrentCommit))
            .map_err(tracerr::map_from)
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Committing a [`Tx`] client that never began its transaction is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.tx.write().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

/// Implements [`Connection`] for a client type forwarding to the
/// [`Connection`] returned by its `conn()` method.
macro_rules! impl_client_connection {
    ($ty:ty) => {
        impl Connection for $ty {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.conn()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.conn()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.conn()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

impl_client_connection!(NonTx);
impl_client_connection!(Tx);
