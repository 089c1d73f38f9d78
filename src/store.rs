//! Counter storage backends.
//!
//! `CounterStore` is the seam between the hit counter and the cache service.
//! The production implementation talks to Redis; tests substitute an
//! in-memory store.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{
    AsyncCommands, Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError,
};
use tokio::sync::Mutex;

use crate::counter::CounterError;

/// An external store holding named integer counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter at `key` by one and return the new
    /// value. A missing key starts from zero.
    async fn incr(&self, key: &str) -> Result<i64, CounterError>;
}

/// Redis-backed counter store.
///
/// Holds a single client for the life of the process. The multiplexed
/// connection is opened on first use, so constructing the store never
/// touches the network.
pub struct RedisStore {
    client: Client,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisStore {
    pub fn new(host: &str, port: u16) -> Result<Self, CounterError> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(host.to_string(), port),
            redis: RedisConnectionInfo::default(),
        };
        let client = Client::open(info).map_err(CounterError::from)?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
        })
    }

    /// Return the cached connection, opening one if there is none.
    ///
    /// The lock is not held while connecting, so a slow connect does not
    /// queue other requests behind it. If two requests race to connect, the
    /// first connection stored wins and the other is dropped.
    async fn connection(&self) -> Result<MultiplexedConnection, RedisError> {
        if let Some(conn) = self.connection.lock().await.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;

        let mut guard = self.connection.lock().await;
        if let Some(existing) = guard.as_ref() {
            return Ok(existing.clone());
        }
        tracing::debug!(addr = %self.client.get_connection_info().addr, "Connected to Redis");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Forget the cached connection so the next call reconnects.
    async fn reset(&self) {
        self.connection.lock().await.take();
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64, CounterError> {
        let result = match self.connection().await {
            Ok(mut conn) => conn.incr::<_, _, i64>(key, 1).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = CounterError::from(e);
                if err.is_connection() {
                    self.reset().await;
                }
                Err(err)
            }
        }
    }
}
