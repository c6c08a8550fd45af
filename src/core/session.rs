//! Session state and the credit-accrual ticker.
//!
//! A [`Session`] is built once per signed-in user and torn down on sign-out;
//! nothing here is a process-wide singleton. The session caches the user's
//! credit balance and keeps it accruing: while a ticker runs, the balance
//! grows by [`CREDIT_INCREMENT`] every [`CREDIT_INTERVAL`].
//!
//! Persistence is write-behind. Each increment updates the local balance
//! first and then writes the new absolute value to the profiles table in a
//! background task. A failed write is logged and the local balance stands;
//! there is no rollback. Because every write carries an absolute value, the
//! completion order of in-flight writes does not matter.

use crate::{
    entities::{Profile, profile},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::Expr};
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// How often an active session earns credits
pub const CREDIT_INTERVAL: Duration = Duration::from_secs(5);

/// Credits earned per tick
pub const CREDIT_INCREMENT: i64 = 1;

/// Fetches a profile by user id, returning None if it does not exist.
pub async fn get_profile(db: &DatabaseConnection, user_id: &str) -> Result<Option<profile::Model>> {
    Profile::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a fresh profile with a zero balance. Called once at signup.
pub async fn create_profile(db: &DatabaseConnection, user_id: &str) -> Result<profile::Model> {
    let model = profile::ActiveModel {
        id: Set(user_id.to_string()),
        credits: Set(0),
        updated_at: Set(chrono::Utc::now()),
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Writes an absolute credit balance to the profiles table.
///
/// This is the write-behind target of the ticker and of [`Session::debit`].
/// It deliberately takes the full new balance rather than a delta: in-flight
/// writes may complete out of order, and the last absolute value wins.
pub async fn persist_balance(db: &DatabaseConnection, user_id: &str, balance: i64) -> Result<()> {
    let result = Profile::update_many()
        .col_expr(profile::Column::Credits, Expr::value(balance))
        .col_expr(profile::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(profile::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ProfileNotFound {
            user_id: user_id.to_string(),
        });
    }

    Ok(())
}

/// A signed-in user's session: cached credit balance plus the ticker task.
///
/// Constructed by [`Session::sign_in`] and consumed by [`Session::sign_out`].
/// Dropping the session (navigating away) also stops the ticker.
#[derive(Debug)]
pub struct Session {
    db: DatabaseConnection,
    user_id: String,
    credits: Arc<AtomicI64>,
    ticker: Option<JoinHandle<()>>,
}

/// Bumps the shared balance and spawns the write-behind persistence call.
/// Returns the new local balance.
fn accrue(db: &DatabaseConnection, user_id: &str, credits: &Arc<AtomicI64>) -> i64 {
    let balance = credits.fetch_add(CREDIT_INCREMENT, Ordering::SeqCst) + CREDIT_INCREMENT;

    let db = db.clone();
    let user_id = user_id.to_string();
    tokio::spawn(async move {
        if let Err(e) = persist_balance(&db, &user_id, balance).await {
            // Write-behind policy: log and keep the local balance as-is.
            error!(user_id, balance, "failed to persist credit balance: {e}");
        }
    });

    balance
}

impl Session {
    /// Establishes a session for `user_id`, seeding the local balance from
    /// the stored profile. The ticker is not started yet.
    ///
    /// # Errors
    /// Returns [`Error::ProfileNotFound`] if no profile row exists.
    pub async fn sign_in(db: DatabaseConnection, user_id: &str) -> Result<Self> {
        let profile = get_profile(&db, user_id)
            .await?
            .ok_or_else(|| Error::ProfileNotFound {
                user_id: user_id.to_string(),
            })?;

        info!(user_id, credits = profile.credits, "session established");
        Ok(Self {
            db,
            user_id: user_id.to_string(),
            credits: Arc::new(AtomicI64::new(profile.credits)),
            ticker: None,
        })
    }

    /// The signed-in user's id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current local credit balance.
    #[must_use]
    pub fn credits(&self) -> i64 {
        self.credits.load(Ordering::SeqCst)
    }

    /// Whether the local balance covers an action costing `cost` credits.
    #[must_use]
    pub fn can_afford(&self, cost: i64) -> bool {
        self.credits() >= cost
    }

    /// Performs one accrual step: adds [`CREDIT_INCREMENT`] to the local
    /// balance and persists the new absolute value in the background.
    /// Returns the new local balance.
    pub fn tick(&self) -> i64 {
        accrue(&self.db, &self.user_id, &self.credits)
    }

    /// Spawns the periodic accrual task, replacing any previous one.
    ///
    /// Exactly one ticker is live per session; the first increment lands
    /// [`CREDIT_INTERVAL`] after the call.
    pub fn start_ticker(&mut self) {
        self.stop_ticker();

        let db = self.db.clone();
        let user_id = self.user_id.clone();
        let credits = Arc::clone(&self.credits);
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(CREDIT_INTERVAL);
            // The first interval tick completes immediately; consume it so
            // accrual starts one full interval after sign-in.
            interval.tick().await;
            loop {
                interval.tick().await;
                accrue(&db, &user_id, &credits);
            }
        }));
    }

    /// Whether the accrual task is currently running.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the accrual task if one is running.
    pub fn stop_ticker(&mut self) {
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
    }

    /// Ends the session: stops the ticker and clears the cached balance.
    pub fn sign_out(mut self) {
        self.stop_ticker();
        self.credits.store(0, Ordering::SeqCst);
        info!(user_id = %self.user_id, "session ended");
    }

    /// Debits `cost` credits for a user action.
    ///
    /// The guard runs against the local balance before anything is written:
    /// an unaffordable debit returns [`Error::InsufficientCredits`] without
    /// touching the backend. Otherwise the local balance drops immediately
    /// and the new absolute value is written through; if that write fails
    /// the local decrement is restored and the error is returned so the
    /// caller can compensate its own side effects.
    ///
    /// # Errors
    /// [`Error::InsufficientCredits`] on the local guard, or the
    /// persistence failure.
    pub async fn debit(&self, cost: i64) -> Result<i64> {
        let balance = self.credits();
        if balance < cost {
            return Err(Error::InsufficientCredits {
                balance,
                required: cost,
            });
        }

        let new_balance = self.credits.fetch_sub(cost, Ordering::SeqCst) - cost;
        if let Err(e) = persist_balance(&self.db, &self.user_id, new_balance).await {
            self.credits.fetch_add(cost, Ordering::SeqCst);
            return Err(e);
        }

        Ok(new_balance)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
