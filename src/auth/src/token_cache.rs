// Copyright 2025 Lark OAPI Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use crate::errors::CredentialsError;
use crate::token::{Token, TokenProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
// Using tokio's wrapper makes the cache testable without relying on clock
// times.
use tokio::time::Instant;

/// The per-kind credential store.
///
/// Holds the last acquired token (or the last seen error) and refreshes it
/// through the inner [TokenProvider] when it is missing, expired, due to
/// expire within the refresh margin, or explicitly invalidated.
///
/// Concurrent callers share a single in-flight refresh: the first caller to
/// find the slot invalid performs the acquisition, every other caller awaits
/// the published result, success or failure. The result is written to the
/// slot before the waiters are notified, so no caller can observe a
/// half-updated value, and a caller abandoning its own call cannot corrupt
/// the shared slot.
#[derive(Debug)]
pub(crate) struct TokenCache<T>
where
    T: TokenProvider,
{
    // The cached token, or the last seen error. The generation increments on
    // every published refresh, never on invalidation.
    slot: Arc<Mutex<Slot>>,

    // Tracks if a refresh is ongoing. If the lock is held, there is a refresh.
    refresh_in_progress: Arc<Mutex<()>>,
    // Allows us to await the result of a refresh in multiple tasks.
    refresh_notify: Arc<Notify>,

    // Tokens due to expire within this margin are refreshed proactively.
    refresh_margin: Duration,

    // The token provider. This thing does the refreshing.
    inner: Arc<T>,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    token: Result<Token>,
}

// Returns true if we are holding an error, or a token that has expired or is
// about to.
fn invalid(token: &Result<Token>, margin: Duration) -> bool {
    match token {
        Ok(t) => t.expires_at.is_some_and(|e| e <= Instant::now() + margin),
        Err(_) => true,
    }
}

// We manually implement the `Clone` trait because the Rust compiler will
// squawk if `T` is not `Clone`, even though we only hold an `Arc<T>`.
impl<T: TokenProvider> Clone for TokenCache<T> {
    fn clone(&self) -> TokenCache<T> {
        TokenCache {
            slot: self.slot.clone(),
            refresh_in_progress: self.refresh_in_progress.clone(),
            refresh_notify: self.refresh_notify.clone(),
            refresh_margin: self.refresh_margin,
            inner: self.inner.clone(),
        }
    }
}

impl<T: TokenProvider> TokenCache<T> {
    pub(crate) fn new(inner: T, refresh_margin: Duration) -> TokenCache<T> {
        TokenCache {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                token: Err(CredentialsError::from_str(true, "no token in the cache yet")),
            })),
            refresh_in_progress: Arc::new(Mutex::new(())),
            refresh_notify: Arc::new(Notify::new()),
            refresh_margin,
            inner: Arc::new(inner),
        }
    }

    // Clones the current slot contents, in a thread-safe manner. Releases the
    // lock on return.
    async fn current(&self) -> (u64, Result<Token>) {
        let slot = self.slot.lock().await;
        (slot.generation, slot.token.clone())
    }

    /// Marks the cached token stale so the next caller refreshes it.
    ///
    /// Used when the platform reports the token as invalid even though its
    /// local expiry has not passed, e.g. after the tenant revoked the
    /// application's authorization.
    pub(crate) async fn invalidate(&self) {
        self.slot.lock().await.token = Err(CredentialsError::from_str(
            true,
            "the platform rejected the cached token, a refresh is required",
        ));
    }

    pub(crate) async fn token(&self) -> Result<Token> {
        let (generation, token) = self.current().await;

        if !invalid(&token, self.refresh_margin) {
            return token;
        }

        match self.refresh_in_progress.try_lock() {
            // Check if there are any outstanding refreshes...
            Ok(guard) => {
                // A refresh may have been published while we raced for the
                // guard. Do not repeat it.
                let (_, token) = self.current().await;
                if !invalid(&token, self.refresh_margin) {
                    return token;
                }

                // No refreshes. We should start one.
                let token = self.inner.token().await;

                // Publish the token, or an updated error.
                {
                    let mut slot = self.slot.lock().await;
                    slot.generation += 1;
                    slot.token = token.clone();
                }

                // The refresh is complete. Release the refresh guard.
                drop(guard);

                // Notify any and all waiters.
                self.refresh_notify.notify_waiters();

                // Return here without asking for the slot lock again.
                return token;
            }
            Err(_) => {
                // There is already a refresh. We will await its result. The
                // `Notified` future receives wakeups from `notify_waiters()`
                // from the moment it is created; re-checking the generation
                // after creating it closes the window where the refresh
                // published before we started listening.
                let notified = self.refresh_notify.notified();
                let (current_generation, token) = self.current().await;
                if current_generation != generation {
                    return token;
                }
                notified.await;
            }
        }

        // The refresh operation has completed. We should have a new
        // error/token. Return it.
        self.current().await.1
    }
}
