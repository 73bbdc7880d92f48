/* ===============================================================================
Restaurant self-order terminal.
Engine error taxonomy. 23 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::error::Error;
use std::fmt;

// What can go wrong while driving the engine. Fetch trouble is transient and
// retried by the poll loop, everything else is surfaced to the caller and
// never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
   // Network or server failure during a refresh, the previous cache stays
   TransientFetch(String),
   // Order placement failed, the ledger is left untouched for a retry
   Submission(String),
   // Server-confirmed settlement rejected, the boundary was not advanced
   Checkout(String),
   // Boundary could not be persisted
   Storage(String),
   // A submit or checkout is already in flight for this table
   Busy,
   // Place-order intent with nothing in the ledger
   EmptyCart,
   // Checkout intent with a zero visible total
   NothingToSettle,
}

impl fmt::Display for SyncError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         SyncError::TransientFetch(s) => write!(f, "refresh failed: {}", s),
         SyncError::Submission(s) => write!(f, "order submission failed: {}", s),
         SyncError::Checkout(s) => write!(f, "checkout failed: {}", s),
         SyncError::Storage(s) => write!(f, "storage failed: {}", s),
         SyncError::Busy => write!(f, "another request for this table is in flight"),
         SyncError::EmptyCart => write!(f, "cart is empty"),
         SyncError::NothingToSettle => write!(f, "nothing to settle"),
      }
   }
}

impl Error for SyncError {}
