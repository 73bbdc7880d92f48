/* ===============================================================================
Restaurant self-order terminal.
Billing session window per table. 16 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::sync::Arc;
use chrono::Utc;

use crate::storage::BoundaryStore;

// Storage keys are scoped per table so several tables sharing one kiosk
// never see each other's boundary
fn storage_key(table: &str) -> String {
   format!("lastCheckoutBoundary:{}", table)
}

pub fn now_millis() -> i64 {
   Utc::now().timestamp_millis()
}

// Keeps, per table, the timestamp of the last checkout. Orders stamped at or
// before it belong to a settled visit and are hidden from the current session.
pub struct SessionTracker {
   store: Arc<dyn BoundaryStore>,
}

impl SessionTracker {
   pub fn new(store: Arc<dyn BoundaryStore>) -> Self {
      Self { store }
   }

   // Epoch when the table has never checked out
   pub fn boundary_for(&self, table: &str) -> i64 {
      self.store.read(&storage_key(table)).unwrap_or(0)
   }

   // Advance the boundary to `at`. The boundary never decreases, a client
   // clock running backwards must not resurrect settled orders.
   pub fn mark_checkout(&self, table: &str, at: i64) -> Result<i64, String> {
      let current = self.boundary_for(table);
      let clamped = at.max(current);

      if clamped > current {
         self.store.write(&storage_key(table), clamped)?;
      }
      Ok(clamped)
   }
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;
   use crate::storage::MemoryStore;

   fn tracker() -> SessionTracker {
      SessionTracker::new(Arc::new(MemoryStore::new()))
   }

   #[test]
   fn unset_boundary_is_epoch() {
      assert_eq!(tracker().boundary_for("12"), 0);
   }

   #[test]
   fn checkout_moves_the_boundary() {
      let tracker = tracker();
      tracker.mark_checkout("12", 1000).unwrap();
      assert_eq!(tracker.boundary_for("12"), 1000);
   }

   #[test]
   fn boundary_never_decreases() {
      let tracker = tracker();
      tracker.mark_checkout("12", 1000).unwrap();

      // A checkout stamped with an earlier clock leaves the boundary alone
      let effective = tracker.mark_checkout("12", 500).unwrap();
      assert_eq!(effective, 1000);
      assert_eq!(tracker.boundary_for("12"), 1000);
   }

   #[test]
   fn tables_do_not_cross_contaminate() {
      let tracker = tracker();
      tracker.mark_checkout("12", 1000).unwrap();
      assert_eq!(tracker.boundary_for("13"), 0);
   }
}
