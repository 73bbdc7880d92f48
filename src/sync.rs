/* ===============================================================================
Restaurant self-order terminal.
Synchronization controller for one table session. 07 May 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use smart_default::SmartDefault;
use strum::{Display, EnumString};
use tokio::task::JoinHandle;

use crate::backend::Transport;
use crate::cart::{Cart, CartLine};
use crate::error::SyncError;
use crate::history::History;
use crate::menu::{MenuItem, MenuOption};
use crate::orders::ServerOrder;
use crate::session::{now_millis, SessionTracker};
use crate::storage::BoundaryStore;

// Whether settlement needs the backend's blessing or a locally persisted
// boundary is enough. The reference deployments run both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CheckoutPolicy {
   Local,
   ServerConfirmed,
}

#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct SyncConfig {
   #[default = 5000]
   pub poll_interval_ms: u64,
   #[default(CheckoutPolicy::Local)]
   pub checkout_policy: CheckoutPolicy,
}

// Unified read model handed to the view layer
#[derive(Clone, Debug)]
pub struct Snapshot {
   pub cart: Vec<CartLine>,
   pub orders: Vec<ServerOrder>,
   pub cart_total: i64,
   pub session_total: i64,
   pub grand_total: i64,
   pub boundary: i64,
   pub fetch_error: bool,
   pub busy: bool,
   pub anomalies: u64,
}

struct Inner {
   cart: Cart,
   history: History,
}

// One table's whole engine state: ledger, order cache and checkout boundary,
// plus the transport used to reconcile with the backend. Constructed per
// table, several sessions in one process never share mutable state.
pub struct TableSession {
   table: String,
   config: SyncConfig,
   transport: Arc<dyn Transport>,
   tracker: SessionTracker,
   // Never held across an await
   state: Mutex<Inner>,
   // Set while a submit or checkout is in flight, those are non-reentrant
   busy: AtomicBool,
   fetch_error: AtomicBool,
}

// Clears the busy flag on every exit path
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
   fn drop(&mut self) {
      self.0.store(false, Ordering::Release);
   }
}

impl TableSession {
   pub fn new(table: &str, transport: Arc<dyn Transport>, store: Arc<dyn BoundaryStore>, config: SyncConfig) -> Self {
      Self {
         table: table.to_string(),
         config,
         transport,
         tracker: SessionTracker::new(store),
         state: Mutex::new(Inner { cart: Cart::new(), history: History::new() }),
         busy: AtomicBool::new(false),
         fetch_error: AtomicBool::new(false),
      }
   }

   pub fn table(&self) -> &str {
      &self.table
   }

   pub fn boundary(&self) -> i64 {
      self.tracker.boundary_for(&self.table)
   }

   // ------------------------------------------------------------------------
   // Local intents, no network involved

   pub fn add_item(&self, item: &MenuItem, quantity: u32, options: Vec<MenuOption>) -> String {
      let mut state = self.state.lock().unwrap();
      state.cart.add_line(item, quantity, options).key.clone()
   }

   pub fn set_quantity(&self, key: &str, quantity: i64) -> Result<(), String> {
      self.state.lock().unwrap().cart.set_quantity(key, quantity)
   }

   pub fn remove_line(&self, key: &str) -> Result<(), String> {
      self.state.lock().unwrap().cart.remove_line(key)
   }

   pub fn snapshot(&self) -> Snapshot {
      let boundary = self.boundary();
      let state = self.state.lock().unwrap();

      let cart_total = state.cart.total();
      let session_total = state.history.session_total(boundary);

      Snapshot {
         cart: state.cart.lines().to_vec(),
         orders: state.history.session_orders(boundary),
         cart_total,
         session_total,
         grand_total: cart_total + session_total,
         boundary,
         fetch_error: self.fetch_error.load(Ordering::Relaxed),
         busy: self.busy.load(Ordering::Relaxed),
         anomalies: state.history.anomalies(),
      }
   }

   // ------------------------------------------------------------------------
   // Backend intents

   // Pull the table's placed orders and swap the cache. A failure keeps the
   // previous snapshot and flips the transient error flag, the next poll
   // tick retries.
   pub async fn refresh(&self) -> Result<(), SyncError> {
      match self.transport.fetch_orders(&self.table).await {
         Ok(orders) => {
            self.state.lock().unwrap().history.replace(orders);
            self.fetch_error.store(false, Ordering::Relaxed);
            Ok(())
         }
         Err(err) => {
            log::warn!("Refresh for table {} failed: {}", self.table, err);
            self.fetch_error.store(true, Ordering::Relaxed);
            Err(SyncError::TransientFetch(err))
         }
      }
   }

   // Send the whole ledger as one order. On success the ledger clears and an
   // immediate refresh makes the new order visible without waiting for the
   // next tick. On failure the ledger is untouched so the customer can retry.
   pub async fn submit(&self) -> Result<ServerOrder, SyncError> {
      let _busy = self.acquire_busy()?;

      if self.table.is_empty() {
         return Err(SyncError::Submission(String::from("no table selected")));
      }

      let lines = {
         let state = self.state.lock().unwrap();
         if state.cart.is_empty() {
            return Err(SyncError::EmptyCart);
         }
         state.cart.lines().to_vec()
      };

      let order = self.transport.submit_order(&self.table, &lines)
      .await
      .map_err(SyncError::Submission)?;

      log::info!("Table {} placed order {} for {}", self.table, order.id, order.amount.unwrap_or_default());
      self.state.lock().unwrap().cart.clear();

      // Best effort, the poll loop catches up if this one fails
      let _ = self.refresh().await;

      Ok(order)
   }

   // Settle the bill. With the local policy the persisted boundary alone
   // hides the session's orders, no network round trip. With the
   // server-confirmed policy the backend must accept first and the boundary
   // only advances on its success.
   pub async fn checkout(&self) -> Result<i64, SyncError> {
      let _busy = self.acquire_busy()?;

      {
         let boundary = self.boundary();
         let state = self.state.lock().unwrap();
         if state.cart.total() + state.history.session_total(boundary) <= 0 {
            return Err(SyncError::NothingToSettle);
         }
      }

      if self.config.checkout_policy == CheckoutPolicy::ServerConfirmed {
         self.transport.checkout(&self.table)
         .await
         .map_err(SyncError::Checkout)?;
      }

      let boundary = self.tracker.mark_checkout(&self.table, now_millis())
      .map_err(SyncError::Storage)?;

      // The boundary already filters everything out on the next fetch, the
      // eager clear just drops the visible total to zero right away
      let mut state = self.state.lock().unwrap();
      state.cart.clear();
      state.history.clear();

      log::info!("Table {} checked out, boundary {}", self.table, boundary);
      Ok(boundary)
   }

   // Fire-and-forget staff call, failures are only logged
   pub async fn call_staff(&self) {
      if let Err(err) = self.transport.call_staff(&self.table).await {
         log::warn!("Staff call for table {} failed: {}", self.table, err);
      }
   }

   fn acquire_busy(&self) -> Result<BusyGuard<'_>, SyncError> {
      self.busy.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
      .map(|_| BusyGuard(&self.busy))
      .map_err(|_| SyncError::Busy)
   }
}

// Owned handle of a running poll loop. Dropping it stops the loop, in-flight
// submits and checkouts run on their caller's task and are never cancelled
// from here.
pub struct PollHandle {
   task: JoinHandle<()>,
   table: String,
}

impl PollHandle {
   pub fn stop(self) {
      // Drop does the work
   }
}

impl Drop for PollHandle {
   fn drop(&mut self) {
      self.task.abort();
      log::debug!("Poll loop for table {} stopped", self.table);
   }
}

// Start the poll loop for this session: an immediate refresh, then one per
// configured interval until the handle is dropped
pub fn start_polling(session: &Arc<TableSession>) -> PollHandle {
   let session = Arc::clone(session);
   let table = session.table.clone();

   let task = tokio::spawn(async move {
      // A zero period would panic the timer
      let period = session.config.poll_interval_ms.max(1);
      let mut ticks = tokio::time::interval(Duration::from_millis(period));
      loop {
         ticks.tick().await;
         // Errors already flagged and logged inside
         let _ = session.refresh().await;
      }
   });

   PollHandle { task, table }
}
