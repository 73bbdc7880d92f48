/* ===============================================================================
Restaurant self-order terminal.
Order/cart synchronization engine. 02 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

pub mod backend;
pub mod cart;
pub mod environment;
pub mod error;
pub mod history;
pub mod menu;
pub mod orders;
pub mod pricing;
pub mod session;
pub mod storage;
pub mod sync;

pub use backend::{Backend, Transport};
pub use cart::{Cart, CartLine};
pub use error::SyncError;
pub use history::History;
pub use menu::{Menu, MenuItem, MenuOption};
pub use orders::{OrderStatus, OrderedLine, ServerOrder};
pub use session::SessionTracker;
pub use storage::{BoundaryStore, FileStore, MemoryStore};
pub use sync::{start_polling, CheckoutPolicy, PollHandle, Snapshot, SyncConfig, TableSession};
