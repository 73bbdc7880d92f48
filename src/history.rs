/* ===============================================================================
Restaurant self-order terminal.
Cache of already-placed orders. 16 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use crate::orders::ServerOrder;

// Last successful snapshot of the table's placed, not-yet-settled orders.
// Always swapped wholesale, individual orders are never patched in place.
#[derive(Default)]
pub struct History {
   orders: Vec<ServerOrder>,
   anomalies: u64,
}

impl History {
   pub fn new() -> Self {
      Self::default()
   }

   // Swap in a fresh snapshot. Orders arriving without an aggregate amount
   // are normalized here from their line items, the occurrence is logged and
   // counted but never treated as a failure.
   pub fn replace(&mut self, mut orders: Vec<ServerOrder>) {
      for order in orders.iter_mut() {
         if order.amount.is_none() {
            let recomputed = order.items_cost();
            log::warn!("Order {} arrived without amount, recomputed {}", order.id, recomputed);
            order.amount = Some(recomputed);
            self.anomalies += 1;
         }
      }
      self.orders = orders;
   }

   // Orders of the current billing session: placed after the checkout
   // boundary, in the order the server gave them
   pub fn current_session(&self, boundary: i64) -> impl Iterator<Item = &ServerOrder> {
      self.orders.iter()
      .filter(move |order| order.timestamp > boundary)
   }

   pub fn session_total(&self, boundary: i64) -> i64 {
      self.current_session(boundary)
      .map(|order| order.amount.unwrap_or_else(|| order.items_cost()))
      .sum()
   }

   pub fn session_orders(&self, boundary: i64) -> Vec<ServerOrder> {
      self.current_session(boundary).cloned().collect()
   }

   pub fn clear(&mut self) {
      self.orders.clear();
   }

   pub fn anomalies(&self) -> u64 {
      self.anomalies
   }
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   fn order(id: &str, amount: Option<i64>, timestamp: i64) -> ServerOrder {
      serde_json::from_str(&format!(r#"{{
         "id": "{}", "table": "12",
         "items": [{{"name": "Burger", "price": 500, "quantity": 2}}],
         "status": "submitted",
         {}
         "timestamp": {}
      }}"#,
         id,
         amount.map(|a| format!(r#""amount": {},"#, a)).unwrap_or_default(),
         timestamp
      )).unwrap()
   }

   #[test]
   fn boundary_zero_includes_everything() {
      let mut history = History::new();
      history.replace(vec![order("a", Some(100), 10), order("b", Some(200), 20)]);

      assert_eq!(history.session_total(0), 300);
      assert_eq!(history.current_session(0).count(), 2);
   }

   #[test]
   fn boundary_hides_settled_orders() {
      let mut history = History::new();
      history.replace(vec![order("a", Some(100), 10), order("b", Some(200), 20)]);

      // Boundary between the two timestamps keeps only the later order
      let visible: Vec<_> = history.current_session(15).collect();
      assert_eq!(visible.len(), 1);
      assert_eq!(visible[0].id, "b");
      assert_eq!(history.session_total(15), 200);

      // An order stamped exactly at the boundary counts as settled
      assert_eq!(history.current_session(20).count(), 0);
   }

   #[test]
   fn missing_amount_is_recovered_and_counted() {
      let mut history = History::new();
      history.replace(vec![order("a", None, 10)]);

      assert_eq!(history.session_total(0), 1000); // 500 x 2 from the lines
      assert_eq!(history.anomalies(), 1);
   }

   #[test]
   fn replace_swaps_wholesale() {
      let mut history = History::new();
      history.replace(vec![order("a", Some(100), 10)]);
      history.replace(vec![order("b", Some(200), 20)]);

      let visible: Vec<_> = history.current_session(0).collect();
      assert_eq!(visible.len(), 1);
      assert_eq!(visible[0].id, "b");
   }

   #[test]
   fn server_given_order_is_preserved() {
      let mut history = History::new();
      history.replace(vec![order("b", Some(200), 20), order("a", Some(100), 10)]);

      let ids: Vec<_> = history.current_session(0).map(|o| o.id.as_str()).collect();
      assert_eq!(ids, vec!["b", "a"]);
   }
}
