/* ===============================================================================
Restaurant self-order terminal.
Server-side order records. 02 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::menu::MenuOption;

// Kitchen status vocabulary belongs to the backend, the client only compares
// for equality and shows the raw text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(pub String);

impl fmt::Display for OrderStatus {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

// One line of an already-placed order, prices resolved by the server
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedLine {
   pub name: String,
   pub price: i64,
   pub quantity: u32,
   #[serde(default)]
   pub options: Vec<MenuOption>,
}

impl OrderedLine {
   pub fn cost(&self) -> i64 {
      self.price * self.quantity as i64
   }
}

// A placed order as returned by GET /orders. Immutable from the client side,
// the cache only holds full-replacement snapshots of these.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOrder {
   pub id: String,
   pub table: String,
   pub items: Vec<OrderedLine>,
   pub status: OrderStatus,
   // Aggregate amount may be absent in partially-populated responses,
   // history::replace() recovers it from the line items
   pub amount: Option<i64>,
   // Server-assigned, epoch millis
   pub timestamp: i64,
}

impl ServerOrder {
   pub fn items_cost(&self) -> i64 {
      self.items.iter()
      .map(OrderedLine::cost)
      .sum()
   }
}

// Body of POST /orders: the whole ledger as one atomic submission
#[derive(Serialize)]
pub struct SubmitPayload<'a> {
   pub table: &'a str,
   pub items: &'a [CartLine],
}

// Body of POST /checkout and POST /call-staff
#[derive(Serialize)]
pub struct TablePayload<'a> {
   pub table: &'a str,
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn order_parses_camel_case_wire_shape() {
      let order: ServerOrder = serde_json::from_str(r#"{
         "id": "o-1", "table": "12",
         "items": [{"name": "Burger", "price": 1000, "quantity": 2}],
         "status": "in-preparation",
         "amount": 2000,
         "timestamp": 1700000000000
      }"#).unwrap();

      assert_eq!(order.status, OrderStatus(String::from("in-preparation")));
      assert_eq!(order.amount, Some(2000));
      assert_eq!(order.items_cost(), 2000);
   }

   #[test]
   fn missing_amount_parses_as_none() {
      let order: ServerOrder = serde_json::from_str(r#"{
         "id": "o-2", "table": "12",
         "items": [{"name": "Tea", "price": 300, "quantity": 1}],
         "status": "submitted",
         "timestamp": 1700000000000
      }"#).unwrap();

      assert_eq!(order.amount, None);
      assert_eq!(order.items_cost(), 300);
   }
}
