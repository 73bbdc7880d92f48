/* ===============================================================================
Restaurant self-order terminal.
Cart ledger, the not-yet-submitted lines. 09 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use serde::{Deserialize, Serialize};

use crate::menu::{MenuItem, MenuOption};
use crate::pricing;

// One ledger line. Identity fields and the unit price are copied from the
// menu item at creation, later catalog edits never change an existing line.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
   pub menu_item_id: String,
   pub name: String,
   pub quantity: u32,
   pub options: Vec<MenuOption>,
   pub unit_price: i64,
   pub line_total: i64,
   // Stable address of the line: (item id, normalized option set). Lines are
   // always referenced by this key, never by position.
   pub key: String,
}

impl CartLine {
   fn new(item: &MenuItem, quantity: u32, options: Vec<MenuOption>) -> Self {
      let unit_price = pricing::unit_price(item.price, &options);
      let key = pricing::identity_key(&item.id, &options);

      Self {
         menu_item_id: item.id.clone(),
         name: item.name.clone(),
         quantity,
         line_total: unit_price * quantity as i64,
         unit_price,
         options,
         key,
      }
   }

   fn set_quantity(&mut self, quantity: u32) {
      self.quantity = quantity;
      self.line_total = self.unit_price * quantity as i64;
   }
}

// Ordered ledger of lines the customer selected but has not submitted yet
#[derive(Default)]
pub struct Cart {
   lines: Vec<CartLine>,
}

impl Cart {
   pub fn new() -> Self {
      Self::default()
   }

   // Add a selection. A line with the same identity key absorbs the quantity,
   // otherwise a new line is appended. Quantities below one are clamped, the
   // caller validates for real.
   pub fn add_line(&mut self, item: &MenuItem, quantity: u32, options: Vec<MenuOption>) -> &CartLine {
      let quantity = quantity.max(1);
      let key = pricing::identity_key(&item.id, &options);

      let pos = match self.lines.iter().position(|line| line.key == key) {
         Some(pos) => {
            let line = &mut self.lines[pos];
            let merged = line.quantity.saturating_add(quantity);
            line.set_quantity(merged);
            pos
         }
         None => {
            self.lines.push(CartLine::new(item, quantity, options));
            self.lines.len() - 1
         }
      };

      &self.lines[pos]
   }

   // Overwrite the quantity of the line with this key. Zero or negative
   // removes the line. The captured unit price is kept as is.
   pub fn set_quantity(&mut self, key: &str, quantity: i64) -> Result<(), String> {
      let pos = self.lines.iter()
      .position(|line| line.key == key)
      .ok_or_else(|| format!("no cart line with key '{}'", key))?;

      if quantity <= 0 {
         self.lines.remove(pos);
      } else {
         self.lines[pos].set_quantity(quantity as u32);
      }
      Ok(())
   }

   pub fn remove_line(&mut self, key: &str) -> Result<(), String> {
      let pos = self.lines.iter()
      .position(|line| line.key == key)
      .ok_or_else(|| format!("no cart line with key '{}'", key))?;

      self.lines.remove(pos);
      Ok(())
   }

   // Called after a successful submission or checkout
   pub fn clear(&mut self) {
      self.lines.clear();
   }

   pub fn total(&self) -> i64 {
      self.lines.iter()
      .map(|line| line.line_total)
      .sum()
   }

   pub fn is_empty(&self) -> bool {
      self.lines.is_empty()
   }

   pub fn len(&self) -> usize {
      self.lines.len()
   }

   pub fn lines(&self) -> &[CartLine] {
      &self.lines
   }
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   fn burger() -> MenuItem {
      serde_json::from_str(r#"{
         "id": "y1", "name": "Burger", "category": "Food", "price": 800,
         "options": ["no pickles", {"label": "cheese", "priceDelta": 200}]
      }"#).unwrap()
   }

   fn tea() -> MenuItem {
      serde_json::from_str(r#"{
         "id": "d2", "name": "Green tea", "category": "Drink", "price": 300
      }"#).unwrap()
   }

   #[test]
   fn same_selection_merges_into_one_line() {
      let item = burger();
      let opts = item.select_options(&["cheese"]).unwrap();

      let mut cart = Cart::new();
      cart.add_line(&item, 1, opts.clone());
      cart.add_line(&item, 1, opts);

      assert_eq!(cart.len(), 1);
      let line = &cart.lines()[0];
      assert_eq!(line.quantity, 2);
      assert_eq!(line.line_total, 2000);
   }

   #[test]
   fn different_option_set_makes_second_line() {
      let item = burger();
      let mut cart = Cart::new();
      cart.add_line(&item, 1, vec![]);
      cart.add_line(&item, 1, item.select_options(&["cheese"]).unwrap());

      assert_eq!(cart.len(), 2);
      assert_eq!(cart.total(), 800 + 1000);
   }

   #[test]
   fn quantity_zero_removes_the_line() {
      let item = tea();
      let mut cart = Cart::new();
      let key = cart.add_line(&item, 2, vec![]).key.clone();

      cart.set_quantity(&key, 0).unwrap();
      assert!(cart.is_empty());
   }

   #[test]
   fn set_quantity_keeps_captured_unit_price() {
      let item = burger();
      let opts = item.select_options(&["cheese"]).unwrap();

      let mut cart = Cart::new();
      let key = cart.add_line(&item, 1, opts).key.clone();

      // A quantity change after the catalog moved on still uses the old price
      cart.set_quantity(&key, 3).unwrap();
      assert_eq!(cart.lines()[0].line_total, 3000);
   }

   #[test]
   fn add_clamps_zero_quantity_to_one() {
      let item = tea();
      let mut cart = Cart::new();
      cart.add_line(&item, 0, vec![]);
      assert_eq!(cart.lines()[0].quantity, 1);
   }

   #[test]
   fn merge_saturates_instead_of_wrapping() {
      let item = tea();
      let mut cart = Cart::new();
      cart.add_line(&item, u32::MAX, vec![]);
      cart.add_line(&item, 2, vec![]);

      assert_eq!(cart.len(), 1);
      assert_eq!(cart.lines()[0].quantity, u32::MAX);
   }

   #[test]
   fn remove_unknown_key_is_an_error() {
      let mut cart = Cart::new();
      assert!(cart.remove_line("nope|").is_err());
   }

   #[test]
   fn clear_empties_the_ledger() {
      let item = tea();
      let mut cart = Cart::new();
      cart.add_line(&item, 2, vec![]);
      cart.clear();
      assert!(cart.is_empty());
      assert_eq!(cart.total(), 0);
   }
}
