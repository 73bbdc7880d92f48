/* ===============================================================================
Restaurant self-order terminal.
Menu catalog interface. 02 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::fs;
use serde::{Deserialize, Serialize};

// An item option as published by the catalog. The backend sends either a bare
// label or a {label, priceDelta} pair, resolved here once into a tagged variant
// instead of being type-sniffed downstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuOption {
   Priced {
      label: String,
      #[serde(rename = "priceDelta")]
      price_delta: i64,
   },
   Label(String),
}

impl MenuOption {
   pub fn label(&self) -> &str {
      match self {
         MenuOption::Priced { label, .. } => label,
         MenuOption::Label(label) => label,
      }
   }

   // Plain labels contribute nothing to the price
   pub fn price_delta(&self) -> i64 {
      match self {
         MenuOption::Priced { price_delta, .. } => *price_delta,
         MenuOption::Label(_) => 0,
      }
   }

   // Serialized form used inside identity keys
   pub fn token(&self) -> String {
      match self {
         MenuOption::Priced { label, price_delta } => format!("{}+{}", label, price_delta),
         MenuOption::Label(label) => label.clone(),
      }
   }
}

// Catalog item, immutable for the lifetime of a session. Cart lines copy the
// fields they need at selection time, so later catalog edits never touch them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MenuItem {
   pub id: String,
   pub name: String,
   pub category: String,
   pub price: i64,
   #[serde(default)]
   pub options: Vec<MenuOption>,
}

impl MenuItem {
   // Resolve option labels against the item's option list, copying the
   // matched options. Unknown labels are an error, not silently dropped.
   pub fn select_options(&self, labels: &[&str]) -> Result<Vec<MenuOption>, String> {
      labels.iter()
      .map(|wanted| {
         self.options.iter()
         .find(|opt| opt.label() == *wanted)
         .cloned()
         .ok_or_else(|| format!("item '{}' has no option '{}'", self.id, wanted))
      })
      .collect()
   }
}

pub struct Menu {
   items: Vec<MenuItem>,
}

impl Menu {
   pub fn load(path: &str) -> Result<Self, String> {
      let raw = fs::read_to_string(path)
      .map_err(|err| format!("menu load {}: {}", path, err))?;

      let items: Vec<MenuItem> = serde_json::from_str(&raw)
      .map_err(|err| format!("menu parse {}: {}", path, err))?;

      log::info!("Menu loaded, {} items", items.len());
      Ok(Self { items })
   }

   pub fn item(&self, id: &str) -> Option<&MenuItem> {
      self.items.iter().find(|item| item.id == id)
   }

   pub fn items(&self) -> &[MenuItem] {
      &self.items
   }
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn option_parses_both_shapes() {
      let bare: MenuOption = serde_json::from_str(r#""no ice""#).unwrap();
      assert_eq!(bare, MenuOption::Label(String::from("no ice")));

      let priced: MenuOption = serde_json::from_str(r#"{"label":"cheese","priceDelta":200}"#).unwrap();
      assert_eq!(priced, MenuOption::Priced { label: String::from("cheese"), price_delta: 200 });
   }

   #[test]
   fn select_options_copies_matches() {
      let item: MenuItem = serde_json::from_str(r#"{
         "id": "y1", "name": "Burger", "category": "Food", "price": 800,
         "options": ["no pickles", {"label": "cheese", "priceDelta": 200}]
      }"#).unwrap();

      let picked = item.select_options(&["cheese"]).unwrap();
      assert_eq!(picked.len(), 1);
      assert_eq!(picked[0].price_delta(), 200);

      assert!(item.select_options(&["wasabi"]).is_err());
   }
}
