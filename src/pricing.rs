/* ===============================================================================
Restaurant self-order terminal.
Money and option arithmetic. 09 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use crate::menu::MenuOption;

// All amounts are integer yen, no rounding happens here

// Price of one unit: base price plus the deltas of priced options
pub fn unit_price(base_price: i64, options: &[MenuOption]) -> i64 {
   base_price + options.iter()
   .map(|opt| opt.price_delta())
   .sum::<i64>()
}

pub fn line_total(base_price: i64, options: &[MenuOption], quantity: u32) -> i64 {
   unit_price(base_price, options) * quantity as i64
}

// Canonical identity of a cart line. Option tokens are sorted with ordinal
// comparison, so {A,B} and {B,A} give the same key. A bare label and a priced
// option with the same label keep distinct tokens, no fuzzy matching.
pub fn identity_key(item_id: &str, options: &[MenuOption]) -> String {
   let mut tokens: Vec<String> = options.iter()
   .map(MenuOption::token)
   .collect();
   tokens.sort_unstable();

   format!("{}|{}", item_id, tokens.join(";"))
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   fn cheese() -> MenuOption {
      MenuOption::Priced { label: String::from("cheese"), price_delta: 200 }
   }

   fn no_ice() -> MenuOption {
      MenuOption::Label(String::from("no ice"))
   }

   #[test]
   fn unit_price_sums_deltas() {
      assert_eq!(unit_price(800, &[]), 800);
      assert_eq!(unit_price(800, &[cheese()]), 1000);
      assert_eq!(unit_price(800, &[cheese(), no_ice()]), 1000);
   }

   #[test]
   fn line_total_multiplies() {
      assert_eq!(line_total(800, &[cheese()], 2), 2000);
      assert_eq!(line_total(1000, &[], 3), 3000);
   }

   #[test]
   fn identity_key_ignores_option_order() {
      let ab = identity_key("7", &[cheese(), no_ice()]);
      let ba = identity_key("7", &[no_ice(), cheese()]);
      assert_eq!(ab, ba);
   }

   #[test]
   fn identity_key_separates_items_and_option_sets() {
      let plain = identity_key("7", &[]);
      let with_opt = identity_key("7", &[no_ice()]);
      let other_item = identity_key("8", &[]);
      assert_ne!(plain, with_opt);
      assert_ne!(plain, other_item);
   }

   #[test]
   fn priced_and_bare_labels_stay_distinct() {
      let bare = identity_key("7", &[MenuOption::Label(String::from("cheese"))]);
      let priced = identity_key("7", &[cheese()]);
      assert_ne!(bare, priced);
   }
}
