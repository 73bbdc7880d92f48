/* ===============================================================================
Restaurant self-order terminal.
Process settings from environment variables. 02 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::env;
use std::str::FromStr;
use once_cell::sync::OnceCell;

use crate::sync::CheckoutPolicy;

// Settings
pub static VARS: OnceCell<Vars> = OnceCell::new();

// Process-level settings. Cart and session state is deliberately not here,
// it lives in per-table contexts.
pub struct Vars {
   // Order backend base, e.g. http://kitchen.local:8080/api/
   pub backend_url: String,

   // Menu catalog file
   pub menu_path: String,

   // Boundary storage file
   pub storage_path: String,

   // Table served by this terminal
   pub table: String,

   // Price suffix
   pub price_unit: String,

   pub poll_interval_ms: u64,
   pub checkout_policy: CheckoutPolicy,
}

impl Vars {
   pub fn from_env() -> Self {
      Vars {
         backend_url: {
            match env::var("BACKEND_URL") {
               Ok(s) => s,
               Err(e) => {
                  log::info!("Something wrong with BACKEND_URL: {}", e);
                  String::from("http://localhost:8080/")
               }
            }
         },

         menu_path: {
            match env::var("MENU_PATH") {
               Ok(s) => s,
               Err(_) => String::from("menu.json"), // if the variable is not set, that's ok
            }
         },

         storage_path: {
            match env::var("STORAGE_PATH") {
               Ok(s) => s,
               Err(_) => String::from("samozakaz-storage.json"),
            }
         },

         table: {
            match env::var("TABLE_ID") {
               Ok(s) => s,
               Err(e) => {
                  log::info!("Something wrong with TABLE_ID: {}", e);
                  String::default()
               }
            }
         },

         price_unit: {
            match env::var("PRICE_UNIT") {
               Ok(s) => s,
               Err(_) => String::from("¥"),
            }
         },

         poll_interval_ms: {
            match env::var("POLL_INTERVAL_MS") {
               Ok(s) => match s.parse::<u64>() {
                  Ok(n) if n > 0 => n,
                  Ok(_) => {
                     log::info!("Something wrong with POLL_INTERVAL_MS: must be non-zero");
                     5000
                  }
                  Err(e) => {
                     log::info!("Something wrong with POLL_INTERVAL_MS: {}", e);
                     5000
                  }
               }
               Err(_) => 5000,
            }
         },

         checkout_policy: {
            match env::var("CHECKOUT_POLICY") {
               Ok(s) => match CheckoutPolicy::from_str(&s) {
                  Ok(p) => p,
                  Err(_) => {
                     log::info!("CHECKOUT_POLICY must be local or server-confirmed, got {}", s);
                     CheckoutPolicy::Local
                  }
               }
               Err(_) => CheckoutPolicy::Local,
            }
         },
      }
   }
}

// Price with units or bare number if the unit is not set
pub fn price_with_unit(price: i64) -> String {
   let unit = VARS.get()
   .map(|vars| vars.price_unit.as_str())
   .unwrap_or_default();
   format!("{}{}", price, unit)
}
