/* ===============================================================================
Restaurant self-order terminal.
Main module, kiosk debug console. 07 May 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::UnboundedReceiverStream, StreamExt};

use samozakaz::environment as env;
use samozakaz::{start_polling, Backend, FileStore, Menu, SyncConfig, TableSession};

// ============================================================================
// [Run!]
// ============================================================================
#[tokio::main]
async fn main() {
   run().await;
}

async fn run() {
   let mut builder = pretty_env_logger::formatted_builder();
   builder.target(pretty_env_logger::env_logger::Target::Stdout);
   builder.init();

   log::info!("Starting...");

   // Settings from environments
   let vars = env::Vars::from_env();
   if env::VARS.set(vars).is_err() {
      log::info!("Something wrong with VARS");
   }
   let vars = env::VARS.get().unwrap();

   if vars.table.is_empty() {
      log::error!("TABLE_ID env variable missing");
      return;
   }

   // Catalog and durable boundary storage
   let menu = match Menu::load(&vars.menu_path) {
      Ok(menu) => menu,
      Err(err) => {
         log::error!("{}", err);
         return;
      }
   };

   let store = match FileStore::open(&vars.storage_path) {
      Ok(store) => Arc::new(store),
      Err(err) => {
         log::error!("{}", err);
         return;
      }
   };

   let backend = match Backend::new(&vars.backend_url) {
      Ok(backend) => Arc::new(backend),
      Err(err) => {
         log::error!("{}", err);
         return;
      }
   };

   let config = SyncConfig {
      poll_interval_ms: vars.poll_interval_ms,
      checkout_policy: vars.checkout_policy,
   };

   let session = Arc::new(TableSession::new(&vars.table, backend, store, config));
   let poll = start_polling(&session);

   // Console intents through a channel, like an update listener
   let (tx, rx) = mpsc::unbounded_channel::<String>();
   std::thread::spawn(move || {
      let mut line = String::new();
      while std::io::stdin().read_line(&mut line).is_ok() {
         if line.is_empty() || tx.send(line.trim().to_string()).is_err() {
            break;
         }
         line.clear();
      }
   });

   println!("Table {}. Commands: menu, cart, add <id> <qty> [opt,opt], qty <key> <n>, del <key>, order, bill, staff, quit", session.table());

   let mut intents = UnboundedReceiverStream::new(rx);
   while let Some(intent) = intents.next().await {
      if !handle_intent(&session, &menu, &intent).await {
         break;
      }
   }

   poll.stop();
   log::info!("Bye");
}

// Line keys embed option labels which may contain spaces, so everything
// after the verb (and the leading fixed arguments) is taken verbatim
// instead of being split on whitespace
fn split_verb(intent: &str) -> (&str, &str) {
   match intent.split_once(char::is_whitespace) {
      Some((verb, rest)) => (verb, rest.trim()),
      None => (intent.trim(), ""),
   }
}

// "qty <key> <n>": the quantity is the last word, the key is the rest
fn split_key_and_quantity(rest: &str) -> Option<(&str, i64)> {
   let (key, n) = rest.rsplit_once(char::is_whitespace)?;
   Some((key.trim_end(), n.parse().ok()?))
}

// Returns false when the console should exit
async fn handle_intent(session: &TableSession, menu: &Menu, intent: &str) -> bool {
   let (verb, rest) = split_verb(intent);

   match verb {
      "menu" => {
         for item in menu.items() {
            println!("{} {} [{}] {}", item.id, item.name, item.category, env::price_with_unit(item.price));
            for opt in &item.options {
               println!("   + {} {}", opt.label(), env::price_with_unit(opt.price_delta()));
            }
         }
      }

      "cart" => print_snapshot(session),

      "add" => match parse_add(menu, rest) {
         Ok((item, quantity, options)) => {
            let key = session.add_item(item, quantity, options);
            println!("Added, line key {}", key);
         }
         Err(err) => println!("{}", err),
      },

      "qty" => {
         let res = match split_key_and_quantity(rest) {
            Some((key, n)) => session.set_quantity(key, n),
            None => Err(String::from("usage: qty <key> <n>")),
         };
         if let Err(err) = res {
            println!("{}", err);
         }
      }

      "del" => {
         let res = if rest.is_empty() {
            Err(String::from("usage: del <key>"))
         } else {
            session.remove_line(rest)
         };
         if let Err(err) = res {
            println!("{}", err);
         }
      }

      "order" => match session.submit().await {
         Ok(order) => println!("Order {} placed, {}", order.id, env::price_with_unit(order.amount.unwrap_or_default())),
         Err(err) => println!("{}", err),
      },

      "bill" => match session.checkout().await {
         Ok(_) => println!("Settled, thank you!"),
         Err(err) => println!("{}", err),
      },

      "staff" => {
         session.call_staff().await;
         println!("Staff called");
      }

      "quit" => return false,

      "" => (),

      other => println!("Unknown command '{}'", other),
   }

   true
}

// "add <id> <qty> [opt,opt]": id and quantity are single words, the option
// list is the comma-separated remainder and may contain spaces
fn parse_add<'a>(menu: &'a Menu, rest: &str) -> Result<(&'a samozakaz::MenuItem, u32, Vec<samozakaz::MenuOption>), String> {
   let (id, rest) = split_verb(rest);
   if id.is_empty() {
      return Err(String::from("usage: add <id> <qty> [opt,opt]"));
   }

   let (qty_word, labels_word) = split_verb(rest);
   let quantity = qty_word.parse::<u32>().unwrap_or(1);

   let item = menu.item(id)
   .ok_or_else(|| format!("no menu item '{}'", id))?;

   let labels: Vec<&str> = if labels_word.is_empty() {
      Vec::new()
   } else {
      labels_word.split(',').map(str::trim).collect()
   };
   let options = item.select_options(&labels)?;

   Ok((item, quantity, options))
}

fn print_snapshot(session: &TableSession) {
   let snap = session.snapshot();

   if snap.cart.is_empty() {
      println!("Cart is empty");
   } else {
      for line in &snap.cart {
         println!("{}: {} x {} pcs. = {} /{}", line.name,
            env::price_with_unit(line.unit_price), line.quantity,
            env::price_with_unit(line.line_total), line.key);
      }
   }
   println!("Cart total: {}", env::price_with_unit(snap.cart_total));

   for order in &snap.orders {
      println!("Order {} [{}] {}", order.id, order.status, env::price_with_unit(order.amount.unwrap_or_default()));
   }
   println!("Session total: {}, to pay: {}{}",
      env::price_with_unit(snap.session_total),
      env::price_with_unit(snap.grand_total),
      if snap.fetch_error { " (last refresh failed)" } else { "" });
}
