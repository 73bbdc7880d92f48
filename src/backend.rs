/* ===============================================================================
Restaurant self-order terminal.
REST transport to the order backend. 23 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use futures::future::BoxFuture;
use reqwest::Url;

use crate::cart::CartLine;
use crate::orders::{ServerOrder, SubmitPayload, TablePayload};

// The controller talks to the backend through this seam so tests can swap in
// a canned transport. Errors stay plain strings here, the controller wraps
// them into the user-facing taxonomy.
pub trait Transport: Send + Sync {
   fn fetch_orders<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<ServerOrder>, String>>;
   fn submit_order<'a>(&'a self, table: &'a str, items: &'a [CartLine]) -> BoxFuture<'a, Result<ServerOrder, String>>;
   fn checkout<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<(), String>>;
   fn call_staff<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<(), String>>;
}

pub struct Backend {
   base: Url,
   client: reqwest::Client,
}

impl Backend {
   pub fn new(base_url: &str) -> Result<Self, String> {
      let base = Url::parse(base_url)
      .map_err(|err| format!("backend url '{}': {}", base_url, err))?;

      Ok(Self { base, client: reqwest::Client::new() })
   }

   fn endpoint(&self, path: &str) -> Result<Url, String> {
      self.base.join(path)
      .map_err(|err| format!("backend endpoint '{}': {}", path, err))
   }

   async fn get_orders(&self, table: &str) -> Result<Vec<ServerOrder>, String> {
      let url = self.endpoint("orders")?;

      let response = self.client.get(url)
      .query(&[("table", table)])
      .send()
      .await
      .map_err(|err| format!("GET /orders: {}", err))?
      .error_for_status()
      .map_err(|err| format!("GET /orders: {}", err))?;

      response.json::<Vec<ServerOrder>>()
      .await
      .map_err(|err| format!("GET /orders body: {}", err))
   }

   async fn post_order(&self, table: &str, items: &[CartLine]) -> Result<ServerOrder, String> {
      let url = self.endpoint("orders")?;

      let response = self.client.post(url)
      .json(&SubmitPayload { table, items })
      .send()
      .await
      .map_err(|err| format!("POST /orders: {}", err))?
      .error_for_status()
      .map_err(|err| format!("POST /orders: {}", err))?;

      response.json::<ServerOrder>()
      .await
      .map_err(|err| format!("POST /orders body: {}", err))
   }

   async fn post_table(&self, path: &str, table: &str) -> Result<(), String> {
      let url = self.endpoint(path)?;

      self.client.post(url)
      .json(&TablePayload { table })
      .send()
      .await
      .map_err(|err| format!("POST /{}: {}", path, err))?
      .error_for_status()
      .map_err(|err| format!("POST /{}: {}", path, err))?;

      Ok(())
   }
}

impl Transport for Backend {
   fn fetch_orders<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<ServerOrder>, String>> {
      Box::pin(self.get_orders(table))
   }

   fn submit_order<'a>(&'a self, table: &'a str, items: &'a [CartLine]) -> BoxFuture<'a, Result<ServerOrder, String>> {
      Box::pin(self.post_order(table, items))
   }

   fn checkout<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<(), String>> {
      Box::pin(self.post_table("checkout", table))
   }

   fn call_staff<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<(), String>> {
      Box::pin(self.post_table("call-staff", table))
   }
}
