/* ===============================================================================
Restaurant self-order terminal.
Durable client-side key-value storage. 16 Apr 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// The only state that must survive a process restart is the checkout
// boundary, one integer per table. Anything implementing this trait can
// back the session tracker.
pub trait BoundaryStore: Send + Sync {
   fn read(&self, key: &str) -> Option<i64>;
   fn write(&self, key: &str, value: i64) -> Result<(), String>;
}

// Write-through store over a single JSON file, the tablet equivalent of
// browser local storage
pub struct FileStore {
   path: PathBuf,
   cache: Mutex<HashMap<String, i64>>,
}

impl FileStore {
   pub fn open(path: &str) -> Result<Self, String> {
      let path = PathBuf::from(path);

      let cache = if path.exists() {
         let raw = fs::read_to_string(&path)
         .map_err(|err| format!("storage read {}: {}", path.display(), err))?;

         serde_json::from_str(&raw)
         .map_err(|err| format!("storage parse {}: {}", path.display(), err))?
      } else {
         HashMap::new()
      };

      Ok(Self { path, cache: Mutex::new(cache) })
   }

   fn flush(&self, cache: &HashMap<String, i64>) -> Result<(), String> {
      let raw = serde_json::to_string(cache)
      .map_err(|err| format!("storage serialize: {}", err))?;

      fs::write(&self.path, raw)
      .map_err(|err| format!("storage write {}: {}", self.path.display(), err))
   }
}

impl BoundaryStore for FileStore {
   fn read(&self, key: &str) -> Option<i64> {
      self.cache.lock().unwrap().get(key).copied()
   }

   fn write(&self, key: &str, value: i64) -> Result<(), String> {
      let mut cache = self.cache.lock().unwrap();
      cache.insert(key.to_string(), value);
      self.flush(&cache)
   }
}

// Volatile store for tests and for running without a writable disk
#[derive(Default)]
pub struct MemoryStore {
   cache: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
   pub fn new() -> Self {
      Self::default()
   }
}

impl BoundaryStore for MemoryStore {
   fn read(&self, key: &str) -> Option<i64> {
      self.cache.lock().unwrap().get(key).copied()
   }

   fn write(&self, key: &str, value: i64) -> Result<(), String> {
      self.cache.lock().unwrap().insert(key.to_string(), value);
      Ok(())
   }
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn file_store_survives_reopen() {
      let path = std::env::temp_dir()
      .join(format!("samozakaz-storage-test-{}.json", std::process::id()));
      let path = path.to_str().unwrap().to_string();
      let _ = fs::remove_file(&path);

      {
         let store = FileStore::open(&path).unwrap();
         assert_eq!(store.read("lastCheckoutBoundary:12"), None);
         store.write("lastCheckoutBoundary:12", 777).unwrap();
      }

      let store = FileStore::open(&path).unwrap();
      assert_eq!(store.read("lastCheckoutBoundary:12"), Some(777));

      let _ = fs::remove_file(&path);
   }

   #[test]
   fn memory_store_round_trip() {
      let store = MemoryStore::new();
      assert_eq!(store.read("k"), None);
      store.write("k", 5).unwrap();
      assert_eq!(store.read("k"), Some(5));
   }
}
