//! Potluck Core Library
//!
//! This crate provides the core functionality for potluck, a shared
//! multi-author checklist backed by a remote persisted collection.
//!
//! # Architecture
//!
//! The heart of the crate is the [`SyncController`]: it owns the in-memory
//! [`ItemCollection`], drives every remote call through the [`RemoteStore`]
//! trait, and applies a confirm-then-apply update policy — local state
//! changes only after the remote operation has succeeded, so no rollback
//! path exists. A successful add triggers a full reload (the server assigns
//! `id`/`created_at`); toggle, rename, and delete patch locally instead.
//!
//! # Quick Start
//!
//! ```text
//! let store = HttpRemoteStore::new(service_url, api_key);
//! let controller = SyncController::new(store);
//!
//! controller.load().await;
//! controller.add("Buy sparkling water", "Alex").await?;
//!
//! for item in controller.items() {
//!     println!("[{}] {}", if item.is_completed { "x" } else { " " }, item.task_name);
//! }
//! ```
//!
//! # Modules
//!
//! - `controller`: the synchronization controller (main entry point)
//! - `collection`: id-indexed in-memory item collection
//! - `models`: the checklist entry and insert payload
//! - `remote`: the remote store trait plus HTTP and in-memory adapters
//! - `profile`: display-name persistence behind a key-value interface
//! - `config`: application configuration

pub mod collection;
pub mod config;
pub mod controller;
pub mod models;
pub mod profile;
pub mod remote;

pub use collection::ItemCollection;
pub use config::Config;
pub use controller::{MissingActorName, SyncController};
pub use models::{partition, Item, NewItem};
pub use profile::{FileKvStore, KvStore};
pub use remote::http::HttpRemoteStore;
pub use remote::memory::MemoryRemoteStore;
pub use remote::{RemoteError, RemoteResult, RemoteStore};
