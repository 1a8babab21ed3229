//! # BeanTown Architecture
//!
//! BeanTown is a **paginated remote-sync engine** for a jelly bean catalog. A
//! remote REST API serves the catalog in numbered pages. BeanTown caches
//! those pages in a local store and hands consumers an ordered, lazily paged
//! view that reads only from the cache and asks for more pages as the reader
//! approaches the end of what is loaded.
//!
//! The local store is the single source of truth: nothing reaches a consumer
//! without first being committed there.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Parses arguments, formats output, installs logging       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Paging sessions (jelly_beans) and point lookups          │
//! │  - Dispatch to commands, returns CmdResult                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Paging (paging/)              Commands (commands/*.rs)     │
//! │  - RemoteMediator: page sync   - refresh, list, show,       │
//! │  - CacheFreshness: start gate    status, config             │
//! │  - Pager / PagingSession                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//! ┌────────────────────────────┐  ┌─────────────────────────────┐
//! │  Network (network/)        │  │  Storage (store/)           │
//! │  - JellyBeanNetworkSource  │  │  - LocalStore trait         │
//! │  - HTTP + fake sources     │  │  - FileStore, InMemoryStore │
//! └────────────────────────────┘  └─────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust arguments and returns regular Rust types
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! ## Sync Model
//!
//! Every fetched page is committed together with its [`model::RemoteKey`]
//! (previous/next page links) in a single store transaction. The mediator
//! reads those keys back to decide which page an append or prepend needs,
//! so it keeps no state of its own. A refresh clears both tables and writes
//! page one in the same transaction, so readers never observe an empty cache
//! in between.
//!
//! ## Testing Strategy
//!
//! 1. **Store / network** (`store/`, `network/`): unit tests against
//!    `InMemoryStore` and `FakeJellyBeanSource`.
//! 2. **Paging** (`paging/`): the mediator and sessions are driven end to end
//!    against the in-memory fixtures. This is where most tests live.
//! 3. **Commands / API**: dispatch and message tests.
//! 4. **CLI** (`tests/`): the binary run offline against a temp data dir.
//!
//! Fixtures are public behind the `test_utils` feature.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`paging`]: Remote mediator, freshness gate and paging sessions
//! - [`commands`]: Logic for each CLI command
//! - [`store`]: Storage abstraction and implementations
//! - [`network`]: Remote data source contract, HTTP client, color decoding
//! - [`model`]: Core data types (`JellyBean`, `RemoteKey`)
//! - [`mapper`]: Network to local entity conversion
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod network;
pub mod paging;
pub mod store;
