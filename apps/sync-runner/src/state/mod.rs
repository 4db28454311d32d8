//! # State Module
//!
//! Runtime state shared by the console commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SyncState                                       │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  InventorySync   │  │ MutationSimulator│  │  ActivityFeed        │  │
//! │  │  (engine, Clone) │  │  TaskHandle      │  │  TaskHandle          │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  mount():   connect (seed if empty) → start enabled timers             │
//! │  unmount(): stop timers → disconnect → close store                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod sync;

pub use sync::SyncState;
