//! Transport-agnostic Field Kit protocol stack.
//!
//! Text commands tunnelled through a shared raw-HID endpoint.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Field Kit Stack                          │
//! │                                                             │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │  Frame   │──▶│  Codec   │──▶│  Engine  │──▶│ Dispatch │  │
//! │  │ (magic)  │   │ (ETX buf)│   │          │   │ (app)    │  │
//! │  └──────────┘   └──────────┘   └──────────┘   └──────────┘  │
//! │       ▲                             │                       │
//! │       │                             ▼                       │
//! │  ┌──────────┐                 ┌──────────┐                  │
//! │  │ raw HID  │◀────────────────│ Response │  (32-byte frame) │
//! │  │ (report) │   Transport     │ encoder  │                  │
//! │  └──────────┘                 └──────────┘                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod engine;
pub mod frame;
pub mod shared;
pub mod transport;
