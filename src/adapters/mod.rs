//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements              | Connects to            |
//! |-------------|-------------------------|------------------------|
//! | `hardware`  | BootloaderPort, DelayNs | Host thread sleep      |
//! | `log_sink`  | EventSink               | `log` facade           |

pub mod hardware;
pub mod log_sink;
