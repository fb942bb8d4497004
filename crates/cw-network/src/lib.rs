//! `cw-network` — arc network, trips, and the congestion delay model.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`arc`]       | `ArcParams`, `Network` (stable-index arc arena)           |
//! | [`trip`]      | `Trip`                                                    |
//! | [`delay`]     | `DelayModel` — shared PWL pieces scaled per arc           |
//! | [`instance`]  | `Instance`, `InstanceBuilder`, validation                 |
//! | [`loader`]    | CSV instance loading                                      |
//! | [`generator`] | Seeded random instances (feature = `"gen"` only)          |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `gen`   | Enables the random instance generator via the `rand` crate. |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.          |

pub mod arc;
pub mod delay;
pub mod error;
pub mod instance;
pub mod loader;
pub mod trip;

#[cfg(feature = "gen")]
pub mod generator;


pub use arc::{ArcParams, Network};
pub use delay::DelayModel;
pub use error::{NetworkError, NetworkResult};
pub use instance::{Instance, InstanceBuilder};
pub use trip::Trip;
