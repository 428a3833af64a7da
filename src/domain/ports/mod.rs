//! Domain ports for the hexagonal boundary.

mod account_store;
mod id_generator;
mod mii_renderer;
mod pid_allocator;
mod timezone;

#[cfg(test)]
pub use account_store::MockAccountStore;
pub use account_store::{AccountStore, AccountStoreError};
pub use id_generator::{FixtureIdentifierGenerator, IdentifierGenerator, RandomIdentifierGenerator};
pub use mii_renderer::{MiiRenderError, MiiRenderer, UnimplementedMiiRenderer};
#[cfg(test)]
pub use pid_allocator::MockPidAllocator;
pub use pid_allocator::{PidAllocationError, PidAllocator};
pub use timezone::{FixedTimezoneOffsets, TimezoneOffsets, TzdbTimezoneOffsets};
