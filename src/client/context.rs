//! Client Context
//!
//! The connection state every dispatcher needs, built once by the bootstrap
//! and passed down explicitly.

use super::error::{ClientError, ClientResult};
use crate::abi::Address;
use crate::clock::Clock;
use crate::contract::AttendanceContract;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClientContext {
    /// Bound attendance contract
    pub contract: Arc<dyn AttendanceContract>,
    /// Accounts the provider can sign for
    pub accounts: Vec<Address>,
    /// Account attendance is recorded for
    pub current_account: Address,
    /// Network the contract was resolved on
    pub network_id: String,
    /// Source of "today"
    pub clock: Arc<dyn Clock>,
}

impl ClientContext {
    /// First provider account; employees are registered from it
    pub fn first_account(&self) -> ClientResult<Address> {
        self.accounts.first().copied().ok_or(ClientError::NoAccounts)
    }

    /// Today's day index
    pub fn today(&self) -> u64 {
        self.clock.today_index()
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("accounts", &self.accounts)
            .field("current_account", &self.current_account)
            .field("network_id", &self.network_id)
            .finish_non_exhaustive()
    }
}
