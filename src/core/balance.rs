//! Balance store - wallet balances and the app-wide masking toggle.
//!
//! Masking is deliberately global: hiding balances hides every monetary value
//! in the app, not individual fields.

use crate::{
    backend::BackendClient,
    core::format::format_currency,
    entities::wallet,
};

/// Local store for the user's wallet and the show/hide toggle.
#[derive(Debug)]
pub struct BalanceStore {
    user_id: String,
    wallet: Option<wallet::Model>,
    is_loading: bool,
    error: Option<String>,
    show_balances: bool,
}

impl BalanceStore {
    /// An empty store scoped to one user; balances start visible.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            wallet: None,
            is_loading: false,
            error: None,
            show_balances: true,
        }
    }

    /// Fetches the wallet row; failure surfaces via [`Self::error`] and the
    /// prior wallet (if any) stays.
    pub async fn load(&mut self, backend: &BackendClient) {
        self.is_loading = true;
        self.error = None;
        match backend.fetch_wallet(&self.user_id).await {
            Ok(wallet) => {
                self.wallet = wallet;
                self.is_loading = false;
            }
            Err(e) => {
                self.is_loading = false;
                self.error = Some(format!("Failed to fetch wallet: {e}"));
            }
        }
    }

    /// True while a wallet fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the most recent failed wallet fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Spendable balance in naira; zero until a wallet loads.
    #[must_use]
    pub fn balance(&self) -> i64 {
        self.wallet.as_ref().map_or(0, |w| w.balance)
    }

    /// Balance locked into payout plans, in naira.
    #[must_use]
    pub fn locked_balance(&self) -> i64 {
        self.wallet.as_ref().map_or(0, |w| w.locked_balance)
    }

    /// Whether monetary values render or mask, app-wide.
    #[must_use]
    pub const fn show_balances(&self) -> bool {
        self.show_balances
    }

    /// Flips the global masking toggle.
    pub const fn toggle_balances(&mut self) {
        self.show_balances = !self.show_balances;
    }

    /// The spendable balance rendered per the masking toggle.
    #[must_use]
    pub fn display_balance(&self) -> String {
        format_currency(self.balance(), self.show_balances)
    }

    /// The locked balance rendered per the masking toggle.
    #[must_use]
    pub fn display_locked_balance(&self) -> String {
        format_currency(self.locked_balance(), self.show_balances)
    }

    /// Drops the wallet and resets the toggle; used on sign-out.
    pub fn clear(&mut self) {
        self.wallet = None;
        self.is_loading = false;
        self.error = None;
        self.show_balances = true;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Result;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_load_populates_balances() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_wallet(db, "wallet-1", "user-1", 500_000, 1_200_000).await?;

        let mut store = BalanceStore::new("user-1");
        store.load(&backend).await;

        assert_eq!(store.balance(), 500_000);
        assert_eq!(store.locked_balance(), 1_200_000);
        assert!(store.error().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_wallet_reads_as_zero() -> Result<()> {
        let backend = setup_test_backend().await?;

        let mut store = BalanceStore::new("user-1");
        store.load(&backend).await;

        assert_eq!(store.balance(), 0);
        assert_eq!(store.locked_balance(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_masks_every_displayed_amount() -> Result<()> {
        let backend = setup_test_backend().await?;
        let db = backend.database().unwrap();
        create_test_wallet(db, "wallet-1", "user-1", 1_234_567, 89_000).await?;

        let mut store = BalanceStore::new("user-1");
        store.load(&backend).await;

        assert_eq!(store.display_balance(), "₦1,234,567");
        store.toggle_balances();
        assert_eq!(store.display_balance(), "••••••••");
        assert_eq!(store.display_locked_balance(), "••••••••");
        store.toggle_balances();
        assert_eq!(store.display_locked_balance(), "₦89,000");

        Ok(())
    }
}
