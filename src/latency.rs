//! Artificial latency in front of store operations.
//!
//! The catalog is meant to stand in for a remote backend, so every operation
//! can be made to wait before it runs. By default nothing waits.

use std::time::Duration;

/// Operations that can be delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchBrands,
    FetchBrand,
    CreateBrand,
    UpdateBrand,
    DeleteBrand,
    FetchPhoneModels,
    FetchPhoneModel,
    CreatePhoneModel,
    UpdatePhoneModel,
    DeletePhoneModel,
    SearchPhones,
    FetchPhonesByBrand,
    GetStats,
    ResetData,
    Login,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchBrands => "fetch_brands",
            Operation::FetchBrand => "fetch_brand",
            Operation::CreateBrand => "create_brand",
            Operation::UpdateBrand => "update_brand",
            Operation::DeleteBrand => "delete_brand",
            Operation::FetchPhoneModels => "fetch_phone_models",
            Operation::FetchPhoneModel => "fetch_phone_model",
            Operation::CreatePhoneModel => "create_phone_model",
            Operation::UpdatePhoneModel => "update_phone_model",
            Operation::DeletePhoneModel => "delete_phone_model",
            Operation::SearchPhones => "search_phones",
            Operation::FetchPhonesByBrand => "fetch_phones_by_brand",
            Operation::GetStats => "get_stats",
            Operation::ResetData => "reset_data",
            Operation::Login => "login",
        }
    }

    /// Delay a real round trip to the simulated backend used to take.
    pub fn realistic_delay(&self) -> Duration {
        let ms = match self {
            Operation::FetchBrands => 600,
            Operation::FetchBrand => 400,
            Operation::CreateBrand => 800,
            Operation::UpdateBrand => 700,
            Operation::DeleteBrand => 600,
            Operation::FetchPhoneModels => 800,
            Operation::FetchPhoneModel => 500,
            Operation::CreatePhoneModel => 900,
            Operation::UpdatePhoneModel => 800,
            Operation::DeletePhoneModel => 600,
            Operation::SearchPhones => 700,
            Operation::FetchPhonesByBrand => 500,
            Operation::GetStats => 300,
            Operation::ResetData => 1000,
            Operation::Login => 1000,
        };
        Duration::from_millis(ms)
    }
}

/// How long operations wait before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    #[default]
    None,
    Fixed(Duration),
    Realistic,
}

impl Latency {
    pub fn delay_for(&self, operation: Operation) -> Duration {
        if cfg!(feature = "slowdown") {
            return operation.realistic_delay();
        }

        match self {
            Latency::None => Duration::ZERO,
            Latency::Fixed(delay) => *delay,
            Latency::Realistic => operation.realistic_delay(),
        }
    }

    pub async fn wait(&self, operation: Operation) {
        let delay = self.delay_for(operation);
        if !delay.is_zero() {
            tracing::trace!("Delaying {} by {:?}", operation.as_str(), delay);
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(all(test, not(feature = "slowdown")))]
mod tests {
    use super::*;

    #[test]
    fn test_default_latency_is_zero() {
        assert_eq!(Latency::default().delay_for(Operation::ResetData), Duration::ZERO);
    }

    #[test]
    fn test_fixed_latency_ignores_operation() {
        let latency = Latency::Fixed(Duration::from_millis(25));
        assert_eq!(latency.delay_for(Operation::GetStats), Duration::from_millis(25));
        assert_eq!(latency.delay_for(Operation::Login), Duration::from_millis(25));
    }

    #[test]
    fn test_realistic_latency_per_operation() {
        let latency = Latency::Realistic;
        assert_eq!(latency.delay_for(Operation::GetStats), Duration::from_millis(300));
        assert_eq!(
            latency.delay_for(Operation::CreatePhoneModel),
            Duration::from_millis(900)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_the_delay() {
        let start = tokio::time::Instant::now();
        Latency::Realistic.wait(Operation::FetchBrand).await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }
}
