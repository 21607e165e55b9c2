use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Lead, LeadId};

/// Acknowledgement for one completed delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub lead_id: LeadId,
    pub email: String,
}

/// Delivers one campaign message to one lead.
///
/// Deliveries share no state with each other; the dispatcher runs them all at
/// once and only looks at the acknowledgements after every one has finished.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, lead: &Lead) -> Delivery;
}

/// Stand-in for a real mail provider: waits a fixed latency and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedMailer {
    latency: Duration,
}

impl SimulatedMailer {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedMailer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY)
    }
}

#[async_trait]
impl Mailer for SimulatedMailer {
    async fn deliver(&self, lead: &Lead) -> Delivery {
        tokio::time::sleep(self.latency).await;
        debug!(lead_id = lead.id, email = %lead.email, "simulated delivery completed");
        Delivery {
            lead_id: lead.id,
            email: lead.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_delivery_waits_the_configured_latency() {
        let mailer = SimulatedMailer::new(Duration::from_millis(250));
        let start = tokio::time::Instant::now();

        let delivery = mailer.deliver(&Lead::pending(9, "z@x.com")).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(300));
        assert_eq!(
            delivery,
            Delivery {
                lead_id: 9,
                email: "z@x.com".to_string()
            }
        );
    }

    #[test]
    fn default_latency_is_half_a_second() {
        assert_eq!(SimulatedMailer::default().latency(), Duration::from_millis(500));
    }
}
