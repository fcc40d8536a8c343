use tokio::time::{sleep, Duration, Instant};

/// Minimum spacing between outbound calls, shared by both providers.
pub const MIN_REQUEST_SPACING: Duration = Duration::from_millis(1500);
/// Window during which no outbound call is attempted after a rate-limit signal.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Two-state request gate: Open (calls permitted, subject to spacing) and
/// Cooldown (calls blocked until a deadline). The cooldown is entered when a
/// provider signals a rate limit and cleared lazily on the next request once
/// the deadline has passed.
#[derive(Debug, Default)]
pub struct RateGate {
    last_request: Option<Instant>,
    limited_until: Option<Instant>,
}

impl RateGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.limited_until.map(|until| now < until).unwrap_or(false)
    }

    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        self.limited_until
            .and_then(|until| (now < until).then(|| until.duration_since(now)))
    }

    /// Clears an elapsed cooldown. Returns true when the gate actually
    /// transitioned back to Open.
    pub fn clear_elapsed_cooldown(&mut self, now: Instant) -> bool {
        match self.limited_until {
            Some(until) if now >= until => {
                self.limited_until = None;
                true
            }
            _ => false,
        }
    }

    /// Open → Cooldown. Re-triggering while already cooling down resets the
    /// deadline.
    pub fn begin_cooldown(&mut self, now: Instant) {
        self.limited_until = Some(now + RATE_LIMIT_COOLDOWN);
    }

    pub fn spacing_delay(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => MIN_REQUEST_SPACING.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn mark_request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Suspends until the spacing since the previous outbound call is
    /// satisfied, then records this call as the most recent one. Callers hold
    /// the gate across the wait so concurrent submissions space against each
    /// other rather than only against the last completed call.
    pub async fn acquire_slot(&mut self) {
        let delay = self.spacing_delay(Instant::now());
        if !delay.is_zero() {
            sleep(delay).await;
        }
        self.mark_request(Instant::now());
    }
}
