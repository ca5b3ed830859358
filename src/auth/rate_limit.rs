use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_ATTEMPTS: usize = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Failed sign-in attempts per client address within a sliding window.
#[derive(Clone)]
pub struct RateLimiter {
    attempts: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// True once `ip` has used up its attempts for the window. Expired
    /// attempts for `ip` are dropped on the way.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        self.is_blocked_at(ip, Instant::now())
    }

    fn is_blocked_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let Some(timestamps) = map.get_mut(&ip) else {
            return false;
        };
        timestamps.retain(|t| now.duration_since(*t) < self.window);
        if timestamps.is_empty() {
            map.remove(&ip);
            return false;
        }
        timestamps.len() >= self.max_attempts
    }

    pub fn record_failure(&self, ip: IpAddr) {
        self.record_failure_at(ip, Instant::now());
    }

    fn record_failure_at(&self, ip: IpAddr, at: Instant) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(ip).or_default().push(at);
    }

    /// Forget `ip` after a successful sign-in.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));
    const OTHER: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8));

    #[test]
    fn blocks_after_five_failures() {
        let limiter = RateLimiter::default();
        for _ in 0..4 {
            limiter.record_failure(IP);
        }
        assert!(!limiter.is_blocked(IP));
        limiter.record_failure(IP);
        assert!(limiter.is_blocked(IP));
        assert!(!limiter.is_blocked(OTHER));
        limiter.clear(IP);
        assert!(!limiter.is_blocked(IP));
    }

    #[test]
    fn attempts_expire_after_the_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();
        limiter.record_failure_at(IP, start);
        limiter.record_failure_at(IP, start);
        assert!(limiter.is_blocked_at(IP, start + Duration::from_secs(59)));
        assert!(!limiter.is_blocked_at(IP, start + Duration::from_secs(61)));
    }
}
