use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::utils::time::now;

#[derive(Debug, Default)]
struct VisitCounters {
    total: u64,
    visitors: HashSet<IpAddr>,
    last_visit: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitSummary {
    pub total_visits: u64,
    pub unique_visitors: u64,
    pub last_visit: Option<DateTime<Utc>>,
}

/// In-memory page visit counter. Resets with the process.
#[derive(Clone, Default)]
pub struct AnalyticsService {
    counters: Arc<Mutex<VisitCounters>>,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_visit(&self, page: &str, user_agent: Option<&str>, ip: Option<IpAddr>) {
        tracing::info!(page, user_agent, ip = ?ip, "page visit");
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        counters.total += 1;
        counters.last_visit = Some(now());
        if let Some(ip) = ip {
            counters.visitors.insert(ip);
        }
    }

    pub fn summary(&self) -> VisitSummary {
        let counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        VisitSummary {
            total_visits: counters.total,
            unique_visitors: counters.visitors.len() as u64,
            last_visit: counters.last_visit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn counts_total_and_unique_visitors() {
        let analytics = AnalyticsService::new();
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        analytics.track_visit("home", Some("test"), Some(a));
        analytics.track_visit("home", None, Some(a));
        analytics.track_visit("home", None, Some(b));
        analytics.track_visit("home", None, None);

        let summary = analytics.summary();
        assert_eq!(summary.total_visits, 4);
        assert_eq!(summary.unique_visitors, 2);
        assert!(summary.last_visit.is_some());
    }
}
