//! Store query metrics.

use metrics::histogram;
use std::time::Instant;

/// Record how long a store query took.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "store_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Times one query and records it on [`record`](QueryTimer::record).
///
/// ```ignore
/// let timer = QueryTimer::new("list_applications");
/// let result = sqlx::query_as::<_, ApplicationEntity>(...).fetch_all(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }
}
