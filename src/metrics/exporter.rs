use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::ClockProMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// This exporter writes in the Prometheus text exposition format so it can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(writer, "# TYPE {} {}", name, kind)
            .and_then(|_| writeln!(writer, "{} {}", name, value))
        {
            log::warn!("failed to export metric {}: {}", name, err);
        }
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<ClockProMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &ClockProMetricsSnapshot) {
        self.write_counter("get_calls_total", snapshot.get_calls);
        self.write_counter("get_hits_total", snapshot.get_hits);
        self.write_counter("get_misses_total", snapshot.get_misses);
        self.write_counter("insert_calls_total", snapshot.insert_calls);
        self.write_counter("insert_updates_total", snapshot.insert_updates);
        self.write_counter("insert_new_total", snapshot.insert_new);
        self.write_counter("evict_calls_total", snapshot.evict_calls);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter(
            "cold_to_hot_promotions_total",
            snapshot.cold_to_hot_promotions,
        );
        self.write_counter(
            "hot_to_cold_demotions_total",
            snapshot.hot_to_cold_demotions,
        );
        self.write_counter("test_insertions_total", snapshot.test_insertions);
        self.write_counter("test_hits_total", snapshot.test_hits);
        self.write_counter("test_expirations_total", snapshot.test_expirations);
        self.write_counter("hot_hand_steps_total", snapshot.hot_hand_steps);
        self.write_counter("cold_hand_steps_total", snapshot.cold_hand_steps);
        self.write_counter("test_hand_steps_total", snapshot.test_hand_steps);
        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("hot_len", snapshot.hot_len as u64);
        self.write_gauge("cold_len", snapshot.cold_len as u64);
        self.write_gauge("ghost_len", snapshot.ghost_len as u64);
        self.write_gauge("cold_target", snapshot.cold_target as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exporter_writes_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("clockpro", Vec::new());
        let snapshot = ClockProMetricsSnapshot {
            get_hits: 3,
            ghost_len: 2,
            capacity: 8,
            ..ClockProMetricsSnapshot::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE clockpro_get_hits_total counter"));
        assert!(text.contains("clockpro_get_hits_total 3"));
        assert!(text.contains("# TYPE clockpro_ghost_len gauge"));
        assert!(text.contains("clockpro_ghost_len 2"));
        assert!(text.contains("clockpro_capacity 8"));
    }

    #[test]
    fn exporter_without_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&ClockProMetricsSnapshot::default());

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.lines().any(|line| line == "get_calls_total 0"));
    }
}
